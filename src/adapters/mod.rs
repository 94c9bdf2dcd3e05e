//! Adapters implementing the domain ports.

pub mod http;
pub mod mock;

pub use http::HttpAssuranceBackend;
pub use mock::{BackendCall, MockBackend};
