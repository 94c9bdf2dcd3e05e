//! Domain layer for the Trinity client
//!
//! This module contains the session models, the error taxonomy and the
//! backend port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{BackendError, BackendResult, ClientError, ClientResult};
