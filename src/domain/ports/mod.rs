//! Domain ports (interfaces) for external dependencies.

pub mod assurance_backend;

pub use assurance_backend::AssuranceBackend;
