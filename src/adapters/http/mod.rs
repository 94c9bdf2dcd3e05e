//! HTTP adapter for the assurance backend.

pub mod client;
pub mod models;

pub use client::HttpAssuranceBackend;
