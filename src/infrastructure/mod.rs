//! Infrastructure layer module
//!
//! Configuration loading and logging setup for the binary and library.

pub mod config;
pub mod logging;
