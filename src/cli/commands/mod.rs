//! CLI command implementations.

pub mod generate;
pub mod history;
pub mod repo_key;
pub mod run;
pub mod verify;
