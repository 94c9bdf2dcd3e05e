//! Trinity - license-gated AI test generation client
//!
//! Trinity talks to an assurance backend that generates tests for a
//! repository. A session is locked until a license token verifies; once
//! unlocked it can submit one generation at a time, download the persisted
//! test bundle for a repository and browse that repository's test history.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Session models, error taxonomy, backend port
//! - **Adapters** (`adapters`): HTTP and in-memory implementations of the port
//! - **Service Layer** (`services`): License gate, generation manager, artifact
//!   retriever, history browser, test runs and result presentation
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use trinity::adapters::HttpAssuranceBackend;
//! use trinity::domain::models::{BackendConfig, GenerationParams};
//! use trinity::services::AssuranceSession;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let backend = HttpAssuranceBackend::new(&BackendConfig::default())?;
//! let session = AssuranceSession::new(Arc::new(backend));
//!
//! session.license().verify("my-license-token").await?;
//! let result = session
//!     .generations()
//!     .submit(&GenerationParams::new("https://github.com/org/my-repo.git"))
//!     .await?;
//! println!("{:?}", result.generated_code);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Config, GenerationParams, GenerationResult, RepoKey};
pub use domain::{BackendError, ClientError, ClientResult};
pub use services::AssuranceSession;
