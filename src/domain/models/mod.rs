//! Domain models for the Trinity client.

pub mod artifact;
pub mod config;
pub mod generation;
pub mod history;
pub mod license;
pub mod repo_key;
pub mod test_run;

pub use artifact::ArtifactBundle;
pub use config::{BackendConfig, Config, LogFormat, LoggingConfig, OutputConfig, RotationPolicy};
pub use generation::{
    GeneratedTests, GenerationParams, GenerationRequest, GenerationResult, GenerationState,
    Language, ResultStatus, TestType,
};
pub use history::{HistoryContentState, HistoryEntry, HistoryFileContent, HistoryListState};
pub use license::{redact_token, LicenseClaims, LicenseSession, LicenseState, LicenseVerification};
pub use repo_key::RepoKey;
pub use test_run::{TestRunReport, TestRunRequest};
