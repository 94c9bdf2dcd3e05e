//! Port for the remote assurance backend.

use async_trait::async_trait;

use crate::domain::errors::BackendResult;
use crate::domain::models::{
    GeneratedTests, GenerationRequest, HistoryEntry, HistoryFileContent, LicenseVerification,
    RepoKey, TestRunReport, TestRunRequest,
};

/// The remote service that verifies licenses, generates tests and stores
/// their history.
///
/// Implementations perform exactly one call per method invocation and never
/// retry; every retry is a fresh user action.
#[async_trait]
pub trait AssuranceBackend: Send + Sync {
    /// `POST /api/license/verify`
    async fn verify_license(&self, license_token: &str) -> BackendResult<LicenseVerification>;

    /// `POST /api/tests/generate`
    async fn generate_tests(&self, request: &GenerationRequest) -> BackendResult<GeneratedTests>;

    /// `GET /api/tests/download/{repo_key}`, raw zip bytes
    async fn download_bundle(&self, repo_key: &RepoKey) -> BackendResult<Vec<u8>>;

    /// `GET /api/history/{repo_key}`, in backend order
    async fn list_history(&self, repo_key: &RepoKey) -> BackendResult<Vec<HistoryEntry>>;

    /// `GET /api/history/{repo_key}/file/{filename}`
    async fn fetch_history_file(
        &self,
        repo_key: &RepoKey,
        filename: &str,
    ) -> BackendResult<HistoryFileContent>;

    /// `POST /api/tests/run`
    async fn run_tests(&self, request: &TestRunRequest) -> BackendResult<TestRunReport>;
}
