//! Mock backend for testing.
//!
//! Responses are scripted per endpoint (and per repository / filename where
//! the endpoint takes one). Delays let tests hold a call open to exercise
//! in-flight and out-of-order completion.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{BackendError, BackendResult};
use crate::domain::models::{
    GeneratedTests, GenerationRequest, HistoryEntry, HistoryFileContent, LicenseVerification,
    RepoKey, ResultStatus, TestRunReport, TestRunRequest,
};
use crate::domain::ports::AssuranceBackend;

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    VerifyLicense { license_token: String },
    GenerateTests { repo_url: String, dry_run: bool },
    DownloadBundle { repo_key: RepoKey },
    ListHistory { repo_key: RepoKey },
    FetchHistoryFile { repo_key: RepoKey, filename: String },
    RunTests(TestRunRequest),
}

fn not_found(detail: &str) -> BackendError {
    BackendError::Status {
        status: 404,
        detail: Some(detail.to_string()),
    }
}

/// Scripted in-memory [`AssuranceBackend`].
pub struct MockBackend {
    license: RwLock<BackendResult<LicenseVerification>>,
    license_delay: RwLock<Duration>,
    generation: RwLock<BackendResult<GeneratedTests>>,
    generation_delay: RwLock<Duration>,
    bundles: RwLock<HashMap<RepoKey, BackendResult<Vec<u8>>>>,
    history: RwLock<HashMap<RepoKey, BackendResult<Vec<HistoryEntry>>>>,
    history_delay: RwLock<Duration>,
    files: RwLock<HashMap<(RepoKey, String), BackendResult<String>>>,
    file_delays: RwLock<HashMap<String, Duration>>,
    test_run: RwLock<BackendResult<TestRunReport>>,
    calls: RwLock<Vec<BackendCall>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// A backend that accepts any license and generates a trivial test.
    pub fn new() -> Self {
        Self {
            license: RwLock::new(Ok(LicenseVerification {
                status: "✅ License valid".to_string(),
            })),
            license_delay: RwLock::new(Duration::ZERO),
            generation: RwLock::new(Ok(GeneratedTests {
                status: Some("success".to_string()),
                generated_test_code: "def test_generated():\n    assert True\n".to_string(),
            })),
            generation_delay: RwLock::new(Duration::ZERO),
            bundles: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
            history_delay: RwLock::new(Duration::ZERO),
            files: RwLock::new(HashMap::new()),
            file_delays: RwLock::new(HashMap::new()),
            test_run: RwLock::new(Ok(TestRunReport {
                status: ResultStatus::Success,
                output: "1 passed".to_string(),
                error: None,
            })),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_license_status(mut self, status: impl Into<String>) -> Self {
        *self.license.get_mut() = Ok(LicenseVerification {
            status: status.into(),
        });
        self
    }

    pub fn with_license_error(mut self, error: BackendError) -> Self {
        *self.license.get_mut() = Err(error);
        self
    }

    pub fn with_license_delay(mut self, delay: Duration) -> Self {
        *self.license_delay.get_mut() = delay;
        self
    }

    pub fn with_generated_code(mut self, code: impl Into<String>) -> Self {
        *self.generation.get_mut() = Ok(GeneratedTests {
            status: Some("success".to_string()),
            generated_test_code: code.into(),
        });
        self
    }

    pub fn with_generation_response(mut self, response: BackendResult<GeneratedTests>) -> Self {
        *self.generation.get_mut() = response;
        self
    }

    pub fn with_generation_delay(mut self, delay: Duration) -> Self {
        *self.generation_delay.get_mut() = delay;
        self
    }

    pub fn with_bundle(mut self, repo_key: &RepoKey, content: impl Into<Vec<u8>>) -> Self {
        self.bundles
            .get_mut()
            .insert(repo_key.clone(), Ok(content.into()));
        self
    }

    pub fn with_bundle_error(mut self, repo_key: &RepoKey, error: BackendError) -> Self {
        self.bundles.get_mut().insert(repo_key.clone(), Err(error));
        self
    }

    pub fn with_history<I, S>(mut self, repo_key: &RepoKey, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = files.into_iter().map(HistoryEntry::new).collect();
        self.history.get_mut().insert(repo_key.clone(), Ok(entries));
        self
    }

    pub fn with_history_error(mut self, repo_key: &RepoKey, error: BackendError) -> Self {
        self.history.get_mut().insert(repo_key.clone(), Err(error));
        self
    }

    pub fn with_history_delay(mut self, delay: Duration) -> Self {
        *self.history_delay.get_mut() = delay;
        self
    }

    pub fn with_file(
        mut self,
        repo_key: &RepoKey,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.files
            .get_mut()
            .insert((repo_key.clone(), filename.into()), Ok(content.into()));
        self
    }

    pub fn with_file_error(
        mut self,
        repo_key: &RepoKey,
        filename: impl Into<String>,
        error: BackendError,
    ) -> Self {
        self.files
            .get_mut()
            .insert((repo_key.clone(), filename.into()), Err(error));
        self
    }

    /// Hold every fetch of `filename` open for `delay`.
    pub fn with_file_delay(mut self, filename: impl Into<String>, delay: Duration) -> Self {
        self.file_delays.get_mut().insert(filename.into(), delay);
        self
    }

    pub fn with_test_run(mut self, response: BackendResult<TestRunReport>) -> Self {
        *self.test_run.get_mut() = response;
        self
    }

    /// Replace the generation response between submissions.
    pub async fn set_generation_response(&self, response: BackendResult<GeneratedTests>) {
        *self.generation.write().await = response;
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn record(&self, call: BackendCall) {
        self.calls.write().await.push(call);
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl AssuranceBackend for MockBackend {
    async fn verify_license(&self, license_token: &str) -> BackendResult<LicenseVerification> {
        self.record(BackendCall::VerifyLicense {
            license_token: license_token.to_string(),
        })
        .await;
        let delay = *self.license_delay.read().await;
        pause(delay).await;
        self.license.read().await.clone()
    }

    async fn generate_tests(&self, request: &GenerationRequest) -> BackendResult<GeneratedTests> {
        self.record(BackendCall::GenerateTests {
            repo_url: request.repo_url().to_string(),
            dry_run: request.is_dry_run(),
        })
        .await;
        let delay = *self.generation_delay.read().await;
        pause(delay).await;
        self.generation.read().await.clone()
    }

    async fn download_bundle(&self, repo_key: &RepoKey) -> BackendResult<Vec<u8>> {
        self.record(BackendCall::DownloadBundle {
            repo_key: repo_key.clone(),
        })
        .await;
        self.bundles
            .read()
            .await
            .get(repo_key)
            .cloned()
            .unwrap_or_else(|| Err(not_found("ZIP file not found.")))
    }

    async fn list_history(&self, repo_key: &RepoKey) -> BackendResult<Vec<HistoryEntry>> {
        self.record(BackendCall::ListHistory {
            repo_key: repo_key.clone(),
        })
        .await;
        let delay = *self.history_delay.read().await;
        pause(delay).await;
        self.history
            .read()
            .await
            .get(repo_key)
            .cloned()
            .unwrap_or_else(|| {
                Err(not_found(&format!("No history found for repo '{repo_key}'.")))
            })
    }

    async fn fetch_history_file(
        &self,
        repo_key: &RepoKey,
        filename: &str,
    ) -> BackendResult<HistoryFileContent> {
        self.record(BackendCall::FetchHistoryFile {
            repo_key: repo_key.clone(),
            filename: filename.to_string(),
        })
        .await;
        let delay = self
            .file_delays
            .read()
            .await
            .get(filename)
            .copied()
            .unwrap_or_default();
        pause(delay).await;

        let content = self
            .files
            .read()
            .await
            .get(&(repo_key.clone(), filename.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(not_found("File not found.")))?;
        Ok(HistoryFileContent {
            filename: filename.to_string(),
            content,
        })
    }

    async fn run_tests(&self, request: &TestRunRequest) -> BackendResult<TestRunReport> {
        self.record(BackendCall::RunTests(*request)).await;
        self.test_run.read().await.clone()
    }
}
