//! Remote test runs.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::license_gate::LicenseGate;
use crate::domain::errors::{ClientResult, GENERIC_FAILURE_MESSAGE};
use crate::domain::models::{Language, TestRunReport, TestRunRequest, TestType};
use crate::domain::ports::AssuranceBackend;

/// Triggers a test run on the backend and captures its output.
pub struct TestRunService {
    backend: Arc<dyn AssuranceBackend>,
    gate: Arc<LicenseGate>,
}

impl TestRunService {
    pub fn new(backend: Arc<dyn AssuranceBackend>, gate: Arc<LicenseGate>) -> Self {
        Self { backend, gate }
    }

    /// Run the backend's suite for `language` / `test_type`.
    ///
    /// Only a locked session is an `Err`. Backend failures come back as an
    /// error report so they can be presented like a failed run.
    #[instrument(skip(self))]
    pub async fn run(&self, language: Language, test_type: TestType) -> ClientResult<TestRunReport> {
        self.gate.require_unlocked().await?;

        let request = TestRunRequest {
            language,
            test_type,
        };
        let report = match self.backend.run_tests(&request).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "test run request failed");
                TestRunReport::failed(err.message_or(GENERIC_FAILURE_MESSAGE))
            }
        };

        info!(status = report.status.as_str(), "test run finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BackendCall, MockBackend};
    use crate::domain::errors::{BackendError, ClientError};
    use crate::domain::models::ResultStatus;

    async fn service(mock: MockBackend, unlock: bool) -> (Arc<MockBackend>, TestRunService) {
        let mock = Arc::new(mock);
        let backend = Arc::clone(&mock) as Arc<dyn AssuranceBackend>;
        let gate = Arc::new(LicenseGate::new(Arc::clone(&backend)));
        if unlock {
            gate.verify("abc123").await.unwrap();
        }
        (mock, TestRunService::new(backend, gate))
    }

    #[tokio::test]
    async fn test_locked_run_is_rejected() {
        let (mock, service) = service(MockBackend::new(), false).await;

        let result = service.run(Language::Python, TestType::Auto).await;

        assert_eq!(result, Err(ClientError::Locked));
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_run_returns_backend_report() {
        let (mock, service) = service(
            MockBackend::new().with_test_run(Ok(TestRunReport {
                status: ResultStatus::Error,
                output: "1 failed".to_string(),
                error: Some("AssertionError".to_string()),
            })),
            true,
        )
        .await;

        let report = service.run(Language::Java, TestType::Unit).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.output, "1 failed");
        assert!(mock.calls().await.contains(&BackendCall::RunTests(TestRunRequest {
            language: Language::Java,
            test_type: TestType::Unit,
        })));
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_report() {
        let (_mock, service) = service(
            MockBackend::new().with_test_run(Err(BackendError::Status {
                status: 500,
                detail: Some("Unsupported language".to_string()),
            })),
            true,
        )
        .await;

        let report = service.run(Language::Typescript, TestType::Ui).await.unwrap();

        assert_eq!(report, TestRunReport::failed("Unsupported language"));
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let (_mock, service) = service(
            MockBackend::new().with_test_run(Err(BackendError::Network("refused".to_string()))),
            true,
        )
        .await;

        let report = service.run(Language::Python, TestType::Auto).await.unwrap();

        assert_eq!(report.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }
}
