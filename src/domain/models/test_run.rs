//! Remote test run model.

use serde::{Deserialize, Serialize};

use super::generation::{Language, ResultStatus, TestType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestRunRequest {
    pub language: Language,
    pub test_type: TestType,
}

/// Captured output of a backend test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunReport {
    pub status: ResultStatus,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestRunReport {
    /// Report for a run that never produced runner output.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            output: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_parses_backend_body() {
        let report: TestRunReport =
            serde_json::from_str(r#"{"status":"error","output":"1 failed","error":"AssertionError"}"#)
                .unwrap();
        assert!(!report.is_success());
        assert_eq!(report.error.as_deref(), Some("AssertionError"));

        let report: TestRunReport = serde_json::from_str(r#"{"status":"success","output":"ok"}"#).unwrap();
        assert!(report.is_success());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = TestRunRequest {
            language: Language::Java,
            test_type: TestType::Unit,
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            serde_json::json!({"language": "java", "test_type": "unit"})
        );
    }
}
