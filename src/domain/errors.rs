//! Domain errors for the Trinity client.

use thiserror::Error;

/// Message used when a failed call carries no structured `detail`.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Errors surfaced by the session components.
///
/// Backend failures are folded into component state wherever the component
/// has a failure state of its own; these variants are what reaches callers
/// directly (precondition violations and operations with no state machine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Session is locked: verify a license token first")]
    Locked,

    #[error("License verification failed: {0}")]
    LicenseInvalid(String),

    #[error("License verification already in progress")]
    VerificationInProgress,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Test generation failed: {0}")]
    GenerationFailed(String),

    #[error("A generation request is already in flight")]
    SubmissionInProgress,

    #[error("Artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    #[error("Failed to load history list: {0}")]
    HistoryListFailed(String),

    #[error("Failed to load history file: {0}")]
    HistoryContentFailed(String),

    #[error("Test run failed: {0}")]
    TestRunFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors reported by an [`AssuranceBackend`](crate::domain::ports::AssuranceBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// The request never produced a response.
    #[error("Transport failure: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the contract.
    #[error("Malformed response: {0}")]
    Decode(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Structured `detail` from the error body, if the backend supplied one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// The user-visible message: the backend's `detail`, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}
