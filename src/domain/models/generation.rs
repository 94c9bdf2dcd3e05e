//! Test generation domain model.
//!
//! A [`GenerationRequest`] is built fresh for every submission from the user's
//! [`GenerationParams`] and the verified license token, and is never modified
//! after it is handed to the backend. Its outcome is a single
//! [`GenerationResult`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::license::redact_token;
use super::repo_key::RepoKey;
use crate::domain::errors::ClientError;

/// Target language of the generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
    Javascript,
    Typescript,
}

impl Language {
    pub const ALL: [Self; 4] = [Self::Python, Self::Java, Self::Javascript, Self::Typescript];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
        }
    }
}

impl FromStr for Language {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "javascript" | "js" => Ok(Self::Javascript),
            "typescript" | "ts" => Ok(Self::Typescript),
            other => Err(ClientError::InvalidRequest(format!(
                "unsupported language '{other}' (expected python, java, javascript or typescript)"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of tests to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Let the backend pick
    #[default]
    Auto,
    Unit,
    /// UI / end-to-end
    Ui,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Unit => "unit",
            Self::Ui => "ui",
        }
    }
}

impl FromStr for TestType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "unit" => Ok(Self::Unit),
            "ui" | "e2e" => Ok(Self::Ui),
            other => Err(ClientError::InvalidRequest(format!(
                "unsupported test type '{other}' (expected auto, unit or ui)"
            ))),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied generation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationParams {
    pub repo_url: String,
    pub language: Language,
    pub file_path: Option<String>,
    pub folder_filter: Option<String>,
    pub test_type: TestType,
    pub dry_run: bool,
}

impl GenerationParams {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_folder_filter(mut self, folder_filter: impl Into<String>) -> Self {
        self.folder_filter = Some(folder_filter.into());
        self
    }

    pub fn with_test_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn repo_key(&self) -> RepoKey {
        RepoKey::derive(&self.repo_url)
    }

    /// Check the parameters before anything is sent.
    ///
    /// Path filters are limited to the characters the backend accepts.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.repo_url.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "repository URL is required".to_string(),
            ));
        }
        if self.repo_key().is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "cannot derive a repository name from '{}'",
                self.repo_url.trim()
            )));
        }
        for (name, value) in [
            ("file path", &self.file_path),
            ("folder filter", &self.folder_filter),
        ] {
            if let Some(value) = value {
                if !value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.'))
                {
                    return Err(ClientError::InvalidRequest(format!(
                        "{name} '{value}' may only contain letters, digits, '_', '-', '/' and '.'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A generation job as sent to the backend.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    repo_url: String,
    language: Language,
    file_path: Option<String>,
    folder_filter: Option<String>,
    dry_run: bool,
    test_type: TestType,
    license_token: String,
}

impl GenerationRequest {
    /// Build the request for `params` under the verified `license_token`.
    ///
    /// Blank optional filters are sent as absent.
    pub fn new(params: &GenerationParams, license_token: impl Into<String>) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            repo_url: params.repo_url.trim().to_string(),
            language: params.language,
            file_path: non_blank(&params.file_path),
            folder_filter: non_blank(&params.folder_filter),
            dry_run: params.dry_run,
            test_type: params.test_type,
            license_token: license_token.into(),
        }
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn folder_filter(&self) -> Option<&str> {
        self.folder_filter.as_deref()
    }

    pub fn test_type(&self) -> TestType {
        self.test_type
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn license_token(&self) -> &str {
        &self.license_token
    }

    pub fn repo_key(&self) -> RepoKey {
        RepoKey::derive(&self.repo_url)
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("repo_url", &self.repo_url)
            .field("language", &self.language)
            .field("file_path", &self.file_path)
            .field("folder_filter", &self.folder_filter)
            .field("dry_run", &self.dry_run)
            .field("test_type", &self.test_type)
            .field("license_token", &redact_token(&self.license_token))
            .finish()
    }
}

/// Backend answer to a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTests {
    /// `success` or `error`; older backends omit it
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub generated_test_code: String,
}

impl GeneratedTests {
    pub fn is_error(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("error"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Outcome of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl GenerationResult {
    pub fn success(generated_code: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Success,
            generated_code: Some(generated_code.into()),
            error_detail: None,
        }
    }

    pub fn failure(error_detail: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            generated_code: None,
            error_detail: Some(error_detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}

/// Lifecycle of the generation manager.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Submitting {
        repo_key: RepoKey,
        dry_run: bool,
    },
    Succeeded(GenerationResult),
    Failed(GenerationResult),
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Succeeded(result) | Self::Failed(result) => Some(result),
            Self::Idle | Self::Submitting { .. } => None,
        }
    }
}
