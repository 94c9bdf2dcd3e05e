//! HTTP client for the assurance backend.
//!
//! One method per backend endpoint. Non-2xx answers become
//! [`BackendError::Status`] carrying the body's `detail`, transport failures
//! become [`BackendError::Network`]. Nothing is retried.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use tracing::{debug, instrument, warn};

use super::models::{ErrorBody, HistoryFileBody, HistoryListBody, VerifyLicenseBody};
use crate::domain::errors::{BackendError, BackendResult};
use crate::domain::models::{
    BackendConfig, GeneratedTests, GenerationRequest, HistoryEntry, HistoryFileContent,
    LicenseVerification, RepoKey, TestRunReport, TestRunRequest,
};
use crate::domain::ports::AssuranceBackend;
use crate::infrastructure::logging::SecretScrubber;

/// [`AssuranceBackend`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpAssuranceBackend {
    /// Reusable HTTP client with connection pooling
    http: Client,
    base_url: Url,
    scrubber: SecretScrubber,
}

impl HttpAssuranceBackend {
    /// Create a client for the backend described by `config`.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .with_context(|| format!("Invalid backend base URL '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Backend base URL '{base_url}' cannot carry API paths");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            scrubber: SecretScrubber::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::Network(format!("base URL {} cannot carry API paths", self.base_url))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> BackendResult<Response> {
        debug!(%method, %url, "backend request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "backend request failed");
            BackendError::Network(transport_message(&e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message());
        warn!(
            %method,
            %url,
            status = status.as_u16(),
            body = %self.scrubber.scrub_message(&body),
            "backend returned error status"
        );

        Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> BackendResult<T> {
        let response = self.send(method, url, body).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                BackendError::Decode(e.to_string())
            } else {
                BackendError::Network(transport_message(&e))
            }
        })
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not connect to backend".to_string()
    } else {
        err.to_string()
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> BackendResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl AssuranceBackend for HttpAssuranceBackend {
    #[instrument(skip_all)]
    async fn verify_license(&self, license_token: &str) -> BackendResult<LicenseVerification> {
        let url = self.endpoint(&["license", "verify"])?;
        let body = to_body(&VerifyLicenseBody { license_token })?;
        self.send_json(Method::POST, url, Some(body)).await
    }

    #[instrument(skip_all, fields(repo_key = %request.repo_key(), dry_run = request.is_dry_run()))]
    async fn generate_tests(&self, request: &GenerationRequest) -> BackendResult<GeneratedTests> {
        let url = self.endpoint(&["tests", "generate"])?;
        let body = to_body(request)?;
        self.send_json(Method::POST, url, Some(body)).await
    }

    #[instrument(skip(self), fields(repo_key = %repo_key))]
    async fn download_bundle(&self, repo_key: &RepoKey) -> BackendResult<Vec<u8>> {
        let url = self.endpoint(&["tests", "download", repo_key.as_str()])?;
        let response = self.send(Method::GET, url, None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(transport_message(&e)))?;
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self), fields(repo_key = %repo_key))]
    async fn list_history(&self, repo_key: &RepoKey) -> BackendResult<Vec<HistoryEntry>> {
        let url = self.endpoint(&["history", repo_key.as_str()])?;
        let body: HistoryListBody = self.send_json(Method::GET, url, None).await?;
        Ok(body.files.into_iter().map(HistoryEntry::new).collect())
    }

    #[instrument(skip(self), fields(repo_key = %repo_key))]
    async fn fetch_history_file(
        &self,
        repo_key: &RepoKey,
        filename: &str,
    ) -> BackendResult<HistoryFileContent> {
        let url = self.endpoint(&["history", repo_key.as_str(), "file", filename])?;
        let body: HistoryFileBody = self.send_json(Method::GET, url, None).await?;
        Ok(HistoryFileContent {
            filename: filename.to_string(),
            content: body.content,
        })
    }

    #[instrument(skip(self))]
    async fn run_tests(&self, request: &TestRunRequest) -> BackendResult<TestRunReport> {
        let url = self.endpoint(&["tests", "run"])?;
        let body = to_body(request)?;
        self.send_json(Method::POST, url, Some(body)).await
    }
}
