//! Artifact retriever.
//!
//! Downloads the zip bundle of persisted tests for a repository. The
//! download is only offered for keys the [`GenerationRequestManager`] has
//! marked as persisted during this session.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::generation_manager::GenerationRequestManager;
use super::license_gate::LicenseGate;
use crate::domain::errors::{BackendError, ClientError, ClientResult};
use crate::domain::models::{ArtifactBundle, RepoKey};
use crate::domain::ports::AssuranceBackend;

const UNKNOWN_DOWNLOAD_ERROR: &str = "Unknown error.";

pub struct ArtifactRetriever {
    backend: Arc<dyn AssuranceBackend>,
    gate: Arc<LicenseGate>,
    generations: Arc<GenerationRequestManager>,
}

impl ArtifactRetriever {
    pub fn new(
        backend: Arc<dyn AssuranceBackend>,
        gate: Arc<LicenseGate>,
        generations: Arc<GenerationRequestManager>,
    ) -> Self {
        Self {
            backend,
            gate,
            generations,
        }
    }

    /// Whether `download(repo_key)` would be attempted.
    pub async fn is_eligible(&self, repo_key: &RepoKey) -> bool {
        self.gate.is_unlocked().await && self.generations.has_persisted_artifact(repo_key).await
    }

    /// Fetch the bundle for `repo_key`.
    ///
    /// An empty key is a no-op and yields `Ok(None)`.
    #[instrument(skip(self), fields(repo_key = %repo_key))]
    pub async fn download(&self, repo_key: &RepoKey) -> ClientResult<Option<ArtifactBundle>> {
        if repo_key.is_empty() {
            return Ok(None);
        }

        self.gate.require_unlocked().await?;
        if !self.generations.has_persisted_artifact(repo_key).await {
            return Err(ClientError::ArtifactUnavailable(format!(
                "no persisted tests for '{repo_key}' in this session"
            )));
        }

        match self.backend.download_bundle(repo_key).await {
            Ok(content) => {
                let bundle = ArtifactBundle::new(repo_key.clone(), content);
                info!(filename = %bundle.filename, bytes = bundle.len(), "artifact downloaded");
                Ok(Some(bundle))
            }
            Err(err @ BackendError::Network(_)) => {
                warn!(error = %err, "artifact download failed");
                Err(ClientError::Network(err.to_string()))
            }
            Err(err) => {
                warn!(error = %err, "artifact download failed");
                Err(ClientError::ArtifactUnavailable(
                    err.message_or(UNKNOWN_DOWNLOAD_ERROR),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BackendCall, MockBackend};
    use crate::domain::models::GenerationParams;

    struct Fixture {
        mock: Arc<MockBackend>,
        gate: Arc<LicenseGate>,
        generations: Arc<GenerationRequestManager>,
        retriever: ArtifactRetriever,
    }

    fn fixture(mock: MockBackend) -> Fixture {
        let mock = Arc::new(mock);
        let backend = Arc::clone(&mock) as Arc<dyn AssuranceBackend>;
        let gate = Arc::new(LicenseGate::new(Arc::clone(&backend)));
        let generations = Arc::new(GenerationRequestManager::new(
            Arc::clone(&backend),
            Arc::clone(&gate),
        ));
        let retriever =
            ArtifactRetriever::new(backend, Arc::clone(&gate), Arc::clone(&generations));
        Fixture {
            mock,
            gate,
            generations,
            retriever,
        }
    }

    fn foo_bar() -> RepoKey {
        RepoKey::derive("Foo_Bar")
    }

    #[tokio::test]
    async fn test_empty_key_is_noop() {
        let f = fixture(MockBackend::new());

        assert_eq!(f.retriever.download(&RepoKey::default()).await, Ok(None));
        assert_eq!(f.mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_locked_session_rejected() {
        let f = fixture(MockBackend::new().with_bundle(&foo_bar(), b"zip".to_vec()));

        assert_eq!(f.retriever.download(&foo_bar()).await, Err(ClientError::Locked));
        assert_eq!(f.mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_download_after_persisted_generation() {
        let f = fixture(MockBackend::new().with_bundle(&foo_bar(), b"PK-zip".to_vec()));
        f.gate.verify("abc123").await.unwrap();
        f.generations
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git"))
            .await
            .unwrap();

        let bundle = f.retriever.download(&foo_bar()).await.unwrap().unwrap();

        assert_eq!(bundle.filename, "Foo_Bar_tests.zip");
        assert_eq!(bundle.content, b"PK-zip");
        assert!(f.mock.calls().await.contains(&BackendCall::DownloadBundle {
            repo_key: foo_bar()
        }));
    }

    #[tokio::test]
    async fn test_other_keys_stay_ineligible() {
        let f = fixture(MockBackend::new().with_bundle(&foo_bar(), b"zip".to_vec()));
        f.gate.verify("abc123").await.unwrap();
        f.generations
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git"))
            .await
            .unwrap();
        let calls_before = f.mock.call_count().await;

        let wrong_case = RepoKey::derive("foo_bar");
        assert!(f.retriever.is_eligible(&foo_bar()).await);
        assert!(!f.retriever.is_eligible(&wrong_case).await);
        assert!(matches!(
            f.retriever.download(&wrong_case).await,
            Err(ClientError::ArtifactUnavailable(_))
        ));
        assert_eq!(f.mock.call_count().await, calls_before);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_download_ineligible() {
        let f = fixture(MockBackend::new().with_bundle(&foo_bar(), b"zip".to_vec()));
        f.gate.verify("abc123").await.unwrap();
        f.generations
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git").dry_run(true))
            .await
            .unwrap();

        assert!(!f.retriever.is_eligible(&foo_bar()).await);
        assert!(matches!(
            f.retriever.download(&foo_bar()).await,
            Err(ClientError::ArtifactUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_not_found_surfaces_detail() {
        let f = fixture(MockBackend::new());
        f.gate.verify("abc123").await.unwrap();
        f.generations
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git"))
            .await
            .unwrap();

        let result = f.retriever.download(&foo_bar()).await;

        assert_eq!(
            result,
            Err(ClientError::ArtifactUnavailable("ZIP file not found.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let f = fixture(MockBackend::new().with_bundle_error(
            &foo_bar(),
            BackendError::Network("connection reset".to_string()),
        ));
        f.gate.verify("abc123").await.unwrap();
        f.generations
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git"))
            .await
            .unwrap();

        assert!(matches!(
            f.retriever.download(&foo_bar()).await,
            Err(ClientError::Network(_))
        ));
    }
}
