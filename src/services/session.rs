//! Assurance session.
//!
//! The top-level context for one user session. It owns the license gate and
//! every component that depends on it, wires them to a single backend, and
//! hands out references to callers. Dropping or ending the session destroys
//! the license token and all per-repository flags.

use std::sync::Arc;

use tracing::{info, info_span, Span};
use uuid::Uuid;

use super::artifact_retriever::ArtifactRetriever;
use super::generation_manager::GenerationRequestManager;
use super::history_browser::HistoryBrowser;
use super::license_gate::LicenseGate;
use super::test_runner::TestRunService;
use crate::adapters::HttpAssuranceBackend;
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::BackendConfig;
use crate::domain::ports::AssuranceBackend;

pub struct AssuranceSession {
    id: Uuid,
    span: Span,
    gate: Arc<LicenseGate>,
    generations: Arc<GenerationRequestManager>,
    artifacts: ArtifactRetriever,
    history: HistoryBrowser,
    test_runner: TestRunService,
}

impl AssuranceSession {
    pub fn new(backend: Arc<dyn AssuranceBackend>) -> Self {
        let id = Uuid::new_v4();
        let gate = Arc::new(LicenseGate::new(Arc::clone(&backend)));
        let generations = Arc::new(GenerationRequestManager::new(
            Arc::clone(&backend),
            Arc::clone(&gate),
        ));

        Self {
            id,
            span: info_span!("session", id = %id),
            artifacts: ArtifactRetriever::new(
                Arc::clone(&backend),
                Arc::clone(&gate),
                Arc::clone(&generations),
            ),
            history: HistoryBrowser::new(Arc::clone(&backend)),
            test_runner: TestRunService::new(backend, Arc::clone(&gate)),
            gate,
            generations,
        }
    }

    /// Session talking to the HTTP backend described by `config`.
    pub fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        let backend = HttpAssuranceBackend::new(config)?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Span that tags everything logged for this session with its id.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn license(&self) -> &LicenseGate {
        &self.gate
    }

    pub fn generations(&self) -> &GenerationRequestManager {
        &self.generations
    }

    pub fn artifacts(&self) -> &ArtifactRetriever {
        &self.artifacts
    }

    pub fn test_runner(&self) -> &TestRunService {
        &self.test_runner
    }

    /// The history browser, available only while the session is unlocked.
    pub async fn history(&self) -> ClientResult<&HistoryBrowser> {
        if self.gate.is_unlocked().await {
            Ok(&self.history)
        } else {
            Err(ClientError::Locked)
        }
    }

    /// Destroy the license session and forget everything learned in it.
    pub async fn end(&self) {
        self.gate.lock().await;
        self.generations.reset().await;
        self.history.reset().await;
        self.span.in_scope(|| info!("session ended"));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::MockBackend;
    use crate::domain::models::{GenerationParams, LicenseState, RepoKey};

    fn session() -> (Arc<MockBackend>, AssuranceSession) {
        let mock = Arc::new(MockBackend::new());
        let session = AssuranceSession::new(Arc::clone(&mock) as Arc<dyn AssuranceBackend>);
        (mock, session)
    }

    #[tokio::test]
    async fn test_history_hidden_while_locked() {
        let (mock, session) = session();

        assert!(matches!(session.history().await, Err(ClientError::Locked)));

        session.license().verify("abc123").await.unwrap();
        assert!(session.history().await.is_ok());
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_end_locks_and_clears_flags() {
        let (_mock, session) = session();
        session.license().verify("abc123").await.unwrap();
        session
            .generations()
            .submit(&GenerationParams::new("https://x/y/Foo-Bar.git"))
            .await
            .unwrap();
        let key = RepoKey::derive("Foo_Bar");
        assert!(session.artifacts().is_eligible(&key).await);

        session.end().await;

        assert_eq!(session.license().state().await, LicenseState::Locked);
        assert!(!session.generations().has_persisted_artifact(&key).await);
        assert!(session.history().await.is_err());
    }

    #[tokio::test]
    async fn test_submission_outliving_session_is_not_downloadable() {
        let mock = Arc::new(MockBackend::new().with_generation_delay(Duration::from_millis(60)));
        let session = AssuranceSession::new(Arc::clone(&mock) as Arc<dyn AssuranceBackend>);
        session.license().verify("abc123").await.unwrap();
        let params = GenerationParams::new("https://x/y/Foo-Bar.git");

        let (submitted, ()) = tokio::join!(session.generations().submit(&params), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.end().await;
        });
        assert!(submitted.is_ok());

        session.license().verify("def456").await.unwrap();
        let key = RepoKey::derive("Foo_Bar");
        assert!(!session.generations().has_persisted_artifact(&key).await);
        assert!(!session.artifacts().is_eligible(&key).await);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let (_, a) = session();
        let (_, b) = session();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = BackendConfig {
            base_url: "not a url".to_string(),
            ..BackendConfig::default()
        };
        assert!(AssuranceSession::from_config(&config).is_err());
    }
}
