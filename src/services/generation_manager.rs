//! Generation request manager.
//!
//! Owns the single in-flight generation request and the per-repository
//! "persisted artifact available" flags. A submission is only accepted when
//! the license gate is unlocked and no other submission is outstanding;
//! a concurrent attempt is rejected, never queued. A submission that
//! outlives its license epoch finishes without recording anything.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::license_gate::LicenseGate;
use crate::domain::errors::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};
use crate::domain::models::{
    GenerationParams, GenerationRequest, GenerationResult, GenerationState, RepoKey,
};
use crate::domain::ports::AssuranceBackend;

/// Clears the busy flag when the submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GenerationRequestManager {
    backend: Arc<dyn AssuranceBackend>,
    gate: Arc<LicenseGate>,
    busy: AtomicBool,
    state: RwLock<GenerationState>,
    persisted: RwLock<HashSet<RepoKey>>,
}

impl GenerationRequestManager {
    pub fn new(backend: Arc<dyn AssuranceBackend>, gate: Arc<LicenseGate>) -> Self {
        Self {
            backend,
            gate,
            busy: AtomicBool::new(false),
            state: RwLock::new(GenerationState::Idle),
            persisted: RwLock::new(HashSet::new()),
        }
    }

    /// Submit a generation request built from `params`.
    ///
    /// Returns the stored [`GenerationResult`]; backend failures are folded
    /// into an error result rather than returned as `Err`. `Err` means the
    /// request was never sent: the session is locked, another submission is
    /// in flight, or the parameters are invalid.
    #[instrument(skip_all, fields(repo_key = %params.repo_key(), dry_run = params.dry_run))]
    pub async fn submit(&self, params: &GenerationParams) -> ClientResult<GenerationResult> {
        let (token, epoch) = self.gate.require_unlocked_in_epoch().await?;
        params.validate()?;

        let Some(_in_flight) = InFlight::acquire(&self.busy) else {
            debug!("rejecting submission while another is in flight");
            return Err(ClientError::SubmissionInProgress);
        };

        let request = GenerationRequest::new(params, token);
        let repo_key = request.repo_key();
        *self.state.write().await = GenerationState::Submitting {
            repo_key: repo_key.clone(),
            dry_run: request.is_dry_run(),
        };

        let result = match self.backend.generate_tests(&request).await {
            Ok(body) if body.is_error() => {
                warn!("backend reported an application-level generation error");
                GenerationResult::failure(GENERIC_FAILURE_MESSAGE)
            }
            Ok(body) => GenerationResult::success(body.generated_test_code),
            Err(err) => {
                warn!(error = %err, "test generation failed");
                GenerationResult::failure(err.message_or(GENERIC_FAILURE_MESSAGE))
            }
        };

        let mut persisted = self.persisted.write().await;
        if self.gate.epoch().await != epoch {
            debug!("session ended during submission, discarding result");
            drop(persisted);
            *self.state.write().await = GenerationState::Idle;
            return Ok(result);
        }
        if result.is_success() && !request.is_dry_run() {
            persisted.insert(repo_key.clone());
            info!(%repo_key, "tests persisted, artifact download available");
        } else if result.is_success() {
            info!(%repo_key, "dry run complete, nothing persisted");
        }
        drop(persisted);

        *self.state.write().await = if result.is_success() {
            GenerationState::Succeeded(result.clone())
        } else {
            GenerationState::Failed(result.clone())
        };
        Ok(result)
    }

    /// Whether a submission is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn state(&self) -> GenerationState {
        self.state.read().await.clone()
    }

    pub async fn last_result(&self) -> Option<GenerationResult> {
        self.state.read().await.result().cloned()
    }

    /// Whether a non-dry-run generation for `repo_key` succeeded in this session.
    pub async fn has_persisted_artifact(&self, repo_key: &RepoKey) -> bool {
        !repo_key.is_empty() && self.persisted.read().await.contains(repo_key)
    }

    /// Forget the session's results and artifact flags.
    pub async fn reset(&self) {
        self.persisted.write().await.clear();
        if !self.is_busy() {
            *self.state.write().await = GenerationState::Idle;
        }
    }
}
