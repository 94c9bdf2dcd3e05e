//! License gate.
//!
//! Holds the session's [`LicenseSession`] and the `Locked → Validating →
//! Unlocked | Locked` state machine. Every other component asks the gate for
//! the verified token before it talks to the backend, so nothing leaves the
//! process while the session is locked.
//!
//! Every [`LicenseGate::lock`] starts a new epoch. Work that began under an
//! earlier epoch must not write its result into the current one.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{BackendError, ClientError, ClientResult};
use crate::domain::models::{redact_token, LicenseClaims, LicenseSession, LicenseState};
use crate::domain::ports::AssuranceBackend;

#[derive(Debug, Default)]
struct GateState {
    state: LicenseState,
    session: LicenseSession,
    epoch: u64,
}

/// Verifies license tokens and guards the rest of the session.
pub struct LicenseGate {
    backend: Arc<dyn AssuranceBackend>,
    inner: RwLock<GateState>,
}

impl LicenseGate {
    pub fn new(backend: Arc<dyn AssuranceBackend>) -> Self {
        Self {
            backend,
            inner: RwLock::new(GateState::default()),
        }
    }

    /// Verify `token` with the backend and unlock the session on success.
    ///
    /// Blank tokens are rejected without a network call. A failed
    /// verification leaves the gate locked with no token retained. Callers
    /// get [`ClientError::Network`] for transport failures and
    /// [`ClientError::LicenseInvalid`] for everything else; the gate state is
    /// the same in both cases.
    #[instrument(skip_all, fields(token = %redact_token(token.trim())))]
    pub async fn verify(&self, token: &str) -> ClientResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::LicenseInvalid(
                "license token is empty".to_string(),
            ));
        }

        let epoch = {
            let mut inner = self.inner.write().await;
            match inner.state {
                LicenseState::Validating => return Err(ClientError::VerificationInProgress),
                LicenseState::Unlocked => {
                    debug!("session already unlocked, skipping verification");
                    return Ok(());
                }
                LicenseState::Locked => inner.state = LicenseState::Validating,
            }
            inner.epoch
        };

        if let Some(claims) = LicenseClaims::parse(token) {
            if claims.is_expired_on(Utc::now().date_naive()) {
                warn!(
                    user = %claims.user_id,
                    expires_on = %claims.expires_on,
                    "license token appears expired, verifying anyway"
                );
            }
        }

        let outcome = match self.backend.verify_license(token).await {
            Ok(verification) if verification.signals_valid() => Ok(()),
            Ok(verification) => Err(ClientError::LicenseInvalid(format!(
                "backend reported status '{}'",
                verification.status
            ))),
            Err(err @ BackendError::Network(_)) => Err(ClientError::Network(err.to_string())),
            Err(err) => Err(ClientError::LicenseInvalid(
                err.message_or("License verification failed."),
            )),
        };

        let mut inner = self.inner.write().await;
        if inner.epoch != epoch || inner.state != LicenseState::Validating {
            debug!("session locked during verification, discarding outcome");
            return Err(ClientError::Locked);
        }
        match &outcome {
            Ok(()) => {
                inner.session = LicenseSession::verified(token);
                inner.state = LicenseState::Unlocked;
                info!("license verified, session unlocked");
            }
            Err(err) => {
                inner.session = LicenseSession::default();
                inner.state = LicenseState::Locked;
                warn!(error = %err, "license verification failed, session remains locked");
            }
        }
        outcome
    }

    /// The verified token, or [`ClientError::Locked`].
    pub async fn require_unlocked(&self) -> ClientResult<String> {
        self.require_unlocked_in_epoch().await.map(|(token, _)| token)
    }

    /// The verified token together with the epoch it belongs to.
    pub async fn require_unlocked_in_epoch(&self) -> ClientResult<(String, u64)> {
        let inner = self.inner.read().await;
        if inner.state == LicenseState::Unlocked && inner.session.valid {
            Ok((inner.session.token.clone(), inner.epoch))
        } else {
            Err(ClientError::Locked)
        }
    }

    /// Current epoch; bumped by every [`lock`](Self::lock).
    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch
    }

    pub async fn state(&self) -> LicenseState {
        self.inner.read().await.state
    }

    pub async fn is_unlocked(&self) -> bool {
        self.state().await == LicenseState::Unlocked
    }

    pub async fn session(&self) -> LicenseSession {
        self.inner.read().await.session.clone()
    }

    /// Destroy the license session and lock the gate again.
    pub async fn lock(&self) {
        let mut inner = self.inner.write().await;
        let epoch = inner.epoch + 1;
        *inner = GateState {
            epoch,
            ..GateState::default()
        };
        debug!(epoch, "license session destroyed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::{BackendCall, MockBackend};

    fn gate(mock: &Arc<MockBackend>) -> LicenseGate {
        LicenseGate::new(Arc::clone(mock) as Arc<dyn AssuranceBackend>)
    }

    #[tokio::test]
    async fn test_starts_locked() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);

        assert_eq!(gate.state().await, LicenseState::Locked);
        assert_eq!(gate.require_unlocked().await, Err(ClientError::Locked));
        assert_eq!(gate.session().await, LicenseSession::default());
    }

    #[tokio::test]
    async fn test_blank_token_rejected_without_network_call() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);

        for token in ["", "   ", "\t\n"] {
            let result = gate.verify(token).await;
            assert!(matches!(result, Err(ClientError::LicenseInvalid(_))));
        }
        assert_eq!(mock.call_count().await, 0);
        assert_eq!(gate.state().await, LicenseState::Locked);
    }

    #[tokio::test]
    async fn test_valid_status_unlocks_and_stores_trimmed_token() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);

        gate.verify("  abc123 ").await.unwrap();

        assert_eq!(gate.state().await, LicenseState::Unlocked);
        assert_eq!(gate.require_unlocked().await.unwrap(), "abc123");
        assert_eq!(gate.session().await, LicenseSession::verified("abc123"));
        assert_eq!(
            mock.calls().await,
            vec![BackendCall::VerifyLicense {
                license_token: "abc123".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_invalid_status_keeps_gate_locked() {
        let mock = Arc::new(MockBackend::new().with_license_status("invalid"));
        let gate = gate(&mock);

        let result = gate.verify("abc123").await;

        assert!(matches!(result, Err(ClientError::LicenseInvalid(_))));
        assert_eq!(gate.state().await, LicenseState::Locked);
        assert_eq!(gate.session().await.token, "");
    }

    #[tokio::test]
    async fn test_error_status_uses_backend_detail() {
        let mock = Arc::new(MockBackend::new().with_license_error(BackendError::Status {
            status: 401,
            detail: Some("❌ Invalid or expired license token".to_string()),
        }));
        let gate = gate(&mock);

        let result = gate.verify("abc123").await;

        assert_eq!(
            result,
            Err(ClientError::LicenseInvalid(
                "❌ Invalid or expired license token".to_string()
            ))
        );
        assert!(!gate.is_unlocked().await);
    }

    #[tokio::test]
    async fn test_network_failure_is_distinguished_but_still_locked() {
        let mock = Arc::new(
            MockBackend::new().with_license_error(BackendError::Network("refused".to_string())),
        );
        let gate = gate(&mock);

        let result = gate.verify("abc123").await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(gate.state().await, LicenseState::Locked);
    }

    #[tokio::test]
    async fn test_lock_destroys_session() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);
        gate.verify("abc123").await.unwrap();

        gate.lock().await;

        assert_eq!(gate.state().await, LicenseState::Locked);
        assert_eq!(gate.require_unlocked().await, Err(ClientError::Locked));
    }

    #[tokio::test]
    async fn test_verify_when_unlocked_is_noop() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);
        gate.verify("abc123").await.unwrap();

        gate.verify("other").await.unwrap();

        assert_eq!(mock.call_count().await, 1);
        assert_eq!(gate.require_unlocked().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_lock_during_verification_keeps_gate_locked() {
        let mock = Arc::new(MockBackend::new().with_license_delay(Duration::from_millis(60)));
        let gate = gate(&mock);

        let (result, ()) = tokio::join!(gate.verify("abc123"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            gate.lock().await;
        });

        assert_eq!(result, Err(ClientError::Locked));
        assert_eq!(gate.state().await, LicenseState::Locked);
        assert_eq!(gate.require_unlocked().await, Err(ClientError::Locked));
        assert_eq!(gate.session().await, LicenseSession::default());
    }

    #[tokio::test]
    async fn test_lock_starts_new_epoch() {
        let mock = Arc::new(MockBackend::new());
        let gate = gate(&mock);
        gate.verify("abc123").await.unwrap();
        let (_, before) = gate.require_unlocked_in_epoch().await.unwrap();

        gate.lock().await;
        gate.verify("abc123").await.unwrap();

        let (_, after) = gate.require_unlocked_in_epoch().await.unwrap();
        assert_eq!(after, before + 1);
        assert_eq!(gate.epoch().await, after);
    }
}
