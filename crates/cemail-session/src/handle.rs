//! SessionHandle - serialized async front door for a session
//!
//! Hosts with real concurrent callers (UI thread plus background tasks) go
//! through this handle: a `parking_lot::Mutex` serializes every state
//! transition, and the lock is only ever held across the synchronous parts,
//! never across the derivation await. A second login arriving while one is
//! in flight is therefore rejected with `Busy` synchronously, and a caller
//! that cancels mid-derivation leaves the late completion to resolve as a
//! stale no-op.

use std::sync::Arc;

use parking_lot::Mutex;

use cemail_core::{AuthError, AuthResult};
use cemail_crypto::MailboxIdentity;

use crate::deriver::DeriveIdentity;
use crate::session::{AuthSession, LoginResolution, SessionStatus};

/// Cloneable handle owning one session and its identity backend.
pub struct SessionHandle<D> {
    session: Arc<Mutex<AuthSession>>,
    deriver: Arc<D>,
}

impl<D> Clone for SessionHandle<D> {
    fn clone(&self) -> Self {
        SessionHandle {
            session: Arc::clone(&self.session),
            deriver: Arc::clone(&self.deriver),
        }
    }
}

impl<D: DeriveIdentity> SessionHandle<D> {
    /// Wrap a fresh anonymous session around the given identity backend.
    pub fn new(deriver: D) -> Self {
        SessionHandle {
            session: Arc::new(Mutex::new(AuthSession::new())),
            deriver: Arc::new(deriver),
        }
    }

    /// Attempt a login with raw user input.
    ///
    /// Validation and the `LoggingIn` transition happen synchronously under
    /// the lock; only the backend derivation is awaited. Returns the derived
    /// identity on success. If the attempt was cancelled while the backend
    /// was still working, the session is untouched and the caller gets
    /// [`AuthError::Cancelled`].
    pub async fn attempt_login(&self, input: &str) -> AuthResult<MailboxIdentity> {
        let (seed, attempt) = self.session.lock().begin_login(input)?;

        let outcome = self.deriver.derive(&seed).await;

        match self.session.lock().complete_login(attempt, outcome) {
            LoginResolution::Authenticated(identity) => Ok(identity),
            LoginResolution::Rejected(err) => Err(err),
            LoginResolution::Stale => Err(AuthError::Cancelled),
        }
    }

    /// Generate a fresh seed; see [`AuthSession::begin_create`].
    pub fn begin_create(&self) -> AuthResult<String> {
        self.session.lock().begin_create()
    }

    /// Abandon the login attempt currently in flight.
    pub fn cancel_login(&self) -> AuthResult<()> {
        let mut session = self.session.lock();
        let attempt = session
            .current_attempt()
            .ok_or(AuthError::InvalidState("not logging in"))?;
        session.abandon_login(attempt)
    }

    /// Drop the credential; see [`AuthSession::log_out`].
    pub fn log_out(&self) -> AuthResult<()> {
        self.session.lock().log_out()
    }

    /// Snapshot of the session state.
    pub fn status(&self) -> SessionStatus {
        self.session.lock().status()
    }

    /// Encoded pending seed for display, if any.
    pub fn pending_seed(&self) -> Option<String> {
        self.session.lock().pending_seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::time::Duration;

    use tokio::sync::oneshot;

    use crate::deriver::{DeriveError, LocalDeriver};
    use cemail_crypto::Seed;

    /// Backend that parks mid-derivation until released, to exercise the
    /// in-flight window.
    struct GatedDeriver {
        gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl GatedDeriver {
        fn new() -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let deriver = GatedDeriver {
                gate: tokio::sync::Mutex::new(Some(rx)),
            };
            (deriver, tx)
        }
    }

    impl DeriveIdentity for GatedDeriver {
        fn derive(
            &self,
            seed: &Seed,
        ) -> impl Future<Output = Result<MailboxIdentity, DeriveError>> + Send {
            let identity = MailboxIdentity::from_seed(seed);
            async move {
                if let Some(rx) = self.gate.lock().await.take() {
                    let _ = rx.await;
                }
                Ok(identity)
            }
        }
    }

    struct FailingDeriver;

    impl DeriveIdentity for FailingDeriver {
        fn derive(
            &self,
            _seed: &Seed,
        ) -> impl Future<Output = Result<MailboxIdentity, DeriveError>> + Send {
            std::future::ready(Err(DeriveError::new("mailbox backend unreachable")))
        }
    }

    async fn wait_for_logging_in<D: DeriveIdentity>(handle: &SessionHandle<D>) {
        while handle.status() != SessionStatus::LoggingIn {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn test_attempt_login_happy_path() {
        let handle = SessionHandle::new(LocalDeriver);
        let seed = Seed::from_bytes([0x11; 32]);

        let identity = handle.attempt_login(&seed.encode()).await.unwrap();
        let expected = MailboxIdentity::from_seed(&seed).mailbox_id();
        assert_eq!(identity.mailbox_id(), expected);
        assert_eq!(
            handle.status(),
            SessionStatus::Authenticated { mailbox: expected }
        );
    }

    #[tokio::test]
    async fn test_create_then_login_confirms() {
        let handle = SessionHandle::new(LocalDeriver);
        let encoded = handle.begin_create().unwrap();
        assert_eq!(handle.status(), SessionStatus::PendingConfirmation);

        let identity = handle.attempt_login(&encoded).await.unwrap();
        assert_eq!(
            handle.status(),
            SessionStatus::Authenticated {
                mailbox: identity.mailbox_id()
            }
        );

        handle.log_out().unwrap();
        assert_eq!(handle.status(), SessionStatus::Anonymous);
        assert_eq!(handle.pending_seed(), None);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_synchronously() {
        let handle = SessionHandle::new(LocalDeriver);

        let err = handle.attempt_login("definitely not hex").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidFormat);
        assert!(matches!(handle.status(), SessionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_derivation_failure_surfaces_detail() {
        let handle = SessionHandle::new(FailingDeriver);
        let seed = Seed::from_bytes([0x22; 32]);

        let err = handle.attempt_login(&seed.encode()).await.unwrap_err();
        match err {
            AuthError::DerivationFailed(detail) => {
                assert!(detail.contains("mailbox backend unreachable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(handle.status(), SessionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_login_rejected_busy() {
        let (deriver, release) = GatedDeriver::new();
        let handle = SessionHandle::new(deriver);
        let seed = Seed::from_bytes([0x33; 32]);

        let first = {
            let handle = handle.clone();
            let encoded = seed.encode();
            tokio::spawn(async move { handle.attempt_login(&encoded).await })
        };
        wait_for_logging_in(&handle).await;

        // Duplicate rejected synchronously while the first is parked.
        let err = handle.attempt_login(&seed.encode()).await.unwrap_err();
        assert_eq!(err, AuthError::Busy);
        assert_eq!(handle.begin_create(), Err(AuthError::Busy));

        // Releasing the gate lets the in-flight attempt finish untouched.
        release.send(()).unwrap();
        let identity = first.await.unwrap().unwrap();
        assert_eq!(
            handle.status(),
            SessionStatus::Authenticated {
                mailbox: identity.mailbox_id()
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_login_resolves_stale() {
        let (deriver, release) = GatedDeriver::new();
        let handle = SessionHandle::new(deriver);
        let seed = Seed::from_bytes([0x44; 32]);

        let first = {
            let handle = handle.clone();
            let encoded = seed.encode();
            tokio::spawn(async move { handle.attempt_login(&encoded).await })
        };
        wait_for_logging_in(&handle).await;

        handle.cancel_login().unwrap();
        assert_eq!(handle.status(), SessionStatus::Anonymous);

        // The parked backend completes late; the session must not move.
        release.send(()).unwrap();
        let err = first.await.unwrap().unwrap_err();
        assert_eq!(err, AuthError::Cancelled);
        assert_eq!(handle.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_cancel_without_attempt_is_invalid() {
        let handle = SessionHandle::new(LocalDeriver);
        assert!(matches!(
            handle.cancel_login(),
            Err(AuthError::InvalidState(_))
        ));
    }
}
