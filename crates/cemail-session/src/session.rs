//! AuthSession - the login state machine
//!
//! One session per user context, owned by whichever controller wires up the
//! UI or service boundary. No globals: sessions are plain values, so tests
//! and multi-account hosts can run several side by side.
//!
//! The login path is split-phase so derivation can suspend without the
//! session blocking: `begin_login` moves to `LoggingIn` synchronously and
//! hands back the decoded seed plus an attempt ticket; `complete_login`
//! resolves that ticket later. A completion whose ticket no longer matches
//! (the caller abandoned the attempt) is a no-op, never an error.

use tracing::{debug, warn};

use cemail_core::{AuthError, AuthResult, MailboxId};
use cemail_crypto::{MailboxIdentity, Seed};

use crate::deriver::DeriveError;

/// Ticket for one in-flight login attempt. Monotonic per session, so a late
/// completion can be told apart from the current attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AttemptId(u64);

/// Caller-visible snapshot of the session state. Carries no seed bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credential held.
    Anonymous,
    /// A freshly generated seed is being shown to the user for safekeeping.
    PendingConfirmation,
    /// A login attempt is in flight.
    LoggingIn,
    /// Logged in; the derived mailbox fingerprint identifies the principal.
    Authenticated { mailbox: MailboxId },
    /// The last attempt failed; the pre-attempt state is kept for recovery.
    Failed { message: String },
}

/// Outcome of resolving an in-flight attempt.
#[derive(Debug)]
pub enum LoginResolution {
    /// The session moved to `Authenticated`.
    Authenticated(MailboxIdentity),
    /// The backend rejected the attempt; the session moved to `Failed`.
    Rejected(AuthError),
    /// The attempt was no longer current; the session was left untouched.
    Stale,
}

enum State {
    Anonymous,
    PendingConfirmation {
        seed: Seed,
    },
    LoggingIn {
        attempt: AttemptId,
        prior: Box<State>,
    },
    Authenticated {
        identity: MailboxIdentity,
    },
    Failed {
        prior: Box<State>,
        message: String,
    },
}

/// Authentication state machine for one user context.
pub struct AuthSession {
    state: State,
    next_attempt: u64,
}

impl AuthSession {
    /// Create a session holding no credential.
    pub fn new() -> Self {
        AuthSession {
            state: State::Anonymous,
            next_attempt: 0,
        }
    }

    /// Generate a fresh seed and move to `PendingConfirmation`.
    ///
    /// Returns the encoded seed for the user to copy and keep. The session
    /// is NOT authenticated yet: the caller confirms by logging in with the
    /// returned text. No network or storage side effect.
    pub fn begin_create(&mut self) -> AuthResult<String> {
        match self.state {
            State::Anonymous | State::Failed { .. } => {}
            State::LoggingIn { .. } => return Err(AuthError::Busy),
            State::PendingConfirmation { .. } => {
                return Err(AuthError::InvalidState("awaiting seed confirmation"))
            }
            State::Authenticated { .. } => {
                return Err(AuthError::InvalidState("authenticated"))
            }
        }

        let seed = Seed::generate();
        let encoded = seed.encode();
        self.state = State::PendingConfirmation { seed };
        debug!("seed generated, awaiting confirmation");
        Ok(encoded)
    }

    /// Start a login attempt with raw user input.
    ///
    /// Valid from `Anonymous`, `PendingConfirmation` and `Failed`. The
    /// transition happens synchronously: a second attempt arriving while one
    /// is in flight gets [`AuthError::Busy`] rather than racing. The input
    /// is validated verbatim (no trimming); a malformed seed moves the
    /// session to `Failed` while preserving the pre-attempt state, so a
    /// pending seed survives a bad login.
    pub fn begin_login(&mut self, input: &str) -> AuthResult<(Seed, AttemptId)> {
        match self.state {
            State::LoggingIn { .. } => return Err(AuthError::Busy),
            State::Authenticated { .. } => {
                return Err(AuthError::InvalidState("authenticated"))
            }
            _ => {}
        }

        let prior = Box::new(self.take_recovery_state());
        let seed = match Seed::decode(input) {
            Ok(seed) => seed,
            Err(err) => {
                debug!("login rejected: malformed seed input");
                self.state = State::Failed {
                    prior,
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        let attempt = self.fresh_attempt();
        self.state = State::LoggingIn { attempt, prior };
        debug!(?attempt, "login attempt in flight");
        Ok((seed, attempt))
    }

    /// Resolve an in-flight attempt with the backend's outcome.
    ///
    /// If the session has since moved on (the attempt was abandoned), the
    /// completion is stale and the state is left untouched.
    pub fn complete_login(
        &mut self,
        attempt: AttemptId,
        outcome: Result<MailboxIdentity, DeriveError>,
    ) -> LoginResolution {
        let state = std::mem::replace(&mut self.state, State::Anonymous);
        let prior = match state {
            State::LoggingIn {
                attempt: current,
                prior,
            } if current == attempt => prior,
            other => {
                self.state = other;
                warn!(?attempt, "stale login completion ignored");
                return LoginResolution::Stale;
            }
        };

        match outcome {
            Ok(identity) => {
                let mailbox = identity.mailbox_id();
                self.state = State::Authenticated {
                    identity: identity.clone(),
                };
                debug!(%mailbox, "session authenticated");
                LoginResolution::Authenticated(identity)
            }
            Err(err) => {
                let err = AuthError::DerivationFailed(err.to_string());
                self.state = State::Failed {
                    prior,
                    message: err.to_string(),
                };
                warn!("identity derivation failed");
                LoginResolution::Rejected(err)
            }
        }
    }

    /// Abandon the given in-flight attempt, reverting to the pre-attempt
    /// state. The backend's late completion then resolves as stale.
    pub fn abandon_login(&mut self, attempt: AttemptId) -> AuthResult<()> {
        let state = std::mem::replace(&mut self.state, State::Anonymous);
        match state {
            State::LoggingIn {
                attempt: current,
                prior,
            } if current == attempt => {
                self.state = *prior;
                debug!(?attempt, "login attempt abandoned");
                Ok(())
            }
            other => {
                self.state = other;
                Err(AuthError::InvalidState("not logging in"))
            }
        }
    }

    /// Drop the credential and return to `Anonymous`.
    ///
    /// Valid only from `Authenticated`; no residual copy of the identity or
    /// the originating seed is retained.
    pub fn log_out(&mut self) -> AuthResult<()> {
        match self.state {
            State::Authenticated { .. } => {
                self.state = State::Anonymous;
                debug!("session logged out");
                Ok(())
            }
            State::LoggingIn { .. } => Err(AuthError::Busy),
            _ => Err(AuthError::InvalidState("not authenticated")),
        }
    }

    /// Snapshot of the current state. Pure read, no side effect.
    pub fn status(&self) -> SessionStatus {
        match &self.state {
            State::Anonymous => SessionStatus::Anonymous,
            State::PendingConfirmation { .. } => SessionStatus::PendingConfirmation,
            State::LoggingIn { .. } => SessionStatus::LoggingIn,
            State::Authenticated { identity } => SessionStatus::Authenticated {
                mailbox: identity.mailbox_id(),
            },
            State::Failed { message, .. } => SessionStatus::Failed {
                message: message.clone(),
            },
        }
    }

    /// Encoded pending seed for display, if one is awaiting confirmation
    /// (directly, or preserved behind a failed attempt).
    pub fn pending_seed(&self) -> Option<String> {
        match &self.state {
            State::PendingConfirmation { seed } => Some(seed.encode()),
            State::Failed { prior, .. } => match prior.as_ref() {
                State::PendingConfirmation { seed } => Some(seed.encode()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Ticket of the attempt currently in flight, if any.
    pub fn current_attempt(&self) -> Option<AttemptId> {
        match &self.state {
            State::LoggingIn { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }

    /// Take the state a new operation should recover to, collapsing `Failed`
    /// onto the state it preserved so failures never nest.
    fn take_recovery_state(&mut self) -> State {
        let state = std::mem::replace(&mut self.state, State::Anonymous);
        match state {
            State::Failed { prior, .. } => *prior,
            other => other,
        }
    }

    fn fresh_attempt(&mut self) -> AttemptId {
        let attempt = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        attempt
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
