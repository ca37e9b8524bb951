//! Identity derivation seam
//!
//! The session never computes an identity itself; it hands the decoded seed
//! to an injected backend. The local backend is a pure function of the seed,
//! a remote one (DID resolution against the mailbox network) plugs in behind
//! the same trait.

use std::future::Future;

use thiserror::Error;

use cemail_crypto::{MailboxIdentity, Seed};

/// Identity backend failure. Carries backend-specific detail opaquely;
/// nothing here is interpreted by the session and no seed bytes are attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct DeriveError {
    detail: String,
}

impl DeriveError {
    pub fn new(detail: impl Into<String>) -> Self {
        DeriveError {
            detail: detail.into(),
        }
    }
}

/// Injected identity backend.
///
/// Derivation must be deterministic: the same seed always resolves to the
/// same identity. The future may suspend (network backends), which is why
/// the session keeps its `LoggingIn` state across the call.
pub trait DeriveIdentity: Send + Sync {
    fn derive(
        &self,
        seed: &Seed,
    ) -> impl Future<Output = Result<MailboxIdentity, DeriveError>> + Send;
}

/// Local backend: derives the identity directly from the seed bytes,
/// without touching the network. Infallible.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalDeriver;

impl DeriveIdentity for LocalDeriver {
    fn derive(
        &self,
        seed: &Seed,
    ) -> impl Future<Output = Result<MailboxIdentity, DeriveError>> + Send {
        std::future::ready(Ok(MailboxIdentity::from_seed(seed)))
    }
}
