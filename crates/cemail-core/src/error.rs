//! Error types for CEMail authentication

use thiserror::Error;

/// Authentication errors
///
/// Every variant is recoverable: the session reverts to (or preserves) its
/// pre-attempt state and the caller may retry. Nothing here is fatal to the
/// process, and no variant carries seed bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login input was not a valid encoded seed. The display text is the
    /// user-visible message.
    #[error("Seed should be a base16-encoded string of 32 bytes length.")]
    InvalidFormat,

    /// A login attempt is already in flight; no queueing, no overwrite.
    #[error("another login attempt is in flight")]
    Busy,

    /// The identity backend failed. Backend detail is attached opaquely.
    #[error("identity derivation failed: {0}")]
    DerivationFailed(String),

    /// The in-flight attempt was abandoned before it resolved.
    #[error("login attempt was cancelled")]
    Cancelled,

    /// Operation not valid from the current session state.
    #[error("operation not valid while {0}")]
    InvalidState(&'static str),
}

/// Result type for CEMail auth operations
pub type AuthResult<T> = Result<T, AuthError>;
