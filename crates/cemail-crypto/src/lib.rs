//! CEMail Crypto - Seed lifecycle and identity derivation
//!
//! Provides the credential primitives for the CEMail mailbox:
//! - Seed generation and base16 codec (the root credential)
//! - Mailbox identity derivation (Ed25519, seed bytes as signing key)

pub mod identity;
pub mod seed;

pub use identity::*;
pub use seed::*;
