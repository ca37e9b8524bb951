//! Seed - the root credential for a mailbox
//!
//! A seed is exactly 32 bytes of cryptographically random data. Users carry
//! it around as a 64-character base16 string (no prefix, no separators), so
//! the codec here is the one piece of wire format this crate owns:
//! `decode(encode(s)) == s` for every seed, and anything that is not 64 hex
//! characters is rejected up front.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use cemail_core::{AuthError, AuthResult};

/// Seed length in bytes. A seed is always exactly this long.
pub const SEED_LEN: usize = 32;

/// Encoded seed length in characters (base16, two per byte).
pub const ENCODED_SEED_LEN: usize = SEED_LEN * 2;

/// Root credential: 32 bytes of secret random data.
///
/// Immutable once constructed, never persisted by this crate, and redacted
/// from `Debug` output so the secret cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Generate a fresh seed from the OS entropy source.
    ///
    /// `OsRng` is a CSPRNG; swapping in anything weaker is a correctness
    /// bug, not a style choice.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Seed(bytes)
    }

    /// Wrap existing seed bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Seed(bytes)
    }

    /// Borrow the raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Copy out the raw seed bytes.
    pub fn to_bytes(&self) -> [u8; SEED_LEN] {
        self.0
    }

    /// Encode as canonical base16: 64 lowercase hex characters.
    pub fn encode(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a base16 string back into a seed.
    ///
    /// Both hex cases are accepted on input; re-encoding always yields the
    /// lowercase canonical form. The input is taken verbatim - no trimming,
    /// no checksum - and anything that does not decode to exactly 32 bytes
    /// fails with [`AuthError::InvalidFormat`].
    pub fn decode(text: &str) -> AuthResult<Self> {
        let bytes = hex::decode(text).map_err(|_| AuthError::InvalidFormat)?;
        let bytes: [u8; SEED_LEN] = bytes.try_into().map_err(|_| AuthError::InvalidFormat)?;
        Ok(Seed(bytes))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").finish_non_exhaustive()
    }
}
