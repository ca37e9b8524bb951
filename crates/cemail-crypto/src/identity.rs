//! Mailbox identity derived from a seed
//!
//! The seed bytes double as an Ed25519 signing key, so the whole identity is
//! a pure function of the seed: same seed, same mailbox. The mailbox
//! backend only ever sees the public half and the derived fingerprint.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use cemail_core::MailboxId;

use crate::seed::Seed;

/// Authenticated principal: keypair plus derived fingerprint.
#[derive(Clone)]
pub struct MailboxIdentity {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    mailbox_id: MailboxId,
}

impl MailboxIdentity {
    /// Derive the identity for a seed. Deterministic and infallible: every
    /// 32-byte value is a valid Ed25519 signing key.
    pub fn from_seed(seed: &Seed) -> Self {
        let signing_key = SigningKey::from_bytes(seed.as_bytes());
        let verifying_key = signing_key.verifying_key();
        let mailbox_id = Self::derive_mailbox_id(&verifying_key);

        MailboxIdentity {
            signing_key,
            verifying_key,
            mailbox_id,
        }
    }

    /// Get the verifying key bytes (public)
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Get the mailbox ID (truncated hash of public key)
    pub fn mailbox_id(&self) -> MailboxId {
        self.mailbox_id
    }

    /// Sign a message on behalf of this mailbox
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature against this mailbox's public key
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        let sig = Signature::from_bytes(signature);
        self.verifying_key.verify(message, &sig).is_ok()
    }

    /// Derive MailboxId from public key (first 8 bytes of SHA-256)
    fn derive_mailbox_id(verifying_key: &VerifyingKey) -> MailboxId {
        let mut hasher = Sha256::new();
        hasher.update(verifying_key.as_bytes());
        let hash = hasher.finalize();
        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&hash[0..8]);
        MailboxId::from_bytes(id_bytes)
    }
}

impl std::fmt::Debug for MailboxIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxIdentity")
            .field("mailbox_id", &self.mailbox_id)
            .finish_non_exhaustive()
    }
}
