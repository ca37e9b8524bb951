//! Identifier types for CEMail
//!
//! Mailbox identifiers are 64-bit fingerprints (truncated hash of the
//! mailbox public key) - compact enough for wire headers while unique
//! enough for practical address books.

use std::fmt;

/// Mailbox identity - cryptographic fingerprint (truncated hash of public key)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MailboxId(pub u64);

impl MailboxId {
    pub const ZERO: MailboxId = MailboxId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        MailboxId(id)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        MailboxId(u64::from_le_bytes(bytes))
    }
}

impl fmt::Debug for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mailbox({:016x})", self.0)
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
