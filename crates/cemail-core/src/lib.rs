//! CEMail Core - Fundamental types for the decentralized mailbox
//!
//! This crate defines the types shared across the CEMail stack:
//! - Mailbox identifiers (MailboxId)
//! - The authentication error model

pub mod error;
pub mod id;

pub use error::*;
pub use id::*;
