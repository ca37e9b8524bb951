//! CEMail Session - Authentication state machine
//!
//! Tracks one user's credential/login status:
//! - AuthSession: the state machine (anonymous, pending seed, logging in,
//!   authenticated, failed)
//! - DeriveIdentity: the injected identity-backend seam
//! - SessionHandle: thread-safe async front door for hosts

pub mod deriver;
pub mod handle;
pub mod session;

pub use deriver::*;
pub use handle::*;
pub use session::*;
