//! Authentication module for Bazaar.
//!
//! Provides opaque session tokens and actor resolution. Credential
//! verification is delegated to an external identity layer; this crate
//! only answers "who holds this token?".

mod error;
mod provider;
mod session;

pub use error::AuthError;
pub use provider::{InMemorySessions, SessionProvider};
pub use session::{AuthSession, SessionConfig, SessionId};
