//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Session not found.
    #[error("session not found")]
    SessionNotFound,

    /// Session expired.
    #[error("session expired")]
    SessionExpired,

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::SessionNotFound | AuthError::SessionExpired)
    }
}
