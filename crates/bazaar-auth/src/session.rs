//! Session management.
//!
//! Sessions bind an opaque token to a resolved [`Actor`]. Credential
//! verification happens elsewhere; by the time a session exists the
//! caller is already authenticated.

use crate::AuthError;
use bazaar_commerce::Actor;
use serde::{Deserialize, Serialize};

/// Session identifier: an opaque, URL-safe token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from an existing token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        Self(generate_token())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Session ID.
    pub id: SessionId,
    /// The resolved actor.
    pub actor: Actor,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last activity.
    pub last_activity_at: i64,
    /// Unix timestamp when session expires.
    pub expires_at: i64,
}

impl AuthSession {
    /// Default session duration: 7 days.
    pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

    /// Create a new session for an actor.
    pub fn new(actor: Actor) -> Self {
        let now = current_timestamp();
        Self {
            id: SessionId::generate(),
            actor,
            created_at: now,
            last_activity_at: now,
            expires_at: now + Self::DEFAULT_DURATION_SECS,
        }
    }

    /// Create session with custom duration.
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.expires_at = self.created_at + duration_secs;
        self
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    /// Validate the session, returning error if expired.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Update last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity_at = current_timestamp();
    }

    /// Extend session expiration.
    pub fn extend(&mut self, duration_secs: i64) {
        self.expires_at = current_timestamp() + duration_secs;
        self.touch();
    }

    /// Get time until expiration in seconds.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - current_timestamp()).max(0)
    }
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session duration in seconds.
    pub duration_secs: i64,
    /// Whether to extend session on activity.
    pub sliding_expiration: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: AuthSession::DEFAULT_DURATION_SECS,
            sliding_expiration: true,
        }
    }
}

/// Generate an opaque URL-safe token.
fn generate_token() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 24] = rand::thread_rng().gen();
    format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::UserId;

    #[test]
    fn test_session_creation() {
        let session = AuthSession::new(Actor::customer(UserId::new("u1")));
        assert!(!session.is_expired());
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_session_expiry() {
        let session = AuthSession::new(Actor::customer(UserId::new("u1"))).with_duration(-1);
        assert!(session.is_expired());
        assert!(matches!(session.validate(), Err(AuthError::SessionExpired)));
        assert_eq!(session.time_to_expiry(), 0);
    }

    #[test]
    fn test_session_id_generation() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("sess_"));
        // 24 bytes base64-encoded, no padding.
        assert_eq!(id1.as_str().len(), "sess_".len() + 32);
    }

    #[test]
    fn test_token_is_url_safe() {
        let id = SessionId::generate();
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
