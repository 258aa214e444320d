//! Session storage and actor resolution.

use crate::session::{AuthSession, SessionConfig, SessionId};
use crate::AuthError;
use bazaar_commerce::Actor;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Resolves an opaque session token to an actor.
///
/// This is the only thing the commerce boundary asks of authentication:
/// given a token, who is calling? `None` means anonymous.
pub trait SessionProvider: Send + Sync {
    /// Resolve a token to the acting user, if the session is live.
    fn current_user(&self, token: &SessionId) -> Option<Actor>;
}

/// In-memory session store.
///
/// Cheap to clone; clones share the same sessions.
#[derive(Clone)]
pub struct InMemorySessions {
    sessions: Arc<Mutex<HashMap<SessionId, AuthSession>>>,
    config: SessionConfig,
}

impl InMemorySessions {
    /// Create an empty session store.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Open a session for an already-authenticated actor.
    ///
    /// Credential verification is out of scope here; callers hand in an
    /// actor their identity layer has already vouched for.
    pub fn login(&self, actor: Actor) -> SessionId {
        let session =
            AuthSession::new(actor.clone()).with_duration(self.config.duration_secs);
        let id = session.id.clone();
        self.lock().insert(id.clone(), session);
        tracing::debug!(user = %actor.user_id, "session opened");
        id
    }

    /// Close a session.
    pub fn logout(&self, token: &SessionId) -> Result<(), AuthError> {
        self.lock()
            .remove(token)
            .map(|_| ())
            .ok_or(AuthError::SessionNotFound)
    }

    /// Drop every expired session.
    ///
    /// Returns the number of sessions removed.
    pub fn prune_expired(&self) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, AuthSession>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionProvider for InMemorySessions {
    fn current_user(&self, token: &SessionId) -> Option<Actor> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(token)?;
        if session.is_expired() {
            sessions.remove(token);
            return None;
        }
        if self.config.sliding_expiration {
            session.extend(self.config.duration_secs);
        } else {
            session.touch();
        }
        Some(session.actor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::UserId;

    #[test]
    fn test_login_and_resolve() {
        let sessions = InMemorySessions::new(SessionConfig::default());
        let actor = Actor::customer(UserId::new("u1"));
        let token = sessions.login(actor.clone());

        assert_eq!(sessions.current_user(&token), Some(actor));
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let sessions = InMemorySessions::new(SessionConfig::default());
        assert_eq!(sessions.current_user(&SessionId::new("sess_bogus")), None);
    }

    #[test]
    fn test_logout_invalidates_token() {
        let sessions = InMemorySessions::new(SessionConfig::default());
        let token = sessions.login(Actor::customer(UserId::new("u1")));

        sessions.logout(&token).unwrap();
        assert_eq!(sessions.current_user(&token), None);
        assert!(matches!(
            sessions.logout(&token),
            Err(AuthError::SessionNotFound)
        ));
    }

    #[test]
    fn test_expired_session_not_resolved() {
        let sessions = InMemorySessions::new(SessionConfig {
            duration_secs: -1,
            sliding_expiration: false,
        });
        let token = sessions.login(Actor::customer(UserId::new("u1")));

        assert_eq!(sessions.current_user(&token), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_prune_expired() {
        let sessions = InMemorySessions::new(SessionConfig {
            duration_secs: -1,
            sliding_expiration: false,
        });
        sessions.login(Actor::customer(UserId::new("u1")));
        sessions.login(Actor::customer(UserId::new("u2")));

        assert_eq!(sessions.prune_expired(), 2);
        assert!(sessions.is_empty());
    }
}
