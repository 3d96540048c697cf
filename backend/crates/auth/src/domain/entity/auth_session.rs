//! Auth Session Entity
//!
//! Held by the external session store. Carries a snapshot of the identity
//! taken at login, so the gate never re-queries the user table.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::{ids::UserId, role_name::RoleName};

/// Bytes of entropy in a session id.
const SESSION_ID_BYTES: usize = 32;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(platform::crypto::random_token(SESSION_ID_BYTES))
    }

    /// Wraps an id recovered from a verified cookie or the session index.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Session ids are bearer credentials; only a prefix is ever printed.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}…)", self.0.get(..6).unwrap_or(""))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.get(..6).unwrap_or(""))
    }
}

/// Identity snapshot cached in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: RoleName,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: SessionId,
    pub identity: SessionIdentity,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

impl AuthSession {
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(identity: SessionIdentity, ttl_ms: i64) -> Self {
        let now_ms = Utc::now().timestamp_millis();

        Self {
            id: SessionId::generate(),
            identity,
            created_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.id
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            id: UserId::new(1),
            username: "alice".into(),
            email: "a@x.com".into(),
            role: RoleName::User,
            is_blocked: false,
        }
    }

    #[test]
    fn test_new_session_expiry() {
        let session = AuthSession::new(identity(), 60_000);
        assert!(!session.is_expired());
        assert!(session.remaining_ms() > 59_000);

        let expired = AuthSession::new(identity(), -1);
        assert!(expired.is_expired());
        assert_eq!(expired.remaining_ms(), 0);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_debug_does_not_leak_full_id() {
        let id = SessionId::from_string("abcdefghijklmnop");
        let debug = format!("{id:?}");
        assert!(debug.contains("abcdef"));
        assert!(!debug.contains("ghij"));
    }

    #[test]
    fn test_json_shape() {
        let session = AuthSession::new(identity(), 60_000);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["identity"]["role"], "ROLE_USER");
        assert_eq!(json["identity"]["isBlocked"], false);
        let back: AuthSession = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, session.id);
    }
}
