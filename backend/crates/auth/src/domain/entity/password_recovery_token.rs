//! Password Recovery Token Entity
//!
//! Single-use credential bound to exactly one user. At most one token
//! exists per user; it is deleted when consumed.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::entity::user::User;
use crate::domain::value_object::ids::{RecoveryTokenId, UserId};

/// Bytes of entropy in a recovery token.
pub const RECOVERY_TOKEN_BYTES: usize = 32;

/// A token that has not been persisted yet.
pub struct NewPasswordRecoveryToken {
    pub token: String,
    pub user_id: UserId,
}

impl NewPasswordRecoveryToken {
    /// Generates a random 256-bit URL-safe token for `user`.
    pub fn issue(user: &User) -> Self {
        Self {
            token: platform::crypto::random_token(RECOVERY_TOKEN_BYTES),
            user_id: user.id,
        }
    }
}

#[derive(Clone)]
pub struct PasswordRecoveryToken {
    pub id: RecoveryTokenId,
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for PasswordRecoveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordRecoveryToken")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user.id)
            .finish()
    }
}

impl fmt::Debug for NewPasswordRecoveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPasswordRecoveryToken")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}
