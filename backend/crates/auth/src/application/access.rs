//! Route access policies evaluated by the session gate.

use crate::domain::entity::auth_session::AuthSession;
use crate::domain::value_object::role_name::RoleName;
use crate::error::{AuthError, AuthResult, Denial};

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Only callers without a valid session (registration, login, reset).
    Anonymous,
    /// Any unblocked, signed-in caller.
    Authenticated,
    /// Signed-in callers whose role is in the set.
    Roles(&'static [RoleName]),
}

impl AccessPolicy {
    pub const ADMIN_ONLY: AccessPolicy = AccessPolicy::Roles(&[RoleName::Admin]);

    /// Decide whether `session` may pass. The blocked flag comes from the
    /// session snapshot.
    pub fn authorize(self, session: Option<&AuthSession>) -> AuthResult<()> {
        match (self, session) {
            (AccessPolicy::Anonymous, None) => Ok(()),
            (AccessPolicy::Anonymous, Some(_)) => {
                Err(AuthError::Forbidden(Denial::AlreadyAuthenticated))
            }
            (_, None) => Err(AuthError::Unauthenticated),
            (_, Some(session)) if session.identity.is_blocked => Err(AuthError::UserBlocked),
            (AccessPolicy::Authenticated, Some(_)) => Ok(()),
            (AccessPolicy::Roles(allowed), Some(session)) => {
                if allowed.contains(&session.identity.role) {
                    Ok(())
                } else {
                    Err(AuthError::Forbidden(Denial::InsufficientRole))
                }
            }
        }
    }
}
