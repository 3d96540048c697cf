//! Session Store Port
//!
//! External TTL-backed key-value store holding [`AuthSession`]s plus a
//! per-user index of session ids used to cut off a user's sessions.

use crate::domain::entity::auth_session::{AuthSession, SessionId};
use crate::domain::value_object::ids::UserId;
use crate::error::AuthResult;

#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Store the session; it expires on its own at `expires_at_ms`.
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    async fn get(&self, id: &SessionId) -> AuthResult<Option<AuthSession>>;

    /// Deleting an absent session is not an error.
    async fn delete(&self, id: &SessionId) -> AuthResult<()>;

    async fn delete_many(&self, ids: &[SessionId]) -> AuthResult<()>;

    async fn add_index_entry(&self, user_id: UserId, id: &SessionId) -> AuthResult<()>;

    async fn find_session_ids_by_user(&self, user_id: UserId) -> AuthResult<Vec<SessionId>>;

    async fn delete_index_entries(&self, user_id: UserId, ids: &[SessionId]) -> AuthResult<()>;
}
