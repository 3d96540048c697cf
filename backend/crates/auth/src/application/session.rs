//! Session Manager
//!
//! Issues, resolves and revokes sessions in the external session store.
//! Cookie tokens are `"{session_id}.{hmac}"` signed with the session key.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::{AuthSession, SessionId};
use crate::domain::entity::user::User;
use crate::domain::session_store::SessionStore;
use crate::domain::value_object::ids::UserId;
use crate::error::AuthResult;

/// A freshly stored session and the signed token for its cookie.
pub struct IssuedSession {
    pub token: String,
    pub session: AuthSession,
}

pub struct SessionManager<SS>
where
    SS: SessionStore,
{
    store: Arc<SS>,
    config: Arc<AuthConfig>,
}

impl<SS> Clone for SessionManager<SS>
where
    SS: SessionStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<SS> SessionManager<SS>
where
    SS: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<SS>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Snapshot `user` into a new session and index it under the user id.
    pub async fn establish(&self, user: &User) -> AuthResult<IssuedSession> {
        let session = AuthSession::new(user.snapshot(), self.config.session_ttl_ms());

        self.store.create(&session).await?;

        if let Err(e) = self.store.add_index_entry(user.id, &session.id).await {
            // An unindexed session could not be revoked on block.
            if let Err(cleanup) = self.store.delete(&session.id).await {
                tracing::warn!(error = %cleanup, "Failed to drop unindexed session");
            }
            return Err(e);
        }

        tracing::info!(user_id = %user.id, session = %session.id, "Session established");

        Ok(IssuedSession {
            token: self.config.session_key.sign(session.id.as_str()),
            session,
        })
    }

    /// `None` for a missing, forged, unknown or expired token.
    pub async fn resolve(&self, token: &str) -> AuthResult<Option<AuthSession>> {
        let Some(raw_id) = self.config.session_key.verify(token) else {
            tracing::debug!("Session cookie failed signature check");
            return Ok(None);
        };
        let id = SessionId::from_string(raw_id);

        let Some(session) = self.store.get(&id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            if let Err(e) = self.store.delete(&session.id).await {
                tracing::debug!(error = %e, "Failed to delete expired session");
            }
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Logout: drop the session and its index entry.
    pub async fn revoke(&self, session: &AuthSession) -> AuthResult<()> {
        self.store.delete(&session.id).await?;
        self.store
            .delete_index_entries(session.user_id(), std::slice::from_ref(&session.id))
            .await?;

        tracing::info!(user_id = %session.user_id(), "Session revoked");
        Ok(())
    }

    /// Drop every indexed session of `user_id`. Returns how many were found.
    pub async fn revoke_all_for_user(&self, user_id: UserId) -> AuthResult<usize> {
        let ids = self.store.find_session_ids_by_user(user_id).await?;
        if ids.is_empty() {
            return Ok(0);
        }

        self.store.delete_many(&ids).await?;
        self.store.delete_index_entries(user_id, &ids).await?;

        tracing::info!(user_id = %user_id, sessions = ids.len(), "Revoked all sessions for user");
        Ok(ids.len())
    }
}
