//! Redis Session Store
//!
//! `session:{id}` holds the session as JSON with a TTL; the set
//! `session_index:{user_id}` lists a user's session ids.

use chrono::Utc;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;

use crate::domain::entity::auth_session::{AuthSession, SessionId};
use crate::domain::session_store::SessionStore;
use crate::domain::value_object::ids::UserId;
use crate::error::{AuthError, AuthResult};

const SESSION_PREFIX: &str = "session:";
const INDEX_PREFIX: &str = "session_index:";

fn store_err(e: redis::RedisError) -> AuthError {
    AuthError::SessionStore(e.to_string())
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    /// TTL applied to the per-user index on every insert
    index_ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, index_ttl: Duration) -> Self {
        tracing::info!("Redis session store initialized");
        Self { conn, index_ttl }
    }

    fn session_key(id: &SessionId) -> String {
        format!("{SESSION_PREFIX}{}", id.as_str())
    }

    fn index_key(user_id: UserId) -> String {
        format!("{INDEX_PREFIX}{user_id}")
    }
}

impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let json = serde_json::to_string(session)
            .map_err(|e| AuthError::Internal(format!("Session encoding failed: {e}")))?;

        let remaining_ms = session.expires_at_ms - Utc::now().timestamp_millis();
        let ttl_secs = u64::try_from(remaining_ms / 1000).unwrap_or(0).max(1);

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::session_key(&session.id), json, ttl_secs)
            .await
            .map_err(store_err)
    }

    async fn get(&self, id: &SessionId) -> AuthResult<Option<AuthSession>> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(Self::session_key(id)).await.map_err(store_err)?;

        match json {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    AuthError::SessionStore(format!("Corrupt session payload: {e}"))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &SessionId) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::session_key(id))
            .await
            .map_err(store_err)
    }

    async fn delete_many(&self, ids: &[SessionId]) -> AuthResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = ids.iter().map(Self::session_key).collect();

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(store_err)
    }

    async fn add_index_entry(&self, user_id: UserId, id: &SessionId) -> AuthResult<()> {
        let key = Self::index_key(user_id);
        let ttl_secs = i64::try_from(self.index_ttl.as_secs()).unwrap_or(i64::MAX);

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .sadd(&key, id.as_str())
            .expire(&key, ttl_secs)
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)
    }

    async fn find_session_ids_by_user(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .smembers(Self::index_key(user_id))
            .await
            .map_err(store_err)?;

        Ok(members.into_iter().map(SessionId::from_string).collect())
    }

    async fn delete_index_entries(&self, user_id: UserId, ids: &[SessionId]) -> AuthResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let members: Vec<&str> = ids.iter().map(SessionId::as_str).collect();

        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(Self::index_key(user_id), members)
            .await
            .map_err(store_err)
    }
}
