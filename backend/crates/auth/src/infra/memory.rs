//! In-memory adapters
//!
//! Same contracts as the Postgres, Redis and SMTP adapters. Used by the
//! test suites and handy for running the API without backing services.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entity::{
    auth_session::{AuthSession, SessionId},
    password_recovery_token::{NewPasswordRecoveryToken, PasswordRecoveryToken},
    role::Role,
    user::{NewUser, User},
};
use crate::domain::notifier::{EmailMessage, EmailNotifier};
use crate::domain::repository::{
    PageRequest, PasswordRecoveryTokenRepository, RoleRepository, TransactionManager,
    UserRepository,
};
use crate::domain::session_store::SessionStore;
use crate::domain::value_object::{
    email::Email,
    ids::{RecoveryTokenId, RoleId, UserId},
    role_name::RoleName,
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Primary store
// ============================================================================

#[derive(Clone)]
struct TokenRecord {
    id: RecoveryTokenId,
    token: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
struct State {
    next_id: i64,
    roles: Vec<Role>,
    users: BTreeMap<UserId, User>,
    tokens: BTreeMap<RecoveryTokenId, TokenRecord>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: UserId) -> AuthResult<&User> {
        self.users.get(&id).ok_or(AuthError::NotFound("User"))
    }

    fn join(&self, record: &TokenRecord) -> AuthResult<PasswordRecoveryToken> {
        Ok(PasswordRecoveryToken {
            id: record.id,
            token: record.token.clone(),
            user: self.user(record.user_id)?.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Username and email must stay unique across users other than `except`.
    fn check_unique(
        &self,
        username: &UserName,
        email: &Email,
        except: Option<UserId>,
    ) -> AuthResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.username == *username {
                return Err(AuthError::Conflict("Username already taken".to_string()));
            }
            if user.email == *email {
                return Err(AuthError::Conflict("Email already registered".to_string()));
            }
        }
        Ok(())
    }
}

/// Serializes transactions behind one lock and restores a snapshot unless
/// the transaction commits.
#[derive(Clone)]
pub struct InMemoryAuthStore {
    state: Arc<Mutex<State>>,
}

/// Transaction handle of [`InMemoryAuthStore`].
pub struct InMemoryTx {
    guard: OwnedMutexGuard<State>,
    snapshot: Option<State>,
}

impl Drop for InMemoryTx {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

impl Default for InMemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthStore {
    /// Store seeded with both roles.
    pub fn new() -> Self {
        let mut state = State::default();
        for name in RoleName::ALL {
            let id = state.next_id();
            state.roles.push(Role::new(RoleId::new(id), name));
        }
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Store without seed data.
    pub fn unseeded() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Number of persisted recovery tokens.
    pub async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }
}

impl TransactionManager for InMemoryAuthStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> AuthResult<Self::Tx> {
        let guard = self.state.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(InMemoryTx {
            guard,
            snapshot: Some(snapshot),
        })
    }

    async fn commit(&self, mut tx: Self::Tx) -> AuthResult<()> {
        tx.snapshot = None;
        Ok(())
    }

    async fn rollback(&self, tx: Self::Tx) -> AuthResult<()> {
        drop(tx);
        Ok(())
    }
}

impl UserRepository for InMemoryAuthStore {
    async fn create(&self, tx: &mut Self::Tx, user: &NewUser) -> AuthResult<User> {
        tx.guard.check_unique(&user.username, &user.email, None)?;

        let now = Utc::now();
        let created = User {
            id: UserId::new(tx.guard.next_id()),
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            is_blocked: false,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tx.guard.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save(&self, tx: &mut Self::Tx, user: &User) -> AuthResult<()> {
        tx.guard.user(user.id)?;
        tx.guard.check_unique(&user.username, &user.email, Some(user.id))?;
        tx.guard.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_email(&self, tx: &mut Self::Tx, email: &Email) -> AuthResult<User> {
        tx.guard
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned()
            .ok_or(AuthError::NotFound("User"))
    }

    async fn get_by_username(&self, tx: &mut Self::Tx, username: &UserName) -> AuthResult<User> {
        tx.guard
            .users
            .values()
            .find(|u| u.username == *username)
            .cloned()
            .ok_or(AuthError::NotFound("User"))
    }

    async fn get_by_id(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User> {
        tx.guard.user(id).cloned()
    }

    // The whole store is already locked for the life of `tx`.
    async fn get_by_id_for_update(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User> {
        tx.guard.user(id).cloned()
    }

    async fn list_by_role(
        &self,
        tx: &mut Self::Tx,
        role: RoleName,
        page: PageRequest,
    ) -> AuthResult<Vec<User>> {
        Ok(tx
            .guard
            .users
            .values()
            .filter(|u| u.role.name() == role)
            .skip(usize::try_from(page.offset).unwrap_or(0))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

impl RoleRepository for InMemoryAuthStore {
    async fn get_by_name(&self, tx: &mut Self::Tx, name: RoleName) -> AuthResult<Role> {
        tx.guard
            .roles
            .iter()
            .find(|r| r.name() == name)
            .copied()
            .ok_or(AuthError::NotFound("Role"))
    }
}

impl PasswordRecoveryTokenRepository for InMemoryAuthStore {
    async fn create(
        &self,
        tx: &mut Self::Tx,
        token: &NewPasswordRecoveryToken,
    ) -> AuthResult<PasswordRecoveryToken> {
        tx.guard.user(token.user_id)?;
        let taken = tx
            .guard
            .tokens
            .values()
            .any(|t| t.user_id == token.user_id || t.token == token.token);
        if taken {
            return Err(AuthError::Conflict("Recovery token already exists".to_string()));
        }

        let now = Utc::now();
        let record = TokenRecord {
            id: RecoveryTokenId::new(tx.guard.next_id()),
            token: token.token.clone(),
            user_id: token.user_id,
            created_at: now,
            updated_at: now,
        };
        tx.guard.tokens.insert(record.id, record.clone());
        tx.guard.join(&record)
    }

    async fn save(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()> {
        let record = tx
            .guard
            .tokens
            .get_mut(&token.id)
            .ok_or(AuthError::NotFound("Recovery token"))?;
        record.token = token.token.clone();
        record.updated_at = token.updated_at;
        Ok(())
    }

    async fn get_by_token(
        &self,
        tx: &mut Self::Tx,
        token: &str,
    ) -> AuthResult<Option<PasswordRecoveryToken>> {
        tx.guard
            .tokens
            .values()
            .find(|t| t.token == token)
            .map(|t| tx.guard.join(t))
            .transpose()
    }

    async fn get_by_user_id(
        &self,
        tx: &mut Self::Tx,
        user_id: UserId,
    ) -> AuthResult<Option<PasswordRecoveryToken>> {
        tx.guard
            .tokens
            .values()
            .find(|t| t.user_id == user_id)
            .map(|t| tx.guard.join(t))
            .transpose()
    }

    async fn delete(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()> {
        tx.guard
            .tokens
            .remove(&token.id)
            .map(|_| ())
            .ok_or(AuthError::NotFound("Recovery token"))
    }
}

// ============================================================================
// Session store
// ============================================================================

#[derive(Default)]
struct SessionState {
    sessions: HashMap<SessionId, AuthSession>,
    index: HashMap<UserId, HashSet<SessionId>>,
}

/// Session store with expiry checked on read.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    state: Arc<Mutex<SessionState>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, as if the backing service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    fn check_available(&self) -> AuthResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::SessionStore("session store unavailable".to_string()));
        }
        Ok(())
    }
}

impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.check_available()?;
        self.state
            .lock()
            .await
            .sessions
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> AuthResult<Option<AuthSession>> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        match state.sessions.get(id).cloned() {
            Some(session) if session.is_expired() => {
                state.sessions.remove(id);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn delete(&self, id: &SessionId) -> AuthResult<()> {
        self.check_available()?;
        self.state.lock().await.sessions.remove(id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[SessionId]) -> AuthResult<()> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        for id in ids {
            state.sessions.remove(id);
        }
        Ok(())
    }

    async fn add_index_entry(&self, user_id: UserId, id: &SessionId) -> AuthResult<()> {
        self.check_available()?;
        self.state
            .lock()
            .await
            .index
            .entry(user_id)
            .or_default()
            .insert(id.clone());
        Ok(())
    }

    async fn find_session_ids_by_user(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .index
            .get(&user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_index_entries(&self, user_id: UserId, ids: &[SessionId]) -> AuthResult<()> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if let Some(entries) = state.index.get_mut(&user_id) {
            for id in ids {
                entries.remove(id);
            }
            if entries.is_empty() {
                state.index.remove(&user_id);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Email notifier
// ============================================================================

/// Records outgoing mail instead of sending it.
#[derive(Clone, Default)]
pub struct InMemoryEmailNotifier {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryEmailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

impl EmailNotifier for InMemoryEmailNotifier {
    async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthError::Email("mail transport unavailable".to_string()));
        }
        tracing::debug!(subject = %message.subject, "Recorded outgoing email");
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
