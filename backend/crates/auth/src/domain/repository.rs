//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra`.
//!
//! Every method takes the caller's transaction explicitly; a use case opens
//! one with [`TransactionManager::begin`] and threads it through each call,
//! so helpers invoked inside a workflow always join the outer transaction.

use std::future::Future;

use crate::domain::entity::{
    password_recovery_token::{NewPasswordRecoveryToken, PasswordRecoveryToken},
    role::Role,
    user::{NewUser, User},
};
use crate::domain::value_object::{
    email::Email, ids::UserId, role_name::RoleName, user_name::UserName,
};
use crate::error::AuthResult;

/// Unit of work over the primary store.
///
/// Dropping a `Tx` without calling [`commit`](Self::commit) rolls it back.
pub trait TransactionManager: Send + Sync {
    type Tx: Send;

    fn begin(&self) -> impl Future<Output = AuthResult<Self::Tx>> + Send;

    fn commit(&self, tx: Self::Tx) -> impl Future<Output = AuthResult<()>> + Send;

    fn rollback(&self, tx: Self::Tx) -> impl Future<Output = AuthResult<()>> + Send;
}

/// Offset/limit window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const MAX_LIMIT: i64 = 100;

    /// Clamps the limit to `1..=MAX_LIMIT` and the offset to `>= 0`.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: offset.max(0),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository: TransactionManager {
    /// Insert a new user. Duplicate username or email is `Conflict`.
    async fn create(&self, tx: &mut Self::Tx, user: &NewUser) -> AuthResult<User>;

    /// Update an existing user by id.
    async fn save(&self, tx: &mut Self::Tx, user: &User) -> AuthResult<()>;

    async fn get_by_email(&self, tx: &mut Self::Tx, email: &Email) -> AuthResult<User>;

    async fn get_by_username(&self, tx: &mut Self::Tx, username: &UserName) -> AuthResult<User>;

    async fn get_by_id(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User>;

    /// Like `get_by_id`, but holds the row lock until `tx` ends so that
    /// concurrent read-modify-`save` cycles on one user serialize.
    async fn get_by_id_for_update(&self, tx: &mut Self::Tx, id: UserId) -> AuthResult<User>;

    /// Users holding `role`, ordered by id.
    async fn list_by_role(
        &self,
        tx: &mut Self::Tx,
        role: RoleName,
        page: PageRequest,
    ) -> AuthResult<Vec<User>>;
}

/// Role repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository: TransactionManager {
    /// `NotFound` means the seed data is missing.
    async fn get_by_name(&self, tx: &mut Self::Tx, name: RoleName) -> AuthResult<Role>;
}

/// Password recovery token repository trait
///
/// Reads return `Option`: a user without a token is a normal state.
#[trait_variant::make(PasswordRecoveryTokenRepository: Send)]
pub trait LocalPasswordRecoveryTokenRepository: TransactionManager {
    /// `Conflict` when the user already has a token. The transaction stays
    /// usable afterwards.
    async fn create(
        &self,
        tx: &mut Self::Tx,
        token: &NewPasswordRecoveryToken,
    ) -> AuthResult<PasswordRecoveryToken>;

    async fn save(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()>;

    /// Locks the row for the rest of the transaction where the store supports it.
    async fn get_by_token(
        &self,
        tx: &mut Self::Tx,
        token: &str,
    ) -> AuthResult<Option<PasswordRecoveryToken>>;

    async fn get_by_user_id(
        &self,
        tx: &mut Self::Tx,
        user_id: UserId,
    ) -> AuthResult<Option<PasswordRecoveryToken>>;

    /// `NotFound` when no row was deleted.
    async fn delete(&self, tx: &mut Self::Tx, token: &PasswordRecoveryToken) -> AuthResult<()>;
}

/// Everything the use cases need from the primary store, sharing one `Tx`.
pub trait AuthStore:
    UserRepository + RoleRepository + PasswordRecoveryTokenRepository + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + RoleRepository + PasswordRecoveryTokenRepository + Send + Sync + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_is_clamped() {
        assert_eq!(PageRequest::new(-5, 0), PageRequest { offset: 0, limit: 1 });
        assert_eq!(PageRequest::new(10, 1_000).limit, PageRequest::MAX_LIMIT);
        assert_eq!(PageRequest::default().limit, 20);
    }
}
