//! Register Use Case
//!
//! Creates a USER-role account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::transaction::finish;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{AuthStore, RoleRepository, UserRepository};
use crate::domain::value_object::role_name::RoleName;
use crate::error::AuthResult;

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: AuthStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: AuthStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let mut tx = self.store.begin().await?;
        let result = self.register(&mut tx, input).await;
        let user = finish(&*self.store, tx, result).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn register(&self, tx: &mut S::Tx, input: RegisterInput) -> AuthResult<User> {
        let role = RoleRepository::get_by_name(&*self.store, tx, RoleName::User).await?;
        let new_user = NewUser::new(
            input.username,
            input.email,
            input.password,
            role,
            self.config.pepper(),
        )?;

        UserRepository::create(&*self.store, tx, &new_user).await
    }
}
