//! Bootstrap Admin Use Case
//!
//! Creates the ADMIN account configured for this deployment at startup.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::transaction::finish;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{AuthStore, RoleRepository, UserRepository};
use crate::domain::value_object::role_name::RoleName;
use crate::error::{AuthError, AuthResult};

/// Credentials of the initial administrator
pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct BootstrapAdminUseCase<S>
where
    S: AuthStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> BootstrapAdminUseCase<S>
where
    S: AuthStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// `None` when the username or email is already taken.
    pub async fn execute(&self, account: AdminAccount) -> AuthResult<Option<User>> {
        let mut tx = self.store.begin().await?;

        let result = self.create_admin(&mut tx, account).await;

        match result {
            Err(AuthError::Conflict(_)) => {
                self.store.rollback(tx).await?;
                tracing::info!("Admin account already exists, skipping bootstrap");
                Ok(None)
            }
            other => {
                let admin = finish(&*self.store, tx, other).await?;
                tracing::info!(user_id = %admin.id, "Admin account created");
                Ok(Some(admin))
            }
        }
    }

    async fn create_admin(&self, tx: &mut S::Tx, account: AdminAccount) -> AuthResult<User> {
        let role = RoleRepository::get_by_name(&*self.store, tx, RoleName::Admin).await?;
        let admin = NewUser::new(
            account.username,
            account.email,
            account.password,
            role,
            self.config.pepper(),
        )?;
        UserRepository::create(&*self.store, tx, &admin).await
    }
}
