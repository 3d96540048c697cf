//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::transaction::finish;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::domain::value_object::{ids::UserId, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<S>
where
    S: AuthStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> ChangePasswordUseCase<S>
where
    S: AuthStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Wrong old password is `InvalidCredentials` and leaves the hash untouched.
    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let mut tx = self.store.begin().await?;
        let result = self.change(&mut tx, user_id, input).await;
        finish(&*self.store, tx, result).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn change(
        &self,
        tx: &mut S::Tx,
        user_id: UserId,
        input: ChangePasswordInput,
    ) -> AuthResult<()> {
        let mut user = self.store.get_by_id_for_update(tx, user_id).await?;

        let old = RawPassword::candidate(input.old_password);
        if !user.compare_password(&old, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        user.change_password(input.new_password, self.config.pepper())?;
        UserRepository::save(&*self.store, tx, &user).await
    }
}
