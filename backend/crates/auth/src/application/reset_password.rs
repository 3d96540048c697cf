//! Reset Password Use Case
//!
//! Consumes a recovery token: the password update and the token deletion
//! commit together or not at all.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::transaction::finish;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthStore, PasswordRecoveryTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Reset password input
pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<S>
where
    S: AuthStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> ResetPasswordUseCase<S>
where
    S: AuthStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<User> {
        let mut tx = self.store.begin().await?;
        let result = self.consume(&mut tx, input).await;
        let user = finish(&*self.store, tx, result).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(user)
    }

    async fn consume(&self, tx: &mut S::Tx, input: ResetPasswordInput) -> AuthResult<User> {
        let token = self
            .store
            .get_by_token(tx, &input.token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let mut user = token.user.clone();
        user.change_password(input.new_password, self.config.pepper())?;
        UserRepository::save(&*self.store, tx, &user).await?;

        PasswordRecoveryTokenRepository::delete(&*self.store, tx, &token)
            .await
            .map_err(|e| match e {
                AuthError::NotFound(_) => AuthError::InvalidToken,
                other => other,
            })?;

        Ok(user)
    }
}
