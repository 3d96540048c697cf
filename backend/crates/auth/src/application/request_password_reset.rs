//! Request Password Reset Use Case
//!
//! Finds or creates the user's single recovery token and mails it, all in
//! one transaction. The outcome never reveals whether the email is known.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::reset_email::PasswordResetEmail;
use crate::application::transaction::finish;
use crate::domain::entity::password_recovery_token::{
    NewPasswordRecoveryToken, PasswordRecoveryToken,
};
use crate::domain::entity::user::User;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::{AuthStore, PasswordRecoveryTokenRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Request password reset use case
pub struct RequestPasswordResetUseCase<S, N>
where
    S: AuthStore,
    N: EmailNotifier,
{
    store: Arc<S>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<S, N> RequestPasswordResetUseCase<S, N>
where
    S: AuthStore,
    N: EmailNotifier + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<()> {
        let Ok(email) = Email::new(email) else {
            tracing::debug!("Password reset requested with malformed email");
            return Ok(());
        };

        let mut tx = self.store.begin().await?;
        let result = self.issue_and_send(&mut tx, &email).await;
        finish(&*self.store, tx, result).await
    }

    async fn issue_and_send(&self, tx: &mut S::Tx, email: &Email) -> AuthResult<()> {
        let user = match self.store.get_by_email(tx, email).await {
            Ok(user) => user,
            Err(AuthError::NotFound(_)) => {
                tracing::debug!("Password reset requested for unknown email");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let token = self.find_or_create_token(tx, &user).await?;

        let message = PasswordResetEmail::new(&self.config, &user, &token.token).into_message();
        self.notifier.send(&message).await?;

        tracing::info!(user_id = %user.id, "Password reset email sent");
        Ok(())
    }

    /// A concurrent request may insert between our read and our insert; the
    /// loser's `Conflict` means the winner's token is the one to use.
    async fn find_or_create_token(
        &self,
        tx: &mut S::Tx,
        user: &User,
    ) -> AuthResult<PasswordRecoveryToken> {
        if let Some(existing) = self.store.get_by_user_id(tx, user.id).await? {
            return Ok(existing);
        }

        let draft = NewPasswordRecoveryToken::issue(user);
        match PasswordRecoveryTokenRepository::create(&*self.store, tx, &draft).await {
            Ok(created) => Ok(created),
            Err(AuthError::Conflict(_)) => {
                tracing::debug!(user_id = %user.id, "Recovery token created concurrently, re-reading");
                self.store.get_by_user_id(tx, user.id).await?.ok_or_else(|| {
                    AuthError::Internal("Recovery token missing after conflict".to_string())
                })
            }
            Err(e) => Err(e),
        }
    }
}
