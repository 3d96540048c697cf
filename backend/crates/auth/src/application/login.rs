//! Login Use Case
//!
//! Checks credentials. Establishing the session is the caller's job.

use std::sync::{Arc, LazyLock};

use crate::application::config::AuthConfig;
use crate::application::transaction::finish;
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Verified in place of a stored hash when the username is unknown, so that
/// path costs one Argon2 run like a wrong password does.
static DUMMY_PASSWORD: LazyLock<Option<UserPassword>> = LazyLock::new(|| {
    UserPassword::from_raw(&RawPassword::candidate("dummy-password".to_string()), None).ok()
});

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: AuthStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LoginUseCase<S>
where
    S: AuthStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Unknown username and wrong password fail identically.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<User> {
        let username = UserName::new(input.username).map_err(|_| AuthError::InvalidCredentials)?;
        let candidate = RawPassword::candidate(input.password);

        let mut tx = self.store.begin().await?;
        let result = self.store.get_by_username(&mut tx, &username).await;
        let user = match finish(&*self.store, tx, result).await {
            Ok(user) => user,
            Err(AuthError::NotFound(_)) => {
                if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                    dummy.verify(&candidate, self.config.pepper());
                }
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !user.compare_password(&candidate, self.config.pepper()) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if user.is_blocked {
            return Err(AuthError::UserBlocked);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}
