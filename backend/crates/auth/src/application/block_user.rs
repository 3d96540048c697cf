//! Block / Unblock User Use Case
//!
//! Admin-only. A block also revokes the target's live sessions; that
//! cleanup is best effort and never undoes the block.

use std::sync::Arc;

use crate::application::session::SessionManager;
use crate::application::transaction::finish;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::domain::session_store::SessionStore;
use crate::domain::value_object::ids::UserId;
use crate::error::{AuthError, AuthResult, Denial};

pub struct BlockUserUseCase<S, SS>
where
    S: AuthStore,
    SS: SessionStore,
{
    store: Arc<S>,
    sessions: SessionManager<SS>,
}

impl<S, SS> BlockUserUseCase<S, SS>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, sessions: SessionManager<SS>) -> Self {
        Self { store, sessions }
    }

    pub async fn block(&self, actor: UserId, target: UserId) -> AuthResult<User> {
        if actor == target {
            return Err(AuthError::Forbidden(Denial::CannotBlockSelf));
        }

        let user = self.set_blocked(target, true).await?;
        tracing::info!(actor = %actor, user_id = %target, "User blocked");

        match self.sessions.revoke_all_for_user(target).await {
            Ok(revoked) => {
                tracing::debug!(user_id = %target, revoked, "Sessions of blocked user revoked");
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %target,
                    error = %e,
                    "Failed to revoke sessions of blocked user; they expire naturally"
                );
            }
        }

        Ok(user)
    }

    pub async fn unblock(&self, actor: UserId, target: UserId) -> AuthResult<User> {
        if actor == target {
            return Err(AuthError::Forbidden(Denial::CannotUnblockSelf));
        }

        let user = self.set_blocked(target, false).await?;
        tracing::info!(actor = %actor, user_id = %target, "User unblocked");
        Ok(user)
    }

    async fn set_blocked(&self, target: UserId, blocked: bool) -> AuthResult<User> {
        let mut tx = self.store.begin().await?;
        let result = self.flip(&mut tx, target, blocked).await;
        finish(&*self.store, tx, result).await
    }

    async fn flip(&self, tx: &mut S::Tx, target: UserId, blocked: bool) -> AuthResult<User> {
        let mut user = self.store.get_by_id_for_update(tx, target).await?;
        if blocked {
            user.block();
        } else {
            user.unblock();
        }
        UserRepository::save(&*self.store, tx, &user).await?;
        Ok(user)
    }
}
