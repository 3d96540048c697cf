//! Domain Layer
//!
//! Entities, value objects and the ports the application layer depends on.

pub mod entity;
pub mod notifier;
pub mod repository;
pub mod session_store;
pub mod value_object;

// Re-exports
pub use entity::{
    auth_session::{AuthSession, SessionId, SessionIdentity},
    password_recovery_token::{NewPasswordRecoveryToken, PasswordRecoveryToken},
    role::Role,
    user::{NewUser, User},
};
pub use notifier::{EmailMessage, EmailNotifier};
pub use repository::{
    AuthStore, PageRequest, PasswordRecoveryTokenRepository, RoleRepository, TransactionManager,
    UserRepository,
};
pub use session_store::SessionStore;
