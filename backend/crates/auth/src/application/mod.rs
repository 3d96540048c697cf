//! Application Layer
//!
//! Use cases, the session manager and route access policies.

pub mod access;
pub mod block_user;
pub mod bootstrap_admin;
pub mod change_password;
pub mod config;
pub mod login;
pub mod register;
pub mod request_password_reset;
pub mod reset_email;
pub mod reset_password;
pub mod session;
pub mod transaction;

// Re-exports
pub use access::AccessPolicy;
pub use block_user::BlockUserUseCase;
pub use bootstrap_admin::{AdminAccount, BootstrapAdminUseCase};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use request_password_reset::RequestPasswordResetUseCase;
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use session::{IssuedSession, SessionManager};
