pub mod auth_session;
pub mod password_recovery_token;
pub mod role;
pub mod user;
