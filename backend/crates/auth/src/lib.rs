//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository / session store / notifier ports
//! - `application/` - Use cases, session manager, route access policies
//! - `infra/` - Postgres, Redis, SMTP and in-memory adapters
//! - `presentation/` - HTTP handlers, DTOs, router, session gate
//!
//! ## Features
//! - Registration and username + password login
//! - Server-side sessions in an external TTL store, cookie-based tokens
//! - Password change, and reset through a single-use emailed token
//! - Admin block / unblock, with revocation of the blocked user's sessions
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application pepper
//! - Session cookies carry an HMAC-SHA256 signed session id
//! - Login and reset-request responses never reveal whether an account exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;
