//! Infrastructure Layer
//!
//! Database, session store and mail transport implementations.

pub mod memory;
pub mod postgres;
pub mod redis_session;
pub mod smtp;

pub use memory::{InMemoryAuthStore, InMemoryEmailNotifier, InMemorySessionStore};
pub use postgres::PgAuthRepository;
pub use redis_session::RedisSessionStore;
pub use smtp::{SmtpConfig, SmtpEmailNotifier};
