//! Platform crate - technical building blocks shared by the backend:
//! - password hashing (Argon2id)
//! - random tokens and HMAC signing
//! - session cookie handling

pub mod cookie;
pub mod crypto;
pub mod password;
