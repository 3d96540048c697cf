//! Value Object Module

pub mod email;
pub mod ids;
pub mod role_name;
pub mod user_name;
pub mod user_password;
