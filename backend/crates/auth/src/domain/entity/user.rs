//! User Entity
//!
//! Identity, credential, role and block flag. Length rules are enforced on
//! construction and on every mutation; uniqueness is the store's job.

use chrono::{DateTime, Utc};

use crate::domain::entity::auth_session::SessionIdentity;
use crate::domain::entity::role::Role;
use crate::domain::value_object::{
    email::Email,
    ids::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::AuthResult;

/// A validated user that has not been persisted yet (no id).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub role: Role,
}

impl NewUser {
    /// Validates every field and hashes the password.
    pub fn new(
        username: String,
        email: String,
        password: String,
        role: Role,
        pepper: Option<&[u8]>,
    ) -> AuthResult<Self> {
        let username = UserName::new(username)?;
        let email = Email::new(email)?;
        let password = UserPassword::from_raw(&RawPassword::new(password)?, pepper)?;

        Ok(Self {
            username,
            email,
            password,
            role,
        })
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub is_blocked: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Re-validates the length policy and re-hashes.
    pub fn change_password(&mut self, plaintext: String, pepper: Option<&[u8]>) -> AuthResult<()> {
        let raw = RawPassword::new(plaintext)?;
        self.password = UserPassword::from_raw(&raw, pepper)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn compare_password(&self, candidate: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.password.verify(candidate, pepper)
    }

    pub fn block(&mut self) {
        self.is_blocked = true;
        self.updated_at = Utc::now();
    }

    pub fn unblock(&mut self) {
        self.is_blocked = false;
        self.updated_at = Utc::now();
    }

    /// Fields cached in a session at login time.
    pub fn snapshot(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id,
            username: self.username.as_str().to_string(),
            email: self.email.as_str().to_string(),
            role: self.role.name(),
            is_blocked: self.is_blocked,
        }
    }
}
