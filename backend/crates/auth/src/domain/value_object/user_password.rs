//! User Password Value Object
//!
//! Domain wrappers around `platform::password`:
//! - [`RawPassword`] is user input, zeroized on drop
//! - [`UserPassword`] is the Argon2id hash that gets persisted
//!
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("longenough1".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Applies the length policy (8 to 64 characters).
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => {
                AuthError::InvalidInput(format!("Password must be at least {min} characters"))
            }
            PasswordPolicyError::TooLong { max, .. } => {
                AuthError::InvalidInput(format!("Password must be at most {max} characters"))
            }
        })?;

        Ok(Self(clear_text))
    }

    /// A password presented for verification only; never hashed or stored.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed user password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AuthError::Internal(format!("Password hashing failed: {msg}"))
            }
            PasswordHashError::InvalidHashFormat => {
                AuthError::Internal("Password hashing produced an invalid hash".to_string())
            }
        })?;

        Ok(Self(hashed))
    }

    /// Loads a hash read from the store. A malformed value is a data error.
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("longenough1".to_string()).is_ok());
        assert!(matches!(
            RawPassword::new("short".to_string()),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(RawPassword::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("longenough1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));
        assert!(!hashed.verify(&RawPassword::candidate("longenough2".to_string()), None));
    }

    #[test]
    fn test_candidate_skips_policy() {
        let hashed =
            UserPassword::from_raw(&RawPassword::new("longenough1".to_string()).unwrap(), None)
                .unwrap();
        // Too short to ever be set, so it can only fail to verify.
        assert!(!hashed.verify(&RawPassword::candidate("x".to_string()), None));
    }

    #[test]
    fn test_malformed_stored_hash() {
        assert!(matches!(
            UserPassword::from_phc_string("plaintext"),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        assert!(!format!("{raw:?}").contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{hashed:?}").contains("argon2"));
    }
}
