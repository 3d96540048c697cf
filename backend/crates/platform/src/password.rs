//! Password hashing and verification.
//!
//! - Argon2id (OWASP default parameters) with a random 128-bit salt
//! - NFKC normalization before counting and hashing
//! - optional application pepper
//! - clear text is zeroized on drop and never printed

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Clear text password, zeroized when dropped.
///
/// Not `Clone`, and `Debug` is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validates the length policy (in Unicode scalar values, after NFKC).
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::candidate(raw);
        let char_count = password.0.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(password)
    }

    /// Normalizes without applying the policy.
    ///
    /// For passwords presented at login: a value that could never have
    /// been set simply fails to verify.
    pub fn candidate(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hashes with Argon2id and a fresh salt.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Argon2id hash in PHC string format; the only form that is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parses a stored PHC string.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// `false` on mismatch. Argon2 compares in constant time.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_password() {
        let result = ClearTextPassword::new("short".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 5 }
        );
    }

    #[test]
    fn rejects_long_password() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn accepts_length_bounds() {
        assert!(ClearTextPassword::new("a".repeat(MIN_PASSWORD_LENGTH)).is_ok());
        assert!(ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH)).is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 8 characters, 24 bytes
        assert!(ClearTextPassword::new("パスワード安全だ".to_string()).is_ok());
    }

    #[test]
    fn hash_and_verify() {
        let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));
        assert!(!hashed.verify(&ClearTextPassword::candidate("wrong".to_string()), None));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
        let a = password.hash(None).unwrap();
        let b = password.hash(None).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn pepper_must_match() {
        let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
        let pepper = b"pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"other")));
    }

    #[test]
    fn candidate_is_normalized_like_new() {
        // Fullwidth digits normalize to ASCII under NFKC.
        let set = ClearTextPassword::new("password１２３".to_string()).unwrap();
        let hashed = set.hash(None).unwrap();
        assert!(hashed.verify(&ClearTextPassword::candidate("password123".to_string()), None));
    }

    #[test]
    fn phc_string_roundtrip() {
        let password = ClearTextPassword::new("longenough1".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));
    }

    #[test]
    fn invalid_phc_string_is_rejected() {
        assert!(matches!(
            HashedPassword::from_phc_string("not_a_valid_hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let password = ClearTextPassword::candidate("secret-value".to_string());
        let output = format!("{password:?}");
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("secret-value"));
    }
}
