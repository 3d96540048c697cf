//! User Name Value Object
//!
//! Public handle used for login and display. Uniqueness is enforced by
//! the store; the value object checks length and ASCII alphanumerics.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(value: impl Into<String>) -> AuthResult<Self> {
        let value = value.into();
        let len = value.chars().count();

        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(AuthError::InvalidInput(format!(
                "Username must be between {USER_NAME_MIN_LENGTH} and {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AuthError::InvalidInput(
                "Username may only contain letters and digits".into(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = AuthError;

    fn try_from(value: String) -> AuthResult<Self> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(matches!(
            UserName::new("ab"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
        assert!(UserName::new("").is_err());
    }

    #[test]
    fn rejects_non_alphanumeric() {
        for bad in ["ali ce", "alice!", "al-ice", "al_ice", "アリス", "<script>"] {
            assert!(
                matches!(UserName::new(bad), Err(AuthError::InvalidInput(_))),
                "{bad}"
            );
        }
        assert!(UserName::new("Alice2024").is_ok());
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<UserName>("\"alice\"").is_ok());
        assert!(serde_json::from_str::<UserName>("\"al\"").is_err());
    }
}
