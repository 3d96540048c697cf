//! Email Value Object
//!
//! Checks the length and the basic `local@domain.tld` shape. Case is kept
//! as entered; deliverability is proven by the password reset mail.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

pub const EMAIL_MIN_LENGTH: usize = 3;
pub const EMAIL_MAX_LENGTH: usize = 256;

/// Maximum length of the part before `@` (RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;
const DOMAIN_LABEL_MAX_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> AuthResult<Self> {
        let value = value.into();
        let len = value.chars().count();

        if !(EMAIL_MIN_LENGTH..=EMAIL_MAX_LENGTH).contains(&len) {
            return Err(AuthError::InvalidInput(format!(
                "Email must be between {EMAIL_MIN_LENGTH} and {EMAIL_MAX_LENGTH} characters"
            )));
        }

        if !Self::is_valid_format(&value) {
            return Err(AuthError::InvalidInput("Invalid email format".into()));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }
        if !local.chars().all(is_local_char) || local.split('.').any(str::is_empty) {
            return false;
        }

        if !domain.contains('.') {
            return false;
        }

        domain.split('.').all(is_domain_label)
    }
}

/// Unquoted local-part characters (RFC 5322 `atext` plus the `.` between atoms).
fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= DOMAIN_LABEL_MAX_LENGTH
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

impl TryFrom<String> for Email {
    type Error = AuthError;

    fn try_from(value: String) -> AuthResult<Self> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
