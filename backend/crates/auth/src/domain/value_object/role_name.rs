use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of roles, persisted by their code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl RoleName {
    pub const ALL: [RoleName; 2] = [RoleName::User, RoleName::Admin];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            RoleName::User => "ROLE_USER",
            RoleName::Admin => "ROLE_ADMIN",
        }
    }

    /// `None` for codes outside the seeded set.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_code_roundtrip() {
        for role in RoleName::ALL {
            assert_eq!(RoleName::from_code(role.code()), Some(role));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(RoleName::from_code("USER"), None);
        assert_eq!(RoleName::from_code("role_admin"), None);
    }

    #[test]
    fn test_serde_uses_code() {
        assert_eq!(
            serde_json::to_string(&RoleName::Admin).unwrap(),
            "\"ROLE_ADMIN\""
        );
        let role: RoleName = serde_json::from_str("\"ROLE_USER\"").unwrap();
        assert_eq!(role, RoleName::User);
    }
}
