//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{auth_session::SessionIdentity, user::User};
use crate::domain::value_object::{ids::UserId, role_name::RoleName};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// `GET /redirect?redirect-to=...`
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectQuery {
    #[serde(rename = "redirect-to")]
    pub redirect_to: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Identity snapshot returned to clients. Never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub role: RoleName,
    pub is_blocked: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            role: user.role.name(),
            is_blocked: user.is_blocked,
        }
    }
}

impl From<&SessionIdentity> for UserResponse {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            username: identity.username.clone(),
            role: identity.role,
            is_blocked: identity.is_blocked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_shape() {
        let response = UserResponse {
            id: UserId::new(3),
            email: "a@x.com".into(),
            username: "alice".into(),
            role: RoleName::User,
            is_blocked: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "email": "a@x.com",
                "username": "alice",
                "role": "ROLE_USER",
                "isBlocked": false
            })
        );
    }

    #[test]
    fn change_password_request_is_camel_case() {
        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(req.old_password, "a");
        assert_eq!(req.new_password, "b");
    }
}
