//! Password reset email rendering.

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::notifier::EmailMessage;

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset";

/// Reset email carrying a deep link into the client app and a browser
/// fallback that bounces through the API's `/redirect` endpoint.
pub struct PasswordResetEmail {
    recipient: String,
    username: String,
    deep_link: String,
    fallback_url: String,
}

impl PasswordResetEmail {
    pub fn new(config: &AuthConfig, user: &User, token: &str) -> Self {
        let deep_link = format!(
            "{}://reset-password?token={}",
            config.app_scheme,
            urlencoding::encode(token)
        );
        let fallback_url = format!(
            "{}/redirect?redirect-to={}",
            config.api_base_url.trim_end_matches('/'),
            urlencoding::encode(&deep_link)
        );

        Self {
            recipient: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            deep_link,
            fallback_url,
        }
    }

    pub fn deep_link(&self) -> &str {
        &self.deep_link
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    fn html_body(&self) -> String {
        format!(
            "<p>Hello <b>{username}</b>, here is your password reset link: \
             <a href=\"{fallback}\">reset password</a></p>\
             <p>If the link does not open the app, copy this address into it:<br>{deep_link}</p>",
            username = html_escape::encode_text(&self.username),
            fallback = html_escape::encode_double_quoted_attribute(&self.fallback_url),
            deep_link = html_escape::encode_text(&self.deep_link),
        )
    }

    pub fn into_message(self) -> EmailMessage {
        let body = self.html_body();
        EmailMessage::to_one(self.recipient, RESET_EMAIL_SUBJECT, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::role::Role;
    use crate::domain::entity::user::NewUser;
    use crate::domain::value_object::ids::{RoleId, UserId};
    use crate::domain::value_object::role_name::RoleName;
    use chrono::Utc;

    fn user(username: &str) -> User {
        let draft = NewUser::new(
            username.into(),
            "a@x.com".into(),
            "longenough1".into(),
            Role::new(RoleId::new(1), RoleName::User),
            None,
        )
        .unwrap();
        User {
            id: UserId::new(1),
            username: draft.username,
            email: draft.email,
            password: draft.password,
            is_blocked: false,
            role: draft.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn links_embed_token() {
        let mut config = AuthConfig::new(b"k").unwrap();
        config.api_base_url = "https://api.example.com/api/".into();

        let email = PasswordResetEmail::new(&config, &user("alice"), "tok-123");
        assert_eq!(email.deep_link(), "cloud-saves://reset-password?token=tok-123");
        assert_eq!(
            email.fallback_url(),
            "https://api.example.com/api/redirect?redirect-to=cloud-saves%3A%2F%2Freset-password%3Ftoken%3Dtok-123"
        );

        let message = email.into_message();
        assert_eq!(message.subject, "Password Reset");
        assert_eq!(message.to, vec!["a@x.com".to_string()]);
        assert!(message.html_body.contains("tok-123"));
    }

    #[test]
    fn username_is_escaped() {
        let config = AuthConfig::new(b"k").unwrap();
        let message = PasswordResetEmail::new(&config, &user("<b>x"), "t").into_message();
        assert!(message.html_body.contains("&lt;b&gt;x"));
    }
}
