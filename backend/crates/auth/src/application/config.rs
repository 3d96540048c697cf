//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::cookie::CookieConfig;
use platform::crypto::{SigningKey, random_bytes};
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default session lifetime (24 hours)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(86_400);

/// Default deep-link scheme of the client application
pub const DEFAULT_APP_SCHEME: &str = "cloud-saves";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key signing session cookies
    pub session_key: SigningKey,
    /// Lifetime of a session in the session store and of its cookie
    pub session_ttl: Duration,
    /// Session cookie attributes
    pub cookie: CookieConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Scheme used in reset deep links, e.g. `cloud-saves://reset-password?...`
    pub app_scheme: String,
    /// Public base URL of this API, used for the browser redirect fallback
    pub api_base_url: String,
}

impl AuthConfig {
    /// Config with production cookie attributes.
    pub fn new(session_secret: &[u8]) -> AuthResult<Self> {
        let session_key = SigningKey::new(session_secret)
            .map_err(|_| AuthError::Internal("Invalid session secret".to_string()))?;

        Ok(Self {
            session_key,
            session_ttl: DEFAULT_SESSION_TTL,
            cookie: CookieConfig::default(),
            password_pepper: None,
            app_scheme: DEFAULT_APP_SCHEME.to_string(),
            api_base_url: "http://localhost:8080/api".to_string(),
        })
    }

    /// Create config for development (random secret, insecure cookie)
    pub fn development() -> AuthResult<Self> {
        let mut config = Self::new(&random_bytes(32))?;
        config.cookie.secure = false;
        config.cookie.same_site = SameSite::Lax;
        Ok(config)
    }

    /// Keeps the cookie Max-Age in step with the session TTL.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self.cookie.max_age_secs = i64::try_from(ttl.as_secs()).ok();
        self
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        i64::try_from(self.session_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
