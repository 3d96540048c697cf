//! Server configuration from the environment.
//!
//! `.env` is loaded by `main` before [`Config::from_env`] runs.

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::AdminAccount;
use auth::infra::SmtpConfig;
use base64::Engine;
use base64::engine::general_purpose;
use std::env;
use std::time::Duration;

pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub request_timeout: Duration,
    pub smtp: SmtpConfig,
    pub admin: Option<AdminAccount>,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", 5)?;
        let redis_url = or_default("REDIS_URL", "redis://127.0.0.1:6379");
        let port = parsed("PORT", 8080)?;

        let frontend_origins = or_default(
            "FRONTEND_ORIGINS",
            "http://localhost:40922,http://127.0.0.1:40922",
        )
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

        let request_timeout = Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", 30)?);

        let smtp = SmtpConfig {
            host: or_default("SMTP_HOST", "localhost"),
            port: parsed("SMTP_PORT", 1025)?,
            username: or_default("SMTP_USERNAME", ""),
            password: or_default("SMTP_PASSWORD", ""),
            from_email: or_default("EMAIL_FROM_ADDRESS", "noreply@localhost"),
            from_name: or_default("EMAIL_FROM_NAME", "Cloud Saves"),
            use_tls: parsed("SMTP_USE_TLS", false)?,
        };

        let admin = match (
            optional("ADMIN_USERNAME"),
            optional("ADMIN_EMAIL"),
            optional("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminAccount {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => bail!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            port,
            frontend_origins,
            request_timeout,
            smtp,
            admin,
            auth: auth_config()?,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match optional("SESSION_SECRET") {
        Some(secret_b64) => {
            let secret = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("SESSION_SECRET must be base64")?;
            if secret.len() < 32 {
                bail!("SESSION_SECRET must decode to at least 32 bytes");
            }
            AuthConfig::new(&secret)?
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random development secret");
            AuthConfig::development()?
        }
        None => bail!("SESSION_SECRET must be set in production"),
    };

    config = config.with_session_ttl(Duration::from_secs(parsed("SESSION_TTL_SECS", 86_400)?));
    if let Some(secure) = optional("COOKIE_SECURE") {
        config.cookie.secure = secure
            .parse()
            .context("COOKIE_SECURE must be true or false")?;
    }
    config.password_pepper = optional("PASSWORD_PEPPER").map(String::into_bytes);
    if let Some(scheme) = optional("APP_SCHEME") {
        config.app_scheme = scheme;
    }
    if let Some(base_url) = optional("API_BASE_URL") {
        config.api_base_url = base_url;
    }

    Ok(config)
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set in environment"))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}
