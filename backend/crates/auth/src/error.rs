//! Auth Error Types
//!
//! Auth-specific error variants that render through the unified
//! `kernel::error::AppError` problem document.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Why an authenticated (or anonymous) caller was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Route is only for callers without a session.
    AlreadyAuthenticated,
    /// Caller's role is not in the route's allowed set.
    InsufficientRole,
    CannotBlockSelf,
    CannotUnblockSelf,
}

impl Denial {
    pub const fn code(&self) -> &'static str {
        match self {
            Denial::AlreadyAuthenticated | Denial::InsufficientRole => "FORBIDDEN",
            Denial::CannotBlockSelf => "CANNOT_BLOCK_YOURSELF",
            Denial::CannotUnblockSelf => "CANNOT_UNBLOCK_YOURSELF",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            Denial::AlreadyAuthenticated => "Already authenticated",
            Denial::InsufficientRole => "Insufficient permissions",
            Denial::CannotBlockSelf => "You cannot block yourself",
            Denial::CannotUnblockSelf => "You cannot unblock yourself",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Client-correctable field violation
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced entity is absent
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique constraint violation
    #[error("{0}")]
    Conflict(String),

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Missing, invalid or expired session
    #[error("Authentication required")]
    Unauthenticated,

    #[error("User is blocked")]
    UserBlocked,

    #[error("{}", .0.message())]
    Forbidden(Denial),

    /// Unknown or already consumed recovery token
    #[error("Invalid or expired password reset token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) | AuthError::InvalidToken => ErrorKind::BadRequest,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::Unauthenticated | AuthError::UserBlocked => {
                ErrorKind::Unauthorized
            }
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::Database(_)
            | AuthError::SessionStore(_)
            | AuthError::Email(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidInput(_) => "INVALID_INPUT",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Conflict(_) => "ALREADY_EXISTS",
            AuthError::InvalidCredentials => "INCORRECT_USERNAME_OR_PASSWORD",
            AuthError::Unauthenticated => "UNAUTHORIZED",
            AuthError::UserBlocked => "USER_IS_BLOCKED",
            AuthError::Forbidden(denial) => denial.code(),
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::Database(_)
            | AuthError::SessionStore(_)
            | AuthError::Email(_)
            | AuthError::Internal(_) => "UNKNOWN",
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        self.kind().is_server_error()
    }

    /// Convert to AppError. Infrastructure details never reach the client.
    pub fn to_app_error(&self) -> AppError {
        let message = if self.is_infrastructure() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::SessionStore(msg) => {
                tracing::error!(message = %msg, "Session store error");
            }
            AuthError::Email(msg) => {
                tracing::error!(message = %msg, "Email delivery error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::UserBlocked => {
                tracing::warn!("Request from blocked user rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
