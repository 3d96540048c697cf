//! Unified application error.
//!
//! Every crate converts its own error enum into [`AppError`] at the HTTP
//! boundary. The error carries a category, a stable machine-readable code
//! that clients may switch on, and a human message.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Application error rendered to clients as a problem document.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "User is blocked")
///     .with_code("USER_IS_BLOCKED");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.code(), "USER_IS_BLOCKED");
/// ```
pub struct AppError {
    kind: ErrorKind,
    code: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl AppError {
    /// Creates an error whose code defaults to the kind's serialized name
    /// (e.g. `NOT_FOUND`).
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            code: Cow::Borrowed(default_code(kind)),
            message: message.into(),
        }
    }

    /// Overrides the machine-readable code.
    #[inline]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = code.into();
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

const fn default_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "BAD_REQUEST",
        ErrorKind::Unauthorized => "UNAUTHORIZED",
        ErrorKind::Forbidden => "FORBIDDEN",
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::Conflict => "CONFLICT",
        ErrorKind::InternalServerError => "UNKNOWN",
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.code, self.message)
    }
}

impl Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_code_follows_kind() {
        let err = AppError::new(ErrorKind::NotFound, "User not found");
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            AppError::new(ErrorKind::InternalServerError, "boom").code(),
            "UNKNOWN"
        );
    }

    #[test]
    fn with_code_overrides_default() {
        let err = AppError::new(ErrorKind::Forbidden, "Cannot block yourself")
            .with_code("CANNOT_BLOCK_YOURSELF");
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.code(), "CANNOT_BLOCK_YOURSELF");
    }

    #[test]
    fn display_carries_kind_code_and_message() {
        let err = AppError::new(ErrorKind::Unauthorized, "User is blocked")
            .with_code("USER_IS_BLOCKED");
        assert_eq!(err.to_string(), "[Unauthorized] USER_IS_BLOCKED: User is blocked");
    }
}
