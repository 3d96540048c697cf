//! Shared kernel.
//!
//! The smallest vocabulary shared by every backend crate:
//! - the application error type and its HTTP rendering
//! - typed, store-assigned identifiers

pub mod error {
    pub mod app_error;
    #[cfg(feature = "axum")]
    pub mod conversions;
    pub mod kind;
}
pub mod id;
