//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the session gate.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentSession, GateState, session_gate};
pub use router::auth_router;
