//! Session Gate
//!
//! Resolves the session cookie and applies a route's [`AccessPolicy`]. On
//! success the session is available to handlers as [`CurrentSession`].

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{Request, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::access::AccessPolicy;
use crate::application::config::AuthConfig;
use crate::application::session::SessionManager;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::session_store::SessionStore;
use crate::error::AuthError;

/// Gate state, one per policy group.
pub struct GateState<SS>
where
    SS: SessionStore,
{
    pub sessions: SessionManager<SS>,
    pub config: Arc<AuthConfig>,
    pub policy: AccessPolicy,
}

impl<SS> Clone for GateState<SS>
where
    SS: SessionStore,
{
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
            policy: self.policy,
        }
    }
}

/// The caller's session, inserted by [`session_gate`].
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthSession);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

pub async fn session_gate<SS>(
    State(gate): State<GateState<SS>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    SS: SessionStore + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &gate.config.cookie.name);

    let session = match token {
        Some(token) => match gate.sessions.resolve(&token).await {
            Ok(session) => session,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    if let Err(e) = gate.policy.authorize(session.as_ref()) {
        return e.into_response();
    }

    if let Some(session) = session {
        req.extensions_mut().insert(CurrentSession(session));
    }

    next.run(req).await
}
