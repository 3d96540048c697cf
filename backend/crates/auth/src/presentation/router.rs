//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::access::AccessPolicy;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AuthStore;
use crate::domain::session_store::SessionStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{GateState, session_gate};

/// Auth routes plus `/redirect`; mount under `/api`.
pub fn auth_router<S, SS, N>(state: AuthAppState<S, SS, N>) -> Router
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let gate = |policy| GateState {
        sessions: state.sessions.clone(),
        config: state.config.clone(),
        policy,
    };

    let anonymous = Router::new()
        .route("/registration", post(handlers::register::<S, SS, N>))
        .route("/login", post(handlers::login::<S, SS, N>))
        .route("/recover-password", post(handlers::recover_password::<S, SS, N>))
        .route("/reset-password", post(handlers::reset_password::<S, SS, N>))
        .route_layer(middleware::from_fn_with_state(
            gate(AccessPolicy::Anonymous),
            session_gate::<SS>,
        ));

    let authenticated = Router::new()
        .route("/logout", post(handlers::logout::<S, SS, N>))
        .route("/me", get(handlers::me))
        .route("/change-password", post(handlers::change_password::<S, SS, N>))
        .route_layer(middleware::from_fn_with_state(
            gate(AccessPolicy::Authenticated),
            session_gate::<SS>,
        ));

    let admin = Router::new()
        .route("/block-user/{user_id}", post(handlers::block_user::<S, SS, N>))
        .route("/unblock-user/{user_id}", post(handlers::unblock_user::<S, SS, N>))
        .route_layer(middleware::from_fn_with_state(
            gate(AccessPolicy::ADMIN_ONLY),
            session_gate::<SS>,
        ));

    let auth = Router::new().merge(anonymous).merge(authenticated).merge(admin);

    Router::new()
        .nest("/auth", auth)
        .route("/redirect", get(handlers::redirect::<S, SS, N>))
        .with_state(state)
}
