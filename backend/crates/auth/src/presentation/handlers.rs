//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionManager;
use crate::application::{
    BlockUserUseCase, ChangePasswordInput, ChangePasswordUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordUseCase,
};
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AuthStore;
use crate::domain::session_store::SessionStore;
use crate::domain::value_object::ids::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RedirectQuery, RegisterRequest,
    RequestPasswordResetRequest, ResetPasswordRequest, UserResponse,
};
use crate::presentation::extract::JsonBody;
use crate::presentation::middleware::CurrentSession;

/// Shared state for auth handlers
pub struct AuthAppState<S, SS, N>
where
    S: AuthStore,
    SS: SessionStore,
    N: EmailNotifier,
{
    pub store: Arc<S>,
    pub sessions: SessionManager<SS>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
}

impl<S, SS, N> AuthAppState<S, SS, N>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier,
{
    pub fn new(store: S, session_store: SS, notifier: N, config: AuthConfig) -> Self {
        let config = Arc::new(config);
        Self {
            store: Arc::new(store),
            sessions: SessionManager::new(Arc::new(session_store), config.clone()),
            notifier: Arc::new(notifier),
            config,
        }
    }
}

impl<S, SS, N> Clone for AuthAppState<S, SS, N>
where
    S: AuthStore,
    SS: SessionStore,
    N: EmailNotifier,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            sessions: self.sessions.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Registration / Login / Logout
// ============================================================================

/// POST /api/auth/registration
pub async fn register<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/auth/login
pub async fn login<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.store.clone(), state.config.clone());

    let user = use_case
        .execute(LoginInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    let issued = state.sessions.establish(&user).await?;
    let cookie = platform::cookie::set_cookie_header(&state.config.cookie, &issued.token)
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/auth/logout
pub async fn logout<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    CurrentSession(session): CurrentSession,
) -> AuthResult<impl IntoResponse>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    // The cookie is cleared even if the store is unreachable.
    if let Err(e) = state.sessions.revoke(&session).await {
        tracing::warn!(error = %e, "Failed to revoke session on logout");
    }

    let cookie = platform::cookie::delete_cookie_header(&state.config.cookie)
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    ))
}

/// GET /api/auth/me
pub async fn me(CurrentSession(session): CurrentSession) -> Json<UserResponse> {
    Json(UserResponse::from(&session.identity))
}

// ============================================================================
// Password
// ============================================================================

/// POST /api/auth/change-password
pub async fn change_password<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    CurrentSession(session): CurrentSession,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.store.clone(), state.config.clone());

    use_case
        .execute(
            session.user_id(),
            ChangePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

/// POST /api/auth/recover-password
///
/// Same response whether or not the email belongs to an account.
pub async fn recover_password<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    JsonBody(req): JsonBody<RequestPasswordResetRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(
        state.store.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    use_case.execute(req.email).await?;

    Ok(Json(MessageResponse::new(
        "If an account with that email exists, a password reset link has been sent",
    )))
}

/// POST /api/auth/reset-password
pub async fn reset_password<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.store.clone(), state.config.clone());

    use_case
        .execute(ResetPasswordInput {
            token: req.token,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset")))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /api/auth/block-user/{user_id}
pub async fn block_user<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<UserId>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = BlockUserUseCase::new(state.store.clone(), state.sessions.clone());
    use_case.block(session.user_id(), user_id).await?;

    Ok(Json(MessageResponse::new("User blocked")))
}

/// POST /api/auth/unblock-user/{user_id}
pub async fn unblock_user<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<UserId>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let use_case = BlockUserUseCase::new(state.store.clone(), state.sessions.clone());
    use_case.unblock(session.user_id(), user_id).await?;

    Ok(Json(MessageResponse::new("User unblocked")))
}

// ============================================================================
// Redirect
// ============================================================================

/// GET /api/redirect?redirect-to=...
///
/// Bounces a browser into the client app. Only deep links with the app's
/// own scheme are followed.
pub async fn redirect<S, SS, N>(
    State(state): State<AuthAppState<S, SS, N>>,
    Query(query): Query<RedirectQuery>,
) -> AuthResult<Response>
where
    S: AuthStore,
    SS: SessionStore + Send + Sync + 'static,
    N: EmailNotifier + Send + Sync + 'static,
{
    let allowed_prefix = format!("{}://", state.config.app_scheme);
    if !query.redirect_to.starts_with(&allowed_prefix) {
        return Err(AuthError::InvalidInput("Invalid redirect target".to_string()));
    }

    let location = HeaderValue::from_str(&query.redirect_to)
        .map_err(|_| AuthError::InvalidInput("Invalid redirect target".to_string()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
