//! Login, logout, and refresh handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use userhub_auth::session::RefreshOutcome;

use crate::dto::request::LoginRequest;
use crate::dto::response::{LoginResponse, LogoutResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::session::{cleared_session_cookie, session_cookie};
use crate::extractors::{SessionCredentials, TOKEN_HEADER, ValidatedBody};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedBody(req): ValidatedBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .session_manager
        .login(&req.username, &req.password)
        .await?;

    let jar = jar.add(session_cookie(&result.session));
    let body = LoginResponse {
        message: "User authenticated".to_string(),
        token: result.token.token.clone(),
        expires_at: result.token.expires_at,
        user: UserResponse::from(&result.identity),
    };

    Ok((jar, [(TOKEN_HEADER, result.token.token)], Json(body)))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    credentials: SessionCredentials,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(session) = credentials.session.as_ref() {
        state.session_manager.logout(session).await?;
    }

    Ok((
        StatusCode::CREATED,
        jar.remove(cleared_session_cookie()),
        Json(LogoutResponse { logout: true }),
    ))
}

/// POST /api/token/refresh
pub async fn refresh(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> Result<Response, ApiError> {
    let response = match state.session_manager.refresh(&credentials.0).await? {
        RefreshOutcome::Refreshed(token) => (
            [(TOKEN_HEADER, token.token.clone())],
            Json(TokenResponse {
                token: token.token,
                expires_at: token.expires_at,
            }),
        )
            .into_response(),
        RefreshOutcome::LoggedOut => {
            (StatusCode::CREATED, Json(LogoutResponse { logout: true })).into_response()
        }
    };

    Ok(response)
}
