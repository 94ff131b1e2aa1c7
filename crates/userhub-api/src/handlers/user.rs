//! User management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::request::CreateUserRequest;
use crate::dto::response::{UserEnvelope, UserResponse, UsernameResponse, UsersResponse};
use crate::error::ApiError;
use crate::extractors::{SessionCredentials, ValidatedBody};
use crate::state::AppState;

/// POST /api/user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedBody(req): ValidatedBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UsernameResponse>), ApiError> {
    let identity = state.user_service.create_user(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UsernameResponse {
            username: identity.username,
        }),
    ))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.user_service.list_users(&credentials.0).await?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/user/{username}
pub async fn get_user(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    Path(username): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let identity = state
        .user_service
        .get_user(&credentials.0, &username)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&identity),
    }))
}

/// DELETE /api/user/{username}
pub async fn delete_user(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    Path(username): Path<String>,
) -> Result<Json<UsernameResponse>, ApiError> {
    state
        .user_service
        .delete_user(&credentials.0, &username)
        .await?;

    Ok(Json(UsernameResponse { username }))
}
