//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use userhub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error wrapping an [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and machine-readable code for an error kind.
    pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::InvalidCredential => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIAL"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED"),
            ErrorKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "TIMEOUT"),
            ErrorKind::Directory
            | ErrorKind::Store
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = Self::status_of(err.kind);

        let message = if status.is_server_error() && err.kind != ErrorKind::Timeout {
            tracing::error!(kind = %err.kind, error = %err, "Internal server error");
            "Internal server error".to_string()
        } else {
            err.message
        };

        let body = Json(ApiErrorResponse {
            error: error_code.to_string(),
            message,
        });

        if err.kind == ErrorKind::Authentication {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Login Required\"")],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kinds_map_to_distinct_statuses() {
        assert_eq!(
            ApiError::status_of(ErrorKind::Authentication).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::status_of(ErrorKind::Unauthenticated).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::status_of(ErrorKind::Forbidden).0, StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::status_of(ErrorKind::InvalidCredential).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::status_of(ErrorKind::Timeout).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_capability_failures_are_server_errors() {
        let response = ApiError(AppError::store("redis at 10.0.0.3 refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_failure_carries_challenge() {
        let response = ApiError(AppError::authentication("nope")).into_response();
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
