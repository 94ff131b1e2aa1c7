//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use userhub_service::CreateUserInput;

/// Login request body, accepted as a form or as JSON.
///
/// Missing fields deserialize as empty strings and fail as bad credentials.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(max = 256, message = "Username is too long"))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    pub password: String,
}

/// Create user request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username.
    #[validate(
        required(message = "missing arguments"),
        length(min = 1, max = 64, message = "Username must be 1-64 characters")
    )]
    pub username: Option<String>,
    /// Email.
    #[validate(
        required(message = "missing arguments"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,
    /// Password.
    #[validate(
        required(message = "missing arguments"),
        length(min = 1, max = 1024, message = "Password must be 1-1024 characters")
    )]
    pub password: Option<String>,
    /// Permission labels to grant.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            permissions: req.permissions.unwrap_or_default(),
        }
    }
}
