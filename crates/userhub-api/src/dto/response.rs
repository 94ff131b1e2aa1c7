//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use userhub_entity::user::Identity;

/// Public view of an account. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Permission labels.
    pub permissions: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            permissions: identity
                .permissions
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            created_at: identity.created_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Fixed confirmation message.
    pub message: String,
    /// Session token, also sent in the `token` header.
    pub token: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Refreshed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The new session token.
    pub token: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
}

/// Returned by logout, and by refresh when there is no session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always `true`.
    pub logout: bool,
}

/// Names the user an operation acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameResponse {
    /// Username.
    pub username: String,
}

/// A single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    /// The user.
    pub user: UserResponse,
}

/// All users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    /// Users ordered by username.
    pub users: Vec<UserResponse>,
}

/// Health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Whether the key-value store answered.
    pub store: bool,
}
