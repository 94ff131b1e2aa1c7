//! Authentication configuration.

use serde::{Deserialize, Serialize};

use super::clamped_minutes;

/// Placeholder signing secret shipped in the defaults.
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Token signing and guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token TTL in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Upper bound on the guard's authentication stage, in milliseconds.
    #[serde(default = "default_guard_timeout")]
    pub guard_timeout_ms: u64,
}

impl AuthConfig {
    /// Whether the placeholder signing secret is still configured.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Token lifetime.
    pub fn token_ttl(&self) -> chrono::Duration {
        clamped_minutes(self.token_ttl_minutes)
    }

    /// Deadline for the guard's authentication stage.
    pub fn guard_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.guard_timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            guard_timeout_ms: default_guard_timeout(),
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    60
}

fn default_guard_timeout() -> u64 {
    2000
}
