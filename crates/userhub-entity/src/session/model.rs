//! Server-side session binding.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The server-side binding of one identity to its current token.
///
/// At most one record exists per identity; a new login overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session identifier, also embedded in the token.
    pub session_id: Uuid,
    /// Identity key of the session owner.
    pub username: String,
    /// The one token currently accepted for this session.
    pub token: String,
    /// When the session was established (login).
    pub created_at: DateTime<Utc>,
    /// When the current token was issued (login or last refresh).
    pub rotated_at: DateTime<Utc>,
    /// Absolute expiry, fixed at login.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the session is still usable at `now` under the given idle timeout.
    ///
    /// Idle time counts from the last rotation, so only a token refresh
    /// extends the session; guarded calls alone do not.
    pub fn is_live(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now < self.expires_at && now < self.rotated_at + idle_timeout
    }

    /// Returns a copy bound to a freshly rotated token.
    pub fn rotated(&self, token: String, now: DateTime<Utc>) -> Self {
        Self {
            token,
            rotated_at: now,
            ..self.clone()
        }
    }
}
