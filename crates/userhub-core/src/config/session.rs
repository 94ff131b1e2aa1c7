//! Session management configuration.

use serde::{Deserialize, Serialize};

use super::clamped_minutes;

/// Session lifetime policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes since the last token rotation before a session is considered idle.
    ///
    /// Only a token refresh resets this clock. Calls to guarded operations
    /// do not, so clients must refresh within this window to stay logged in.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Absolute session timeout in hours (regardless of refreshes).
    #[serde(default = "default_absolute_timeout")]
    pub absolute_timeout_hours: u64,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl SessionConfig {
    /// Idle timeout, measured from the last token rotation.
    pub fn idle_timeout(&self) -> chrono::Duration {
        clamped_minutes(self.idle_timeout_minutes)
    }

    /// Absolute session lifetime.
    pub fn absolute_timeout(&self) -> chrono::Duration {
        clamped_minutes(self.absolute_timeout_hours.saturating_mul(60))
    }

    /// Period of the cleanup task, never shorter than one minute.
    pub fn cleanup_interval(&self) -> std::time::Duration {
        let minutes = clamped_minutes(self.cleanup_interval_minutes.max(1)).num_minutes();
        std::time::Duration::from_secs(minutes as u64 * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout(),
            absolute_timeout_hours: default_absolute_timeout(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_absolute_timeout() -> u64 {
    12
}

fn default_cleanup_interval() -> u64 {
    15
}
