//! Key builders for all UserHub key-value entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all UserHub keys.
const PREFIX: &str = "userhub";

/// Key holding the session record of an identity.
pub fn session_by_username(username: &str) -> String {
    format!("{PREFIX}:session:{username}")
}

/// Prefix shared by every session key, for sweeps.
pub fn session_prefix() -> String {
    format!("{PREFIX}:session:")
}
