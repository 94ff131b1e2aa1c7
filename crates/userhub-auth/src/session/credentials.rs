//! What a request presents to prove who it is.

use userhub_entity::session::SessionRef;

/// The session reference and bearer token a request carried, if any.
///
/// Either half may be missing; the guard and the flow treat a missing half
/// the same as a wrong one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    /// Session reference (from the session cookie).
    pub session: Option<SessionRef>,
    /// Presented token (from the `Authorization` header).
    pub token: Option<String>,
}

impl RequestCredentials {
    /// Credentials carrying both halves.
    pub fn new(session: SessionRef, token: impl Into<String>) -> Self {
        Self {
            session: Some(session),
            token: Some(token.into()),
        }
    }

    /// The presented token, or an empty string when none was sent.
    pub fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }
}
