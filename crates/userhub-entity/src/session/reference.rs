//! Client-held handle to a server-side session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use userhub_core::AppError;

/// Identifies a session from the outside: the identity key it belongs to and
/// the session id minted at login.
///
/// The transport layer carries it (e.g. in a cookie) and hands it to every
/// flow and guard call. Its text form is `<session_id>.<username>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRef {
    /// Identity key (username).
    pub username: String,
    /// Session id minted at login.
    pub session_id: Uuid,
}

impl SessionRef {
    /// Creates a new reference.
    pub fn new(username: impl Into<String>, session_id: Uuid) -> Self {
        Self {
            username: username.into(),
            session_id,
        }
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.session_id, self.username)
    }
}

impl FromStr for SessionRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, username) = s
            .split_once('.')
            .ok_or_else(|| AppError::unauthenticated("Malformed session reference"))?;
        let session_id = Uuid::parse_str(id)
            .map_err(|_| AppError::unauthenticated("Malformed session reference"))?;
        if username.is_empty() {
            return Err(AppError::unauthenticated("Malformed session reference"));
        }
        Ok(Self::new(username, session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form_parses_back() {
        let reference = SessionRef::new("alice.smith", Uuid::new_v4());
        let parsed: SessionRef = reference.to_string().parse().unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn test_malformed_references_are_rejected() {
        assert!("".parse::<SessionRef>().is_err());
        assert!("not-a-uuid.alice".parse::<SessionRef>().is_err());
        assert!(format!("{}.", Uuid::new_v4()).parse::<SessionRef>().is_err());
    }
}
