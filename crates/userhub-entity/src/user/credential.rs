//! Stored password credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A salted one-way password digest in PHC string format
/// (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
///
/// The PHC string carries the algorithm parameters needed to re-verify.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wraps an already-encoded PHC string.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Returns the encoded PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}
