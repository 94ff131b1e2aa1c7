//! Permission labels attached to identities and protected operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use userhub_core::AppError;

/// A permission label such as `read`, `create` or `delete`.
///
/// Labels are free-form; they are trimmed and lowercased on construction so
/// that `"Read"` and `"read"` name the same permission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
    /// Read users.
    pub fn read() -> Self {
        Self("read".to_string())
    }

    /// Create users.
    pub fn create() -> Self {
        Self("create".to_string())
    }

    /// Delete users.
    pub fn delete() -> Self {
        Self("delete".to_string())
    }

    /// Returns the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        if label.is_empty() {
            return Err(AppError::validation("Permission label must not be empty"));
        }
        if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AppError::validation(format!(
                "Invalid permission label: '{s}'"
            )));
        }
        Ok(Self(label))
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.0
    }
}
