//! Identity entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::CredentialHash;
use super::permission::Permission;

/// A registered account.
///
/// The username is the identity key: unique, case-sensitive, and never
/// changed after creation. Only the hashed credential is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: CredentialHash,
    /// Permission labels granted to this identity.
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Builds a new identity from already-hashed credentials.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: CredentialHash,
        permissions: impl IntoIterator<Item = Permission>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash,
            permissions: permissions.into_iter().collect(),
            created_at,
        }
    }

    /// Check whether this identity holds the given permission.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Check whether this identity holds at least one of the given permissions.
    pub fn has_any_permission<'a>(
        &self,
        permissions: impl IntoIterator<Item = &'a Permission>,
    ) -> bool {
        permissions.into_iter().any(|p| self.has_permission(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(perms: &[Permission]) -> Identity {
        Identity::new(
            "alice",
            "alice@example.com",
            CredentialHash::from_phc("$argon2id$stub"),
            perms.iter().cloned(),
            Utc::now(),
        )
    }

    #[test]
    fn test_has_any_permission() {
        let alice = identity(&[Permission::read()]);
        assert!(alice.has_any_permission(&[Permission::read(), Permission::delete()]));
        assert!(!alice.has_any_permission(&[Permission::delete()]));
        assert!(!alice.has_any_permission(std::iter::empty()));
    }

    #[test]
    fn test_serialization_omits_password_hash() {
        let alice = identity(&[Permission::read()]);
        let json = serde_json::to_value(&alice).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["permissions"], serde_json::json!(["read"]));
    }
}
