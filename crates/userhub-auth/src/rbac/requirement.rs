//! Per-operation permission requirements.

use std::collections::BTreeSet;
use std::fmt;

use userhub_entity::user::{Identity, Permission};

/// The permission labels an operation accepts, declared once when the
/// operation is set up.
///
/// Holding any one label is enough. An empty requirement admits every
/// authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionRequirement {
    accepted: BTreeSet<Permission>,
}

impl PermissionRequirement {
    /// A requirement satisfied by authentication alone.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// A requirement satisfied by holding any of `permissions`.
    pub fn any_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            accepted: permissions.into_iter().collect(),
        }
    }

    /// Whether `identity` meets the requirement.
    pub fn is_satisfied_by(&self, identity: &Identity) -> bool {
        self.accepted.is_empty() || identity.has_any_permission(&self.accepted)
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accepted.is_empty() {
            return write!(f, "authentication");
        }
        let labels: Vec<&str> = self.accepted.iter().map(Permission::as_str).collect();
        write!(f, "any of [{}]", labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use userhub_entity::user::CredentialHash;

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
    fn test_any_of_matching() {
        let read_or_delete = PermissionRequirement::any_of([Permission::read(), Permission::delete()]);

        assert!(read_or_delete.is_satisfied_by(&identity(&[Permission::read()])));
        assert!(read_or_delete.is_satisfied_by(&identity(&[Permission::delete()])));
        assert!(!read_or_delete.is_satisfied_by(&identity(&[Permission::create()])));
        assert!(!read_or_delete.is_satisfied_by(&identity(&[])));
    }

    #[test]
    fn test_empty_requirement_admits_anyone() {
        let requirement = PermissionRequirement::authenticated();
        assert_eq!(requirement, PermissionRequirement::any_of([]));
        assert!(requirement.is_satisfied_by(&identity(&[])));
    }

    #[test]
    fn test_display() {
        assert_eq!(PermissionRequirement::authenticated().to_string(), "authentication");
        assert_eq!(
            PermissionRequirement::any_of([Permission::read(), Permission::delete()]).to_string(),
            "any of [delete, read]"
        );
    }
}
