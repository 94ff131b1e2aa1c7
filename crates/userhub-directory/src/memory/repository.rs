//! In-memory user directory.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_entity::user::Identity;

use crate::directory::UserDirectory;

/// Identities held in a concurrent map keyed by username.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<DashMap<String, Identity>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.contains_key(username))
    }

    async fn create(&self, identity: Identity) -> AppResult<()> {
        match self.users.entry(identity.username.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "user {} already exists",
                identity.username
            ))),
            Entry::Vacant(slot) => {
                debug!(username = %identity.username, "Stored identity");
                slot.insert(identity);
                Ok(())
            }
        }
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.remove(username).is_some())
    }

    async fn list(&self) -> AppResult<Vec<Identity>> {
        let mut users: Vec<Identity> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}
