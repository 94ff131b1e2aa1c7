//! User directory capability.

use async_trait::async_trait;

use userhub_core::result::AppResult;
use userhub_entity::user::Identity;

/// Storage of identities, keyed by username.
///
/// Lookups are exact and case-sensitive. Backend failures are reported as
/// [`ErrorKind::Directory`](userhub_core::error::ErrorKind::Directory).
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find an identity by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>>;

    /// Check whether a username is taken.
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Store a new identity. Fails with a conflict if the username is taken.
    async fn create(&self, identity: Identity) -> AppResult<()>;

    /// Delete an identity. Returns `true` if one was removed.
    async fn delete(&self, username: &str) -> AppResult<bool>;

    /// List all identities ordered by username.
    async fn list(&self) -> AppResult<Vec<Identity>>;
}
