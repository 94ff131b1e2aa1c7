//! Shared wiring for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use userhub_cache::MemoryKeyValueStore;
use userhub_core::config::{AuthConfig, SessionConfig};
use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::{KeyValueStore, ManualClock};
use userhub_directory::{MemoryUserDirectory, UserDirectory};
use userhub_entity::user::{Identity, Permission};

use crate::jwt::TokenService;
use crate::password::PasswordHasher;
use crate::rbac::AccessGuard;
use crate::session::{SessionManager, SessionStore};

/// The auth core wired over in-memory capabilities and a manual clock.
pub(crate) struct Harness {
    pub clock: Arc<ManualClock>,
    pub directory: Arc<dyn UserDirectory>,
    pub sessions: Arc<SessionStore>,
    pub tokens: Arc<TokenService>,
    pub manager: SessionManager,
    pub guard: AccessGuard,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryUserDirectory::new()),
        )
    }

    pub fn build(kv: Arc<dyn KeyValueStore>, directory: Arc<dyn UserDirectory>) -> Self {
        let clock = Arc::new(ManualClock::default());
        let auth = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        };
        let tokens = Arc::new(TokenService::new(&auth, clock.clone()));
        let sessions = Arc::new(SessionStore::new(kv, clock.clone(), &SessionConfig::default()));
        let manager = SessionManager::new(
            tokens.clone(),
            sessions.clone(),
            directory.clone(),
            Arc::new(PasswordHasher::new()),
        );
        let guard = AccessGuard::new(
            tokens.clone(),
            sessions.clone(),
            directory.clone(),
            auth.guard_timeout(),
        );

        Self {
            clock,
            directory,
            sessions,
            tokens,
            manager,
            guard,
        }
    }

    pub async fn add_user(&self, username: &str, password: &str, perms: &[Permission]) -> Identity {
        let hash = PasswordHasher::new().hash_password(password).unwrap();
        let identity = Identity::new(
            username,
            format!("{username}@example.com"),
            hash,
            perms.iter().cloned(),
            Utc::now(),
        );
        self.directory.create(identity.clone()).await.unwrap();
        identity
    }
}

/// A key-value store whose writes always fail.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: MemoryKeyValueStore,
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::store("store unavailable"))
    }

    async fn compare_and_set(
        &self,
        _key: &str,
        _expected: &str,
        _value: &str,
        _ttl: Duration,
    ) -> AppResult<bool> {
        Err(AppError::store("store unavailable"))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.inner.compare_and_delete(key, expected).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        self.inner.keys_with_prefix(prefix).await
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        self.inner.purge_expired().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

/// A key-value store that, once armed, parks the next conditional write or
/// delete until released.
#[derive(Debug, Default)]
pub(crate) struct GatedStore {
    inner: MemoryKeyValueStore,
    armed: AtomicBool,
    reached: Notify,
    release: Notify,
}

impl GatedStore {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Waits until an operation is parked at the gate.
    pub async fn parked(&self) {
        self.reached.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.pass().await;
        self.inner.compare_and_set(key, expected, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.pass().await;
        self.inner.compare_and_delete(key, expected).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        self.inner.keys_with_prefix(prefix).await
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        self.inner.purge_expired().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// A directory that takes far longer than any guard deadline to answer lookups.
#[derive(Debug, Default)]
pub(crate) struct SlowDirectory {
    inner: MemoryUserDirectory,
}

#[async_trait]
impl UserDirectory for SlowDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        self.inner.find_by_username(username).await
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        self.inner.exists_by_username(username).await
    }

    async fn create(&self, identity: Identity) -> AppResult<()> {
        self.inner.create(identity).await
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        self.inner.delete(username).await
    }

    async fn list(&self) -> AppResult<Vec<Identity>> {
        self.inner.list().await
    }
}
