//! Key-value capability backing the session store.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key-value backends (in-memory, or an external atomic service).
///
/// Each operation is atomic for its key. Implementations make no promise
/// about ordering across different keys, and callers must not rely on
/// multi-key transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, overwriting any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Replace the value of `key` only if it currently holds `expected`.
    ///
    /// Returns `false`, leaving the store untouched, when the key is missing,
    /// expired, or holds anything else.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Delete `key` only if it currently holds `expected`. Returns whether
    /// anything was deleted.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// List all live keys starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Drop entries whose TTL has passed. Returns how many were dropped.
    ///
    /// Backends that expire keys on their own may return `0`.
    async fn purge_expired(&self) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
