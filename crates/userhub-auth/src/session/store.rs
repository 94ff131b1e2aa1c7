//! Session persistence over the key-value capability.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use userhub_cache::keys;
use userhub_core::config::SessionConfig;
use userhub_core::error::AppError;
use userhub_core::traits::{Clock, KeyValueStore};
use userhub_entity::session::SessionRecord;

/// Holds the current session of every identity, one record per username.
///
/// Records live as JSON under [`keys::session_by_username`] with a TTL equal
/// to their remaining absolute lifetime. Reads treat expired records as
/// absent.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Backing store.
    kv: Arc<dyn KeyValueStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Absolute session lifetime.
    absolute_timeout: Duration,
    /// Maximum time since the last token rotation.
    idle_timeout: Duration,
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            kv,
            clock,
            absolute_timeout: config.absolute_timeout(),
            idle_timeout: config.idle_timeout(),
        }
    }

    /// Builds a fresh record for a session established now.
    pub fn open(&self, username: &str, session_id: Uuid, token: String) -> SessionRecord {
        let now = self.clock.now();
        SessionRecord {
            session_id,
            username: username.to_string(),
            token,
            created_at: now,
            rotated_at: now,
            expires_at: now + self.absolute_timeout,
        }
    }

    /// Returns `record` rebound to a token rotated now.
    pub fn rotate(&self, record: &SessionRecord, token: String) -> SessionRecord {
        record.rotated(token, self.clock.now())
    }

    /// Establishes or overwrites the session of `record.username`.
    pub async fn put(&self, record: &SessionRecord) -> Result<(), AppError> {
        let value = serde_json::to_string(record)?;

        self.kv
            .set(
                &keys::session_by_username(&record.username),
                &value,
                self.ttl_of(record),
            )
            .await
    }

    /// Returns the live session of `username`, if any.
    ///
    /// Records past their absolute or idle timeout are evicted and reported
    /// as absent, as are records that no longer parse.
    pub async fn get(&self, username: &str) -> Result<Option<SessionRecord>, AppError> {
        let key = keys::session_by_username(username);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        match self.parse_live(&raw) {
            Some(record) => Ok(Some(record)),
            None => {
                debug!(username = %username, "Evicting expired session");
                self.kv.compare_and_delete(&key, &raw).await?;
                Ok(None)
            }
        }
    }

    /// Swaps `current` for `next`, provided the stored session is still
    /// `current`: same session id, same token, and live.
    ///
    /// Returns `false` without writing when the session was removed,
    /// superseded, or rotated in the meantime.
    pub async fn replace(
        &self,
        current: &SessionRecord,
        next: &SessionRecord,
    ) -> Result<bool, AppError> {
        let key = keys::session_by_username(&current.username);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(false);
        };
        let still_current = self.parse_live(&raw).is_some_and(|stored| {
            stored.session_id == current.session_id && stored.token == current.token
        });
        if !still_current {
            return Ok(false);
        }

        let value = serde_json::to_string(next)?;
        self.kv
            .compare_and_set(&key, &raw, &value, self.ttl_of(next))
            .await
    }

    /// Removes the session of `username`. Removing nothing succeeds.
    pub async fn remove(&self, username: &str) -> Result<(), AppError> {
        self.kv.delete(&keys::session_by_username(username)).await
    }

    /// Removes the session of `username` only if it is `session_id`.
    ///
    /// A newer session bound in the meantime is left in place. Returns
    /// whether a session was removed.
    pub async fn remove_session(&self, username: &str, session_id: Uuid) -> Result<bool, AppError> {
        let key = keys::session_by_username(username);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(false);
        };
        let matches = serde_json::from_str::<SessionRecord>(&raw)
            .is_ok_and(|stored| stored.session_id == session_id);
        if !matches {
            return Ok(false);
        }

        self.kv.compare_and_delete(&key, &raw).await
    }

    /// Deletes every stored session that is no longer live, along with any
    /// entries the backend kept past their TTL.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> Result<u32, AppError> {
        let purged = self.kv.purge_expired().await?;
        let mut removed = u32::try_from(purged).unwrap_or(u32::MAX);

        for key in self.kv.keys_with_prefix(&keys::session_prefix()).await? {
            let Some(raw) = self.kv.get(&key).await? else {
                continue;
            };
            if self.parse_live(&raw).is_none() && self.kv.compare_and_delete(&key, &raw).await? {
                removed = removed.saturating_add(1);
            }
        }

        Ok(removed)
    }

    fn ttl_of(&self, record: &SessionRecord) -> std::time::Duration {
        (record.expires_at - self.clock.now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    fn parse_live(&self, raw: &str) -> Option<SessionRecord> {
        let record: SessionRecord = match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session record");
                return None;
            }
        };

        record
            .is_live(self.clock.now(), self.idle_timeout)
            .then_some(record)
    }
}
