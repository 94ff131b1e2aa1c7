//! Expired and idle session cleanup.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use userhub_core::error::AppError;

use super::store::SessionStore;

/// Handles periodic cleanup of expired and idle sessions.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session store to sweep.
    session_store: Arc<SessionStore>,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self { session_store }
    }

    /// Runs a cleanup cycle, removing all expired and idle sessions.
    ///
    /// Returns the number of sessions cleaned up.
    pub async fn run_cleanup(&self) -> Result<u32, AppError> {
        let cleaned = self.session_store.sweep_expired().await?;
        if cleaned > 0 {
            info!(cleaned = cleaned, "Session cleanup completed");
        }
        Ok(cleaned)
    }

    /// Runs [`run_cleanup`](Self::run_cleanup) every `interval` until
    /// `shutdown` flips to `true` or its sender is dropped.
    pub fn spawn(self, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Session cleanup failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("Session cleanup stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}
