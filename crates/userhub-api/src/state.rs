//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use userhub_auth::jwt::TokenService;
use userhub_auth::password::PasswordHasher;
use userhub_auth::rbac::AccessGuard;
use userhub_auth::session::{SessionCleanup, SessionManager, SessionStore};
use userhub_cache::MemoryKeyValueStore;
use userhub_core::config::AppConfig;
use userhub_core::traits::{Clock, KeyValueStore, SystemClock};
use userhub_directory::{MemoryUserDirectory, UserDirectory};
use userhub_service::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Capabilities ─────────────────────────────────────────
    /// Key-value store backing sessions
    pub kv_store: Arc<dyn KeyValueStore>,
    /// Identity storage
    pub directory: Arc<dyn UserDirectory>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session persistence
    pub session_store: Arc<SessionStore>,
    /// Login, logout, and refresh flows
    pub session_manager: Arc<SessionManager>,
    /// Guard for protected operations
    pub access_guard: Arc<AccessGuard>,

    // ── Services ─────────────────────────────────────────────
    /// User management
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wires the auth core and services over the given capabilities.
    pub fn new(
        config: AppConfig,
        kv_store: Arc<dyn KeyValueStore>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let password_hasher = Arc::new(PasswordHasher::new());
        let token_service = Arc::new(TokenService::new(&config.auth, Arc::clone(&clock)));
        let session_store = Arc::new(SessionStore::new(
            Arc::clone(&kv_store),
            Arc::clone(&clock),
            &config.session,
        ));

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&token_service),
            Arc::clone(&session_store),
            Arc::clone(&directory),
            Arc::clone(&password_hasher),
        ));
        let access_guard = Arc::new(AccessGuard::new(
            Arc::clone(&token_service),
            Arc::clone(&session_store),
            Arc::clone(&directory),
            config.auth.guard_timeout(),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&directory),
            Arc::clone(&password_hasher),
            Arc::clone(&access_guard),
            Arc::clone(&session_store),
            clock,
        ));

        Self {
            config: Arc::new(config),
            kv_store,
            directory,
            session_store,
            session_manager,
            access_guard,
            user_service,
        }
    }

    /// State over the in-memory store and directory with the system clock.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(SystemClock),
        )
    }

    /// Cleanup handler sweeping this state's session store.
    pub fn session_cleanup(&self) -> SessionCleanup {
        SessionCleanup::new(Arc::clone(&self.session_store))
    }
}
