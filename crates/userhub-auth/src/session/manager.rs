//! Session lifecycle: login, logout, and token refresh.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use userhub_core::error::AppError;
use userhub_directory::UserDirectory;
use userhub_entity::session::SessionRef;
use userhub_entity::user::{CredentialHash, Identity};

use crate::jwt::{SessionToken, TokenService};
use crate::password::PasswordHasher;

use super::credentials::RequestCredentials;
use super::store::SessionStore;

/// Message returned for every failed login, whatever the cause.
const INVALID_LOGIN: &str = "Invalid username or password";

/// Hash verified against when the username is unknown, so that path costs
/// the same as a wrong password.
static DUMMY_HASH: OnceLock<CredentialHash> = OnceLock::new();

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Reference to the newly bound session.
    pub session: SessionRef,
    /// The session's first token.
    pub token: SessionToken,
    /// The authenticated identity.
    pub identity: Identity,
}

/// Result of a refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The session's token was rotated.
    Refreshed(SessionToken),
    /// There was no session to refresh.
    LoggedOut,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Token issuance and validation.
    token_service: Arc<TokenService>,
    /// Session persistence.
    session_store: Arc<SessionStore>,
    /// Identity lookups.
    directory: Arc<dyn UserDirectory>,
    /// Password verification.
    password_hasher: Arc<PasswordHasher>,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        token_service: Arc<TokenService>,
        session_store: Arc<SessionStore>,
        directory: Arc<dyn UserDirectory>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            token_service,
            session_store,
            directory,
            password_hasher,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Find the identity
    /// 2. Verify the password off the async executor
    /// 3. Issue a token under a new session id
    /// 4. Bind the session, replacing any previous one
    ///
    /// Every credential failure yields the same authentication error. If the
    /// session cannot be bound, no token is handed out.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AppError> {
        let Some(identity) = self.directory.find_by_username(username).await? else {
            self.spend_dummy_verification(password).await?;
            warn!(username = %username, "Login failed: unknown user");
            return Err(AppError::authentication(INVALID_LOGIN));
        };

        let password_valid = self
            .password_hasher
            .verify_off_thread(password, &identity.password_hash)
            .await?;

        if !password_valid {
            warn!(username = %username, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_LOGIN));
        }

        let session_id = Uuid::new_v4();
        let token = self.token_service.issue(&identity, session_id)?;
        let record = self
            .session_store
            .open(&identity.username, session_id, token.token.clone());

        if let Err(e) = self.session_store.put(&record).await {
            error!(
                username = %identity.username,
                error = %e,
                "Failed to bind session, login aborted"
            );
            return Err(e);
        }

        info!(
            username = %identity.username,
            session_id = %session_id,
            "User logged in"
        );

        Ok(LoginResult {
            session: SessionRef::new(identity.username.clone(), session_id),
            token,
            identity,
        })
    }

    /// Ends the referenced session.
    ///
    /// A newer session of the same identity is left alone. Logging out
    /// without a session succeeds.
    pub async fn logout(&self, session: &SessionRef) -> Result<(), AppError> {
        let removed = self
            .session_store
            .remove_session(&session.username, session.session_id)
            .await?;

        if removed {
            info!(
                username = %session.username,
                session_id = %session.session_id,
                "User logged out"
            );
        } else {
            debug!(username = %session.username, "Logout without a matching session");
        }
        Ok(())
    }

    /// Rotates the token of the referenced session.
    ///
    /// Without a live session the outcome is [`RefreshOutcome::LoggedOut`].
    /// A live session with a wrong or missing token is an authentication
    /// failure. On success the previous token stops validating. If the
    /// session is logged out or superseded while the new token is minted,
    /// nothing is written and the outcome is [`RefreshOutcome::LoggedOut`].
    pub async fn refresh(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<RefreshOutcome, AppError> {
        let Some(session) = credentials.session.as_ref() else {
            return Ok(RefreshOutcome::LoggedOut);
        };

        let record = match self.session_store.get(&session.username).await? {
            Some(record) if record.session_id == session.session_id => record,
            _ => {
                debug!(username = %session.username, "Refresh without a live session");
                return Ok(RefreshOutcome::LoggedOut);
            }
        };

        if !self
            .token_service
            .validate(credentials.token_or_empty(), &record.token)
        {
            warn!(username = %session.username, "Token refresh rejected");
            return Err(AppError::authentication("Invalid or expired token"));
        }

        let Some(identity) = self.directory.find_by_username(&record.username).await? else {
            self.session_store
                .remove_session(&record.username, record.session_id)
                .await?;
            return Ok(RefreshOutcome::LoggedOut);
        };

        let token = self.token_service.refresh(&identity, record.session_id)?;
        let rotated = self.session_store.rotate(&record, token.token.clone());
        if !self.session_store.replace(&record, &rotated).await? {
            debug!(username = %record.username, "Session ended during refresh");
            return Ok(RefreshOutcome::LoggedOut);
        }

        info!(
            username = %record.username,
            session_id = %record.session_id,
            "Session token refreshed"
        );

        Ok(RefreshOutcome::Refreshed(token))
    }

    async fn spend_dummy_verification(&self, password: &str) -> Result<(), AppError> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let hash = DUMMY_HASH.get_or_init(|| {
                hasher
                    .hash_password("userhub-dummy-credential")
                    .unwrap_or_else(|_| CredentialHash::from_phc(""))
            });
            hasher.verify_password(&password, hash)
        })
        .await
        .map(|_| ())
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
    }
}
