//! Access control guard.
//!
//! Every protected operation passes two stages before it runs:
//!
//! 1. **Authentication**: the session reference must name a live session and
//!    the presented token must be that session's current token. The stage is
//!    bounded by a deadline.
//! 2. **Authorization**: the caller must hold one of the operation's accepted
//!    permissions.
//!
//! A failure in the first stage is always reported as such, whatever the
//! caller's permissions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use userhub_core::error::AppError;
use userhub_directory::UserDirectory;
use userhub_entity::session::SessionRef;
use userhub_entity::user::Identity;

use crate::jwt::TokenService;
use crate::session::{RequestCredentials, SessionStore};

use super::requirement::PermissionRequirement;

/// A caller that passed the authentication stage.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    /// The caller's identity as currently stored in the directory.
    pub identity: Identity,
    /// The session the caller authenticated with.
    pub session: SessionRef,
}

impl AuthenticatedCaller {
    /// The caller's username.
    pub fn username(&self) -> &str {
        &self.identity.username
    }
}

/// Authenticates requests and checks them against permission requirements.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// Token validation.
    token_service: Arc<TokenService>,
    /// Session lookups.
    session_store: Arc<SessionStore>,
    /// Identity lookups.
    directory: Arc<dyn UserDirectory>,
    /// Deadline for the authentication stage.
    timeout: Duration,
}

impl AccessGuard {
    /// Creates a new guard.
    pub fn new(
        token_service: Arc<TokenService>,
        session_store: Arc<SessionStore>,
        directory: Arc<dyn UserDirectory>,
        timeout: Duration,
    ) -> Self {
        Self {
            token_service,
            session_store,
            directory,
            timeout,
        }
    }

    /// Runs the authentication stage.
    pub async fn authenticate(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<AuthenticatedCaller, AppError> {
        match tokio::time::timeout(self.timeout, self.resolve_caller(credentials)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Authentication did not complete before the deadline"
                );
                Err(AppError::timeout("Authentication timed out"))
            }
        }
    }

    /// Runs the authorization stage for an authenticated caller.
    pub fn authorize(
        &self,
        caller: &AuthenticatedCaller,
        requirement: &PermissionRequirement,
    ) -> Result<(), AppError> {
        if requirement.is_satisfied_by(&caller.identity) {
            return Ok(());
        }

        warn!(
            username = %caller.username(),
            required = %requirement,
            "Access denied"
        );
        Err(AppError::forbidden(format!(
            "Insufficient permissions: requires {requirement}"
        )))
    }

    /// Runs both stages in order.
    pub async fn check(
        &self,
        requirement: &PermissionRequirement,
        credentials: &RequestCredentials,
    ) -> Result<AuthenticatedCaller, AppError> {
        let caller = self.authenticate(credentials).await?;
        self.authorize(&caller, requirement)?;
        Ok(caller)
    }

    /// Runs `operation` only if the request passes both stages.
    pub async fn protect<T, F, Fut>(
        &self,
        requirement: &PermissionRequirement,
        credentials: &RequestCredentials,
        operation: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(AuthenticatedCaller) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let caller = self.check(requirement, credentials).await?;
        operation(caller).await
    }

    async fn resolve_caller(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<AuthenticatedCaller, AppError> {
        let Some(session) = credentials.session.as_ref() else {
            return Err(AppError::unauthenticated("Authentication required"));
        };

        let record = self
            .session_store
            .get(&session.username)
            .await?
            .filter(|record| record.session_id == session.session_id);

        let Some(record) = record else {
            debug!(username = %session.username, "No live session for reference");
            return Err(AppError::unauthenticated("No active session"));
        };

        if !self
            .token_service
            .validate(credentials.token_or_empty(), &record.token)
        {
            debug!(username = %session.username, "Presented token rejected");
            return Err(AppError::unauthenticated("Invalid or expired token"));
        }

        let Some(identity) = self.directory.find_by_username(&record.username).await? else {
            debug!(username = %session.username, "Session owner no longer exists");
            return Err(AppError::unauthenticated("Unknown identity"));
        };

        Ok(AuthenticatedCaller {
            identity,
            session: session.clone(),
        })
    }
}
