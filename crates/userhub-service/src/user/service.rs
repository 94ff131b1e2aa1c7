//! User management: creating, reading, and deleting accounts.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use userhub_auth::password::PasswordHasher;
use userhub_auth::rbac::{AccessGuard, PermissionRequirement};
use userhub_auth::session::{RequestCredentials, SessionStore};
use userhub_core::error::AppError;
use userhub_core::traits::Clock;
use userhub_directory::UserDirectory;
use userhub_entity::user::{Identity, Permission};

/// Longest accepted username.
const MAX_USERNAME_LEN: usize = 64;

/// Data for creating a new account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserInput {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password; hashed before anything is stored.
    pub password: String,
    /// Permission labels to grant.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Handles user management operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Identity storage.
    directory: Arc<dyn UserDirectory>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Guard for protected operations.
    guard: Arc<AccessGuard>,
    /// Session store, cleared when an account goes away.
    session_store: Arc<SessionStore>,
    /// Time source for creation timestamps.
    clock: Arc<dyn Clock>,
    /// Accepted permissions for listing and reading users.
    read_requirement: PermissionRequirement,
    /// Accepted permissions for deleting users.
    delete_requirement: PermissionRequirement,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<PasswordHasher>,
        guard: Arc<AccessGuard>,
        session_store: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            hasher,
            guard,
            session_store,
            clock,
            read_requirement: PermissionRequirement::any_of([Permission::read()]),
            delete_requirement: PermissionRequirement::any_of([Permission::delete()]),
        }
    }

    /// Creates an account. Open to unauthenticated callers.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<Identity, AppError> {
        validate_username(&input.username)?;
        if input.email.trim().is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if input.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let permissions = input
            .permissions
            .iter()
            .map(|label| label.parse::<Permission>())
            .collect::<Result<Vec<_>, _>>()?;

        if self.directory.exists_by_username(&input.username).await? {
            return Err(AppError::conflict(format!(
                "user {} already exists",
                input.username
            )));
        }

        let password_hash = self.hasher.hash_off_thread(&input.password).await?;
        let identity = Identity::new(
            input.username,
            input.email.trim(),
            password_hash,
            permissions,
            self.clock.now(),
        );

        self.directory.create(identity.clone()).await?;

        info!(
            username = %identity.username,
            permissions = identity.permissions.len(),
            "User created"
        );

        Ok(identity)
    }

    /// Lists every account. Requires `read`.
    pub async fn list_users(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Vec<Identity>, AppError> {
        self.guard
            .protect(&self.read_requirement, credentials, |_| self.directory.list())
            .await
    }

    /// Fetches one account. Requires `read`.
    pub async fn get_user(
        &self,
        credentials: &RequestCredentials,
        username: &str,
    ) -> Result<Identity, AppError> {
        self.guard
            .protect(&self.read_requirement, credentials, |_| async move {
                self.directory
                    .find_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::not_found("user doesn't exist"))
            })
            .await
    }

    /// Deletes an account and ends its session. Requires `delete`.
    pub async fn delete_user(
        &self,
        credentials: &RequestCredentials,
        username: &str,
    ) -> Result<(), AppError> {
        self.guard
            .protect(&self.delete_requirement, credentials, |caller| async move {
                if !self.directory.delete(username).await? {
                    return Err(AppError::not_found("user doesn't exist"));
                }
                self.session_store.remove(username).await?;

                info!(
                    username = %username,
                    deleted_by = %caller.username(),
                    "User deleted"
                );
                Ok(())
            })
            .await
    }
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@');
    if !username.chars().all(allowed) {
        return Err(AppError::validation(
            "Username may only contain letters, digits, '_', '-', '.', and '@'",
        ));
    }
    Ok(())
}
