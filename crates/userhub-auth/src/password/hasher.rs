//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use userhub_core::error::AppError;
use userhub_entity::user::CredentialHash;

/// Handles password hashing and verification using Argon2id.
///
/// Hashing is CPU-heavy; async callers should run it on a blocking thread.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a fresh random salt.
    ///
    /// Two calls with the same password produce different hashes.
    pub fn hash_password(&self, password: &str) -> Result<CredentialHash, AppError> {
        if password.is_empty() {
            return Err(AppError::invalid_credential("Password must not be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(CredentialHash::from_phc(hash.to_string()))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// The digest comparison is constant-time. A malformed hash never
    /// matches.
    pub fn verify_password(&self, password: &str, hash: &CredentialHash) -> bool {
        let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Runs [`hash_password`](Self::hash_password) on the blocking pool.
    pub async fn hash_off_thread(&self, password: &str) -> Result<CredentialHash, AppError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// Runs [`verify_password`](Self::verify_password) on the blocking pool.
    pub async fn verify_off_thread(
        &self,
        password: &str,
        hash: &CredentialHash,
    ) -> Result<bool, AppError> {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
    }
}
