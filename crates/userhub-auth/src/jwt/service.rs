//! Token issuance, validation, and rotation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

use userhub_core::config::AuthConfig;
use userhub_core::error::AppError;
use userhub_core::traits::Clock;
use userhub_entity::user::Identity;

use super::claims::Claims;

/// A freshly minted session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    /// The signed token string handed to the client.
    pub token: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops validating on its own.
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks HS256-signed session tokens.
///
/// Expiry is evaluated against the injected [`Clock`] rather than the
/// library's wall-clock check, so the whole auth core shares one notion of
/// "now".
#[derive(Clone)]
pub struct TokenService {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// HMAC key for verification.
    decoding_key: DecodingKey,
    /// Signature validation rules.
    validation: Validation,
    /// Token lifetime.
    ttl: Duration,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: config.token_ttl(),
            clock,
        }
    }

    /// Issues a new token bound to `identity` and `session_id`.
    pub fn issue(&self, identity: &Identity, session_id: Uuid) -> Result<SessionToken, AppError> {
        let now = self.clock.now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: identity.username.clone(),
            sid: session_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(SessionToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Issues the replacement for a session's current token.
    ///
    /// The caller must already have authenticated the session; this does no
    /// authorization of its own.
    pub fn refresh(
        &self,
        identity: &Identity,
        session_id: Uuid,
    ) -> Result<SessionToken, AppError> {
        let token = self.issue(identity, session_id)?;
        debug!(username = %identity.username, session_id = %session_id, "Session token rotated");
        Ok(token)
    }

    /// Checks a presented token against the session's current token.
    ///
    /// True only when both are non-empty, they are byte-for-byte equal, and
    /// the token's signature and expiry hold. Never errors.
    pub fn validate(&self, presented: &str, expected: &str) -> bool {
        if presented.is_empty() || expected.is_empty() {
            return false;
        }

        let equal: bool = presented.as_bytes().ct_eq(expected.as_bytes()).into();
        if !equal {
            return false;
        }

        self.decode(presented).is_ok()
    }

    /// Verifies signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::unauthenticated(format!("Invalid session token: {e}")))?;

        if data.claims.is_expired_at(self.clock.now()) {
            return Err(AppError::unauthenticated("Session token has expired"));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userhub_core::traits::ManualClock;
    use userhub_entity::user::{CredentialHash, Permission};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn alice() -> Identity {
        Identity::new(
            "alice",
            "alice@example.com",
            CredentialHash::from_phc("$argon2id$stub"),
            [Permission::read()],
            Utc::now(),
        )
    }

    #[test]
    fn test_issue_embeds_identity_and_session() {
        let clock = Arc::new(ManualClock::default());
        let service = TokenService::new(&config("test-secret"), clock);
        let sid = Uuid::new_v4();

        let issued = service.issue(&alice(), sid).unwrap();
        let claims = service.decode(&issued.token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_validate_requires_exact_match() {
        let service = TokenService::new(&config("test-secret"), Arc::new(ManualClock::default()));
        let issued = service.issue(&alice(), Uuid::new_v4()).unwrap();
        let other = service.issue(&alice(), Uuid::new_v4()).unwrap();

        assert!(service.validate(&issued.token, &issued.token));
        assert!(!service.validate(&issued.token, &other.token));
        assert!(!service.validate("", &issued.token));
        assert!(!service.validate(&issued.token, ""));
        assert!(!service.validate("", ""));
    }

    #[test]
    fn test_refresh_supersedes_previous_token() {
        let service = TokenService::new(&config("test-secret"), Arc::new(ManualClock::default()));
        let sid = Uuid::new_v4();
        let first = service.issue(&alice(), sid).unwrap();
        let second = service.refresh(&alice(), sid).unwrap();

        assert_ne!(first.token, second.token);
        assert!(service.validate(&second.token, &second.token));
        assert!(!service.validate(&first.token, &second.token));
    }

    #[test]
    fn test_expired_token_fails_closed() {
        let clock = Arc::new(ManualClock::default());
        let service = TokenService::new(&config("test-secret"), clock.clone());
        let issued = service.issue(&alice(), Uuid::new_v4()).unwrap();

        clock.advance(Duration::minutes(61));

        assert!(!service.validate(&issued.token, &issued.token));
        assert!(service.decode(&issued.token).is_err());
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let ours = TokenService::new(&config("ours"), clock.clone());
        let theirs = TokenService::new(&config("theirs"), clock);
        let forged = theirs.issue(&alice(), Uuid::new_v4()).unwrap();

        assert!(!ours.validate(&forged.token, &forged.token));
    }
}
