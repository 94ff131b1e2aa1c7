//! # userhub-auth
//!
//! Authentication and authorization for UserHub.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `jwt`: signed session token issuance, validation, and rotation
//! - `session`: session store, expiry sweeps, and the login/logout/refresh flow
//! - `rbac`: the access guard wrapping protected operations

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, SessionToken, TokenService};
pub use password::PasswordHasher;
pub use rbac::{AccessGuard, AuthenticatedCaller, PermissionRequirement};
pub use session::{
    LoginResult, RefreshOutcome, RequestCredentials, SessionCleanup, SessionManager, SessionStore,
};

#[cfg(test)]
pub(crate) mod testing;
