//! User domain entities.

pub mod credential;
pub mod model;
pub mod permission;

pub use credential::CredentialHash;
pub use model::Identity;
pub use permission::Permission;
