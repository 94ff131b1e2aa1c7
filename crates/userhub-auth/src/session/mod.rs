//! Session lifecycle management including login, refresh, and termination.

pub mod cleanup;
pub mod credentials;
pub mod manager;
pub mod store;

pub use cleanup::SessionCleanup;
pub use credentials::RequestCredentials;
pub use manager::{LoginResult, RefreshOutcome, SessionManager};
pub use store::SessionStore;
