//! Custom Axum extractors.

pub mod body;
pub mod session;

pub use body::ValidatedBody;
pub use session::{SESSION_COOKIE, SessionCredentials, TOKEN_HEADER};
