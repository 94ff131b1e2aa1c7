//! Signed session tokens.

pub mod claims;
pub mod service;

pub use claims::Claims;
pub use service::{SessionToken, TokenService};
