//! # userhub-core
//!
//! Core crate for UserHub. Contains the capability traits the auth core
//! depends on (key-value store, user directory, clock), configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other UserHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
