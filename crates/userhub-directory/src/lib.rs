//! # userhub-directory
//!
//! The [`UserDirectory`] capability the auth core reads identities from,
//! and an in-memory implementation of it.

pub mod directory;
pub mod memory;

pub use directory::UserDirectory;
pub use memory::MemoryUserDirectory;
