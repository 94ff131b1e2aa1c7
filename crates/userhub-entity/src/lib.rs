//! # userhub-entity
//!
//! Domain entities shared by every UserHub crate: identities, their
//! permission labels and credential hashes, and server-side sessions.

pub mod session;
pub mod user;
