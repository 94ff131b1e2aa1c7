//! # userhub-service
//!
//! Business logic for user management. Protected operations run behind the
//! access guard with the permission requirements declared here.

pub mod user;

pub use user::{CreateUserInput, UserService};
