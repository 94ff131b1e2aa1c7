//! Role-based access control around protected operations.

pub mod guard;
pub mod requirement;

pub use guard::{AccessGuard, AuthenticatedCaller};
pub use requirement::PermissionRequirement;
