//! User management services.

pub mod service;

pub use service::{CreateUserInput, UserService};
