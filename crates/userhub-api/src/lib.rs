//! # userhub-api
//!
//! HTTP transport for UserHub built on Axum.
//!
//! All routes live under `/api`. Session references travel in the `session`
//! cookie and tokens in the `Authorization: Bearer` header.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
