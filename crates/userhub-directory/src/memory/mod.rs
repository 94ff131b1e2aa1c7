//! In-process user directory.

pub mod repository;

pub use repository::MemoryUserDirectory;
