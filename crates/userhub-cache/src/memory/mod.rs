//! In-process key-value store.

pub mod store;

pub use store::MemoryKeyValueStore;
