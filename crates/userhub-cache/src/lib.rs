//! # userhub-cache
//!
//! Key-value store implementations behind the
//! [`KeyValueStore`](userhub_core::traits::KeyValueStore) capability, plus
//! the key builders for every entry UserHub writes.

pub mod keys;
pub mod memory;

pub use memory::MemoryKeyValueStore;
