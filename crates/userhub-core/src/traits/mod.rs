//! Capability traits defined in `userhub-core` and implemented by other crates.

pub mod clock;
pub mod kv_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use kv_store::KeyValueStore;
