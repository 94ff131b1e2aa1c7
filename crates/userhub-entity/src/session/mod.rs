//! Session domain entities.

pub mod model;
pub mod reference;

pub use model::SessionRecord;
pub use reference::SessionRef;
