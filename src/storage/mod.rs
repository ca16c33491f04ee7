//! Local key-value storage for drafts and the signed-in user
//!
//! Values are opaque strings (JSON in practice), the same contract a
//! browser's local storage offers.

mod drafts;
mod file_store;
mod memory_store;
mod traits;

pub use drafts::DraftStore;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use traits::KeyValueStore;

#[cfg(test)]
pub use traits::{MockKeyValueStore, StoreError};
