//! Trait abstraction for the key-value store to enable mocking in tests

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Storage lock was poisoned")]
    Poisoned,
}

/// String-keyed, string-valued store. Writes overwrite, last write wins.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` for an absent key
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Create or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value; removing an absent key succeeds
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
