//! Persisted form drafts keyed by user email

use super::traits::{KeyValueStore, StoreError};
use crate::state::PersistedRecord;
use std::sync::Arc;

const KEY_PREFIX: &str = "form-data:";

/// Typed access to saved drafts on top of a [`KeyValueStore`]
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key for a user's draft
    pub fn key_for(email: &str) -> String {
        format!("{KEY_PREFIX}{email}")
    }

    /// Load a saved draft.
    ///
    /// Read failures and malformed payloads are logged and reported as no
    /// draft at all.
    pub fn get(&self, email: &str) -> Option<PersistedRecord> {
        let key = Self::key_for(email);
        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!("Failed to read draft {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!("Discarding malformed draft {key}: {err}");
                None
            }
        }
    }

    pub fn set(&self, email: &str, record: &PersistedRecord) -> Result<(), StoreError> {
        let value = serde_json::to_string(record)?;
        self.store.set(&Self::key_for(email), &value)
    }

    pub fn delete(&self, email: &str) -> Result<(), StoreError> {
        self.store.delete(&Self::key_for(email))
    }
}
