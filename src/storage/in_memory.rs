//! InMemoryStrategy - HashMap-backed storage for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::StorageError;

/// In-memory backend: one map of collections, each a map of id to record.
///
/// Collections are created lazily on first write. Data lives for the life
/// of the process. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStrategy {
    collections: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl InMemoryStrategy {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn put(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned("put"))?;

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), payload.to_string());

        Ok(())
    }

    pub(crate) async fn fetch(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StorageError::LockPoisoned("fetch"))?;

        Ok(collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    pub(crate) async fn remove(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<(), StorageError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned("remove"))?;

        if let Some(records) = collections.get_mut(collection) {
            records.remove(key);
        }

        Ok(())
    }
}
