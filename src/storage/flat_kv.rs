//! FlatKvStrategy - sled-backed flat key-value storage.
//!
//! Records live in a single keyspace under composite `collection/id` keys.
//! sled's API is synchronous; calls complete inline inside the async
//! interface. The backend contributes its own id capability: sled's
//! monotonic id generator.

use std::path::Path;

use super::{backend, StorageError};

/// Flat key-value backend over a sled tree.
pub struct FlatKvStrategy {
    db: sled::Db,
}

impl FlatKvStrategy {
    /// Open (or create) a sled database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(backend)?;
        Ok(FlatKvStrategy { db })
    }

    fn composite_key(collection: &str, key: &str) -> String {
        format!("{}/{}", collection, key)
    }

    pub(crate) async fn put(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        let storage_key = Self::composite_key(collection, key);
        self.db
            .insert(storage_key.as_bytes(), payload.as_bytes())
            .map_err(backend)?;
        Ok(())
    }

    pub(crate) async fn fetch(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let storage_key = Self::composite_key(collection, key);
        match self.db.get(storage_key.as_bytes()).map_err(backend)? {
            Some(bytes) => {
                let payload = String::from_utf8(bytes.to_vec())
                    .map_err(|e| StorageError::Serde(e.to_string()))?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    pub(crate) async fn remove(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<(), StorageError> {
        let storage_key = Self::composite_key(collection, key);
        self.db.remove(storage_key.as_bytes()).map_err(backend)?;
        Ok(())
    }

    /// sled supplies monotonic ids; surface them as this backend's id
    /// capability.
    pub(crate) fn generate_id(&self) -> Option<String> {
        self.db.generate_id().ok().map(|id| id.to_string())
    }
}
