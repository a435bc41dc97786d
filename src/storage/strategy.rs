//! StorageStrategy - The closed set of storage backends.
//!
//! A sum type rather than a trait object: the set of backends is closed, so
//! dispatch is an exhaustive match and adding a variant is a compile error
//! everywhere it matters. Every backend answers the same contract:
//!
//! - `save`/`update` upsert a serialized record under (collection, key)
//! - `get` returns `Ok(None)` for absent keys, never an error
//! - `delete` is an idempotent no-op on absent keys
//! - `deserialize` propagates `None` without invoking the model factory

use crate::model::{Model, Record};

use super::{Ack, FlatKvStrategy, InMemoryStrategy, StorageError, TableStoreStrategy};

/// A concrete storage backend. Owned by [`Storage`](super::Storage); one is
/// active at a time.
pub enum StorageStrategy {
    InMemory(InMemoryStrategy),
    FlatKv(FlatKvStrategy),
    TableStore(TableStoreStrategy),
}

impl StorageStrategy {
    /// Process-lifetime storage. The default backend.
    pub fn in_memory() -> Self {
        StorageStrategy::InMemory(InMemoryStrategy::new())
    }

    /// Persistent flat key-value storage (sled) at the given path.
    pub fn flat_kv(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        Ok(StorageStrategy::FlatKv(FlatKvStrategy::open(path)?))
    }

    /// Persistent transactional table storage (redb) at the given path.
    /// The database opens lazily on first use.
    pub fn table_store(path: impl Into<std::path::PathBuf>) -> Self {
        StorageStrategy::TableStore(TableStoreStrategy::new(path))
    }

    /// Persist `payload` under `key` in `collection`. Upsert: saving the
    /// same key twice overwrites.
    pub async fn save(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<Ack, StorageError> {
        self.put(collection, key, payload).await?;
        Ok(Ack::saved())
    }

    /// Fetch and deserialize the record under `key`, or `Ok(None)` if the
    /// key was never written.
    pub async fn get<M: Model>(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<M>, StorageError> {
        let raw = match self {
            StorageStrategy::InMemory(store) => store.fetch(collection, key).await?,
            StorageStrategy::FlatKv(store) => store.fetch(collection, key).await?,
            StorageStrategy::TableStore(store) => store.fetch(collection, key).await?,
        };
        self.deserialize(raw.as_deref())
    }

    /// Behaviorally identical to [`save`](Self::save); a distinct entry
    /// point so callers and traces can tell intent apart.
    pub async fn update(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<Ack, StorageError> {
        self.put(collection, key, payload).await?;
        Ok(Ack::updated())
    }

    /// Remove the record under `key`. Deleting an absent key acks the same
    /// as deleting a present one.
    pub async fn delete(&self, collection: &str, key: &str) -> Result<Ack, StorageError> {
        match self {
            StorageStrategy::InMemory(store) => store.remove(collection, key).await?,
            StorageStrategy::FlatKv(store) => store.remove(collection, key).await?,
            StorageStrategy::TableStore(store) => store.remove(collection, key).await?,
        }
        Ok(Ack::deleted())
    }

    /// Decode a stored payload through the model factory. `None` in yields
    /// `None` out without touching the factory, since the factory enforces
    /// required fields and would spuriously reject empty input.
    pub fn deserialize<M: Model>(
        &self,
        payload: Option<&str>,
    ) -> Result<Option<M>, StorageError> {
        let Some(payload) = payload else {
            return Ok(None);
        };
        let record: Record = serde_json::from_str(payload)?;
        Ok(Some(M::from_record(&record)?))
    }

    /// The backend's own id capability, if it has one. `None` tells the
    /// facade to fall back to its UUID generator.
    pub fn generate_id(&self) -> Option<String> {
        match self {
            StorageStrategy::InMemory(_) => None,
            StorageStrategy::FlatKv(store) => store.generate_id(),
            StorageStrategy::TableStore(_) => None,
        }
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        match self {
            StorageStrategy::InMemory(store) => store.put(collection, key, payload).await,
            StorageStrategy::FlatKv(store) => store.put(collection, key, payload).await,
            StorageStrategy::TableStore(store) => store.put(collection, key, payload).await,
        }
    }
}
