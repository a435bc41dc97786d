//! Storage - Backend-agnostic CRUD facade over the active strategy.

use tracing::debug;
use uuid::Uuid;

use crate::model::{Model, ModelKind};

use super::{Ack, StorageError, StorageStrategy};

/// The application-facing storage handle. Holds exactly one active
/// [`StorageStrategy`] (default: in-memory) and resolves collections
/// through the model registry.
pub struct Storage {
    strategy: StorageStrategy,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    /// Storage with the in-memory default backend.
    pub fn new() -> Self {
        Storage {
            strategy: StorageStrategy::in_memory(),
        }
    }

    /// Storage with an explicit backend. The table-store schema is not
    /// established until first use; see [`set_strategy`](Self::set_strategy)
    /// for the eager path.
    pub fn with_strategy(strategy: StorageStrategy) -> Self {
        Storage { strategy }
    }

    /// The active backend.
    pub fn strategy(&self) -> &StorageStrategy {
        &self.strategy
    }

    /// Persist a model: key from its id, collection from the registry,
    /// payload from its serialized record.
    pub async fn save<M: Model>(&self, model: &M) -> Result<Ack, StorageError> {
        let payload = model.to_record()?;
        self.strategy
            .save(M::KIND.collection(), model.id(), &payload)
            .await
    }

    /// Fetch a model by id. Absence is `Ok(None)`, never an error.
    pub async fn get<M: Model>(&self, id: &str) -> Result<Option<M>, StorageError> {
        self.strategy.get(M::KIND.collection(), id).await
    }

    /// Re-persist a model, stamping its update metadata first. Callers
    /// updating a model go through here rather than `save`, so the audit
    /// stamp cannot be skipped. Upsert: an absent key is written fresh.
    pub async fn update<M: Model>(
        &self,
        model: &mut M,
        updated_by: Option<&str>,
    ) -> Result<Ack, StorageError> {
        model.audit_mut().touch(updated_by);
        let payload = model.to_record()?;
        self.strategy
            .update(M::KIND.collection(), model.id(), &payload)
            .await
    }

    /// Delete a model by id. Idempotent.
    pub async fn delete<M: Model>(&self, id: &str) -> Result<Ack, StorageError> {
        self.strategy.delete(M::KIND.collection(), id).await
    }

    /// Swap the active backend. The prior backend's handle is dropped
    /// (sled flushes, redb closes); switching to the table store
    /// establishes its schema before the swap completes.
    pub async fn set_strategy(
        &mut self,
        strategy: StorageStrategy,
    ) -> Result<(), StorageError> {
        if let StorageStrategy::TableStore(store) = &strategy {
            store.ensure_open().await?;
        }
        self.strategy = strategy;
        debug!("storage strategy swapped");
        Ok(())
    }

    /// Mint a new record id: the backend's capability if it has one, else
    /// a UUID v4.
    pub fn generate_id(&self) -> String {
        self.strategy
            .generate_id()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Resolve a string type tag against the registry. An unknown tag is a
    /// caller misconfiguration and surfaces as [`StorageError::UnknownKind`].
    pub fn resolve_kind(tag: &str) -> Result<ModelKind, StorageError> {
        ModelKind::from_tag(tag).ok_or_else(|| StorageError::UnknownKind(tag.to_string()))
    }
}
