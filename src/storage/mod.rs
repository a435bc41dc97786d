//! Storage - Pluggable CRUD persistence for registered models.
//!
//! One [`Storage`] facade holds exactly one active [`StorageStrategy`] and
//! exposes backend-agnostic save/get/update/delete. The strategy is a closed
//! sum over three backends:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  StorageStrategy                     │
//! └──────────────────────────────────────────────────────┘
//!       ↑                   ↑                    ↑
//! ┌─────┴──────┐   ┌────────┴───────┐   ┌────────┴────────┐
//! │  InMemory  │   │     FlatKv     │   │   TableStore    │
//! │ (HashMap)  │   │     (sled)     │   │     (redb)      │
//! └────────────┘   └────────────────┘   └─────────────────┘
//! ```
//!
//! Absence is a value, not an error: `get` on a never-written key returns
//! `Ok(None)` from every backend. Errors bubble unmodified; this layer
//! carries no retries and no recovery.

mod flat_kv;
mod in_memory;
mod storage;
mod strategy;
mod transactional;

use std::fmt;

use serde::Serialize;

use crate::model::ValidationError;

pub use flat_kv::FlatKvStrategy;
pub use in_memory::InMemoryStrategy;
pub use storage::Storage;
pub use strategy::StorageStrategy;
pub use transactional::TableStoreStrategy;

/// Acknowledgement returned by mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub(crate) fn saved() -> Self {
        Ack {
            message: "object saved successfully".to_string(),
        }
    }

    pub(crate) fn updated() -> Self {
        Ack {
            message: "object updated successfully".to_string(),
        }
    }

    pub(crate) fn deleted() -> Self {
        Ack {
            message: "object deleted successfully".to_string(),
        }
    }
}

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A record failed required-field validation during rehydration.
    Validation(ValidationError),
    /// Malformed payload: the stored text is not a decodable record.
    /// Distinct from absence, which is `Ok(None)`.
    Serde(String),
    /// Backend failure (open, transaction, or commit), with the backend's
    /// native error text.
    Backend(String),
    /// In-memory guard poisoned during the named operation.
    LockPoisoned(&'static str),
    /// A string type tag with no registry entry. A programming error in the
    /// caller, surfaced immediately rather than swallowed.
    UnknownKind(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Validation(err) => write!(f, "{}", err),
            StorageError::Serde(msg) => write!(f, "record serialization error: {}", msg),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::UnknownKind(tag) => {
                write!(f, "unknown model kind: {}", tag)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::Validation(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}

/// Map a backend-native error into `StorageError::Backend`.
pub(crate) fn backend(err: impl fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}
