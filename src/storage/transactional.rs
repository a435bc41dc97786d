//! TableStoreStrategy - redb-backed transactional table storage.
//!
//! Each registry collection maps to one redb table; every call runs in its
//! own transaction. The database handle opens lazily through a shared
//! `OnceCell`, so concurrent first-callers await a single open instead of
//! racing to create the file. The open is gated by a stored schema version:
//! when the version is behind, every registered collection gets its table
//! created before the handle is handed out.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition, TableError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::model::ModelKind;

use super::{backend, StorageError};

const META: TableDefinition<&str, u32> = TableDefinition::new("__meta");
const SCHEMA_VERSION: u32 = 1;

/// Transactional table backend over a redb database.
pub struct TableStoreStrategy {
    path: PathBuf,
    db: OnceCell<Database>,
}

impl TableStoreStrategy {
    /// Bind to a database path. The file is not touched until the first
    /// operation (or an explicit [`ensure_open`](Self::ensure_open)).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TableStoreStrategy {
            path: path.into(),
            db: OnceCell::new(),
        }
    }

    fn table(name: &str) -> TableDefinition<'_, &'static str, &'static str> {
        TableDefinition::new(name)
    }

    /// Open the database if it is not open yet, establishing the schema.
    /// Concurrent callers all await the same open.
    pub(crate) async fn ensure_open(&self) -> Result<&Database, StorageError> {
        self.db
            .get_or_try_init(|| async { Self::open_and_migrate(&self.path) })
            .await
    }

    fn open_and_migrate(path: &Path) -> Result<Database, StorageError> {
        debug!(path = %path.display(), "opening table store");
        let db = Database::create(path).map_err(backend)?;

        let txn = db.begin_write().map_err(backend)?;
        {
            let mut meta = txn.open_table(META).map_err(backend)?;
            let version = meta
                .get("schema_version")
                .map_err(backend)?
                .map(|guard| guard.value())
                .unwrap_or(0);

            if version < SCHEMA_VERSION {
                for kind in ModelKind::ALL {
                    txn.open_table(Self::table(kind.collection()))
                        .map_err(backend)?;
                }
                meta.insert("schema_version", SCHEMA_VERSION)
                    .map_err(backend)?;
                debug!(version = SCHEMA_VERSION, "table store schema established");
            }
        }
        txn.commit().map_err(backend)?;

        Ok(db)
    }

    pub(crate) async fn put(
        &self,
        collection: &str,
        key: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        let db = self.ensure_open().await?;
        let txn = db.begin_write().map_err(backend)?;
        {
            let mut table = txn
                .open_table(Self::table(collection))
                .map_err(backend)?;
            table.insert(key, payload).map_err(backend)?;
        }
        txn.commit().map_err(backend)?;
        Ok(())
    }

    pub(crate) async fn fetch(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let db = self.ensure_open().await?;
        let txn = db.begin_read().map_err(backend)?;

        let table = match txn.open_table(Self::table(collection)) {
            Ok(table) => table,
            // A collection with no table yet holds nothing.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(backend(err)),
        };

        Ok(table
            .get(key)
            .map_err(backend)?
            .map(|guard| guard.value().to_string()))
    }

    pub(crate) async fn remove(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<(), StorageError> {
        let db = self.ensure_open().await?;
        let txn = db.begin_write().map_err(backend)?;
        {
            let mut table = txn
                .open_table(Self::table(collection))
                .map_err(backend)?;
            table.remove(key).map_err(backend)?;
        }
        txn.commit().map_err(backend)?;
        Ok(())
    }
}
