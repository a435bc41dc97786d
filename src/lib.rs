mod model;
mod storage;

pub use model::{
    optional_str, require_str, Audit, Model, ModelKind, Record, User, ValidationError,
};
pub use storage::{
    Ack, FlatKvStrategy, InMemoryStrategy, Storage, StorageError, StorageStrategy,
    TableStoreStrategy,
};
