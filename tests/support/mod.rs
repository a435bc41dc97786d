use shelfstore::{StorageStrategy, User};
use tempfile::TempDir;

pub fn john() -> User {
    User::new("u1", "John Doe").with_email("john@x.com")
}

pub fn flat_kv(dir: &TempDir) -> StorageStrategy {
    StorageStrategy::flat_kv(dir.path().join("kv")).expect("open sled")
}

pub fn table_store(dir: &TempDir) -> StorageStrategy {
    StorageStrategy::table_store(dir.path().join("store.redb"))
}
