mod support;

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use shelfstore::{Storage, StorageError, StorageStrategy, User};
use support::{flat_kv, john, table_store};
use tempfile::TempDir;

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Save → get → update → get → delete → get, against one backend.
async fn end_to_end(storage: &Storage) {
    let mut user = john();
    storage.save(&user).await.unwrap();

    let loaded: User = storage.get("u1").await.unwrap().unwrap();
    assert_eq!(loaded.id, "u1");
    assert_eq!(loaded.name, "John Doe");
    assert_eq!(loaded.email.as_deref(), Some("john@x.com"));

    user.name = "Jane Doe".to_string();
    storage.update(&mut user, None).await.unwrap();

    let updated: User = storage.get("u1").await.unwrap().unwrap();
    assert_eq!(updated.name, "Jane Doe");
    assert!(updated.audit.updated_on.is_some());

    storage.delete::<User>("u1").await.unwrap();
    let gone: Option<User> = storage.get("u1").await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn end_to_end_in_memory() {
    end_to_end(&Storage::new()).await;
}

#[tokio::test]
async fn end_to_end_flat_kv() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_strategy(flat_kv(&dir));
    end_to_end(&storage).await;
}

#[tokio::test]
async fn end_to_end_table_store() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_strategy(table_store(&dir));
    end_to_end(&storage).await;
}

#[tokio::test]
async fn round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let backends = vec![
        StorageStrategy::in_memory(),
        flat_kv(&dir),
        table_store(&dir),
    ];

    for strategy in backends {
        let storage = Storage::with_strategy(strategy);
        let user = john();

        storage.save(&user).await.unwrap();
        let loaded: User = storage.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded, user);
    }
}

#[tokio::test]
async fn get_never_written_key_returns_none_on_every_backend() {
    let dir = TempDir::new().unwrap();
    let backends = vec![
        StorageStrategy::in_memory(),
        flat_kv(&dir),
        table_store(&dir),
    ];

    for strategy in backends {
        let storage = Storage::with_strategy(strategy);
        let loaded: Option<User> = storage.get("never-written").await.unwrap();
        assert!(loaded.is_none());
    }
}

#[tokio::test]
async fn delete_is_idempotent_on_every_backend() {
    let dir = TempDir::new().unwrap();
    let backends = vec![
        StorageStrategy::in_memory(),
        flat_kv(&dir),
        table_store(&dir),
    ];

    for strategy in backends {
        let storage = Storage::with_strategy(strategy);
        let user = john();
        storage.save(&user).await.unwrap();

        let first = storage.delete::<User>("u1").await.unwrap();
        let second = storage.delete::<User>("u1").await.unwrap();
        let never_there = storage.delete::<User>("u2").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, never_there);
    }
}

#[tokio::test]
async fn update_stamps_are_ordered() {
    let storage = Storage::new();
    let mut user = john();
    storage.save(&user).await.unwrap();

    let before_update = now_millis();
    storage.update(&mut user, Some("admin")).await.unwrap();

    let loaded: User = storage.get("u1").await.unwrap().unwrap();
    let updated_on = loaded.audit.updated_on.unwrap();
    assert!(updated_on > loaded.audit.created_on);
    assert!(updated_on >= before_update);
    assert_eq!(loaded.audit.updated_by.as_deref(), Some("admin"));
}

#[tokio::test]
async fn swapped_strategies_do_not_share_data() {
    let mut storage = Storage::new();
    storage.save(&john()).await.unwrap();

    let dir = TempDir::new().unwrap();
    storage.set_strategy(flat_kv(&dir)).await.unwrap();

    let loaded: Option<User> = storage.get("u1").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn swapping_to_table_store_establishes_schema() {
    let mut storage = Storage::new();
    let dir = TempDir::new().unwrap();
    storage.set_strategy(table_store(&dir)).await.unwrap();

    // The users table exists before any write.
    let loaded: Option<User> = storage.get("nobody").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn swapping_back_to_a_persistent_backend_finds_its_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.redb");

    let mut storage = Storage::new();
    storage
        .set_strategy(StorageStrategy::table_store(&path))
        .await
        .unwrap();
    storage.save(&john()).await.unwrap();

    // Swap away (dropping the handle), then bind a fresh strategy to the
    // same file.
    storage.set_strategy(StorageStrategy::in_memory()).await.unwrap();
    storage
        .set_strategy(StorageStrategy::table_store(&path))
        .await
        .unwrap();

    let loaded: User = storage.get("u1").await.unwrap().unwrap();
    assert_eq!(loaded.name, "John Doe");
}

#[tokio::test]
async fn fallback_ids_are_unique_and_non_empty() {
    let storage = Storage::new();
    let mut seen = HashSet::new();

    for _ in 0..10_000 {
        let id = storage.generate_id();
        assert!(!id.is_empty());
        assert!(seen.insert(id), "generated a duplicate id");
    }
}

#[tokio::test]
async fn flat_kv_supplies_its_own_ids() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_strategy(flat_kv(&dir));

    let first = storage.generate_id();
    let second = storage.generate_id();
    assert_ne!(first, second);
    // sled ids are numeric, not UUIDs.
    assert!(first.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn malformed_stored_payload_is_not_reported_as_absence() {
    let dir = TempDir::new().unwrap();
    let strategy = flat_kv(&dir);
    strategy.save("users", "bad", "not json").await.unwrap();

    let err = strategy.get::<User>("users", "bad").await.unwrap_err();
    assert!(matches!(err, StorageError::Serde(_)));
}

#[tokio::test]
async fn invalid_record_fails_validation_with_field_names() {
    let strategy = StorageStrategy::in_memory();
    strategy
        .save("users", "partial", r#"{"id":"partial"}"#)
        .await
        .unwrap();

    let err = strategy.get::<User>("users", "partial").await.unwrap_err();
    match err {
        StorageError::Validation(v) => assert_eq!(v.missing, vec!["name"]),
        other => panic!("expected validation error, got {other}"),
    }
}
