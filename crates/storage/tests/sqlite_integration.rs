use storage::repository::{KeyValueRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_round_trips_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("course_progress_v1").await.unwrap(), None);

    repo.put("course_progress_v1", r#"{"a":1}"#).await.unwrap();
    repo.put("course_progress_v1", r#"{"a":2}"#).await.unwrap();
    assert_eq!(
        repo.get("course_progress_v1").await.unwrap().as_deref(),
        Some(r#"{"a":2}"#)
    );

    repo.delete("course_progress_v1").await.unwrap();
    assert_eq!(repo.get("course_progress_v1").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.put("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_builder_migrates_before_use() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.put("key", "value").await.unwrap();
    assert_eq!(storage.kv.get("key").await.unwrap().as_deref(), Some("value"));
}
