use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

/// String-keyed store of opaque string values.
///
/// The progress record lives here as one JSON document under a fixed key.
/// Adapters do not interpret values.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is
    /// `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Backend that failed to open. Every call fails with the original reason.
#[derive(Clone, Debug)]
pub struct UnavailableRepository {
    reason: String,
}

impl UnavailableRepository {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Connection(self.reason.clone())
    }
}

#[async_trait]
impl KeyValueRepository for UnavailableRepository {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(self.error())
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(self.error())
    }

    async fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(self.error())
    }
}

/// Repositories behind trait objects so backends can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueRepository> = Arc::new(InMemoryRepository::new());
        Self { kv }
    }

    /// Storage whose backend could not be opened.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let kv: Arc<dyn KeyValueRepository> = Arc::new(UnavailableRepository::new(reason));
        Self { kv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_latest_value() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("k").await.unwrap(), None);

        repo.put("k", "one").await.unwrap();
        repo.put("k", "two").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.put("k", "v").await.unwrap();
        repo.delete("k").await.unwrap();
        repo.delete("k").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.kv.put("shared", "yes").await.unwrap();
        assert_eq!(other.kv.get("shared").await.unwrap().as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn unavailable_storage_reports_the_open_failure() {
        let storage = Storage::unavailable("disk is gone");
        let err = storage.kv.get("k").await.unwrap_err();
        assert_eq!(err.to_string(), "connection error: disk is gone");
        assert!(storage.kv.put("k", "v").await.is_err());
        assert!(storage.kv.delete("k").await.is_err());
    }
}
