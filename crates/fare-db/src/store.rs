//! # Snapshot Stores
//!
//! The storage seam under the session: a string-valued key-value store.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │  SnapshotStore (trait)   │
//!                 │  load(key) → Option<str> │
//!                 │  save(key, value)        │
//!                 └────────────┬─────────────┘
//!                ┌─────────────┴──────────────┐
//!                ▼                            ▼
//!      SnapshotRepository                MemoryStore
//!      (SQLite, durable)                 (tests, throwaway sessions)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{DbError, DbResult};
use crate::repository::snapshot::SnapshotRepository;

/// Key-value storage for serialized trips.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if nothing was saved.
    async fn load(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing what was there.
    async fn save(&self, key: &str, value: &str) -> DbResult<()>;
}

#[async_trait]
impl SnapshotStore for SnapshotRepository {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        self.get(key).await
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        self.put(key, value).await
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` under `key`.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Synchronous read, for inspecting what was persisted.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| DbError::Internal("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DbError::Internal("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load("k").await.unwrap(), None);

        store.save("k", "one").await.unwrap();
        store.save("k", "two").await.unwrap();

        assert_eq!(store.load("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.clone().get("k").as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_repository_as_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store: Arc<dyn SnapshotStore> = Arc::new(db.snapshots());

        store.save("k", "value").await.unwrap();
        assert_eq!(store.load("k").await.unwrap().as_deref(), Some("value"));
    }
}
