//! # Storage State
//!
//! Owns the snapshot store the session writes through. With the default
//! configuration that is the SQLite database; `COLLECTOR_IN_MEMORY` swaps in
//! a [`MemoryStore`] and nothing outlives the process.

use std::sync::Arc;

use fare_db::{Database, DbConfig, MemoryStore, SnapshotStore};
use tracing::info;

use crate::error::ApiError;
use crate::state::ConfigState;

/// The open store, plus the database behind it when there is one.
pub struct DbState {
    db: Option<Database>,
    store: Arc<dyn SnapshotStore>,
}

impl DbState {
    /// Opens the store selected by `config`.
    pub async fn open(config: &ConfigState) -> Result<Self, ApiError> {
        if config.in_memory {
            info!("Using in-memory trip store; nothing will be saved to disk");
            return Ok(DbState::memory());
        }

        let path = config.resolve_database_path()?;
        info!(?path, "Database path determined");

        let db = Database::new(DbConfig::new(path)).await?;
        let (total, applied) = fare_db::migrations::migration_status(db.pool()).await?;
        info!(total, applied, "Database connected and migrations applied");

        Ok(DbState::sqlite(db))
    }

    pub fn sqlite(db: Database) -> Self {
        let store: Arc<dyn SnapshotStore> = Arc::new(db.snapshots());
        DbState {
            db: Some(db),
            store,
        }
    }

    pub fn memory() -> Self {
        DbState {
            db: None,
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// The store to open a session on.
    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn is_persistent(&self) -> bool {
        self.db.is_some()
    }

    /// Closes the pool. Call after the session's final flush.
    pub async fn close(self) {
        if let Some(db) = self.db {
            db.close().await;
        }
    }
}
