//! # Snapshot Repository
//!
//! Key-value rows in the `trip_snapshots` table.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trip_snapshots                                                         │
//! │                                                                         │
//! │  key (PK)               │ value (JSON)             │ updated_at         │
//! │  ───────────────────────┼──────────────────────────┼─────────────────── │
//! │  minibus_trip_data_v1   │ {"status":"Active",...}  │ 1700000123456      │
//! │                                                                         │
//! │  One row per key. Every save overwrites the row (INSERT … ON CONFLICT). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for trip snapshot rows.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Reads the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM trip_snapshots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Snapshot read");
        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO trip_snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Snapshot written");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.snapshots().get("nothing_here").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_by_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.snapshots();

        repo.put("k", r#"{"v":1}"#).await.unwrap();
        repo.put("k", r#"{"v":2}"#).await.unwrap();
        repo.put("other", "x").await.unwrap();

        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some(r#"{"v":2}"#));
        assert_eq!(repo.get("other").await.unwrap().as_deref(), Some("x"));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trip_snapshots")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 2);
    }
}
