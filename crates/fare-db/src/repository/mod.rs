//! # Repository Module
//!
//! SQL access for the collector, isolated behind small repository types.
//!
//! ```text
//! SnapshotStore::load / save
//!       │
//!       ▼
//! SnapshotRepository
//! ├── get(&self, key)
//! └── put(&self, key, value)     ← upsert by key
//!       │
//!       ▼
//! trip_snapshots (SQLite)
//! ```
//!
//! ## Available Repositories
//!
//! - [`snapshot::SnapshotRepository`] - Key-value trip snapshots

pub mod snapshot;
