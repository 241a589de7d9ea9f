//! # fare-db: Storage Layer for Fare Collector
//!
//! Persists the trip snapshot and owns the startup/shutdown sequence around
//! the ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Fare Collector Data Flow                            │
//! │                                                                         │
//! │  Shell command (pay 3 50)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TripLedger (fare-core) ── applied ──► SnapshotObserver                │
//! │       │                                                                 │
//! │  ┌────┼────────────────────────────────────────────────────────────┐   │
//! │  │    ▼                 fare-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SnapshotWriter│    │ SnapshotStore │    │  Migrations  │  │   │
//! │  │   │  (writer.rs)  │───►│  (store.rs)   │    │  (embedded)  │  │   │
//! │  │   │ tokio task    │    │ SQLite/Memory │    │ 001_trip_... │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │   TripSession (session.rs): load once, subscribe, flush        │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: <data dir>/fare-collector/trips.db                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - SQL repositories
//! - [`store`] - The `SnapshotStore` seam and its implementations
//! - [`writer`] - Background snapshot writer
//! - [`session`] - Load barrier and final flush
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fare_db::{Database, DbConfig, TripSession};
//!
//! let db = Database::new(DbConfig::new("trips.db")).await?;
//! let mut session = TripSession::open(Arc::new(db.snapshots())).await;
//!
//! session.ledger_mut().start_trip(Money::from_units(15));
//!
//! session.close().await?;
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;
pub mod store;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::SnapshotRepository;
pub use session::TripSession;
pub use store::{MemoryStore, SnapshotStore};
pub use writer::{SnapshotWriter, SnapshotWriterHandle};
