//! # State Module
//!
//! Application state for the collector, split by concern the same way the
//! commands consume it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   LedgerState    │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  SQLite or   │─►│  TripSession     │  │  db path         │          │
//! │  │  MemoryStore │  │  (TripLedger +   │  │  in-memory flag  │          │
//! │  │              │  │   writer)        │  │  currency symbol │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  Shutdown order: LedgerState::close (flush) → DbState::close (pool)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod ledger;

pub use config::{ConfigState, ENV_CURRENCY, ENV_DB_PATH, ENV_IN_MEMORY};
pub use db::DbState;
pub use ledger::LedgerState;
