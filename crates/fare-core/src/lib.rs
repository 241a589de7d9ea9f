//! # fare-core: Pure Trip Ledger Logic for Fare Collector
//!
//! This crate is the **heart** of Fare Collector. It tracks what each
//! passenger paid against a fixed trip fare, works out the change owed, and
//! reconciles the cash in hand when the trip ends. Everything here is pure:
//! no database, no files, no tasks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Fare Collector Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (apps/collector)                      │   │
//! │  │     start ──► add / pay / return change ──► end ──► summary     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands / queries                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fare-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  ledger   │  │  totals   │  │ snapshot  │  │   │
//! │  │   │   Trip    │  │TripLedger │  │TripTotals │  │  decode   │  │   │
//! │  │   │ Passenger │  │ Outcome   │  │TripSummary│  │  validate │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ snapshot_changed(&Trip)                │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           ▼                                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            fare-db (SnapshotWriter → SQLite key-value)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Trip, Passenger, TripStatus)
//! - [`money`] - Money type in whole currency units
//! - [`ledger`] - The `TripLedger` state machine and its observers
//! - [`totals`] - Reconciliation totals and the end-of-trip summary
//! - [`validation`] - Input checks for fares and keypad entries
//! - [`snapshot`] - Persisted record encoding with schema validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fare_core::{Money, TripLedger};
//!
//! let mut ledger = TripLedger::new();
//! ledger.start_trip(Money::from_units(15));
//!
//! let passenger = ledger.add_passenger().applied().unwrap();
//! ledger.update_passenger_payment(&passenger.id, Money::from_units(50));
//!
//! // Paid 50 against a fare of 15: 35 change owed
//! assert_eq!(ledger.total_change_due(), Money::from_units(35));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod snapshot;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Outcome, Rejection, SnapshotObserver, TripLedger};
pub use money::Money;
pub use totals::{Balance, TripSummary, TripTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key for the persisted trip snapshot.
///
/// The schema version lives in the key name: a future incompatible layout
/// gets a new key, so old data is never read with the wrong shape.
pub const SNAPSHOT_KEY: &str = "minibus_trip_data_v1";

/// Fares offered as one-tap choices when starting a trip.
pub const COMMON_FARES: [i64; 8] = [10, 15, 20, 25, 30, 35, 40, 50];

/// Banknote amounts offered as one-tap payments, after the fare itself.
pub const QUICK_NOTE_AMOUNTS: [i64; 2] = [50, 100];

/// Maximum digits accepted from free-form amount entry.
///
/// ## Business Reason
/// Stops a stuck key from producing an absurd payment (99,999 is already
/// far above any fare).
pub const MAX_ENTRY_DIGITS: usize = 5;
