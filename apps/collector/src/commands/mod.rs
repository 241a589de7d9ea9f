//! # Commands Module
//!
//! Every operation the front end can invoke. Commands take the state they
//! need, call into the ledger, and return a serializable view or an
//! [`ApiError`]. The shell turns those into text.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (shared helpers)
//! ├── trip.rs       ◄─── start, end, new trip, common fares
//! ├── passenger.rs  ◄─── add, pay, quick pay, reset, return change, remove
//! └── summary.rs    ◄─── running totals, end-of-trip report
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shell: "pay 3 50"                                                     │
//! │         │ parse                                                         │
//! │         ▼                                                               │
//! │  passenger::pay(&mut LedgerState, 3, Money(50))                        │
//! │         │ number → id, validate amount                                  │
//! │         ▼                                                               │
//! │  TripLedger::update_passenger_payment(id, 50) → Outcome                │
//! │         │                                                               │
//! │         ├── Applied    → Ok(PassengerView)  (snapshot queued)          │
//! │         └── Ignored(r) → Err(ApiError REJECTED)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod passenger;
pub mod summary;
pub mod trip;

use fare_core::Outcome;

use crate::error::ApiError;

/// Turns a ledger outcome into a command result.
fn applied<T>(outcome: Outcome<T>) -> Result<T, ApiError> {
    match outcome {
        Outcome::Applied(value) => Ok(value),
        Outcome::Ignored(rejection) => Err(rejection.into()),
    }
}
