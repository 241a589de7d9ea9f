//! # Trip Commands
//!
//! Trip lifecycle: start, end, and reset to a new trip.
//!
//! ## Trip Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Trip Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  start_trip(fare)  ┌──────────┐  end_trip()  ┌─────────┐ │
//! │  │  Start   │───────────────────►│  Active  │─────────────►│ Summary │ │
//! │  │ (setup)  │                    │          │              │         │ │
//! │  └──────────┘                    └──────────┘              └─────────┘ │
//! │       ▲                                                         │      │
//! │       └──────────────────────── new_trip() ─────────────────────┘      │
//! │                                                                         │
//! │  start_trip from any state discards the previous trip.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Local};
use fare_core::validation::validate_fare;
use fare_core::{Money, TripStatus, TripSummary, TripTotals, COMMON_FARES};
use serde::Serialize;
use tracing::debug;

use super::applied;
use crate::error::ApiError;
use crate::state::LedgerState;

/// Trip header shown after lifecycle commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub status: TripStatus,
    pub fare: Money,
    /// Local wall-clock start time, once the trip has started.
    pub started_at: Option<String>,
    pub totals: TripTotals,
}

impl TripView {
    fn from_state(state: &LedgerState) -> Self {
        let ledger = state.ledger();
        let trip = ledger.trip();
        let started_at = match trip.status {
            TripStatus::Start => None,
            _ => format_local_time(trip.start_time),
        };

        TripView {
            status: trip.status,
            fare: trip.fare,
            started_at,
            totals: ledger.totals(),
        }
    }
}

fn format_local_time(epoch_millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}

/// Current trip header.
pub fn get_trip(state: &LedgerState) -> TripView {
    debug!("get_trip command");
    TripView::from_state(state)
}

/// The quick-select fares offered on the setup screen.
pub fn common_fares() -> Vec<Money> {
    COMMON_FARES.iter().copied().map(Money::from_units).collect()
}

/// Starts a new trip at `fare`.
pub fn start_trip(state: &mut LedgerState, fare: Money) -> Result<TripView, ApiError> {
    debug!(%fare, "start_trip command");
    validate_fare(fare)?;
    applied(state.ledger_mut().start_trip(fare))?;
    Ok(TripView::from_state(state))
}

/// Ends the active trip and returns its summary.
pub fn end_trip(state: &mut LedgerState) -> Result<TripSummary, ApiError> {
    debug!("end_trip command");
    applied(state.ledger_mut().end_trip())?;
    Ok(state.ledger().summary())
}

/// Discards the current trip and returns to setup.
pub fn new_trip(state: &mut LedgerState) -> Result<TripView, ApiError> {
    debug!("new_trip command");
    applied(state.ledger_mut().reset_app())?;
    Ok(TripView::from_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fare_db::MemoryStore;
    use std::sync::Arc;

    async fn fresh() -> LedgerState {
        LedgerState::open(Arc::new(MemoryStore::new())).await
    }

    #[tokio::test]
    async fn test_start_trip() {
        let mut state = fresh().await;
        let view = start_trip(&mut state, Money::from_units(15)).unwrap();

        assert_eq!(view.status, TripStatus::Active);
        assert_eq!(view.fare, Money::from_units(15));
        assert!(view.started_at.is_some());
        assert_eq!(view.totals.passenger_count, 0);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_trip_rejects_zero_fare() {
        let mut state = fresh().await;
        let err = start_trip(&mut state, Money::zero()).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_trip(&state).status, TripStatus::Start);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_end_then_new_trip() {
        let mut state = fresh().await;
        start_trip(&mut state, Money::from_units(20)).unwrap();

        let summary = end_trip(&mut state).unwrap();
        assert!(summary.balance.is_balanced());
        assert_eq!(get_trip(&state).status, TripStatus::Summary);

        // Ending twice is rejected, not an error in the ledger
        assert_eq!(end_trip(&mut state).unwrap_err().code, ErrorCode::Rejected);

        let view = new_trip(&mut state).unwrap();
        assert_eq!(view.status, TripStatus::Start);
        assert_eq!(view.started_at, None);
        state.close().await.unwrap();
    }

    #[test]
    fn test_common_fares() {
        let fares = common_fares();
        assert_eq!(fares.len(), 8);
        assert_eq!(fares.first(), Some(&Money::from_units(10)));
        assert_eq!(fares.last(), Some(&Money::from_units(50)));
    }
}
