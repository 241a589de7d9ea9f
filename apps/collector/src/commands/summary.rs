//! # Summary Commands
//!
//! Read-only reconciliation views.

use fare_core::{TripStatus, TripSummary, TripTotals};
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::LedgerState;

/// Running totals for the active-trip header. Valid in any state.
pub fn get_totals(state: &LedgerState) -> TripTotals {
    debug!("get_totals command");
    state.ledger().totals()
}

/// The end-of-trip report. Only available once the trip has ended.
pub fn get_summary(state: &LedgerState) -> Result<TripSummary, ApiError> {
    debug!("get_summary command");
    match state.ledger().status() {
        TripStatus::Summary => Ok(state.ledger().summary()),
        status => Err(ApiError::new(
            ErrorCode::Rejected,
            format!("trip is {:?}; the summary is available after 'end'", status),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::passenger::{add_passenger, pay, return_change};
    use crate::commands::trip::{end_trip, start_trip};
    use fare_core::{Balance, Money};
    use fare_db::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_only_after_end() {
        let mut state = LedgerState::open(Arc::new(MemoryStore::new())).await;
        assert!(get_summary(&state).is_err());

        start_trip(&mut state, Money::from_units(15)).unwrap();
        add_passenger(&mut state).unwrap();
        add_passenger(&mut state).unwrap();
        pay(&mut state, 1, Money::from_units(15)).unwrap();
        pay(&mut state, 2, Money::from_units(50)).unwrap();
        return_change(&mut state, 2).unwrap();
        assert!(get_summary(&state).is_err());

        let totals = get_totals(&state);
        assert_eq!(totals.total_collected, Money::from_units(65));
        assert_eq!(totals.net_cash_in_hand, Money::from_units(30));

        end_trip(&mut state).unwrap();
        let summary = get_summary(&state).unwrap();
        assert_eq!(summary.balance, Balance::Balanced);
        assert_eq!(summary.totals.theoretical_revenue, Money::from_units(30));
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreturned_change_is_surplus() {
        let mut state = LedgerState::open(Arc::new(MemoryStore::new())).await;
        start_trip(&mut state, Money::from_units(15)).unwrap();
        add_passenger(&mut state).unwrap();
        pay(&mut state, 1, Money::from_units(50)).unwrap();
        end_trip(&mut state).unwrap();

        let summary = get_summary(&state).unwrap();
        assert_eq!(summary.balance, Balance::Surplus(Money::from_units(35)));
        state.close().await.unwrap();
    }
}
