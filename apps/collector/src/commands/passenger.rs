//! # Passenger Commands
//!
//! Everything the collector does to a single passenger during an active
//! trip. Passengers are addressed by their permanent number (`#3`).
//!
//! ## Passenger Card
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #3                                   paid 50 Br                        │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CHANGE 35 Br                                 [return change]    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │  quick: [15] [50] [100]          [reset]                  [remove]     │
//! │                                                                         │
//! │  Due(n) ──pay──► Paid / ChangePending(n) ──return──► ChangeReturned     │
//! │     ▲                                                        │          │
//! │     └────────────────────────── reset ───────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fare_core::validation::{quick_payment_amounts, validate_payment_amount};
use fare_core::{Money, Passenger, PassengerStatus};
use serde::Serialize;
use tracing::debug;

use super::applied;
use crate::error::ApiError;
use crate::state::LedgerState;

/// One passenger as the front end shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerView {
    pub number: u32,
    pub id: String,
    pub paid_amount: Money,
    pub status: PassengerStatus,
}

impl PassengerView {
    pub fn new(passenger: &Passenger, fare: Money) -> Self {
        PassengerView {
            number: passenger.number,
            id: passenger.id.clone(),
            paid_amount: passenger.paid_amount,
            status: passenger.status(fare),
        }
    }
}

fn view(state: &LedgerState, id: &str) -> Result<PassengerView, ApiError> {
    let ledger = state.ledger();
    ledger
        .passenger(id)
        .map(|p| PassengerView::new(p, ledger.fare()))
        .ok_or_else(|| ApiError::not_found("Passenger", id))
}

/// Passengers, newest first.
pub fn list_passengers(state: &LedgerState) -> Vec<PassengerView> {
    let ledger = state.ledger();
    ledger
        .passengers()
        .iter()
        .map(|p| PassengerView::new(p, ledger.fare()))
        .collect()
}

/// Adds the next passenger.
pub fn add_passenger(state: &mut LedgerState) -> Result<PassengerView, ApiError> {
    debug!("add_passenger command");
    let passenger = applied(state.ledger_mut().add_passenger())?;
    Ok(PassengerView::new(&passenger, state.ledger().fare()))
}

/// Adds `amount` to what passenger `number` has paid.
pub fn pay(state: &mut LedgerState, number: u32, amount: Money) -> Result<PassengerView, ApiError> {
    debug!(number, %amount, "pay command");
    validate_payment_amount(amount)?;
    let id = state.passenger_id(number)?;
    applied(state.ledger_mut().update_passenger_payment(&id, amount))?;
    view(state, &id)
}

/// The one-tap amounts for the current fare.
pub fn quick_amounts(state: &LedgerState) -> [Money; 3] {
    quick_payment_amounts(state.ledger().fare())
}

/// Pays the `choice`-th quick amount (1-based).
pub fn quick_pay(
    state: &mut LedgerState,
    number: u32,
    choice: usize,
) -> Result<PassengerView, ApiError> {
    let amounts = quick_amounts(state);
    let amount = choice
        .checked_sub(1)
        .and_then(|i| amounts.get(i).copied())
        .ok_or_else(|| {
            ApiError::validation(format!(
                "quick choice must be 1 to {}, got {}",
                amounts.len(),
                choice
            ))
        })?;
    pay(state, number, amount)
}

/// Clears passenger `number`'s payment.
pub fn reset_payment(state: &mut LedgerState, number: u32) -> Result<PassengerView, ApiError> {
    debug!(number, "reset_payment command");
    let id = state.passenger_id(number)?;
    applied(state.ledger_mut().reset_passenger_payment(&id))?;
    view(state, &id)
}

/// Records that passenger `number` got their change.
pub fn return_change(state: &mut LedgerState, number: u32) -> Result<PassengerView, ApiError> {
    debug!(number, "return_change command");
    let id = state.passenger_id(number)?;
    applied(state.ledger_mut().mark_change_returned(&id))?;
    view(state, &id)
}

/// Removes passenger `number` from the trip.
pub fn remove_passenger(state: &mut LedgerState, number: u32) -> Result<(), ApiError> {
    debug!(number, "remove_passenger command");
    let id = state.passenger_id(number)?;
    applied(state.ledger_mut().remove_passenger(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::trip::{end_trip, start_trip};
    use crate::error::ErrorCode;
    use fare_db::MemoryStore;
    use std::sync::Arc;

    async fn active(fare: i64) -> LedgerState {
        let mut state = LedgerState::open(Arc::new(MemoryStore::new())).await;
        start_trip(&mut state, Money::from_units(fare)).unwrap();
        state
    }

    #[tokio::test]
    async fn test_pay_and_return_change() {
        let mut state = active(15).await;
        let p = add_passenger(&mut state).unwrap();
        assert_eq!(p.number, 1);
        assert_eq!(p.status, PassengerStatus::Due(Money::from_units(15)));

        let p = pay(&mut state, 1, Money::from_units(50)).unwrap();
        assert_eq!(p.status, PassengerStatus::ChangePending(Money::from_units(35)));

        let p = return_change(&mut state, 1).unwrap();
        assert_eq!(p.status, PassengerStatus::ChangeReturned);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_quick_pay_choices() {
        let mut state = active(20).await;
        add_passenger(&mut state).unwrap();

        assert_eq!(quick_amounts(&state).map(|m| m.units()), [20, 50, 100]);

        let p = quick_pay(&mut state, 1, 1).unwrap();
        assert_eq!(p.status, PassengerStatus::Paid);

        let err = quick_pay(&mut state, 1, 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = quick_pay(&mut state, 1, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_and_remove() {
        let mut state = active(10).await;
        add_passenger(&mut state).unwrap();
        add_passenger(&mut state).unwrap();
        pay(&mut state, 2, Money::from_units(30)).unwrap();
        return_change(&mut state, 2).unwrap();

        let p = reset_payment(&mut state, 2).unwrap();
        assert_eq!(p.paid_amount, Money::zero());
        assert_eq!(p.status, PassengerStatus::Due(Money::from_units(10)));

        remove_passenger(&mut state, 1).unwrap();
        let numbers: Vec<u32> = list_passengers(&state).iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2]);

        assert_eq!(add_passenger(&mut state).unwrap().number, 3);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_number_and_bad_amount() {
        let mut state = active(10).await;
        add_passenger(&mut state).unwrap();

        assert_eq!(
            pay(&mut state, 7, Money::from_units(10)).unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            pay(&mut state, 1, Money::zero()).unwrap_err().code,
            ErrorCode::ValidationError
        );
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_rejected_after_trip_end() {
        let mut state = active(10).await;
        add_passenger(&mut state).unwrap();
        end_trip(&mut state).unwrap();

        assert_eq!(add_passenger(&mut state).unwrap_err().code, ErrorCode::Rejected);
        assert_eq!(
            pay(&mut state, 1, Money::from_units(10)).unwrap_err().code,
            ErrorCode::Rejected
        );
        assert_eq!(remove_passenger(&mut state, 1).unwrap_err().code, ErrorCode::Rejected);
        assert_eq!(list_passengers(&state).len(), 1);
        state.close().await.unwrap();
    }
}
