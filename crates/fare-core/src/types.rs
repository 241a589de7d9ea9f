//! # Domain Types
//!
//! Core domain types used throughout Fare Collector.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │        Trip         │ 1    * │      Passenger      │                │
//! │  │  ─────────────────  │◆──────►│  ─────────────────  │                │
//! │  │  status             │        │  id (UUID)          │                │
//! │  │  fare               │        │  number (1, 2, …)   │                │
//! │  │  passengers         │        │  paid_amount        │                │
//! │  │  start/end time     │        │  is_change_returned │                │
//! │  │  next_number        │        │  timestamp          │                │
//! │  └─────────────────────┘        └─────────────────────┘                │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │     TripStatus      │        │   PassengerStatus   │                │
//! │  │  Start              │        │  Due(amount)        │                │
//! │  │  Active             │        │  Paid               │                │
//! │  │  Summary            │        │  ChangePending(amt) │                │
//! │  └─────────────────────┘        │  ChangeReturned     │                │
//! │                                 └─────────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Every passenger has:
//! - `id`: UUID v4 - opaque, used by commands
//! - `number`: sequence tag - what the collector calls out ("number 7")

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Trip Status
// =============================================================================

/// Where the trip is in its lifecycle. Governs which commands apply.
///
/// ```text
///            start_trip(fare)            end_trip()
///   Start ───────────────────► Active ─────────────► Summary
///     ▲                                                 │
///     └──────────────────── reset_app() ◄───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TripStatus {
    /// No trip yet: choose a fare.
    #[default]
    Start,
    /// Collecting fares.
    Active,
    /// Trip ended: read-only reconciliation.
    Summary,
}

// =============================================================================
// Passenger
// =============================================================================

/// One row in the trip ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    /// Unique identifier (UUID v4), never reused.
    pub id: String,

    /// 1-based sequence number in creation order. Permanent, not a position.
    pub number: u32,

    /// Cumulative amount handed over. Never negative.
    #[ts(type = "number")]
    pub paid_amount: Money,

    /// Set only by an explicit "return change" command.
    pub is_change_returned: bool,

    /// Creation time in epoch millis (audit only).
    #[ts(type = "number")]
    pub timestamp: i64,
}

impl Passenger {
    /// Change owed back: `max(0, paid - fare)`.
    #[inline]
    pub fn change(&self, fare: Money) -> Money {
        (self.paid_amount - fare).positive_part()
    }

    /// Amount still owed: `max(0, fare - paid)`.
    #[inline]
    pub fn due(&self, fare: Money) -> Money {
        (fare - self.paid_amount).positive_part()
    }

    /// Has paid at least the fare.
    #[inline]
    pub fn is_paid_full(&self, fare: Money) -> bool {
        self.paid_amount >= fare
    }

    /// Paid in full and, if change was owed, it has been handed back.
    pub fn is_settled(&self, fare: Money) -> bool {
        self.is_paid_full(fare) && (self.change(fare).is_zero() || self.is_change_returned)
    }

    /// The badge the front end shows on this passenger's card.
    pub fn status(&self, fare: Money) -> PassengerStatus {
        let change = self.change(fare);
        if !self.is_paid_full(fare) {
            PassengerStatus::Due(self.due(fare))
        } else if change.is_zero() {
            PassengerStatus::Paid
        } else if self.is_change_returned {
            PassengerStatus::ChangeReturned
        } else {
            PassengerStatus::ChangePending(change)
        }
    }
}

// =============================================================================
// Passenger Status
// =============================================================================

/// Derived per-passenger state, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount")]
pub enum PassengerStatus {
    /// Underpaid by this much.
    Due(Money),
    /// Paid the exact fare.
    Paid,
    /// Overpaid; this much change still has to go back.
    ChangePending(Money),
    /// Overpaid and the change was handed back.
    ChangeReturned,
}

impl PassengerStatus {
    /// Settled means nothing is left to collect or hand back.
    pub fn is_settled(&self) -> bool {
        matches!(self, PassengerStatus::Paid | PassengerStatus::ChangeReturned)
    }
}

// =============================================================================
// Trip
// =============================================================================

/// The aggregate root: one trip and the passengers it owns.
///
/// ## Invariants
/// - `passengers` is newest first (new passengers are prepended)
/// - `fare` is positive and fixed while `Active` or `Summary`
/// - every passenger number is below `next_number`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub status: TripStatus,

    #[ts(type = "number")]
    pub fare: Money,

    pub passengers: Vec<Passenger>,

    /// Epoch millis; 0 before a trip starts.
    #[ts(type = "number")]
    pub start_time: i64,

    /// Epoch millis; set when the trip ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number", optional)]
    pub end_time: Option<i64>,

    /// Sequence number the next added passenger receives.
    pub next_number: u32,
}

impl Default for Trip {
    fn default() -> Self {
        Trip::initial()
    }
}

impl Trip {
    /// The `Start` trip: no fare, no passengers, no timestamps.
    pub fn initial() -> Self {
        Trip {
            status: TripStatus::Start,
            fare: Money::zero(),
            passengers: Vec::new(),
            start_time: 0,
            end_time: None,
            next_number: 1,
        }
    }

    /// Finds a passenger by id.
    pub fn passenger(&self, id: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    /// Finds a passenger by sequence number.
    pub fn passenger_by_number(&self, number: u32) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.number == number)
    }

    /// Number of passengers currently on the ledger.
    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    // -------------------------------------------------------------------------
    // Aggregates. Recomputed on every call so they can never drift from the
    // passenger records.
    // -------------------------------------------------------------------------

    /// Σ paid amounts.
    pub fn total_collected(&self) -> Money {
        self.passengers.iter().map(|p| p.paid_amount).sum()
    }

    /// Change owed and not yet handed back.
    pub fn total_change_due(&self) -> Money {
        self.passengers
            .iter()
            .filter(|p| !p.is_change_returned)
            .map(|p| p.change(self.fare))
            .sum()
    }

    /// Change already handed back.
    pub fn total_change_returned(&self) -> Money {
        self.passengers
            .iter()
            .filter(|p| p.is_change_returned)
            .map(|p| p.change(self.fare))
            .sum()
    }

    /// Passengers who paid at least the fare.
    pub fn passengers_paid_count(&self) -> usize {
        self.passengers
            .iter()
            .filter(|p| p.is_paid_full(self.fare))
            .count()
    }

    /// What the trip should have earned: head count × fare.
    pub fn theoretical_revenue(&self) -> Money {
        let count = i64::try_from(self.passenger_count()).unwrap_or(i64::MAX);
        self.fare * count
    }

    /// What the collector should physically hold.
    pub fn net_cash_in_hand(&self) -> Money {
        self.total_collected() - self.total_change_returned()
    }

    /// Net cash in hand minus theoretical revenue.
    ///
    /// Positive: cash held that was never logged as returned change.
    /// Negative: more change marked returned than the numbers support.
    pub fn discrepancy(&self) -> Money {
        self.net_cash_in_hand() - self.theoretical_revenue()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(number: u32, paid: i64, returned: bool) -> Passenger {
        Passenger {
            id: format!("p-{}", number),
            number,
            paid_amount: Money::from_units(paid),
            is_change_returned: returned,
            timestamp: 0,
        }
    }

    fn trip(fare: i64, passengers: Vec<Passenger>) -> Trip {
        Trip {
            status: TripStatus::Active,
            fare: Money::from_units(fare),
            next_number: passengers.len() as u32 + 1,
            passengers,
            start_time: 1,
            end_time: None,
        }
    }

    #[test]
    fn test_change_and_due_are_exclusive() {
        let fare = Money::from_units(20);
        for paid in 0..60 {
            let p = passenger(1, paid, false);
            let change = p.change(fare);
            let due = p.due(fare);

            assert_eq!(change.is_positive(), paid > 20);
            assert_eq!(due.is_positive(), paid < 20);
            assert!(!(change.is_positive() && due.is_positive()));
        }
    }

    #[test]
    fn test_exact_payment_is_settled() {
        let fare = Money::from_units(20);
        let p = passenger(1, 20, false);

        assert!(p.is_paid_full(fare));
        assert!(p.change(fare).is_zero());
        assert!(p.is_settled(fare));
        assert_eq!(p.status(fare), PassengerStatus::Paid);
    }

    #[test]
    fn test_overpayment_settles_only_after_change_returned() {
        let fare = Money::from_units(15);
        let mut p = passenger(1, 50, false);

        assert_eq!(p.change(fare).units(), 35);
        assert!(!p.is_settled(fare));
        assert_eq!(
            p.status(fare),
            PassengerStatus::ChangePending(Money::from_units(35))
        );

        p.is_change_returned = true;
        assert!(p.is_settled(fare));
        assert_eq!(p.status(fare), PassengerStatus::ChangeReturned);
    }

    #[test]
    fn test_underpayment_status() {
        let fare = Money::from_units(20);
        let p = passenger(1, 5, false);

        assert_eq!(p.status(fare), PassengerStatus::Due(Money::from_units(15)));
        assert!(!p.status(fare).is_settled());
    }

    #[test]
    fn test_aggregates() {
        // fare 10: one exact, one overpaid by 5 (not returned), one overpaid
        // by 10 (returned), one who has paid nothing
        let t = trip(
            10,
            vec![
                passenger(4, 0, false),
                passenger(3, 20, true),
                passenger(2, 15, false),
                passenger(1, 10, false),
            ],
        );

        assert_eq!(t.total_collected().units(), 45);
        assert_eq!(t.total_change_due().units(), 5);
        assert_eq!(t.total_change_returned().units(), 10);
        assert_eq!(t.passengers_paid_count(), 3);
        assert_eq!(t.theoretical_revenue().units(), 40);
        assert_eq!(t.net_cash_in_hand().units(), 35);
        assert_eq!(t.discrepancy().units(), -5);
    }

    #[test]
    fn test_returned_flag_without_change_has_no_effect() {
        let t = trip(10, vec![passenger(1, 10, true)]);

        assert!(t.total_change_returned().is_zero());
        assert!(t.discrepancy().is_zero());
    }

    #[test]
    fn test_initial_trip() {
        let t = Trip::initial();
        assert_eq!(t.status, TripStatus::Start);
        assert!(t.fare.is_zero());
        assert!(t.passengers.is_empty());
        assert_eq!(t.start_time, 0);
        assert_eq!(t.end_time, None);
        assert_eq!(t, Trip::default());
    }

    #[test]
    fn test_lookup_by_id_and_number() {
        let t = trip(10, vec![passenger(2, 0, false), passenger(1, 0, false)]);

        assert_eq!(t.passenger("p-1").map(|p| p.number), Some(1));
        assert_eq!(t.passenger_by_number(2).map(|p| p.id.as_str()), Some("p-2"));
        assert!(t.passenger("missing").is_none());
    }

    #[test]
    fn test_typescript_timestamps_are_numbers() {
        let decl = Trip::decl();
        assert!(decl.contains("startTime: number"));
        assert!(decl.contains("endTime?: number"));
        assert!(PassengerStatus::decl().contains("kind"));
    }
}
