//! # Totals and Reconciliation
//!
//! Read-only views computed from a [`Trip`]. Nothing here is stored: every
//! value is recomputed from the passenger records on demand.
//!
//! ## End-of-Trip Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Total Cash Collected                       Σ paid            125 Br    │
//! │  Total Change Returned                      Σ returned change −35 Br    │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  Net Cash In Hand                                              90 Br    │
//! │  Theoretical Revenue                        6 passengers × 15  90 Br    │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  Discrepancy                                                    0       │
//! │                                                                         │
//! │   0  → Balanced                                                        │
//! │  > 0 → Surplus: change that was never logged as returned?              │
//! │  < 0 → Shortfall: underpayment, or too much change logged?             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Trip;

const MILLIS_PER_MINUTE: i64 = 60_000;

// =============================================================================
// Trip Totals
// =============================================================================

/// Running totals for the header of the active-trip screen and the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TripTotals {
    pub passenger_count: usize,
    pub passengers_paid_count: usize,
    #[ts(type = "number")]
    pub total_collected: Money,
    #[ts(type = "number")]
    pub total_change_due: Money,
    #[ts(type = "number")]
    pub total_change_returned: Money,
    #[ts(type = "number")]
    pub theoretical_revenue: Money,
    #[ts(type = "number")]
    pub net_cash_in_hand: Money,
    #[ts(type = "number")]
    pub discrepancy: Money,
}

impl From<&Trip> for TripTotals {
    fn from(trip: &Trip) -> Self {
        TripTotals {
            passenger_count: trip.passenger_count(),
            passengers_paid_count: trip.passengers_paid_count(),
            total_collected: trip.total_collected(),
            total_change_due: trip.total_change_due(),
            total_change_returned: trip.total_change_returned(),
            theoretical_revenue: trip.theoretical_revenue(),
            net_cash_in_hand: trip.net_cash_in_hand(),
            discrepancy: trip.discrepancy(),
        }
    }
}

// =============================================================================
// Balance Verdict
// =============================================================================

/// How the cash in hand compares with what the trip should have earned.
///
/// The sign convention of the discrepancy is kept as-is: one signed number,
/// with no attempt to say which passenger records contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount")]
pub enum Balance {
    Balanced,
    /// Holding this much more than expected.
    Surplus(Money),
    /// Holding this much less than expected.
    Shortfall(Money),
}

impl Balance {
    pub fn from_discrepancy(discrepancy: Money) -> Self {
        if discrepancy.is_positive() {
            Balance::Surplus(discrepancy)
        } else if discrepancy.is_negative() {
            Balance::Shortfall(discrepancy.abs())
        } else {
            Balance::Balanced
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, Balance::Balanced)
    }
}

// =============================================================================
// Trip Summary
// =============================================================================

/// The end-of-trip report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[ts(type = "number")]
    pub fare: Money,
    pub totals: TripTotals,
    pub balance: Balance,
    /// Whole minutes between start and end, rounded to nearest.
    #[ts(type = "number")]
    pub duration_minutes: i64,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        let totals = TripTotals::from(trip);
        TripSummary {
            fare: trip.fare,
            balance: Balance::from_discrepancy(totals.discrepancy),
            totals,
            duration_minutes: duration_minutes(trip.start_time, trip.end_time),
        }
    }
}

/// `round((end - start) / 1 minute)`, or 0 when either end is unknown.
fn duration_minutes(start_time: i64, end_time: Option<i64>) -> i64 {
    match end_time {
        Some(end) if start_time != 0 && end != 0 => {
            let elapsed = end.saturating_sub(start_time);
            // Round half away from zero
            let half = MILLIS_PER_MINUTE / 2;
            if elapsed >= 0 {
                elapsed.saturating_add(half) / MILLIS_PER_MINUTE
            } else {
                elapsed.saturating_sub(half) / MILLIS_PER_MINUTE
            }
        }
        _ => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Passenger, TripStatus};

    fn summary_trip(fare: i64, paid: &[(i64, bool)]) -> Trip {
        let passengers = paid
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &(amount, returned))| Passenger {
                id: format!("p-{}", i + 1),
                number: i as u32 + 1,
                paid_amount: Money::from_units(amount),
                is_change_returned: returned,
                timestamp: 0,
            })
            .collect::<Vec<_>>();
        Trip {
            status: TripStatus::Summary,
            fare: Money::from_units(fare),
            next_number: passengers.len() as u32 + 1,
            passengers,
            start_time: 1_700_000_000_000,
            end_time: Some(1_700_000_000_000 + 45 * MILLIS_PER_MINUTE + 20_000),
        }
    }

    #[test]
    fn test_totals_from_trip() {
        let trip = summary_trip(15, &[(15, false), (50, true), (20, false)]);
        let totals = TripTotals::from(&trip);

        assert_eq!(totals.passenger_count, 3);
        assert_eq!(totals.passengers_paid_count, 3);
        assert_eq!(totals.total_collected.units(), 85);
        assert_eq!(totals.total_change_due.units(), 5);
        assert_eq!(totals.total_change_returned.units(), 35);
        assert_eq!(totals.theoretical_revenue.units(), 45);
        assert_eq!(totals.net_cash_in_hand.units(), 50);
        assert_eq!(totals.discrepancy.units(), 5);
    }

    #[test]
    fn test_balance_verdicts() {
        assert_eq!(Balance::from_discrepancy(Money::zero()), Balance::Balanced);
        assert_eq!(
            Balance::from_discrepancy(Money::from_units(5)),
            Balance::Surplus(Money::from_units(5))
        );
        assert_eq!(
            Balance::from_discrepancy(Money::from_units(-7)),
            Balance::Shortfall(Money::from_units(7))
        );
    }

    #[test]
    fn test_summary_balanced_trip() {
        let trip = summary_trip(15, &[(15, false), (50, true)]);
        let summary = TripSummary::from(&trip);

        assert!(summary.balance.is_balanced());
        assert_eq!(summary.fare.units(), 15);
        assert_eq!(summary.duration_minutes, 45);
    }

    #[test]
    fn test_duration_rounds_to_nearest_minute() {
        assert_eq!(duration_minutes(1, Some(1 + 29_999)), 0);
        assert_eq!(duration_minutes(1, Some(1 + 30_000)), 1);
        assert_eq!(duration_minutes(1, Some(1 + 90_000)), 2);
    }

    #[test]
    fn test_duration_without_timestamps_is_zero() {
        assert_eq!(duration_minutes(0, Some(120_000)), 0);
        assert_eq!(duration_minutes(1_000, None), 0);
    }

    #[test]
    fn test_duration_of_extreme_timestamps_saturates() {
        assert_eq!(
            duration_minutes(i64::MIN, Some(i64::MAX)),
            i64::MAX / MILLIS_PER_MINUTE
        );
        assert_eq!(
            duration_minutes(i64::MAX, Some(i64::MIN)),
            i64::MIN / MILLIS_PER_MINUTE
        );
    }

    #[test]
    fn test_totals_serialize_camel_case() {
        let trip = summary_trip(10, &[(10, false)]);
        let json = serde_json::to_value(TripTotals::from(&trip)).unwrap();

        assert_eq!(json["totalCollected"], 10);
        assert_eq!(json["netCashInHand"], 10);
        assert_eq!(json["discrepancy"], 0);
    }

    #[test]
    fn test_summary_has_typescript_declaration() {
        let decl = TripSummary::decl();
        assert!(decl.contains("durationMinutes: number"));
        assert!(decl.contains("balance: Balance"));
        assert!(Balance::decl().contains("Shortfall"));
    }
}
