//! # Trip Ledger
//!
//! The state machine that owns the current trip and enforces every payment
//! rule.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Command Flow                                  │
//! │                                                                         │
//! │  Front end               TripLedger                 Subscribers         │
//! │  ─────────               ──────────                 ───────────         │
//! │                                                                         │
//! │  pay #3, 50 ───────────► preconditions hold?                           │
//! │                              │                                          │
//! │                   no ◄───────┴───────► yes                              │
//! │                   │                     │                               │
//! │                   ▼                     ▼                               │
//! │      Outcome::Ignored(reason)    mutate trip                            │
//! │      (trip untouched,                   │                               │
//! │       nobody notified)                  ▼                               │
//! │                               snapshot_changed(&trip) ──► SnapshotWriter│
//! │                                         │                 (fire&forget) │
//! │                                         ▼                               │
//! │                               Outcome::Applied(value)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Error Channel
//! A command issued with a bad fare, an unknown passenger id, or in the wrong
//! status is a no-op. The `Outcome` says why, for logs and tests, but callers
//! are free to drop it.

use std::fmt;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::money::Money;
use crate::totals::{TripSummary, TripTotals};
use crate::types::{Passenger, Trip, TripStatus};

// =============================================================================
// Observer Seam
// =============================================================================

/// Receives the full trip after every applied command.
///
/// Implementations must return quickly: they run inside the command, so any
/// slow work (writing to storage) belongs on another task.
pub trait SnapshotObserver: Send + Sync {
    fn snapshot_changed(&self, trip: &Trip);
}

impl<F> SnapshotObserver for F
where
    F: Fn(&Trip) + Send + Sync,
{
    fn snapshot_changed(&self, trip: &Trip) {
        self(trip)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Why a command was a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("fare must be positive, got {0}")]
    InvalidFare(Money),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Money),

    #[error("no passenger with id {0}")]
    UnknownPassenger(String),

    #[error("trip is {0:?}, command needs an active trip")]
    NotActive(TripStatus),

    #[error("no passenger numbers left on this trip")]
    NumbersExhausted,
}

/// Result of a ledger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    /// The trip changed and subscribers were notified.
    Applied(T),
    /// Nothing changed.
    Ignored(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        !self.is_applied()
    }

    /// The command's value, if it was applied.
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Ignored(reason) => Some(reason),
        }
    }
}

// =============================================================================
// Trip Ledger
// =============================================================================

/// Source of "now" in epoch millis.
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// The single trip being collected, plus the subscribers that mirror it.
///
/// ## Lifecycle
/// A ledger is built from whatever snapshot was loaded at startup
/// ([`TripLedger::from_trip`]) and is owned by whoever drives it. There is no
/// global instance: pass `&mut TripLedger` to the code that issues commands.
///
/// ## Usage
/// ```rust
/// use fare_core::{Money, TripLedger, TripStatus};
///
/// let mut ledger = TripLedger::new();
/// ledger.start_trip(Money::from_units(20));
/// let p = ledger.add_passenger().applied().unwrap();
/// ledger.update_passenger_payment(&p.id, Money::from_units(20));
///
/// assert!(ledger.passenger(&p.id).unwrap().is_settled(ledger.fare()));
/// ledger.end_trip();
/// assert_eq!(ledger.status(), TripStatus::Summary);
/// ```
pub struct TripLedger {
    trip: Trip,
    observers: Vec<Box<dyn SnapshotObserver>>,
    clock: Clock,
}

impl fmt::Debug for TripLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripLedger")
            .field("trip", &self.trip)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for TripLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TripLedger {
    /// Creates a ledger in the initial `Start` state.
    pub fn new() -> Self {
        Self::from_trip(Trip::initial())
    }

    /// Creates a ledger over a previously persisted trip.
    pub fn from_trip(trip: Trip) -> Self {
        TripLedger {
            trip,
            observers: Vec::new(),
            clock: system_clock,
        }
    }

    /// Replaces the clock used to stamp trips and passengers.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Registers a subscriber for snapshot-changed notifications.
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Starts a fresh trip at `fare`, discarding any previous one.
    pub fn start_trip(&mut self, fare: Money) -> Outcome {
        let now = (self.clock)();
        let outcome = self.apply("start_trip", |trip| {
            if !fare.is_positive() {
                return Err(Rejection::InvalidFare(fare));
            }
            *trip = Trip {
                status: TripStatus::Active,
                fare,
                passengers: Vec::new(),
                start_time: now,
                end_time: None,
                next_number: 1,
            };
            Ok(())
        });
        if outcome.is_applied() {
            info!(fare = fare.units(), "Trip started");
        }
        outcome
    }

    /// Adds a passenger at the front of the list.
    ///
    /// The new passenger takes the next sequence number; numbers of removed
    /// passengers are never handed out again.
    pub fn add_passenger(&mut self) -> Outcome<Passenger> {
        let now = (self.clock)();
        self.apply("add_passenger", |trip| {
            require_active(trip)?;
            let next_number = trip
                .next_number
                .checked_add(1)
                .ok_or(Rejection::NumbersExhausted)?;
            let passenger = Passenger {
                id: Uuid::new_v4().to_string(),
                number: trip.next_number,
                paid_amount: Money::zero(),
                is_change_returned: false,
                timestamp: now,
            };
            trip.next_number = next_number;
            trip.passengers.insert(0, passenger.clone());
            Ok(passenger)
        })
    }

    /// Adds `amount` to what the passenger has paid. Overpayment is allowed;
    /// it is what produces change.
    pub fn update_passenger_payment(&mut self, id: &str, amount: Money) -> Outcome {
        self.apply("update_passenger_payment", |trip| {
            require_active(trip)?;
            if !amount.is_positive() {
                return Err(Rejection::InvalidAmount(amount));
            }
            let passenger = passenger_mut(trip, id)?;
            passenger.paid_amount = passenger.paid_amount.saturating_add(amount);
            Ok(())
        })
    }

    /// Clears a mis-entered payment.
    pub fn reset_passenger_payment(&mut self, id: &str) -> Outcome {
        self.apply("reset_passenger_payment", |trip| {
            require_active(trip)?;
            let passenger = passenger_mut(trip, id)?;
            passenger.paid_amount = Money::zero();
            passenger.is_change_returned = false;
            Ok(())
        })
    }

    /// Records that change was handed back. The flag is set even when no
    /// change is owed; it then has no numeric effect.
    pub fn mark_change_returned(&mut self, id: &str) -> Outcome {
        self.apply("mark_change_returned", |trip| {
            require_active(trip)?;
            passenger_mut(trip, id)?.is_change_returned = true;
            Ok(())
        })
    }

    /// Deletes a passenger. Surviving passengers keep their numbers.
    pub fn remove_passenger(&mut self, id: &str) -> Outcome {
        self.apply("remove_passenger", |trip| {
            require_active(trip)?;
            let index = trip
                .passengers
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| Rejection::UnknownPassenger(id.to_string()))?;
            trip.passengers.remove(index);
            Ok(())
        })
    }

    /// Closes the trip for reconciliation.
    pub fn end_trip(&mut self) -> Outcome {
        let now = (self.clock)();
        let outcome = self.apply("end_trip", |trip| {
            require_active(trip)?;
            trip.status = TripStatus::Summary;
            trip.end_time = Some(now);
            Ok(())
        });
        if outcome.is_applied() {
            info!(
                passengers = self.trip.passenger_count(),
                collected = self.trip.total_collected().units(),
                discrepancy = self.trip.discrepancy().units(),
                "Trip ended"
            );
        }
        outcome
    }

    /// Discards the trip and returns to `Start`. Always applies.
    pub fn reset_app(&mut self) -> Outcome {
        let outcome = self.apply("reset_app", |trip| {
            *trip = Trip::initial();
            Ok(())
        });
        info!("Ledger reset");
        outcome
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The current snapshot.
    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn status(&self) -> TripStatus {
        self.trip.status
    }

    pub fn fare(&self) -> Money {
        self.trip.fare
    }

    /// Passengers, newest first.
    pub fn passengers(&self) -> &[Passenger] {
        &self.trip.passengers
    }

    pub fn passenger(&self, id: &str) -> Option<&Passenger> {
        self.trip.passenger(id)
    }

    pub fn passenger_by_number(&self, number: u32) -> Option<&Passenger> {
        self.trip.passenger_by_number(number)
    }

    pub fn total_collected(&self) -> Money {
        self.trip.total_collected()
    }

    pub fn total_change_due(&self) -> Money {
        self.trip.total_change_due()
    }

    pub fn total_change_returned(&self) -> Money {
        self.trip.total_change_returned()
    }

    pub fn passengers_paid_count(&self) -> usize {
        self.trip.passengers_paid_count()
    }

    pub fn theoretical_revenue(&self) -> Money {
        self.trip.theoretical_revenue()
    }

    pub fn net_cash_in_hand(&self) -> Money {
        self.trip.net_cash_in_hand()
    }

    pub fn discrepancy(&self) -> Money {
        self.trip.discrepancy()
    }

    /// All running totals in one value.
    pub fn totals(&self) -> TripTotals {
        TripTotals::from(&self.trip)
    }

    /// End-of-trip report. Meaningful once the trip is in `Summary`.
    pub fn summary(&self) -> TripSummary {
        TripSummary::from(&self.trip)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs a command body; notifies subscribers only if it applied.
    fn apply<T>(
        &mut self,
        command: &'static str,
        body: impl FnOnce(&mut Trip) -> Result<T, Rejection>,
    ) -> Outcome<T> {
        match body(&mut self.trip) {
            Ok(value) => {
                debug!(command, "Command applied");
                self.notify();
                Outcome::Applied(value)
            }
            Err(reason) => {
                debug!(command, %reason, "Command ignored");
                Outcome::Ignored(reason)
            }
        }
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.snapshot_changed(&self.trip);
        }
    }
}

fn require_active(trip: &Trip) -> Result<(), Rejection> {
    match trip.status {
        TripStatus::Active => Ok(()),
        other => Err(Rejection::NotActive(other)),
    }
}

fn passenger_mut<'a>(trip: &'a mut Trip, id: &str) -> Result<&'a mut Passenger, Rejection> {
    trip.passengers
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Rejection::UnknownPassenger(id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
