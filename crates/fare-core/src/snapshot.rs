//! # Snapshot Schema
//!
//! Encodes a [`Trip`] for storage and, on the way back, checks that the
//! stored record really is a trip before anything trusts it.
//!
//! ## Load Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Decode                                    │
//! │                                                                         │
//! │  raw JSON (from the store)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde → TripRecord        shape check: field names and types          │
//! │       │                    ("START"/"ACTIVE"/"SUMMARY" accepted)       │
//! │       ▼                                                                 │
//! │  TripRecord → Trip         value checks + migration                    │
//! │       │                    • amounts non-negative                      │
//! │       │                    • active/summary trips have a fare          │
//! │       │                    • ids and numbers unique                    │
//! │       │                    • nextNumber filled in when missing         │
//! │       ▼                                                                 │
//! │  Ok(Trip)  or  Err(CoreError::InvalidSnapshot)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Passenger, Trip, TripStatus};

// =============================================================================
// Encode
// =============================================================================

/// Serializes a trip into the persisted JSON record.
pub fn encode_snapshot(trip: &Trip) -> CoreResult<String> {
    Ok(serde_json::to_string(trip)?)
}

// =============================================================================
// Decode
// =============================================================================

/// Parses and validates a persisted record.
///
/// ## Example
/// ```rust
/// use fare_core::snapshot::decode_snapshot;
/// use fare_core::TripStatus;
///
/// let trip = decode_snapshot(
///     r#"{"status":"ACTIVE","fare":15,"passengers":[],"startTime":1700000000000}"#,
/// ).unwrap();
/// assert_eq!(trip.status, TripStatus::Active);
/// assert_eq!(trip.next_number, 1);
///
/// assert!(decode_snapshot(r#"{"status":"Active","fare":-1}"#).is_err());
/// ```
pub fn decode_snapshot(raw: &str) -> CoreResult<Trip> {
    let record: TripRecord = serde_json::from_str(raw)
        .map_err(|e| CoreError::invalid_snapshot(format!("unexpected shape: {}", e)))?;
    Trip::try_from(record)
}

/// Status as stored. Early builds wrote upper-case names.
#[derive(Debug, Clone, Copy, Deserialize)]
enum RecordStatus {
    #[serde(alias = "START")]
    Start,
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "SUMMARY")]
    Summary,
}

impl From<RecordStatus> for TripStatus {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Start => TripStatus::Start,
            RecordStatus::Active => TripStatus::Active,
            RecordStatus::Summary => TripStatus::Summary,
        }
    }
}

/// The stored trip, before value checks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TripRecord {
    status: RecordStatus,
    fare: i64,
    passengers: Vec<PassengerRecord>,
    start_time: i64,
    #[serde(default)]
    end_time: Option<i64>,
    #[serde(default)]
    next_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PassengerRecord {
    id: String,
    number: i64,
    paid_amount: i64,
    is_change_returned: bool,
    timestamp: i64,
}

impl TryFrom<PassengerRecord> for Passenger {
    type Error = CoreError;

    fn try_from(record: PassengerRecord) -> CoreResult<Self> {
        if record.id.trim().is_empty() {
            return Err(CoreError::invalid_snapshot("passenger id is empty"));
        }
        let number = u32::try_from(record.number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                CoreError::invalid_snapshot(format!(
                    "passenger {} has number {}",
                    record.id, record.number
                ))
            })?;
        if record.paid_amount < 0 {
            return Err(CoreError::invalid_snapshot(format!(
                "passenger #{} has negative payment {}",
                number, record.paid_amount
            )));
        }

        Ok(Passenger {
            id: record.id,
            number,
            paid_amount: Money::from_units(record.paid_amount),
            is_change_returned: record.is_change_returned,
            timestamp: record.timestamp,
        })
    }
}

impl TryFrom<TripRecord> for Trip {
    type Error = CoreError;

    fn try_from(record: TripRecord) -> CoreResult<Self> {
        let status = TripStatus::from(record.status);

        if record.fare < 0 {
            return Err(CoreError::invalid_snapshot(format!(
                "negative fare {}",
                record.fare
            )));
        }

        if status == TripStatus::Start {
            // Nothing in a not-yet-started trip is worth keeping
            if !record.passengers.is_empty() {
                return Err(CoreError::invalid_snapshot(
                    "trip not started but has passengers",
                ));
            }
            return Ok(Trip::initial());
        }

        if record.fare == 0 {
            return Err(CoreError::invalid_snapshot(format!(
                "{:?} trip has no fare",
                status
            )));
        }
        if status == TripStatus::Active && record.end_time.is_some() {
            return Err(CoreError::invalid_snapshot("active trip has an end time"));
        }

        let passengers = record
            .passengers
            .into_iter()
            .map(Passenger::try_from)
            .collect::<CoreResult<Vec<_>>>()?;

        let mut ids = HashSet::new();
        let mut numbers = HashSet::new();
        for p in &passengers {
            if !ids.insert(p.id.as_str()) {
                return Err(CoreError::invalid_snapshot(format!(
                    "duplicate passenger id {}",
                    p.id
                )));
            }
            if !numbers.insert(p.number) {
                return Err(CoreError::invalid_snapshot(format!(
                    "duplicate passenger number {}",
                    p.number
                )));
            }
        }

        let highest = passengers.iter().map(|p| p.number).max().unwrap_or(0);
        let next_number = match record.next_number {
            Some(next) if next > highest => next,
            Some(next) => {
                return Err(CoreError::invalid_snapshot(format!(
                    "next number {} already used",
                    next
                )))
            }
            None => u32::try_from(passengers.len())
                .ok()
                .map(|count| highest.max(count))
                .and_then(|last| last.checked_add(1))
                .ok_or_else(|| {
                    CoreError::invalid_snapshot("passenger numbers exhausted")
                })?,
        };

        Ok(Trip {
            status,
            fare: Money::from_units(record.fare),
            passengers,
            start_time: record.start_time,
            end_time: record.end_time,
            next_number,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
