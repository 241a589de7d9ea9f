//! # Trip Session
//!
//! Startup and shutdown around a [`TripLedger`]. The ledger can only be
//! reached through an open session, and a session only exists once the
//! stored trip has been read, so no command can run against an unloaded
//! ledger.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Lifecycle                                  │
//! │                                                                         │
//! │  TripSession::open(store).await                                        │
//! │       │                                                                 │
//! │       ├── store.load(key)                                              │
//! │       │     ├── Some(json) → decode_snapshot → Ok(trip)  → restore     │
//! │       │     │                                → Err       → warn!, Start│
//! │       │     ├── None                                     → Start       │
//! │       │     └── Err (storage)                            → error!, Start│
//! │       ├── TripLedger::from_trip(trip)                                  │
//! │       └── subscribe(SnapshotWriter)                                    │
//! │                                                                         │
//! │  session.ledger_mut().add_passenger() ... (write-behind saves)         │
//! │                                                                         │
//! │  session.close().await  ← final flush                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use fare_core::snapshot::decode_snapshot;
use fare_core::{Trip, TripLedger, SNAPSHOT_KEY};

use crate::error::DbResult;
use crate::store::SnapshotStore;
use crate::writer::{SnapshotWriter, SnapshotWriterHandle};

/// An open, persisted trip ledger.
pub struct TripSession {
    ledger: TripLedger,
    writer: SnapshotWriterHandle,
}

impl TripSession {
    /// Opens the session stored under [`SNAPSHOT_KEY`].
    pub async fn open(store: Arc<dyn SnapshotStore>) -> Self {
        Self::open_with_key(store, SNAPSHOT_KEY).await
    }

    /// Opens the session stored under `key`.
    ///
    /// Never fails: anything unreadable is logged and the session starts
    /// from a fresh trip.
    pub async fn open_with_key(store: Arc<dyn SnapshotStore>, key: &str) -> Self {
        let trip = load_trip(store.as_ref(), key).await;

        let mut ledger = TripLedger::from_trip(trip);
        let (writer, handle) = SnapshotWriter::spawn(store, key);
        ledger.subscribe(writer);

        info!(
            status = ?ledger.status(),
            passengers = ledger.trip().passenger_count(),
            "Trip session opened"
        );

        TripSession {
            ledger,
            writer: handle,
        }
    }

    pub fn ledger(&self) -> &TripLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut TripLedger {
        &mut self.ledger
    }

    /// Flushes pending snapshots and stops the writer.
    pub async fn close(self) -> DbResult<()> {
        let TripSession { ledger, writer } = self;
        // Drop the ledger first: no more snapshots can be queued
        drop(ledger);
        writer.shutdown().await?;
        info!("Trip session closed");
        Ok(())
    }
}

/// Reads and validates the stored trip, falling back to a fresh one.
pub async fn load_trip(store: &dyn SnapshotStore, key: &str) -> Trip {
    match store.load(key).await {
        Ok(Some(raw)) => match decode_snapshot(&raw) {
            Ok(trip) => {
                info!(key = %key, status = ?trip.status, "Restored saved trip");
                trip
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding invalid saved trip");
                Trip::initial()
            }
        },
        Ok(None) => {
            debug!(key = %key, "No saved trip");
            Trip::initial()
        }
        Err(e) => {
            error!(key = %key, error = %e, "Failed to read saved trip");
            Trip::initial()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
