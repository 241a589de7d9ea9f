//! # Snapshot Writer
//!
//! Write-behind persistence for the ledger. Commands never wait on storage:
//! the writer hands each new trip to a background task and returns.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Writer Flow                                 │
//! │                                                                         │
//! │  TripLedger command applied                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SnapshotWriter::snapshot_changed(&trip)   (sync, never blocks)        │
//! │       │  trip.clone() → unbounded channel                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Background task                                 │   │
//! │  │                                                                 │   │
//! │  │  1. recv() one trip                                            │   │
//! │  │  2. drain the queue, keep only the newest (coalesce bursts)     │   │
//! │  │  3. encode_snapshot → store.save(key, json)                    │   │
//! │  │  4. on failure: error!, keep going                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  SnapshotWriterHandle::shutdown()                                      │
//! │       └── close queue, save whatever is left, stop the task            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use fare_core::snapshot::encode_snapshot;
use fare_core::{SnapshotObserver, Trip};

use crate::error::{DbError, DbResult};
use crate::store::SnapshotStore;

// =============================================================================
// Writer
// =============================================================================

/// Ledger subscriber that queues snapshots for the background task.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<Trip>,
}

impl SnapshotObserver for SnapshotWriter {
    fn snapshot_changed(&self, trip: &Trip) {
        if self.tx.send(trip.clone()).is_err() {
            error!("Snapshot writer stopped; change not persisted");
        }
    }
}

/// Handle for stopping the writer task.
pub struct SnapshotWriterHandle {
    /// Shutdown sender.
    shutdown_tx: mpsc::Sender<()>,

    task: JoinHandle<()>,
}

impl SnapshotWriterHandle {
    /// Saves every snapshot still queued, then stops the task.
    pub async fn shutdown(self) -> DbResult<()> {
        // A closed channel means the task already exited
        let _ = self.shutdown_tx.send(()).await;
        self.task
            .await
            .map_err(|e| DbError::Internal(format!("snapshot writer task failed: {}", e)))
    }
}

impl SnapshotWriter {
    /// Spawns the background task on the current Tokio runtime.
    pub fn spawn(
        store: Arc<dyn SnapshotStore>,
        key: impl Into<String>,
    ) -> (Self, SnapshotWriterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let worker = Worker {
            store,
            key: key.into(),
            rx,
            shutdown_rx,
        };
        let task = tokio::spawn(worker.run());

        (SnapshotWriter { tx }, SnapshotWriterHandle { shutdown_tx, task })
    }
}

// =============================================================================
// Background Task
// =============================================================================

struct Worker {
    store: Arc<dyn SnapshotStore>,
    key: String,
    rx: mpsc::UnboundedReceiver<Trip>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Worker {
    async fn run(mut self) {
        debug!(key = %self.key, "Snapshot writer starting");

        loop {
            tokio::select! {
                biased;

                Some(trip) = self.rx.recv() => {
                    let latest = self.drain_newer(trip);
                    self.persist(&latest).await;
                }

                _ = self.shutdown_rx.recv() => {
                    self.rx.close();
                    if let Some(trip) = self.drain_remaining() {
                        self.persist(&trip).await;
                    }
                    info!("Snapshot writer flushed and stopped");
                    break;
                }
            }
        }
    }

    /// Skips every queued snapshot older than the newest one.
    fn drain_newer(&mut self, mut latest: Trip) -> Trip {
        let mut skipped = 0usize;
        while let Ok(newer) = self.rx.try_recv() {
            latest = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "Coalesced queued snapshots");
        }
        latest
    }

    fn drain_remaining(&mut self) -> Option<Trip> {
        let mut latest = None;
        while let Ok(trip) = self.rx.try_recv() {
            latest = Some(trip);
        }
        latest
    }

    /// Encodes and saves. Failures are logged and dropped.
    async fn persist(&self, trip: &Trip) {
        let json = match encode_snapshot(trip) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to encode trip snapshot");
                return;
            }
        };

        match self.store.save(&self.key, &json).await {
            Ok(()) => debug!(
                status = ?trip.status,
                passengers = trip.passenger_count(),
                "Snapshot saved"
            ),
            Err(e) => error!(error = %e, key = %self.key, "Failed to save trip snapshot"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fare_core::snapshot::decode_snapshot;
    use fare_core::{Money, TripLedger, TripStatus, SNAPSHOT_KEY};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::store::MemoryStore;

    /// Fails the first `failures` saves, then delegates.
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotStore for FlakyStore {
        async fn load(&self, key: &str) -> DbResult<Option<String>> {
            self.inner.load(key).await
        }

        async fn save(&self, key: &str, value: &str) -> DbResult<()> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(DbError::QueryFailed("disk full".to_string()));
            }
            self.inner.save(key, value).await
        }
    }

    fn persisted(store: &MemoryStore) -> Trip {
        decode_snapshot(&store.get(SNAPSHOT_KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_writer_persists_latest_snapshot() {
        let store = MemoryStore::new();
        let (writer, handle) = SnapshotWriter::spawn(Arc::new(store.clone()), SNAPSHOT_KEY);

        let mut ledger = TripLedger::new();
        ledger.subscribe(writer);
        ledger.start_trip(Money::from_units(20));
        for _ in 0..5 {
            ledger.add_passenger();
        }
        let third = ledger.passenger_by_number(3).unwrap().id.clone();
        ledger.update_passenger_payment(&third, Money::from_units(50));

        handle.shutdown().await.unwrap();

        let saved = persisted(&store);
        assert_eq!(&saved, ledger.trip());
        assert_eq!(saved.passenger_count(), 5);
    }

    #[tokio::test]
    async fn test_writer_survives_store_failures() {
        let inner = MemoryStore::new();
        let store = Arc::new(FlakyStore {
            inner: inner.clone(),
            failures: AtomicUsize::new(1),
        });
        let (writer, handle) = SnapshotWriter::spawn(store, SNAPSHOT_KEY);

        let mut ledger = TripLedger::new();
        ledger.subscribe(writer.clone());
        ledger.start_trip(Money::from_units(10));

        // Let the first save run and fail
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        ledger.add_passenger();
        handle.shutdown().await.unwrap();

        let saved = persisted(&inner);
        assert_eq!(saved.status, TripStatus::Active);
        assert_eq!(saved.passenger_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_without_changes_writes_nothing() {
        let store = MemoryStore::new();
        let (_writer, handle) = SnapshotWriter::spawn(Arc::new(store.clone()), SNAPSHOT_KEY);

        handle.shutdown().await.unwrap();

        assert_eq!(store.get(SNAPSHOT_KEY), None);
    }

    #[tokio::test]
    async fn test_send_after_shutdown_is_harmless() {
        let store = MemoryStore::new();
        let (writer, handle) = SnapshotWriter::spawn(Arc::new(store.clone()), SNAPSHOT_KEY);
        handle.shutdown().await.unwrap();

        writer.snapshot_changed(&Trip::initial());

        assert_eq!(store.get(SNAPSHOT_KEY), None);
    }
}
