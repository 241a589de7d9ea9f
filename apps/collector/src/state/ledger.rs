//! # Ledger State
//!
//! Wraps the open [`TripSession`] for the commands. The shell is the only
//! writer and runs commands one at a time, so the session is owned outright
//! instead of being shared behind a lock.
//!
//! ## Passenger Addressing
//! ```text
//! Operator types:   pay 3 50
//!                        │
//!                        ▼
//! passenger_id(3) ──► "c1f0…" (UUID)  ──► ledger.update_passenger_payment
//!                        │
//!                        └── no #3? → ApiError NOT_FOUND
//! ```
//! Numbers are never reused, so `#3` always means the same passenger.

use fare_core::TripLedger;
use fare_db::{SnapshotStore, TripSession};
use std::sync::Arc;

use crate::error::ApiError;

pub struct LedgerState {
    session: TripSession,
}

impl LedgerState {
    /// Loads the stored trip and starts persisting changes.
    pub async fn open(store: Arc<dyn SnapshotStore>) -> Self {
        LedgerState {
            session: TripSession::open(store).await,
        }
    }

    pub fn ledger(&self) -> &TripLedger {
        self.session.ledger()
    }

    pub fn ledger_mut(&mut self) -> &mut TripLedger {
        self.session.ledger_mut()
    }

    /// Resolves the number the operator typed to the passenger's id.
    pub fn passenger_id(&self, number: u32) -> Result<String, ApiError> {
        self.ledger()
            .passenger_by_number(number)
            .map(|p| p.id.clone())
            .ok_or_else(|| ApiError::not_found("Passenger", &format!("#{}", number)))
    }

    /// Final flush.
    pub async fn close(self) -> Result<(), ApiError> {
        self.session.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fare_core::Money;
    use fare_db::MemoryStore;

    #[tokio::test]
    async fn test_passenger_id_lookup() {
        let mut state = LedgerState::open(Arc::new(MemoryStore::new())).await;
        state.ledger_mut().start_trip(Money::from_units(10));
        let added = state.ledger_mut().add_passenger().applied().unwrap();

        assert_eq!(state.passenger_id(1).unwrap(), added.id);
        assert_eq!(state.passenger_id(2).unwrap_err().code, ErrorCode::NotFound);
        state.close().await.unwrap();
    }
}
