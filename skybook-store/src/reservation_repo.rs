use async_trait::async_trait;
use chrono::Utc;
use skybook_shared::{FlightNumber, Reservation, ReservationId, ReservationStatus};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::info;

/// Durable, append-mostly collection of reservation records.
///
/// Records are never deleted, only status-updated, preserving the audit
/// history. Writes must be durable before the call returns.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Fails with `DuplicateId` if the id already exists. Should be
    /// unreachable given the sequence allocator's guarantee.
    async fn insert(&self, reservation: Reservation) -> Result<(), StoreError>;

    async fn update_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<(), StoreError>;

    /// Compare-and-set status transition: applies `to` only while the
    /// current status is still `from`, failing with `StatusMismatch` when
    /// another writer got there first. Concurrency-sensitive transitions
    /// (cancellation, waitlist promotion) go through this, never through
    /// the unconditional `update_status`.
    async fn update_status_if(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), StoreError>;

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;

    /// All reservations for a flight, ordered by reservation id ascending.
    /// Waitlist promotion relies on this ordering.
    async fn list_by_flight(
        &self,
        flight_number: FlightNumber,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn count_by_status(&self, status: ReservationStatus) -> Result<usize, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Reservation id already exists: {0}")]
    DuplicateId(ReservationId),

    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    /// A compare-and-set transition lost to a concurrent writer.
    #[error("Reservation {id} is {actual}, expected {expected}")]
    StatusMismatch {
        id: ReservationId,
        expected: ReservationStatus,
        actual: ReservationStatus,
    },

    /// Transaction aborted by concurrent contention. Emitted by
    /// transactional backends; callers may retry a bounded number of times.
    #[error("Concurrent write conflict: {0}")]
    Conflict(String),
}

/// In-memory reservation store. The BTreeMap keeps records sorted by id,
/// which gives `list_by_flight` its required ordering directly.
pub struct InMemoryReservationStore {
    records: RwLock<BTreeMap<ReservationId, Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationStore {
    async fn insert(&self, reservation: Reservation) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&reservation.id) {
            return Err(StoreError::DuplicateId(reservation.id));
        }

        info!(
            reservation_id = reservation.id,
            flight_number = reservation.flight_number,
            status = %reservation.status,
            "Reservation recorded"
        );
        records.insert(reservation.id, reservation);
        Ok(())
    }

    async fn update_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        record.status = status;
        record.updated_at = Utc::now();
        info!(reservation_id = id, status = %status, "Reservation status updated");
        Ok(())
    }

    async fn update_status_if(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if record.status != from {
            return Err(StoreError::StatusMismatch {
                id,
                expected: from,
                actual: record.status,
            });
        }

        record.status = to;
        record.updated_at = Utc::now();
        info!(reservation_id = id, from = %from, to = %to, "Reservation status transitioned");
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list_by_flight(
        &self,
        flight_number: FlightNumber,
    ) -> Result<Vec<Reservation>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.flight_number == flight_number)
            .cloned()
            .collect())
    }

    async fn count_by_status(&self, status: ReservationStatus) -> Result<usize, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().filter(|r| r.status == status).count())
    }
}
