use crate::models::{BookingOutcome, CancellationOutcome};
use skybook_core::{CustomerDirectory, DirectoryError, FlightDirectory};
use skybook_ledger::{
    CapacityLedger, EntityClass, LedgerError, SeatAvailability, SeatOutcome, SequenceAllocator,
};
use skybook_shared::{CustomerId, FlightNumber, Reservation, ReservationId, ReservationStatus};
use skybook_store::app_config::BookingRules;
use skybook_store::{ReservationRepository, StoreError};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Coordinates one booking request across the ledger, the allocator and
/// the reservation store. Owns no state of its own.
pub struct AdmissionController {
    ledger: Arc<CapacityLedger>,
    sequences: Arc<SequenceAllocator>,
    reservations: Arc<dyn ReservationRepository>,
    flights: Arc<dyn FlightDirectory>,
    customers: Arc<dyn CustomerDirectory>,
    rules: BookingRules,
}

/// Returns a confirmed seat to the ledger unless the surrounding operation
/// commits. Covers both a failed record write and the whole future being
/// dropped mid-flight (caller-side timeout or cancellation): a seat must
/// never stay consumed without a durable record referencing it.
struct SeatGuard {
    ledger: Arc<CapacityLedger>,
    flight_number: FlightNumber,
    armed: bool,
}

impl SeatGuard {
    fn new(ledger: Arc<CapacityLedger>, flight_number: FlightNumber) -> Self {
        Self {
            ledger,
            flight_number,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SeatGuard {
    fn drop(&mut self) {
        if self.armed {
            // The counter exists: the guard is only created after a
            // successful reserve on this flight.
            let _ = self.ledger.release_seat(self.flight_number);
        }
    }
}

impl AdmissionController {
    pub fn new(
        ledger: Arc<CapacityLedger>,
        sequences: Arc<SequenceAllocator>,
        reservations: Arc<dyn ReservationRepository>,
        flights: Arc<dyn FlightDirectory>,
        customers: Arc<dyn CustomerDirectory>,
        rules: BookingRules,
    ) -> Self {
        Self {
            ledger,
            sequences,
            reservations,
            flights,
            customers,
            rules,
        }
    }

    /// Book a seat on a flight for a customer. Always returns a definite
    /// status: `Reserved` when a seat was confirmed, `Waitlisted` when the
    /// flight is full. A waitlisted booking consumes no seat.
    pub async fn book_flight(
        &self,
        customer_id: CustomerId,
        flight_number: FlightNumber,
    ) -> Result<BookingOutcome, BookingError> {
        let request_id = Uuid::new_v4();

        // 1. Validate both references before touching any state
        let known_customer = self
            .customers
            .customer_exists(customer_id)
            .await
            .map_err(BookingError::Directory)?;
        if !known_customer {
            return Err(BookingError::CustomerNotFound(customer_id));
        }

        let known_flight = self
            .flights
            .flight_exists(flight_number)
            .await
            .map_err(BookingError::Directory)?;
        if !known_flight {
            return Err(BookingError::FlightNotFound(flight_number));
        }

        // 2. Admission attempt, re-run from the seat decision on store
        //    conflicts. Retrying an uncommitted attempt is safe.
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_book(request_id, customer_id, flight_number).await {
                Err(BookingError::Store(StoreError::Conflict(reason)))
                    if attempt < self.rules.max_booking_attempts =>
                {
                    warn!(%request_id, attempt, %reason, "Booking attempt conflicted, retrying");
                }
                outcome => return outcome,
            }
        }
    }

    /// One admission attempt: atomic seat decision, identity allocation,
    /// durable record.
    async fn try_book(
        &self,
        request_id: Uuid,
        customer_id: CustomerId,
        flight_number: FlightNumber,
    ) -> Result<BookingOutcome, BookingError> {
        let seat = self.ledger.try_reserve_seat(flight_number)?;
        let status = match seat {
            SeatOutcome::Confirmed => ReservationStatus::Reserved,
            SeatOutcome::Full => ReservationStatus::Waitlisted,
        };

        // The confirmed seat stays guarded until the record is durable;
        // if this future never reaches the commit, the guard returns it.
        let mut guard = match seat {
            SeatOutcome::Confirmed => {
                Some(SeatGuard::new(Arc::clone(&self.ledger), flight_number))
            }
            SeatOutcome::Full => None,
        };

        let reservation_id = self.sequences.next(EntityClass::Reservation);
        let reservation = Reservation::new(reservation_id, customer_id, flight_number, status);

        if let Err(err) = self.reservations.insert(reservation).await {
            if let StoreError::DuplicateId(id) = &err {
                error!(
                    %request_id,
                    reservation_id = id,
                    "Sequence allocator invariant violated: duplicate reservation id"
                );
            }
            // The armed guard releases the seat on the way out.
            return Err(err.into());
        }

        if let Some(guard) = guard.as_mut() {
            guard.disarm();
        }

        info!(
            %request_id,
            reservation_id,
            customer_id,
            flight_number,
            status = %status,
            "Booking admitted"
        );
        Ok(BookingOutcome {
            reservation_id,
            status,
        })
    }

    /// Cancel a reservation. Cancelling a reserved booking frees its seat
    /// and promotes the oldest waitlisted reservation on the same flight.
    ///
    /// Every transition is a compare-and-set against the status this call
    /// observed, so of two racing cancels exactly one wins and only the
    /// winner releases the seat; the loser re-reads and reports the
    /// invalid transition.
    pub async fn cancel_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<CancellationOutcome, BookingError> {
        let request_id = Uuid::new_v4();

        loop {
            let reservation = self
                .reservations
                .get(reservation_id)
                .await?
                .ok_or(BookingError::ReservationNotFound(reservation_id))?;

            match reservation.status {
                ReservationStatus::Cancelled => {
                    return Err(BookingError::InvalidTransition {
                        from: ReservationStatus::Cancelled.to_string(),
                        to: ReservationStatus::Cancelled.to_string(),
                    })
                }
                ReservationStatus::Waitlisted => {
                    // Never held a seat: nothing to release, nothing to
                    // promote.
                    match self
                        .reservations
                        .update_status_if(
                            reservation_id,
                            ReservationStatus::Waitlisted,
                            ReservationStatus::Cancelled,
                        )
                        .await
                    {
                        Ok(()) => {
                            info!(%request_id, reservation_id, "Waitlisted reservation cancelled");
                            return Ok(CancellationOutcome { promoted: None });
                        }
                        // Promoted or cancelled under us; decide again
                        // from the fresh status.
                        Err(StoreError::StatusMismatch { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
                ReservationStatus::Reserved => {
                    match self
                        .reservations
                        .update_status_if(
                            reservation_id,
                            ReservationStatus::Reserved,
                            ReservationStatus::Cancelled,
                        )
                        .await
                    {
                        Ok(()) => {
                            // This cancel won the transition, so it alone
                            // returns the seat.
                            self.ledger.release_seat(reservation.flight_number)?;
                            info!(
                                %request_id,
                                reservation_id,
                                flight_number = reservation.flight_number,
                                "Reservation cancelled, seat released"
                            );

                            let promoted = self
                                .promote_oldest_waitlisted(request_id, reservation.flight_number)
                                .await?;
                            return Ok(CancellationOutcome { promoted });
                        }
                        Err(StoreError::StatusMismatch { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }
    }

    /// Read-only snapshot for reporting. Admission never consults this.
    pub fn get_availability(
        &self,
        flight_number: FlightNumber,
    ) -> Result<SeatAvailability, BookingError> {
        Ok(self.ledger.availability(flight_number)?)
    }

    /// First-in-first-out promotion: the waitlisted reservation with the
    /// smallest id claims the freed seat through the same atomic path a
    /// fresh booking uses. Candidates whose status moved between the
    /// listing and the write (owner cancelled meanwhile) are skipped, not
    /// overwritten.
    async fn promote_oldest_waitlisted(
        &self,
        request_id: Uuid,
        flight_number: FlightNumber,
    ) -> Result<Option<ReservationId>, BookingError> {
        let listed = self.reservations.list_by_flight(flight_number).await?;
        let waiting: Vec<&Reservation> = listed
            .iter()
            .filter(|r| r.status == ReservationStatus::Waitlisted)
            .collect();
        if waiting.is_empty() {
            return Ok(None);
        }

        match self.ledger.try_reserve_seat(flight_number)? {
            SeatOutcome::Confirmed => {
                let mut guard = SeatGuard::new(Arc::clone(&self.ledger), flight_number);

                for candidate in waiting {
                    match self
                        .reservations
                        .update_status_if(
                            candidate.id,
                            ReservationStatus::Waitlisted,
                            ReservationStatus::Reserved,
                        )
                        .await
                    {
                        Ok(()) => {
                            guard.disarm();
                            info!(
                                %request_id,
                                reservation_id = candidate.id,
                                flight_number,
                                "Waitlisted reservation promoted"
                            );
                            return Ok(Some(candidate.id));
                        }
                        Err(StoreError::StatusMismatch { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }

                // Every candidate left the waitlist while we held the
                // seat; the guard returns it.
                Ok(None)
            }
            // A concurrent booking claimed the freed seat first; the
            // candidates stay waitlisted until the next cancellation.
            SeatOutcome::Full => Ok(None),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Flight not found: {0}")]
    FlightNotFound(FlightNumber),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Directory lookup failed: {0}")]
    Directory(DirectoryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
