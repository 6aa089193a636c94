use serde::Serialize;
use skybook_shared::{ReservationId, ReservationStatus};

/// Definite answer to a booking request: either a seat was confirmed or
/// the reservation was accepted onto the waitlist.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookingOutcome {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CancellationOutcome {
    /// Waitlisted reservation promoted into the freed seat, if any.
    pub promoted: Option<ReservationId>,
}
