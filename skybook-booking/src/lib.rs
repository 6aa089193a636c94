pub mod admission;
pub mod models;

pub use admission::{AdmissionController, BookingError};
pub use models::{BookingOutcome, CancellationOutcome};
pub use skybook_ledger::SeatAvailability;
