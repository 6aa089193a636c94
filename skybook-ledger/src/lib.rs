pub mod capacity;
pub mod sequence;

pub use capacity::{CapacityLedger, LedgerError, SeatAvailability, SeatOutcome};
pub use sequence::{EntityClass, SequenceAllocator};
