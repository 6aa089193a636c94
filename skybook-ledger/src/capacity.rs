use serde::{Deserialize, Serialize};
use skybook_shared::FlightNumber;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

/// Outcome of an admission attempt. `Full` is a valid terminal answer,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatOutcome {
    Confirmed,
    Full,
}

/// Read-only snapshot for reporting. Never used for admission decisions;
/// admission goes through `try_reserve_seat`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeatAvailability {
    pub confirmed: u32,
    pub capacity: u32,
}

struct SeatCounter {
    capacity: u32,
    confirmed: AtomicU32,
}

/// Per-flight seat accounting. Sole writer of confirmed-seat counts.
///
/// The check-and-increment in `try_reserve_seat` is a single
/// compare-and-swap on the flight's counter, so concurrent bookings on the
/// same flight serialize on that counter alone and flights never contend
/// with each other. The outer map only takes its write lock when a flight
/// is opened.
pub struct CapacityLedger {
    flights: RwLock<HashMap<FlightNumber, SeatCounter>>,
}

impl CapacityLedger {
    pub fn new() -> Self {
        Self {
            flights: RwLock::new(HashMap::new()),
        }
    }

    /// Register the seat counter for a flight. Called once by the
    /// flight-registration flow; reopening an active flight is refused so
    /// an accumulated confirmed count can never be silently reset.
    pub fn open_flight(
        &self,
        flight_number: FlightNumber,
        capacity: u32,
    ) -> Result<(), LedgerError> {
        let mut flights = self.flights.write().unwrap_or_else(|e| e.into_inner());
        if flights.contains_key(&flight_number) {
            return Err(LedgerError::FlightAlreadyOpen(flight_number));
        }
        flights.insert(
            flight_number,
            SeatCounter {
                capacity,
                confirmed: AtomicU32::new(0),
            },
        );
        Ok(())
    }

    /// Atomically consume one seat if any remain. The compare against
    /// capacity and the increment happen in one step; a `Full` answer
    /// leaves the count untouched.
    pub fn try_reserve_seat(
        &self,
        flight_number: FlightNumber,
    ) -> Result<SeatOutcome, LedgerError> {
        let flights = self.flights.read().unwrap_or_else(|e| e.into_inner());
        let counter = flights
            .get(&flight_number)
            .ok_or(LedgerError::UnknownFlight(flight_number))?;

        let claimed = counter
            .confirmed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |confirmed| {
                if confirmed < counter.capacity {
                    Some(confirmed + 1)
                } else {
                    None
                }
            });

        Ok(match claimed {
            Ok(_) => SeatOutcome::Confirmed,
            Err(_) => SeatOutcome::Full,
        })
    }

    /// Return one seat, used when a reserved booking is cancelled.
    /// Never decrements below zero.
    pub fn release_seat(&self, flight_number: FlightNumber) -> Result<(), LedgerError> {
        let flights = self.flights.read().unwrap_or_else(|e| e.into_inner());
        let counter = flights
            .get(&flight_number)
            .ok_or(LedgerError::UnknownFlight(flight_number))?;

        let _ = counter
            .confirmed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |confirmed| {
                confirmed.checked_sub(1)
            });

        Ok(())
    }

    /// Snapshot of `(confirmed, capacity)` for reporting.
    pub fn availability(
        &self,
        flight_number: FlightNumber,
    ) -> Result<SeatAvailability, LedgerError> {
        let flights = self.flights.read().unwrap_or_else(|e| e.into_inner());
        let counter = flights
            .get(&flight_number)
            .ok_or(LedgerError::UnknownFlight(flight_number))?;

        Ok(SeatAvailability {
            confirmed: counter.confirmed.load(Ordering::SeqCst),
            capacity: counter.capacity,
        })
    }
}

impl Default for CapacityLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Flight not found in ledger: {0}")]
    UnknownFlight(FlightNumber),

    #[error("Flight {0} already has an open seat counter")]
    FlightAlreadyOpen(FlightNumber),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_seat_lifecycle() {
        let ledger = CapacityLedger::new();
        ledger.open_flight(100, 2).unwrap();

        assert_eq!(ledger.try_reserve_seat(100).unwrap(), SeatOutcome::Confirmed);
        assert_eq!(ledger.try_reserve_seat(100).unwrap(), SeatOutcome::Confirmed);
        assert_eq!(ledger.try_reserve_seat(100).unwrap(), SeatOutcome::Full);

        let snapshot = ledger.availability(100).unwrap();
        assert_eq!(snapshot.confirmed, 2);
        assert_eq!(snapshot.capacity, 2);

        ledger.release_seat(100).unwrap();
        assert_eq!(ledger.availability(100).unwrap().confirmed, 1);
        assert_eq!(ledger.try_reserve_seat(100).unwrap(), SeatOutcome::Confirmed);
    }

    #[test]
    fn test_full_flight_leaves_count_untouched() {
        let ledger = CapacityLedger::new();
        ledger.open_flight(7, 1).unwrap();

        assert_eq!(ledger.try_reserve_seat(7).unwrap(), SeatOutcome::Confirmed);
        for _ in 0..5 {
            assert_eq!(ledger.try_reserve_seat(7).unwrap(), SeatOutcome::Full);
        }
        assert_eq!(ledger.availability(7).unwrap().confirmed, 1);
    }

    #[test]
    fn test_release_never_goes_below_zero() {
        let ledger = CapacityLedger::new();
        ledger.open_flight(7, 3).unwrap();

        ledger.release_seat(7).unwrap();
        assert_eq!(ledger.availability(7).unwrap().confirmed, 0);
    }

    #[test]
    fn test_unknown_flight() {
        let ledger = CapacityLedger::new();
        assert!(matches!(
            ledger.try_reserve_seat(42),
            Err(LedgerError::UnknownFlight(42))
        ));
    }

    #[test]
    fn test_reopening_a_flight_is_refused() {
        let ledger = CapacityLedger::new();
        ledger.open_flight(9, 10).unwrap();
        assert!(matches!(
            ledger.open_flight(9, 20),
            Err(LedgerError::FlightAlreadyOpen(9))
        ));
    }

    #[test]
    fn test_no_oversell_under_concurrency() {
        let ledger = Arc::new(CapacityLedger::new());
        ledger.open_flight(500, 5).unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                ledger.try_reserve_seat(500).unwrap()
            }));
        }

        let confirmed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| *outcome == SeatOutcome::Confirmed)
            .count();

        assert_eq!(confirmed, 5);
        assert_eq!(ledger.availability(500).unwrap().confirmed, 5);
    }
}
