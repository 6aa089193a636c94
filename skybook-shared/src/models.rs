use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifiers are integers issued by the sequence allocator,
/// monotonic per entity class.
pub type PlaneId = i64;
pub type FlightNumber = i64;
pub type CustomerId = i64;
pub type ReservationId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub id: PlaneId,
    pub make: String,
    pub model: String,
    pub age: u32,
    pub seats: u32,
}

/// A scheduled flight. Capacity is not stored here; it is derived from
/// the assigned plane's seat count through the flight directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: FlightNumber,
    pub plane_id: PlaneId,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub customer_id: CustomerId,
    pub flight_number: FlightNumber,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: ReservationId,
        customer_id: CustomerId,
        flight_number: FlightNumber,
        status: ReservationStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id,
            flight_number,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    Reserved,
    Waitlisted,
    Cancelled,
}

impl ReservationStatus {
    /// Single-letter column code used by the legacy schema.
    pub fn code(&self) -> char {
        match self {
            ReservationStatus::Reserved => 'R',
            ReservationStatus::Waitlisted => 'W',
            ReservationStatus::Cancelled => 'C',
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Reserved => write!(f, "RESERVED"),
            ReservationStatus::Waitlisted => write!(f, "WAITLISTED"),
            ReservationStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
