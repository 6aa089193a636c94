use async_trait::async_trait;
use skybook_shared::{Customer, CustomerId, Flight, FlightNumber};

pub type DirectoryError = Box<dyn std::error::Error + Send + Sync>;

/// Lookup seam for flight data. The admission core only needs existence
/// checks and the capacity derived from the flight's plane assignment.
#[async_trait]
pub trait FlightDirectory: Send + Sync {
    async fn flight_exists(&self, flight_number: FlightNumber) -> Result<bool, DirectoryError>;

    /// Seat capacity of the plane assigned to this flight.
    async fn capacity(&self, flight_number: FlightNumber) -> Result<Option<u32>, DirectoryError>;

    async fn get_flight(&self, flight_number: FlightNumber)
        -> Result<Option<Flight>, DirectoryError>;
}

/// Lookup seam for customer data.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn customer_exists(&self, customer_id: CustomerId) -> Result<bool, DirectoryError>;

    async fn get_customer(&self, customer_id: CustomerId)
        -> Result<Option<Customer>, DirectoryError>;
}
