pub mod app_config;
pub mod customer_repo;
pub mod flight_repo;
pub mod reservation_repo;

pub use customer_repo::InMemoryCustomerDirectory;
pub use flight_repo::InMemoryFlightDirectory;
pub use reservation_repo::{InMemoryReservationStore, ReservationRepository, StoreError};
