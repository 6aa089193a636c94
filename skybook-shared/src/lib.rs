pub mod models;

pub use models::{
    Customer, CustomerId, Flight, FlightNumber, Plane, PlaneId, Reservation, ReservationId,
    ReservationStatus,
};
