use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skybook_core::{CoreError, DirectoryError, FlightDirectory};
use skybook_ledger::{EntityClass, SequenceAllocator};
use skybook_shared::{Flight, FlightNumber, Plane, PlaneId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory flight and plane registry. Capacity is derived by joining a
/// flight's plane assignment to the plane's seat count, the same relation
/// the legacy schema expressed through its FlightInfo table.
pub struct InMemoryFlightDirectory {
    planes: RwLock<HashMap<PlaneId, Plane>>,
    flights: RwLock<HashMap<FlightNumber, Flight>>,
    sequences: Arc<SequenceAllocator>,
}

impl InMemoryFlightDirectory {
    pub fn new(sequences: Arc<SequenceAllocator>) -> Self {
        Self {
            planes: RwLock::new(HashMap::new()),
            flights: RwLock::new(HashMap::new()),
            sequences,
        }
    }

    pub async fn register_plane(&self, make: &str, model: &str, age: u32, seats: u32) -> PlaneId {
        let id = self.sequences.next(EntityClass::Plane);
        let mut planes = self.planes.write().await;
        planes.insert(
            id,
            Plane {
                id,
                make: make.to_string(),
                model: model.to_string(),
                age,
                seats,
            },
        );
        info!(plane_id = id, seats, "Plane registered");
        id
    }

    /// Registers a flight and assigns it to a plane. Fails if the plane is
    /// unknown, since capacity could never be derived for it.
    pub async fn register_flight(
        &self,
        plane_id: PlaneId,
        origin: &str,
        destination: &str,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    ) -> Result<FlightNumber, DirectoryError> {
        let planes = self.planes.read().await;
        if !planes.contains_key(&plane_id) {
            return Err(Box::new(CoreError::ValidationError(format!(
                "unknown plane: {plane_id}"
            ))));
        }
        drop(planes);

        let flight_number = self.sequences.next(EntityClass::Flight);
        let mut flights = self.flights.write().await;
        flights.insert(
            flight_number,
            Flight {
                flight_number,
                plane_id,
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure,
                arrival,
            },
        );
        info!(flight_number, plane_id, "Flight registered");
        Ok(flight_number)
    }
}

#[async_trait]
impl FlightDirectory for InMemoryFlightDirectory {
    async fn flight_exists(&self, flight_number: FlightNumber) -> Result<bool, DirectoryError> {
        let flights = self.flights.read().await;
        Ok(flights.contains_key(&flight_number))
    }

    async fn capacity(&self, flight_number: FlightNumber) -> Result<Option<u32>, DirectoryError> {
        let flights = self.flights.read().await;
        let Some(flight) = flights.get(&flight_number) else {
            return Ok(None);
        };

        let planes = self.planes.read().await;
        Ok(planes.get(&flight.plane_id).map(|plane| plane.seats))
    }

    async fn get_flight(
        &self,
        flight_number: FlightNumber,
    ) -> Result<Option<Flight>, DirectoryError> {
        let flights = self.flights.read().await;
        Ok(flights.get(&flight_number).cloned())
    }
}
