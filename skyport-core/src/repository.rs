use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::TicketRequest;
use crate::error::DomainError;
use crate::seating::SeatGeometry;

/// Flight data the booking engine needs: seat geometry for validation and the
/// booked-ticket count for the availability projection.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn seat_geometry(&self, flight_id: Uuid) -> Result<Option<SeatGeometry>, DomainError>;

    async fn booked_seats(&self, flight_id: Uuid) -> Result<i64, DomainError>;
}

/// Atomic order persistence. `create_order` must insert the order and all of
/// its tickets in one transaction: any ticket failing the storage-level
/// `(flight, row, seat)` uniqueness constraint aborts the whole write.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(
        &self,
        user_id: Uuid,
        tickets: &[TicketRequest],
    ) -> Result<Uuid, DomainError>;
}
