use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::repository::{FlightRepository, OrderRepository};
use crate::seating;

/// One desired ticket inside an order request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub flight_id: Uuid,
    pub row: i32,
    pub seat: i32,
}

/// Multi-ticket booking: all tickets in an order are booked atomically or not
/// at all. Seat-geometry validation runs here, before persistence. The
/// duplicate-seat check is NOT done here: the storage layer's uniqueness
/// constraint is the only authority, which closes the check-then-act race
/// between concurrent bookings for the same seat.
#[derive(Clone)]
pub struct BookingService {
    flights: Arc<dyn FlightRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl BookingService {
    pub fn new(flights: Arc<dyn FlightRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { flights, orders }
    }

    /// Book every ticket in `tickets` for `user_id`, or nothing.
    ///
    /// Fails with `EmptyOrder` for a zero-ticket request, `NotFound` for an
    /// unknown flight, `Validation` for a seat outside the airplane's
    /// geometry and `Conflict` when a seat is already taken. All failure
    /// paths leave storage unchanged.
    pub async fn place_order(
        &self,
        user_id: Uuid,
        tickets: &[TicketRequest],
    ) -> Result<Uuid, DomainError> {
        if tickets.is_empty() {
            return Err(DomainError::EmptyOrder);
        }

        for ticket in tickets {
            let geometry = self
                .flights
                .seat_geometry(ticket.flight_id)
                .await?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("flight {} does not exist", ticket.flight_id))
                })?;
            seating::validate_seat(ticket.row, ticket.seat, &geometry)?;
        }

        let order_id = self.orders.create_order(user_id, tickets).await?;
        tracing::info!(%order_id, %user_id, tickets = tickets.len(), "order placed");
        Ok(order_id)
    }

    /// Seats not yet ticketed on a flight: capacity minus booked count,
    /// recomputed per call. Display-only; never gates booking.
    pub async fn tickets_available(&self, flight_id: Uuid) -> Result<i64, DomainError> {
        let geometry = self
            .flights
            .seat_geometry(flight_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("flight {flight_id} does not exist")))?;
        let booked = self.flights.booked_seats(flight_id).await?;
        Ok(seating::seats_remaining(&geometry, booked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seating::SeatGeometry;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    struct FakeFlights {
        geometries: HashMap<Uuid, SeatGeometry>,
        seats: Arc<FakeSeats>,
    }

    #[async_trait]
    impl FlightRepository for FakeFlights {
        async fn seat_geometry(
            &self,
            flight_id: Uuid,
        ) -> Result<Option<SeatGeometry>, DomainError> {
            Ok(self.geometries.get(&flight_id).copied())
        }

        async fn booked_seats(&self, flight_id: Uuid) -> Result<i64, DomainError> {
            let taken = self.seats.taken.lock().unwrap();
            Ok(taken.iter().filter(|(f, _, _)| *f == flight_id).count() as i64)
        }
    }

    // Mimics the database: a unique set over (flight, row, seat) and
    // all-or-nothing inserts.
    #[derive(Default)]
    struct FakeSeats {
        taken: Mutex<HashSet<(Uuid, i32, i32)>>,
        orders: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl OrderRepository for FakeSeats {
        async fn create_order(
            &self,
            _user_id: Uuid,
            tickets: &[TicketRequest],
        ) -> Result<Uuid, DomainError> {
            let mut taken = self.taken.lock().unwrap();
            // Check-and-insert one ticket at a time, like the row-by-row
            // inserts against the unique constraint: a duplicate later in the
            // same order must also fail, and then everything rolls back.
            let mut inserted = Vec::new();
            for t in tickets {
                if !taken.insert((t.flight_id, t.row, t.seat)) {
                    for key in inserted {
                        taken.remove(&key);
                    }
                    return Err(DomainError::Conflict(format!(
                        "seat {} in row {} is already taken on flight {}",
                        t.seat, t.row, t.flight_id
                    )));
                }
                inserted.push((t.flight_id, t.row, t.seat));
            }
            let order_id = Uuid::new_v4();
            self.orders.lock().unwrap().push(order_id);
            Ok(order_id)
        }
    }

    fn service_with_flight(rows: i32, seats_in_row: i32) -> (BookingService, Uuid, Arc<FakeSeats>) {
        let flight_id = Uuid::new_v4();
        let seats = Arc::new(FakeSeats::default());
        let flights = FakeFlights {
            geometries: HashMap::from([(flight_id, SeatGeometry { rows, seats_in_row })]),
            seats: seats.clone(),
        };
        let service = BookingService::new(Arc::new(flights), seats.clone());
        (service, flight_id, seats)
    }

    fn ticket(flight_id: Uuid, row: i32, seat: i32) -> TicketRequest {
        TicketRequest { flight_id, row, seat }
    }

    #[tokio::test]
    async fn books_a_multi_ticket_order() {
        let (service, flight, seats) = service_with_flight(10, 6);
        let user = Uuid::new_v4();

        let order_id = service
            .place_order(user, &[ticket(flight, 1, 1), ticket(flight, 1, 2)])
            .await
            .expect("order should be accepted");

        assert_eq!(seats.orders.lock().unwrap().as_slice(), &[order_id]);
        assert_eq!(seats.taken.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejects_empty_order_without_persisting_anything() {
        let (service, _flight, seats) = service_with_flight(10, 6);

        let err = service.place_order(Uuid::new_v4(), &[]).await.unwrap_err();

        assert!(matches!(err, DomainError::EmptyOrder));
        assert!(seats.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_out_of_range_seats_before_persistence() {
        let (service, flight, seats) = service_with_flight(10, 6);

        for (row, seat) in [(0, 1), (11, 1), (1, 0), (1, 7)] {
            let err = service
                .place_order(Uuid::new_v4(), &[ticket(flight, row, seat)])
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "({row},{seat}): {err:?}");
        }
        assert!(seats.orders.lock().unwrap().is_empty());
        assert!(seats.taken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_flight() {
        let (service, _flight, seats) = service_with_flight(10, 6);

        let err = service
            .place_order(Uuid::new_v4(), &[ticket(Uuid::new_v4(), 1, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(seats.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_attempt_at_a_taken_seat_conflicts() {
        let (service, flight, _seats) = service_with_flight(10, 6);

        service
            .place_order(Uuid::new_v4(), &[ticket(flight, 3, 4)])
            .await
            .expect("first booking succeeds");

        let err = service
            .place_order(Uuid::new_v4(), &[ticket(flight, 3, 4)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_in_third_ticket_rolls_back_the_whole_order() {
        let (service, flight, seats) = service_with_flight(10, 6);

        service
            .place_order(Uuid::new_v4(), &[ticket(flight, 5, 5)])
            .await
            .expect("seed booking succeeds");

        let err = service
            .place_order(
                Uuid::new_v4(),
                &[ticket(flight, 1, 1), ticket(flight, 1, 2), ticket(flight, 5, 5)],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        // Only the seed booking's seat exists; tickets 1 and 2 did not stick.
        assert_eq!(seats.taken.lock().unwrap().len(), 1);
        assert_eq!(seats.orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_seat_twice_in_one_order_conflicts() {
        // The second insert of the pair hits the uniqueness constraint even
        // though the seat was free when the order started; nothing persists.
        let (service, flight, seats) = service_with_flight(10, 6);

        let err = service
            .place_order(Uuid::new_v4(), &[ticket(flight, 2, 2), ticket(flight, 2, 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(seats.taken.lock().unwrap().is_empty());
        assert!(seats.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn availability_is_capacity_minus_booked() {
        let (service, flight, _seats) = service_with_flight(10, 10);

        assert_eq!(service.tickets_available(flight).await.unwrap(), 100);

        service
            .place_order(
                Uuid::new_v4(),
                &[ticket(flight, 1, 1), ticket(flight, 1, 2), ticket(flight, 1, 3)],
            )
            .await
            .unwrap();

        assert_eq!(service.tickets_available(flight).await.unwrap(), 97);
    }
}
