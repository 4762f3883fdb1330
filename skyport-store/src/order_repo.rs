use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_core::booking::TicketRequest;
use skyport_core::models::Ticket;
use skyport_core::repository::OrderRepository;
use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_db_err;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

/// An order with its tickets, each carrying resolved flight context for
/// display.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketRecord>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketRecord {
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub flight_id: Uuid,
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TicketOwnerRow {
    id: Uuid,
    row: i32,
    seat: i32,
    flight_id: Uuid,
    order_id: Uuid,
    user_id: Uuid,
}

const TICKET_CONTEXT_SELECT: &str =
    "SELECT t.id, t.\"row\", t.seat, t.flight_id, \
     sc.name || ' - ' || dc.name AS route, \
     a.name AS airplane, f.departure_time, f.arrival_time \
     FROM tickets t \
     JOIN flights f ON t.flight_id = f.id \
     JOIN routes r ON f.route_id = r.id \
     JOIN airports s ON r.source_id = s.id \
     JOIN cities sc ON s.closest_city_id = sc.id \
     JOIN airports d ON r.destination_id = d.id \
     JOIN cities dc ON d.closest_city_id = dc.id \
     JOIN airplanes a ON f.airplane_id = a.id";

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<OrderRecord>, DomainError> {
        let order: Option<OrderRow> =
            sqlx::query_as("SELECT id, user_id, created_at FROM orders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        let Some(order) = order else { return Ok(None) };

        let tickets: Vec<TicketRecord> = sqlx::query_as(&format!(
            "{TICKET_CONTEXT_SELECT} WHERE t.order_id = $1 ORDER BY t.\"row\", t.seat"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Some(OrderRecord {
            id: order.id,
            user_id: order.user_id,
            created_at: order.created_at,
            tickets,
        }))
    }

    /// One page of a user's orders, newest first, plus the total count for
    /// the pagination envelope.
    pub async fn list_orders(
        &self,
        user_id: Uuid,
        page: i64,
        page_size: i64,
        source_city: Option<&str>,
        destination_city: Option<&str>,
    ) -> Result<(i64, Vec<OrderRecord>), DomainError> {
        let mut count_qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT COUNT(*) FROM orders o WHERE o.user_id = ",
        );
        count_qb.push_bind(user_id);
        push_route_filters(&mut count_qb, source_city, destination_city);
        let count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;

        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT o.id, o.user_id, o.created_at FROM orders o WHERE o.user_id = ",
        );
        qb.push_bind(user_id);
        push_route_filters(&mut qb, source_city, destination_city);
        qb.push(" ORDER BY o.created_at DESC LIMIT ")
            .push_bind(page_size)
            .push(" OFFSET ")
            .push_bind((page - 1) * page_size);

        let rows: Vec<OrderRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(order) = self.get_order(row.id).await? {
                orders.push(order);
            }
        }
        Ok((count, orders))
    }

    pub async fn delete_order(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Tickets (read-only; the only writer is create_order below)
    // ------------------------------------------------------------------

    pub async fn list_tickets(&self, user_id: Uuid) -> Result<Vec<Ticket>, DomainError> {
        let rows: Vec<TicketOwnerRow> = sqlx::query_as(
            "SELECT t.id, t.\"row\", t.seat, t.flight_id, t.order_id, o.user_id \
             FROM tickets t JOIN orders o ON t.order_id = o.id \
             WHERE o.user_id = $1 ORDER BY t.\"row\", t.seat",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(rows.into_iter().map(ticket_from_row).collect())
    }

    /// Fetch a ticket together with its owning user, so the caller can
    /// enforce the ownership check.
    pub async fn get_ticket(&self, id: Uuid) -> Result<Option<(Ticket, Uuid)>, DomainError> {
        let row: Option<TicketOwnerRow> = sqlx::query_as(
            "SELECT t.id, t.\"row\", t.seat, t.flight_id, t.order_id, o.user_id \
             FROM tickets t JOIN orders o ON t.order_id = o.id WHERE t.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(|r| {
            let user_id = r.user_id;
            (ticket_from_row(r), user_id)
        }))
    }
}

fn ticket_from_row(r: TicketOwnerRow) -> Ticket {
    Ticket {
        id: r.id,
        row: r.row,
        seat: r.seat,
        flight_id: r.flight_id,
        order_id: r.order_id,
    }
}

fn push_route_filters(
    qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>,
    source_city: Option<&str>,
    destination_city: Option<&str>,
) {
    if let Some(source_city) = source_city {
        qb.push(
            " AND EXISTS (SELECT 1 FROM tickets t \
             JOIN flights f ON t.flight_id = f.id \
             JOIN routes r ON f.route_id = r.id \
             JOIN airports s ON r.source_id = s.id \
             JOIN cities sc ON s.closest_city_id = sc.id \
             WHERE t.order_id = o.id AND sc.name ILIKE '%' || ",
        )
        .push_bind(source_city.to_owned())
        .push(" || '%')");
    }
    if let Some(destination_city) = destination_city {
        qb.push(
            " AND EXISTS (SELECT 1 FROM tickets t \
             JOIN flights f ON t.flight_id = f.id \
             JOIN routes r ON f.route_id = r.id \
             JOIN airports d ON r.destination_id = d.id \
             JOIN cities dc ON d.closest_city_id = dc.id \
             WHERE t.order_id = o.id AND dc.name ILIKE '%' || ",
        )
        .push_bind(destination_city.to_owned())
        .push(" || '%')");
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    /// Atomic multi-ticket booking. The order row and every ticket go in one
    /// transaction; a uniqueness violation on any ticket aborts the whole
    /// write, so no order and no tickets persist on failure.
    async fn create_order(
        &self,
        user_id: Uuid,
        tickets: &[TicketRequest],
    ) -> Result<Uuid, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        let (order_id,): (Uuid,) =
            sqlx::query_as("INSERT INTO orders (user_id) VALUES ($1) RETURNING id")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_err)?;

        for ticket in tickets {
            sqlx::query(
                "INSERT INTO tickets (\"row\", seat, flight_id, order_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(ticket.row)
            .bind(ticket.seat)
            .bind(ticket.flight_id)
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_ticket_err(e, ticket))?;
        }

        // Dropping the transaction on any error path above rolls it back.
        tx.commit().await.map_err(map_db_err)?;
        Ok(order_id)
    }
}

/// Constraint violations on a ticket insert get a message naming the seat the
/// caller asked for.
fn map_ticket_err(err: sqlx::Error, ticket: &TicketRequest) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        match db.code().as_deref() {
            Some("23505") => {
                return DomainError::Conflict(format!(
                    "seat {} in row {} is already taken on flight {}",
                    ticket.seat, ticket.row, ticket.flight_id
                ))
            }
            Some("23503") => {
                return DomainError::NotFound(format!(
                    "flight {} does not exist",
                    ticket.flight_id
                ))
            }
            _ => {}
        }
    }
    map_db_err(err)
}
