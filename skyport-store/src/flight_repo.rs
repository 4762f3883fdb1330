use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use skyport_core::models::Flight;
use skyport_core::repository::FlightRepository;
use skyport_core::seating::SeatGeometry;
use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::fleet_repo::AirplaneRecord;
use crate::map_db_err;
use crate::route_repo::RouteRecord;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

/// List projection: route as "Source - Destination" city pair, airplane by
/// name, crew by full name, availability computed per query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FlightListRecord {
    pub id: Uuid,
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<String>,
    pub tickets_available: i64,
}

/// Detail projection: fully nested airplane and route views.
#[derive(Debug, Clone)]
pub struct FlightDetailRecord {
    pub id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub airplane: AirplaneRecord,
    pub route: RouteRecord,
    pub crew: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct FlightDetailRow {
    id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    airplane_id: Uuid,
    airplane_name: String,
    airplane_type: String,
    rows: i32,
    seats_in_row: i32,
    capacity: i32,
    image: Option<String>,
    route_id: Uuid,
    distance: i32,
    source: String,
    destination: String,
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    route_id: Uuid,
    airplane_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
}

impl From<FlightRow> for Flight {
    fn from(r: FlightRow) -> Self {
        Flight {
            id: r.id,
            route_id: r.route_id,
            airplane_id: r.airplane_id,
            departure_time: r.departure_time,
            arrival_time: r.arrival_time,
        }
    }
}

#[derive(Debug, Default)]
pub struct FlightFilter<'a> {
    pub dep_date: Option<NaiveDate>,
    pub dep_hour: Option<i32>,
    pub dep_minute: Option<i32>,
    pub arr_date: Option<NaiveDate>,
    pub arr_hour: Option<i32>,
    pub arr_minute: Option<i32>,
    pub source_city: Option<&'a str>,
    pub destination_city: Option<&'a str>,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_flights(
        &self,
        filter: FlightFilter<'_>,
    ) -> Result<Vec<FlightListRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT f.id, \
             sc.name || ' - ' || dc.name AS route, \
             a.name AS airplane, \
             f.departure_time, f.arrival_time, \
             COALESCE(ARRAY_AGG(cr.first_name || ' ' || cr.last_name ORDER BY cr.last_name) \
                 FILTER (WHERE cr.id IS NOT NULL), ARRAY[]::TEXT[]) AS crew, \
             a.rows * a.seats_in_row \
                 - (SELECT COUNT(*) FROM tickets t WHERE t.flight_id = f.id) AS tickets_available \
             FROM flights f \
             JOIN routes r ON f.route_id = r.id \
             JOIN airports s ON r.source_id = s.id \
             JOIN cities sc ON s.closest_city_id = sc.id \
             JOIN airports d ON r.destination_id = d.id \
             JOIN cities dc ON d.closest_city_id = dc.id \
             JOIN airplanes a ON f.airplane_id = a.id \
             LEFT JOIN flight_crews fc ON fc.flight_id = f.id \
             LEFT JOIN crews cr ON cr.id = fc.crew_id \
             WHERE 1=1",
        );

        if let Some(dep_date) = filter.dep_date {
            qb.push(" AND f.departure_time::date = ").push_bind(dep_date);
        }
        if let Some(dep_hour) = filter.dep_hour {
            qb.push(" AND EXTRACT(HOUR FROM f.departure_time) = ").push_bind(dep_hour);
        }
        if let Some(dep_minute) = filter.dep_minute {
            qb.push(" AND EXTRACT(MINUTE FROM f.departure_time) = ").push_bind(dep_minute);
        }
        if let Some(arr_date) = filter.arr_date {
            qb.push(" AND f.arrival_time::date = ").push_bind(arr_date);
        }
        if let Some(arr_hour) = filter.arr_hour {
            qb.push(" AND EXTRACT(HOUR FROM f.arrival_time) = ").push_bind(arr_hour);
        }
        if let Some(arr_minute) = filter.arr_minute {
            qb.push(" AND EXTRACT(MINUTE FROM f.arrival_time) = ").push_bind(arr_minute);
        }
        if let Some(source_city) = filter.source_city {
            qb.push(" AND sc.name ILIKE '%' || ").push_bind(source_city).push(" || '%'");
        }
        if let Some(destination_city) = filter.destination_city {
            qb.push(" AND dc.name ILIKE '%' || ").push_bind(destination_city).push(" || '%'");
        }

        qb.push(
            " GROUP BY f.id, sc.name, dc.name, a.name, a.rows, a.seats_in_row \
             ORDER BY f.departure_time",
        );

        qb.build_query_as().fetch_all(&self.pool).await.map_err(map_db_err)
    }

    pub async fn get_flight(&self, id: Uuid) -> Result<Option<FlightDetailRecord>, DomainError> {
        let row: Option<FlightDetailRow> = sqlx::query_as(
            "SELECT f.id, f.departure_time, f.arrival_time, \
             a.id AS airplane_id, a.name AS airplane_name, t.name AS airplane_type, \
             a.rows, a.seats_in_row, a.rows * a.seats_in_row AS capacity, a.image, \
             r.id AS route_id, r.distance, sc.name AS source, dc.name AS destination \
             FROM flights f \
             JOIN airplanes a ON f.airplane_id = a.id \
             JOIN airplane_types t ON a.airplane_type_id = t.id \
             JOIN routes r ON f.route_id = r.id \
             JOIN airports s ON r.source_id = s.id \
             JOIN cities sc ON s.closest_city_id = sc.id \
             JOIN airports d ON r.destination_id = d.id \
             JOIN cities dc ON d.closest_city_id = dc.id \
             WHERE f.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        let Some(row) = row else { return Ok(None) };

        let crew: Vec<String> = sqlx::query_scalar(
            "SELECT cr.first_name || ' ' || cr.last_name \
             FROM flight_crews fc JOIN crews cr ON cr.id = fc.crew_id \
             WHERE fc.flight_id = $1 ORDER BY cr.last_name, cr.first_name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Some(FlightDetailRecord {
            id: row.id,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            airplane: AirplaneRecord {
                id: row.airplane_id,
                name: row.airplane_name,
                airplane_type: row.airplane_type,
                rows: row.rows,
                seats_in_row: row.seats_in_row,
                capacity: row.capacity,
                image: row.image,
            },
            route: RouteRecord {
                id: row.route_id,
                distance: row.distance,
                source: row.source,
                destination: row.destination,
            },
            crew,
        }))
    }

    pub async fn create_flight(
        &self,
        route_id: Uuid,
        airplane_id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        crew_ids: &[Uuid],
    ) -> Result<Flight, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        let row: FlightRow = sqlx::query_as(
            "INSERT INTO flights (route_id, airplane_id, departure_time, arrival_time) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, route_id, airplane_id, departure_time, arrival_time",
        )
        .bind(route_id)
        .bind(airplane_id)
        .bind(departure_time)
        .bind(arrival_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_err)?;

        for crew_id in crew_ids {
            sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(crew_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(row.into())
    }

    pub async fn update_flight(
        &self,
        id: Uuid,
        route_id: Uuid,
        airplane_id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        crew_ids: &[Uuid],
    ) -> Result<Option<Flight>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        let row: Option<FlightRow> = sqlx::query_as(
            "UPDATE flights \
             SET route_id = $1, airplane_id = $2, departure_time = $3, arrival_time = $4 \
             WHERE id = $5 \
             RETURNING id, route_id, airplane_id, departure_time, arrival_time",
        )
        .bind(route_id)
        .bind(airplane_id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_err)?;

        let Some(row) = row else { return Ok(None) };

        // Replace the crew set wholesale.
        sqlx::query("DELETE FROM flight_crews WHERE flight_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;
        for crew_id in crew_ids {
            sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES ($1, $2)")
                .bind(id)
                .bind(crew_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(Some(row.into()))
    }

    pub async fn delete_flight(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn seat_geometry(&self, flight_id: Uuid) -> Result<Option<SeatGeometry>, DomainError> {
        let row: Option<(i32, i32)> = sqlx::query_as(
            "SELECT a.rows, a.seats_in_row \
             FROM flights f JOIN airplanes a ON f.airplane_id = a.id WHERE f.id = $1",
        )
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(|(rows, seats_in_row)| SeatGeometry { rows, seats_in_row }))
    }

    async fn booked_seats(&self, flight_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE flight_id = $1")
            .bind(flight_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
