use skyport_core::models::Route;
use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_db_err;

/// Directed airport pairs. Listing resolves each endpoint to the name of the
/// airport's closest city; writes accept airport identifiers only.
pub struct RouteRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    source_id: Uuid,
    destination_id: Uuid,
    distance: i32,
}

impl From<RouteRow> for Route {
    fn from(r: RouteRow) -> Self {
        Route {
            id: r.id,
            source_id: r.source_id,
            destination_id: r.destination_id,
            distance: r.distance,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteRecord {
    pub id: Uuid,
    pub distance: i32,
    pub source: String,
    pub destination: String,
}

const ROUTE_SELECT: &str = "SELECT r.id, r.distance, sc.name AS source, dc.name AS destination \
     FROM routes r \
     JOIN airports s ON r.source_id = s.id \
     JOIN cities sc ON s.closest_city_id = sc.id \
     JOIN airports d ON r.destination_id = d.id \
     JOIN cities dc ON d.closest_city_id = dc.id";

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_routes(
        &self,
        source_city: Option<&str>,
        destination_city: Option<&str>,
    ) -> Result<Vec<RouteRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(ROUTE_SELECT);
        qb.push(" WHERE 1=1");
        if let Some(source_city) = source_city {
            qb.push(" AND sc.name ILIKE '%' || ").push_bind(source_city).push(" || '%'");
        }
        if let Some(destination_city) = destination_city {
            qb.push(" AND dc.name ILIKE '%' || ").push_bind(destination_city).push(" || '%'");
        }
        qb.push(" ORDER BY sc.name, dc.name");

        qb.build_query_as().fetch_all(&self.pool).await.map_err(map_db_err)
    }

    pub async fn get_route(&self, id: Uuid) -> Result<Option<RouteRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(ROUTE_SELECT);
        qb.push(" WHERE r.id = ").push_bind(id);
        qb.build_query_as().fetch_optional(&self.pool).await.map_err(map_db_err)
    }

    pub async fn create_route(
        &self,
        source_id: Uuid,
        destination_id: Uuid,
        distance: i32,
    ) -> Result<Route, DomainError> {
        let row: RouteRow = sqlx::query_as(
            "INSERT INTO routes (source_id, destination_id, distance) VALUES ($1, $2, $3) \
             RETURNING id, source_id, destination_id, distance",
        )
        .bind(source_id)
        .bind(destination_id)
        .bind(distance)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.into())
    }

    pub async fn update_route(
        &self,
        id: Uuid,
        source_id: Uuid,
        destination_id: Uuid,
        distance: i32,
    ) -> Result<Option<Route>, DomainError> {
        let row: Option<RouteRow> = sqlx::query_as(
            "UPDATE routes SET source_id = $1, destination_id = $2, distance = $3 WHERE id = $4 \
             RETURNING id, source_id, destination_id, distance",
        )
        .bind(source_id)
        .bind(destination_id)
        .bind(distance)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    pub async fn delete_route(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
