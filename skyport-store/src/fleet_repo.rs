use skyport_core::models::Airplane;
use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_db_err;

/// Airplanes: seating geometry plus the optional image reference.
pub struct FleetRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct AirplaneRow {
    id: Uuid,
    name: String,
    airplane_type_id: Uuid,
    rows: i32,
    seats_in_row: i32,
    image: Option<String>,
}

impl From<AirplaneRow> for Airplane {
    fn from(r: AirplaneRow) -> Self {
        Airplane {
            id: r.id,
            name: r.name,
            airplane_type_id: r.airplane_type_id,
            rows: r.rows,
            seats_in_row: r.seats_in_row,
            image: r.image,
        }
    }
}

/// List/detail projection: type resolved to its name, capacity precomputed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AirplaneRecord {
    pub id: Uuid,
    pub name: String,
    pub airplane_type: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i32,
    pub image: Option<String>,
}

pub struct AirplaneFilter<'a> {
    pub name: Option<&'a str>,
    pub airplane_type: Option<&'a str>,
    /// Upper bound on rows * seats_in_row.
    pub capacity: Option<i32>,
}

impl FleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_airplanes(
        &self,
        filter: AirplaneFilter<'_>,
    ) -> Result<Vec<AirplaneRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT a.id, a.name, t.name AS airplane_type, a.rows, a.seats_in_row, \
             a.rows * a.seats_in_row AS capacity, a.image \
             FROM airplanes a JOIN airplane_types t ON a.airplane_type_id = t.id WHERE 1=1",
        );
        if let Some(name) = filter.name {
            qb.push(" AND a.name ILIKE '%' || ").push_bind(name).push(" || '%'");
        }
        if let Some(airplane_type) = filter.airplane_type {
            qb.push(" AND t.name ILIKE '%' || ").push_bind(airplane_type).push(" || '%'");
        }
        if let Some(capacity) = filter.capacity {
            qb.push(" AND a.rows * a.seats_in_row <= ").push_bind(capacity);
        }
        qb.push(" ORDER BY a.name");

        qb.build_query_as().fetch_all(&self.pool).await.map_err(map_db_err)
    }

    pub async fn get_airplane(&self, id: Uuid) -> Result<Option<AirplaneRecord>, DomainError> {
        sqlx::query_as(
            "SELECT a.id, a.name, t.name AS airplane_type, a.rows, a.seats_in_row, \
             a.rows * a.seats_in_row AS capacity, a.image \
             FROM airplanes a JOIN airplane_types t ON a.airplane_type_id = t.id WHERE a.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create_airplane(
        &self,
        name: &str,
        airplane_type_id: Uuid,
        rows: i32,
        seats_in_row: i32,
    ) -> Result<Airplane, DomainError> {
        let row: AirplaneRow = sqlx::query_as(
            "INSERT INTO airplanes (name, airplane_type_id, rows, seats_in_row) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, airplane_type_id, rows, seats_in_row, image",
        )
        .bind(name)
        .bind(airplane_type_id)
        .bind(rows)
        .bind(seats_in_row)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.into())
    }

    pub async fn update_airplane(
        &self,
        id: Uuid,
        name: &str,
        airplane_type_id: Uuid,
        rows: i32,
        seats_in_row: i32,
    ) -> Result<Option<Airplane>, DomainError> {
        let row: Option<AirplaneRow> = sqlx::query_as(
            "UPDATE airplanes SET name = $1, airplane_type_id = $2, rows = $3, seats_in_row = $4 \
             WHERE id = $5 \
             RETURNING id, name, airplane_type_id, rows, seats_in_row, image",
        )
        .bind(name)
        .bind(airplane_type_id)
        .bind(rows)
        .bind(seats_in_row)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    /// Record the media reference produced by an image upload.
    pub async fn set_airplane_image(&self, id: Uuid, image: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE airplanes SET image = $1 WHERE id = $2")
            .bind(image)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_airplane(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM airplanes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
