use skyport_core::models::{AirplaneType, City, Country, Crew};
use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_db_err;

/// Lookup entities with no invariants beyond referential existence:
/// countries, cities, airplane types, airports and crew members.
pub struct ReferenceRepository {
    pool: PgPool,
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    name: String,
}

#[derive(sqlx::FromRow)]
struct AirplaneTypeRow {
    id: Uuid,
    name: String,
}

#[derive(sqlx::FromRow)]
struct CityRow {
    id: Uuid,
    name: String,
    population: i32,
    country_id: Uuid,
}

/// List/detail projection of a city: the parent country resolved to its name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CityRecord {
    pub id: Uuid,
    pub name: String,
    pub population: i32,
    pub country: String,
}

#[derive(sqlx::FromRow)]
struct CrewRow {
    id: Uuid,
    first_name: String,
    last_name: String,
}

/// List/detail projection of an airport: closest city resolved to its name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AirportRecord {
    pub id: Uuid,
    pub name: String,
    pub closest_city: String,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Countries
    // ------------------------------------------------------------------

    pub async fn list_countries(&self, name: Option<&str>) -> Result<Vec<Country>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, name FROM countries WHERE 1=1",
        );
        if let Some(name) = name {
            qb.push(" AND name ILIKE '%' || ").push_bind(name).push(" || '%'");
        }
        qb.push(" ORDER BY name");

        let rows: Vec<CountryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(|r| Country { id: r.id, name: r.name }).collect())
    }

    pub async fn get_country(&self, id: Uuid) -> Result<Option<Country>, DomainError> {
        let row: Option<CountryRow> =
            sqlx::query_as("SELECT id, name FROM countries WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(row.map(|r| Country { id: r.id, name: r.name }))
    }

    pub async fn create_country(&self, name: &str) -> Result<Country, DomainError> {
        let row: CountryRow =
            sqlx::query_as("INSERT INTO countries (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(Country { id: row.id, name: row.name })
    }

    pub async fn update_country(&self, id: Uuid, name: &str) -> Result<Option<Country>, DomainError> {
        let row: Option<CountryRow> =
            sqlx::query_as("UPDATE countries SET name = $1 WHERE id = $2 RETURNING id, name")
                .bind(name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(row.map(|r| Country { id: r.id, name: r.name }))
    }

    pub async fn delete_country(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM countries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Cities
    // ------------------------------------------------------------------

    pub async fn list_cities(
        &self,
        city_name: Option<&str>,
        country: Option<&str>,
    ) -> Result<Vec<CityRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT c.id, c.name, c.population, co.name AS country \
             FROM cities c JOIN countries co ON c.country_id = co.id WHERE 1=1",
        );
        if let Some(city_name) = city_name {
            qb.push(" AND c.name ILIKE '%' || ").push_bind(city_name).push(" || '%'");
        }
        if let Some(country) = country {
            qb.push(" AND co.name ILIKE '%' || ").push_bind(country).push(" || '%'");
        }
        qb.push(" ORDER BY c.name");

        qb.build_query_as().fetch_all(&self.pool).await.map_err(map_db_err)
    }

    pub async fn get_city(&self, id: Uuid) -> Result<Option<CityRecord>, DomainError> {
        sqlx::query_as(
            "SELECT c.id, c.name, c.population, co.name AS country \
             FROM cities c JOIN countries co ON c.country_id = co.id WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create_city(
        &self,
        name: &str,
        population: i32,
        country_id: Uuid,
    ) -> Result<City, DomainError> {
        let row: CityRow = sqlx::query_as(
            "INSERT INTO cities (name, population, country_id) VALUES ($1, $2, $3) \
             RETURNING id, name, population, country_id",
        )
        .bind(name)
        .bind(population)
        .bind(country_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(City {
            id: row.id,
            name: row.name,
            population: row.population,
            country_id: row.country_id,
        })
    }

    pub async fn update_city(
        &self,
        id: Uuid,
        name: &str,
        population: i32,
        country_id: Uuid,
    ) -> Result<Option<City>, DomainError> {
        let row: Option<CityRow> = sqlx::query_as(
            "UPDATE cities SET name = $1, population = $2, country_id = $3 WHERE id = $4 \
             RETURNING id, name, population, country_id",
        )
        .bind(name)
        .bind(population)
        .bind(country_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(|r| City {
            id: r.id,
            name: r.name,
            population: r.population,
            country_id: r.country_id,
        }))
    }

    pub async fn delete_city(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Airplane types
    // ------------------------------------------------------------------

    pub async fn list_airplane_types(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<AirplaneType>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, name FROM airplane_types WHERE 1=1",
        );
        if let Some(name) = name {
            qb.push(" AND name ILIKE '%' || ").push_bind(name).push(" || '%'");
        }
        qb.push(" ORDER BY name");

        let rows: Vec<AirplaneTypeRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(|r| AirplaneType { id: r.id, name: r.name }).collect())
    }

    pub async fn get_airplane_type(&self, id: Uuid) -> Result<Option<AirplaneType>, DomainError> {
        let row: Option<AirplaneTypeRow> =
            sqlx::query_as("SELECT id, name FROM airplane_types WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(row.map(|r| AirplaneType { id: r.id, name: r.name }))
    }

    pub async fn create_airplane_type(&self, name: &str) -> Result<AirplaneType, DomainError> {
        let row: AirplaneTypeRow =
            sqlx::query_as("INSERT INTO airplane_types (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(AirplaneType { id: row.id, name: row.name })
    }

    pub async fn update_airplane_type(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<AirplaneType>, DomainError> {
        let row: Option<AirplaneTypeRow> = sqlx::query_as(
            "UPDATE airplane_types SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(|r| AirplaneType { id: r.id, name: r.name }))
    }

    pub async fn delete_airplane_type(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM airplane_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Airports
    // ------------------------------------------------------------------

    pub async fn list_airports(
        &self,
        name: Option<&str>,
        city: Option<&str>,
    ) -> Result<Vec<AirportRecord>, DomainError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT a.id, a.name, c.name AS closest_city \
             FROM airports a JOIN cities c ON a.closest_city_id = c.id WHERE 1=1",
        );
        if let Some(name) = name {
            qb.push(" AND a.name ILIKE '%' || ").push_bind(name).push(" || '%'");
        }
        if let Some(city) = city {
            qb.push(" AND c.name ILIKE '%' || ").push_bind(city).push(" || '%'");
        }
        qb.push(" ORDER BY a.name");

        qb.build_query_as().fetch_all(&self.pool).await.map_err(map_db_err)
    }

    pub async fn get_airport(&self, id: Uuid) -> Result<Option<AirportRecord>, DomainError> {
        sqlx::query_as(
            "SELECT a.id, a.name, c.name AS closest_city \
             FROM airports a JOIN cities c ON a.closest_city_id = c.id WHERE a.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create_airport(
        &self,
        name: &str,
        closest_city_id: Uuid,
    ) -> Result<Uuid, DomainError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO airports (name, closest_city_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(closest_city_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(id)
    }

    pub async fn update_airport(
        &self,
        id: Uuid,
        name: &str,
        closest_city_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result =
            sqlx::query("UPDATE airports SET name = $1, closest_city_id = $2 WHERE id = $3")
                .bind(name)
                .bind(closest_city_id)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_airport(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM airports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Crews
    // ------------------------------------------------------------------

    pub async fn list_crews(&self) -> Result<Vec<Crew>, DomainError> {
        let rows: Vec<CrewRow> = sqlx::query_as(
            "SELECT id, first_name, last_name FROM crews ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(rows
            .into_iter()
            .map(|r| Crew { id: r.id, first_name: r.first_name, last_name: r.last_name })
            .collect())
    }

    pub async fn get_crew(&self, id: Uuid) -> Result<Option<Crew>, DomainError> {
        let row: Option<CrewRow> =
            sqlx::query_as("SELECT id, first_name, last_name FROM crews WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(row.map(|r| Crew { id: r.id, first_name: r.first_name, last_name: r.last_name }))
    }

    pub async fn create_crew(&self, first_name: &str, last_name: &str) -> Result<Crew, DomainError> {
        let row: CrewRow = sqlx::query_as(
            "INSERT INTO crews (first_name, last_name) VALUES ($1, $2) \
             RETURNING id, first_name, last_name",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(Crew { id: row.id, first_name: row.first_name, last_name: row.last_name })
    }

    pub async fn update_crew(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Crew>, DomainError> {
        let row: Option<CrewRow> = sqlx::query_as(
            "UPDATE crews SET first_name = $1, last_name = $2 WHERE id = $3 \
             RETURNING id, first_name, last_name",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(row.map(|r| Crew { id: r.id, first_name: r.first_name, last_name: r.last_name }))
    }

    pub async fn delete_crew(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM crews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
