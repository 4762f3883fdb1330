use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::models::City;
use skyport_store::reference_repo::CityRecord;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city_name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityWrite {
    pub name: String,
    pub population: i32,
    pub country_id: Uuid,
}

/// Write-side echo: the country stays an identifier.
#[derive(Debug, Serialize)]
pub struct CityWriteResponse {
    pub id: Uuid,
    pub name: String,
    pub population: i32,
    pub country_id: Uuid,
}

/// List/detail view: country resolved to its name.
#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub id: Uuid,
    pub name: String,
    pub population: i32,
    pub country: String,
}

impl From<City> for CityWriteResponse {
    fn from(c: City) -> Self {
        Self { id: c.id, name: c.name, population: c.population, country_id: c.country_id }
    }
}

impl From<CityRecord> for CityResponse {
    fn from(c: CityRecord) -> Self {
        Self { id: c.id, name: c.name, population: c.population, country: c.country }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities).post(create_city))
        .route("/cities/{id}", get(get_city).put(update_city).delete(delete_city))
}

/// GET /api/service/cities
async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<CityResponse>>, AppError> {
    let cities = state
        .reference
        .list_cities(query.city_name.as_deref(), query.country.as_deref())
        .await?;
    Ok(Json(cities.into_iter().map(Into::into).collect()))
}

/// GET /api/service/cities/{id}
async fn get_city(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CityResponse>, AppError> {
    let city = state
        .reference
        .get_city(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("city {id} does not exist")))?;
    Ok(Json(city.into()))
}

/// POST /api/service/cities
async fn create_city(
    State(state): State<AppState>,
    Json(req): Json<CityWrite>,
) -> Result<(StatusCode, Json<CityWriteResponse>), AppError> {
    let city = state
        .reference
        .create_city(&req.name, req.population, req.country_id)
        .await?;
    Ok((StatusCode::CREATED, Json(city.into())))
}

/// PUT /api/service/cities/{id}
async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CityWrite>,
) -> Result<Json<CityWriteResponse>, AppError> {
    let city = state
        .reference
        .update_city(id, &req.name, req.population, req.country_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("city {id} does not exist")))?;
    Ok(Json(city.into()))
}

/// DELETE /api/service/cities/{id}
async fn delete_city(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reference.delete_city(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("city {id} does not exist")))
    }
}
