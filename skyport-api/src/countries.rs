use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::models::Country;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    /// Case-insensitive substring filter.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountryWrite {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Country> for CountryResponse {
    fn from(c: Country) -> Self {
        Self { id: c.id, name: c.name }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries).post(create_country))
        .route(
            "/countries/{id}",
            get(get_country).put(update_country).delete(delete_country),
        )
}

/// GET /api/service/countries
async fn list_countries(
    State(state): State<AppState>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<Vec<CountryResponse>>, AppError> {
    let countries = state.reference.list_countries(query.name.as_deref()).await?;
    Ok(Json(countries.into_iter().map(Into::into).collect()))
}

/// GET /api/service/countries/{id}
async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CountryResponse>, AppError> {
    let country = state
        .reference
        .get_country(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("country {id} does not exist")))?;
    Ok(Json(country.into()))
}

/// POST /api/service/countries
async fn create_country(
    State(state): State<AppState>,
    Json(req): Json<CountryWrite>,
) -> Result<(StatusCode, Json<CountryResponse>), AppError> {
    let country = state.reference.create_country(&req.name).await?;
    Ok((StatusCode::CREATED, Json(country.into())))
}

/// PUT /api/service/countries/{id}
async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CountryWrite>,
) -> Result<Json<CountryResponse>, AppError> {
    let country = state
        .reference
        .update_country(id, &req.name)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("country {id} does not exist")))?;
    Ok(Json(country.into()))
}

/// DELETE /api/service/countries/{id}
async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reference.delete_country(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("country {id} does not exist")))
    }
}
