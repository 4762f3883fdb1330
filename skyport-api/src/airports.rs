use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_store::reference_repo::AirportRecord;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub name: Option<String>,
    /// Substring match against the closest city's name.
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AirportWrite {
    pub name: String,
    pub closest_city_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AirportWriteResponse {
    pub id: Uuid,
    pub name: String,
    pub closest_city_id: Uuid,
}

/// List/detail view: closest city resolved to its name.
#[derive(Debug, Serialize)]
pub struct AirportResponse {
    pub id: Uuid,
    pub name: String,
    pub closest_city: String,
}

impl From<AirportRecord> for AirportResponse {
    fn from(a: AirportRecord) -> Self {
        Self { id: a.id, name: a.name, closest_city: a.closest_city }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/airports", get(list_airports).post(create_airport))
        .route("/airports/{id}", get(get_airport).put(update_airport).delete(delete_airport))
}

/// GET /api/service/airports
async fn list_airports(
    State(state): State<AppState>,
    Query(query): Query<AirportQuery>,
) -> Result<Json<Vec<AirportResponse>>, AppError> {
    let airports = state
        .reference
        .list_airports(query.name.as_deref(), query.city.as_deref())
        .await?;
    Ok(Json(airports.into_iter().map(Into::into).collect()))
}

/// GET /api/service/airports/{id}
async fn get_airport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AirportResponse>, AppError> {
    let airport = state
        .reference
        .get_airport(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("airport {id} does not exist")))?;
    Ok(Json(airport.into()))
}

/// POST /api/service/airports
async fn create_airport(
    State(state): State<AppState>,
    Json(req): Json<AirportWrite>,
) -> Result<(StatusCode, Json<AirportWriteResponse>), AppError> {
    let id = state.reference.create_airport(&req.name, req.closest_city_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(AirportWriteResponse { id, name: req.name, closest_city_id: req.closest_city_id }),
    ))
}

/// PUT /api/service/airports/{id}
async fn update_airport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirportWrite>,
) -> Result<Json<AirportWriteResponse>, AppError> {
    if !state.reference.update_airport(id, &req.name, req.closest_city_id).await? {
        return Err(AppError::NotFoundError(format!("airport {id} does not exist")));
    }
    Ok(Json(AirportWriteResponse { id, name: req.name, closest_city_id: req.closest_city_id }))
}

/// DELETE /api/service/airports/{id}
async fn delete_airport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reference.delete_airport(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("airport {id} does not exist")))
    }
}
