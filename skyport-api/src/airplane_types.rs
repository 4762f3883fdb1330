use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::models::AirplaneType;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirplaneTypeQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AirplaneTypeWrite {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AirplaneTypeResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<AirplaneType> for AirplaneTypeResponse {
    fn from(t: AirplaneType) -> Self {
        Self { id: t.id, name: t.name }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/airplane-types", get(list_airplane_types).post(create_airplane_type))
        .route(
            "/airplane-types/{id}",
            get(get_airplane_type).put(update_airplane_type).delete(delete_airplane_type),
        )
}

/// GET /api/service/airplane-types
async fn list_airplane_types(
    State(state): State<AppState>,
    Query(query): Query<AirplaneTypeQuery>,
) -> Result<Json<Vec<AirplaneTypeResponse>>, AppError> {
    let types = state.reference.list_airplane_types(query.name.as_deref()).await?;
    Ok(Json(types.into_iter().map(Into::into).collect()))
}

/// GET /api/service/airplane-types/{id}
async fn get_airplane_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AirplaneTypeResponse>, AppError> {
    let airplane_type = state
        .reference
        .get_airplane_type(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("airplane type {id} does not exist")))?;
    Ok(Json(airplane_type.into()))
}

/// POST /api/service/airplane-types
async fn create_airplane_type(
    State(state): State<AppState>,
    Json(req): Json<AirplaneTypeWrite>,
) -> Result<(StatusCode, Json<AirplaneTypeResponse>), AppError> {
    let airplane_type = state.reference.create_airplane_type(&req.name).await?;
    Ok((StatusCode::CREATED, Json(airplane_type.into())))
}

/// PUT /api/service/airplane-types/{id}
async fn update_airplane_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirplaneTypeWrite>,
) -> Result<Json<AirplaneTypeResponse>, AppError> {
    let airplane_type = state
        .reference
        .update_airplane_type(id, &req.name)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("airplane type {id} does not exist")))?;
    Ok(Json(airplane_type.into()))
}

/// DELETE /api/service/airplane-types/{id}
async fn delete_airplane_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reference.delete_airplane_type(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("airplane type {id} does not exist")))
    }
}
