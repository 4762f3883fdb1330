use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::models::Crew;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CrewWrite {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct CrewResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<Crew> for CrewResponse {
    fn from(c: Crew) -> Self {
        let full_name = c.full_name();
        Self { id: c.id, first_name: c.first_name, last_name: c.last_name, full_name }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crews", get(list_crews).post(create_crew))
        .route("/crews/{id}", get(get_crew).put(update_crew).delete(delete_crew))
}

/// GET /api/service/crews
async fn list_crews(
    State(state): State<AppState>,
) -> Result<Json<Vec<CrewResponse>>, AppError> {
    let crews = state.reference.list_crews().await?;
    Ok(Json(crews.into_iter().map(Into::into).collect()))
}

/// GET /api/service/crews/{id}
async fn get_crew(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CrewResponse>, AppError> {
    let crew = state
        .reference
        .get_crew(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("crew member {id} does not exist")))?;
    Ok(Json(crew.into()))
}

/// POST /api/service/crews
async fn create_crew(
    State(state): State<AppState>,
    Json(req): Json<CrewWrite>,
) -> Result<(StatusCode, Json<CrewResponse>), AppError> {
    let crew = state.reference.create_crew(&req.first_name, &req.last_name).await?;
    Ok((StatusCode::CREATED, Json(crew.into())))
}

/// PUT /api/service/crews/{id}
async fn update_crew(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CrewWrite>,
) -> Result<Json<CrewResponse>, AppError> {
    let crew = state
        .reference
        .update_crew(id, &req.first_name, &req.last_name)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("crew member {id} does not exist")))?;
    Ok(Json(crew.into()))
}

/// DELETE /api/service/crews/{id}
async fn delete_crew(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reference.delete_crew(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("crew member {id} does not exist")))
    }
}
