use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::models::Airplane;
use skyport_store::fleet_repo::{AirplaneFilter, AirplaneRecord};
use uuid::Uuid;

use crate::error::AppError;
use crate::media;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirplaneQuery {
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub airplane_type: Option<String>,
    /// Upper bound on total seats.
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AirplaneWrite {
    pub name: String,
    pub airplane_type_id: Uuid,
    pub rows: i32,
    pub seats_in_row: i32,
}

/// Write-side echo: the type stays an identifier.
#[derive(Debug, Serialize)]
pub struct AirplaneWriteResponse {
    pub id: Uuid,
    pub name: String,
    pub airplane_type_id: Uuid,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i32,
    pub image: Option<String>,
}

/// List/detail view: type resolved to its name.
#[derive(Debug, Serialize)]
pub struct AirplaneResponse {
    pub id: Uuid,
    pub name: String,
    pub airplane_type: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: Uuid,
    pub image: String,
}

impl From<Airplane> for AirplaneWriteResponse {
    fn from(a: Airplane) -> Self {
        let capacity = a.capacity();
        Self {
            id: a.id,
            name: a.name,
            airplane_type_id: a.airplane_type_id,
            rows: a.rows,
            seats_in_row: a.seats_in_row,
            capacity,
            image: a.image,
        }
    }
}

impl From<AirplaneRecord> for AirplaneResponse {
    fn from(a: AirplaneRecord) -> Self {
        Self {
            id: a.id,
            name: a.name,
            airplane_type: a.airplane_type,
            rows: a.rows,
            seats_in_row: a.seats_in_row,
            capacity: a.capacity,
            image: a.image,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/airplanes", get(list_airplanes).post(create_airplane))
        .route(
            "/airplanes/{id}",
            get(get_airplane).put(update_airplane).delete(delete_airplane),
        )
        .route("/airplanes/{id}/upload-image", post(upload_image))
}

/// GET /api/service/airplanes
async fn list_airplanes(
    State(state): State<AppState>,
    Query(query): Query<AirplaneQuery>,
) -> Result<Json<Vec<AirplaneResponse>>, AppError> {
    let filter = AirplaneFilter {
        name: query.name.as_deref(),
        airplane_type: query.airplane_type.as_deref(),
        capacity: query.capacity,
    };
    let airplanes = state.fleet.list_airplanes(filter).await?;
    Ok(Json(airplanes.into_iter().map(Into::into).collect()))
}

/// GET /api/service/airplanes/{id}
async fn get_airplane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AirplaneResponse>, AppError> {
    let airplane = state
        .fleet
        .get_airplane(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("airplane {id} does not exist")))?;
    Ok(Json(airplane.into()))
}

/// POST /api/service/airplanes
async fn create_airplane(
    State(state): State<AppState>,
    Json(req): Json<AirplaneWrite>,
) -> Result<(StatusCode, Json<AirplaneWriteResponse>), AppError> {
    validate_geometry(&req)?;
    let airplane = state
        .fleet
        .create_airplane(&req.name, req.airplane_type_id, req.rows, req.seats_in_row)
        .await?;
    Ok((StatusCode::CREATED, Json(airplane.into())))
}

/// PUT /api/service/airplanes/{id}
async fn update_airplane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirplaneWrite>,
) -> Result<Json<AirplaneWriteResponse>, AppError> {
    validate_geometry(&req)?;
    let airplane = state
        .fleet
        .update_airplane(id, &req.name, req.airplane_type_id, req.rows, req.seats_in_row)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("airplane {id} does not exist")))?;
    Ok(Json(airplane.into()))
}

/// DELETE /api/service/airplanes/{id}
async fn delete_airplane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.fleet.delete_airplane(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("airplane {id} does not exist")))
    }
}

/// POST /api/service/airplanes/{id}/upload-image
///
/// Multipart form with a single "image" part. The file lands under the media
/// root and the relative path is stored on the airplane row.
async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ImageResponse>, AppError> {
    // 1. The airplane must exist before we touch the filesystem.
    if state.fleet.get_airplane(id).await?.is_none() {
        return Err(AppError::NotFoundError(format!("airplane {id} does not exist")));
    }

    // 2. Pull the image part out of the form.
    let mut stored: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::ValidationError("image part has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(format!("failed to read image: {e}")))?;
        stored = Some(media::store_airplane_image(&state.media_root, id, &filename, &data).await?);
        break;
    }

    let image = stored
        .ok_or_else(|| AppError::ValidationError("missing \"image\" form field".to_string()))?;

    // 3. Persist the reference.
    if !state.fleet.set_airplane_image(id, &image).await? {
        return Err(AppError::NotFoundError(format!("airplane {id} does not exist")));
    }

    Ok(Json(ImageResponse { id, image }))
}

fn validate_geometry(req: &AirplaneWrite) -> Result<(), AppError> {
    if req.rows < 1 {
        return Err(AppError::ValidationError(format!(
            "rows must be at least 1, got {}",
            req.rows
        )));
    }
    if req.seats_in_row < 1 {
        return Err(AppError::ValidationError(format!(
            "seats_in_row must be at least 1, got {}",
            req.seats_in_row
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_rejects_non_positive_dimensions() {
        let base = AirplaneWrite {
            name: "Falcon".to_string(),
            airplane_type_id: Uuid::new_v4(),
            rows: 10,
            seats_in_row: 6,
        };
        assert!(validate_geometry(&base).is_ok());

        let no_rows = AirplaneWrite { rows: 0, ..base };
        assert!(matches!(
            validate_geometry(&no_rows),
            Err(AppError::ValidationError(_))
        ));

        let no_seats = AirplaneWrite { rows: 10, seats_in_row: -1, ..no_rows };
        assert!(matches!(
            validate_geometry(&no_seats),
            Err(AppError::ValidationError(_))
        ));
    }
}
