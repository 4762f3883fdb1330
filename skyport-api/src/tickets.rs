use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use skyport_core::models::Ticket;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::{require_user, Claims};
use crate::state::AppState;

/// Tickets are read-only over HTTP. Booking one happens through an order, so
/// there is deliberately no POST route here.
#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub flight_id: Uuid,
    pub order_id: Uuid,
}

impl From<Ticket> for TicketDetailResponse {
    fn from(t: Ticket) -> Self {
        Self { id: t.id, row: t.row, seat: t.seat, flight_id: t.flight_id, order_id: t.order_id }
    }
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets))
        .route("/tickets/{id}", get(get_ticket))
        .route_layer(axum::middleware::from_fn_with_state(state, require_user))
}

/// GET /api/service/tickets
async fn list_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<TicketDetailResponse>>, AppError> {
    let tickets = state.orders.list_tickets(claims.sub).await?;
    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

/// GET /api/service/tickets/{id}
async fn get_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDetailResponse>, AppError> {
    let (ticket, owner) = state
        .orders
        .get_ticket(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("ticket {id} does not exist")))?;
    if owner != claims.sub {
        return Err(AppError::ForbiddenError(format!("ticket {id} belongs to another user")));
    }
    Ok(Json(ticket.into()))
}
