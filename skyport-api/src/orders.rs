use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyport_core::booking::TicketRequest;
use skyport_store::order_repo::{OrderRecord, TicketRecord};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::{require_user, Claims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub page: Option<i64>,
    #[serde(alias = "s_route")]
    pub source_city: Option<String>,
    #[serde(alias = "d_route")]
    pub destination_city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderCreate {
    pub tickets: Vec<TicketRequest>,
}

/// Count-plus-links envelope for list endpoints that page.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub flight_id: Uuid,
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketResponse>,
}

impl From<TicketRecord> for TicketResponse {
    fn from(t: TicketRecord) -> Self {
        Self {
            id: t.id,
            row: t.row,
            seat: t.seat,
            flight_id: t.flight_id,
            route: t.route,
            airplane: t.airplane,
            departure_time: t.departure_time,
            arrival_time: t.arrival_time,
        }
    }
}

impl From<OrderRecord> for OrderResponse {
    fn from(o: OrderRecord) -> Self {
        Self {
            id: o.id,
            created_at: o.created_at,
            tickets: o.tickets.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).delete(delete_order))
        .route_layer(axum::middleware::from_fn_with_state(state, require_user))
}

/// GET /api/service/orders
/// The caller only ever sees their own orders, one page at a time.
async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Paginated<OrderResponse>>, AppError> {
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::ValidationError(format!("page must be at least 1, got {page}")));
    }

    let (count, orders) = state
        .orders
        .list_orders(
            claims.sub,
            page,
            state.order_page_size,
            query.source_city.as_deref(),
            query.destination_city.as_deref(),
        )
        .await?;

    let (next, previous) = page_links(page, state.order_page_size, count);
    Ok(Json(Paginated {
        count,
        next,
        previous,
        results: orders.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/service/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("order {id} does not exist")))?;
    if order.user_id != claims.sub {
        return Err(AppError::ForbiddenError(format!("order {id} belongs to another user")));
    }
    Ok(Json(order.into()))
}

/// POST /api/service/orders
/// All tickets in the request book atomically or none do.
async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<OrderCreate>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order_id = state.booking.place_order(claims.sub, &req.tickets).await?;

    let order = state
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError(format!("order {order_id} vanished")))?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// DELETE /api/service/orders/{id}
/// Cascades to the order's tickets, which releases their seats.
async fn delete_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("order {id} does not exist")))?;
    if order.user_id != claims.sub {
        return Err(AppError::ForbiddenError(format!("order {id} belongs to another user")));
    }

    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn page_links(page: i64, page_size: i64, count: i64) -> (Option<String>, Option<String>) {
    let next = if page * page_size < count { Some(format!("?page={}", page + 1)) } else { None };
    let previous = if page > 1 { Some(format!("?page={}", page - 1)) } else { None };
    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_previous_link() {
        let (next, previous) = page_links(1, 5, 12);
        assert_eq!(next.as_deref(), Some("?page=2"));
        assert_eq!(previous, None);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let (next, previous) = page_links(2, 5, 12);
        assert_eq!(next.as_deref(), Some("?page=3"));
        assert_eq!(previous.as_deref(), Some("?page=1"));
    }

    #[test]
    fn last_page_has_no_next_link() {
        let (next, previous) = page_links(3, 5, 12);
        assert_eq!(next, None);
        assert_eq!(previous.as_deref(), Some("?page=2"));
    }

    #[test]
    fn exact_multiple_ends_on_the_boundary_page() {
        let (next, _) = page_links(2, 5, 10);
        assert_eq!(next, None);
    }
}
