use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use skyport_api::state::{AppState, AuthConfig};
use skyport_api::app;
use skyport_core::booking::BookingService;
use skyport_store::fleet_repo::FleetRepository;
use skyport_store::flight_repo::PostgresFlightRepository;
use skyport_store::order_repo::PostgresOrderRepository;
use skyport_store::reference_repo::ReferenceRepository;
use skyport_store::route_repo::RouteRepository;
use skyport_store::user_repo::UserRepository;
use jsonwebtoken::{encode, EncodingKey, Header};
use skyport_api::middleware::auth::Claims;
use tower::ServiceExt;
use uuid::Uuid;

// A lazy pool never connects until a query runs, so every request below must
// be rejected by the router or middleware before reaching the database.
fn test_state() -> AppState {
    let db = skyport_store::DbClient::new_lazy("postgres://skyport@localhost:1/skyport")
        .expect("lazy pool");

    let flights = Arc::new(PostgresFlightRepository::new(db.pool.clone()));
    let orders = Arc::new(PostgresOrderRepository::new(db.pool.clone()));
    let booking = BookingService::new(flights.clone(), orders.clone());

    AppState {
        reference: Arc::new(ReferenceRepository::new(db.pool.clone())),
        fleet: Arc::new(FleetRepository::new(db.pool.clone())),
        routes: Arc::new(RouteRepository::new(db.pool.clone())),
        flights,
        orders,
        users: Arc::new(UserRepository::new(db.pool)),
        booking,
        auth: AuthConfig { secret: "router-test-secret".to_string(), expiration: 3600 },
        media_root: "media".to_string(),
        order_page_size: 5,
    }
}

#[tokio::test]
async fn unknown_paths_are_404() {
    let app = app(test_state());
    let response = app
        .oneshot(Request::get("/api/service/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_require_a_bearer_token() {
    let app = app(test_state());
    let response = app
        .oneshot(Request::get("/api/service/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_tokens_are_unauthorized() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::get("/api/service/tickets")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

fn bearer_token() -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "passenger@example.com".to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"router-test-secret"),
    )
    .unwrap();
    format!("Bearer {token}")
}

#[tokio::test]
async fn tickets_cannot_be_created_directly() {
    // Tickets only come into existence through orders; there is no POST route
    // even for an authenticated caller.
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::post("/api/service/tickets")
                .header(header::AUTHORIZATION, bearer_token())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn empty_orders_are_rejected_up_front() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::post("/api/service/orders")
                .header(header::AUTHORIZATION, bearer_token())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"tickets":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_an_invalid_email_before_touching_storage() {
    let app = app(test_state());
    let response = app
        .oneshot(
            Request::post("/api/user/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"not-an-email"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
