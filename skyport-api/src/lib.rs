use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod airplane_types;
pub mod airplanes;
pub mod airports;
pub mod cities;
pub mod countries;
pub mod crews;
pub mod error;
pub mod flights;
pub mod media;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod state;
pub mod tickets;
pub mod users;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let service = Router::new()
        .merge(countries::router())
        .merge(cities::router())
        .merge(airplane_types::router())
        .merge(airplanes::router())
        .merge(airports::router())
        .merge(routes::router())
        .merge(crews::router())
        .merge(flights::router())
        .merge(orders::router(state.clone()))
        .merge(tickets::router(state.clone()));

    Router::new()
        .nest("/api/service", service)
        .nest("/api/user", users::router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
