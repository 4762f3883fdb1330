use std::net::SocketAddr;
use std::sync::Arc;

use skyport_api::{app, state::{AppState, AuthConfig}};
use skyport_core::booking::BookingService;
use skyport_store::fleet_repo::FleetRepository;
use skyport_store::flight_repo::PostgresFlightRepository;
use skyport_store::order_repo::PostgresOrderRepository;
use skyport_store::reference_repo::ReferenceRepository;
use skyport_store::route_repo::RouteRepository;
use skyport_store::user_repo::UserRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyport_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skyport_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Skyport API on port {}", config.server.port);

    let db = skyport_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let flights = Arc::new(PostgresFlightRepository::new(db.pool.clone()));
    let orders = Arc::new(PostgresOrderRepository::new(db.pool.clone()));
    let booking = BookingService::new(flights.clone(), orders.clone());

    let app_state = AppState {
        reference: Arc::new(ReferenceRepository::new(db.pool.clone())),
        fleet: Arc::new(FleetRepository::new(db.pool.clone())),
        routes: Arc::new(RouteRepository::new(db.pool.clone())),
        flights,
        orders,
        users: Arc::new(UserRepository::new(db.pool.clone())),
        booking,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        media_root: config.media.root.clone(),
        order_page_size: config.pagination.order_page_size,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
