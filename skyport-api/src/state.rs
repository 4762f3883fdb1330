use std::sync::Arc;

use skyport_core::booking::BookingService;
use skyport_store::fleet_repo::FleetRepository;
use skyport_store::flight_repo::PostgresFlightRepository;
use skyport_store::order_repo::PostgresOrderRepository;
use skyport_store::reference_repo::ReferenceRepository;
use skyport_store::route_repo::RouteRepository;
use skyport_store::user_repo::UserRepository;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub reference: Arc<ReferenceRepository>,
    pub fleet: Arc<FleetRepository>,
    pub routes: Arc<RouteRepository>,
    pub flights: Arc<PostgresFlightRepository>,
    pub orders: Arc<PostgresOrderRepository>,
    pub users: Arc<UserRepository>,
    pub booking: BookingService,
    pub auth: AuthConfig,
    pub media_root: String,
    pub order_page_size: i64,
}
