use crate::catalog::LocationCatalog;
use crate::geocode::{GeocodingGateway, RequestPolicy};
use std::sync::Arc;

pub struct AppState {
    pub catalog: Arc<LocationCatalog>,
    pub gateway: GeocodingGateway,
    pub region_meters: f64,
}

impl AppState {
    /// Shared state for the router.
    ///
    /// The gateway is shared by every client, so it always runs `Concurrent`:
    /// under `LatestWins` one client's request would supersede another's.
    pub fn new(
        catalog: Arc<LocationCatalog>,
        gateway: GeocodingGateway,
        region_meters: f64,
    ) -> Self {
        if gateway.policy() != RequestPolicy::Concurrent {
            tracing::warn!(
                policy = ?gateway.policy(),
                "request policy applies to a single caller; server gateway uses concurrent"
            );
        }
        Self {
            catalog,
            gateway: gateway.with_policy(RequestPolicy::Concurrent),
            region_meters,
        }
    }
}
