mod handlers;
mod state;

pub use state::AppState;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/locations", get(handlers::list_pins))
        .route("/api/locations/{id}", get(handlers::location_detail))
        .route("/api/lookup", get(handlers::lookup))
        .route("/api/region", get(handlers::catalog_region))
        .route("/api/geocode", get(handlers::geocode))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("pinpoint server listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Coordinate, Location, LocationCatalog};
    use crate::geocode::{
        CatalogGeocoder, GeocodeFailure, Geocoder, GeocodingGateway, RequestPolicy,
    };
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    fn app_with(geocoder: Arc<dyn Geocoder>, policy: RequestPolicy) -> Router {
        let catalog = Arc::new(LocationCatalog::builtin());
        let gateway = GeocodingGateway::new(geocoder).with_policy(policy);
        build_router(Arc::new(AppState::new(catalog, gateway, 1600.0)))
    }

    fn test_app() -> Router {
        let catalog = Arc::new(LocationCatalog::builtin());
        app_with(Arc::new(CatalogGeocoder::new(catalog)), RequestPolicy::Concurrent)
    }

    /// Fails every query the same way.
    struct FailingGeocoder(GeocodeFailure);

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Coordinate, GeocodeFailure> {
            Err(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// "slow" blocks until released; anything else answers at once.
    struct GatedGeocoder {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Geocoder for GatedGeocoder {
        async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeFailure> {
            if query == "slow" {
                self.started.notify_one();
                self.release.notified().await;
                Ok(Coordinate::new(1.0, 1.0))
            } else {
                Ok(Coordinate::new(2.0, 2.0))
            }
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_pins() {
        let (status, body) = get_json(test_app(), "/api/locations").await;
        assert_eq!(status, StatusCode::OK);
        let pins = body.as_array().unwrap();
        assert_eq!(pins.len(), LocationCatalog::builtin().len());
        assert_eq!(pins[0]["id"], 0);
        assert_eq!(pins[0]["title"], "Duck Pond");
        assert_eq!(pins[0]["coordinate"]["latitude"], 40.7);
    }

    #[tokio::test]
    async fn test_location_detail() {
        let (status, body) = get_json(test_app(), "/api/locations/0").await;
        assert_eq!(status, StatusCode::OK);
        let loc: Location = serde_json::from_value(body).unwrap();
        assert_eq!(loc.title, "Duck Pond");
        assert_eq!(loc.image_name, "duck_pond.png");

        let (status, body) = get_json(test_app(), "/api/locations/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_location_detail_bad_id() {
        let (status, body) = get_json(test_app(), "/api/locations/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("abc"));

        let (status, _) = get_json(test_app(), "/api/locations/-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_by_title() {
        let (status, body) = get_json(test_app(), "/api/lookup?title=Duck%20Pond").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["image_name"], "duck_pond.png");

        let (status, _) = get_json(test_app(), "/api/lookup?title=duck%20pond").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(test_app(), "/api/lookup").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_catalog_region() {
        let (status, body) = get_json(test_app(), "/api/region").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["latitude_delta"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_geocode_success() {
        let (status, body) = get_json(test_app(), "/api/geocode?query=Central%20Park").await;
        assert_eq!(status, StatusCode::OK);
        let coord: Coordinate = serde_json::from_value(body["coordinate"].clone()).unwrap();
        assert_eq!(coord, Coordinate::new(40.7829, -73.9654));
        assert_eq!(body["region"]["center"]["latitude"], 40.7829);
    }

    #[tokio::test]
    async fn test_geocode_errors() {
        let (status, _) = get_json(test_app(), "/api/geocode?query=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(test_app(), "/api/geocode").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(test_app(), "/api/geocode?query=zzz-not-a-place-zzz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);

        let (status, body) = get_json(test_app(), "/api/geocode?query=park").await;
        assert_eq!(status, StatusCode::MULTIPLE_CHOICES);
        assert_eq!(body["multiple"], true);
        assert!(body["options"].as_array().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn test_geocode_provider_failures_are_bad_gateway() {
        for failure in [
            GeocodeFailure::Network("connection refused".into()),
            GeocodeFailure::InvalidResponse("expected value at line 1".into()),
        ] {
            let app = app_with(Arc::new(FailingGeocoder(failure)), RequestPolicy::Concurrent);
            let (status, body) = get_json(app, "/api/geocode?query=Paris").await;
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(body["code"], 502);
        }
    }

    #[tokio::test]
    async fn test_overlapping_clients_both_succeed() {
        let geocoder = Arc::new(GatedGeocoder {
            started: Notify::new(),
            release: Notify::new(),
        });
        // Configured latest-wins, but a shared server gateway must not let
        // one client's request supersede another's.
        let app = app_with(geocoder.clone(), RequestPolicy::LatestWins);

        let first = tokio::spawn(get_json(app.clone(), "/api/geocode?query=slow"));
        geocoder.started.notified().await;

        let (status, body) = get_json(app, "/api/geocode?query=fast").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coordinate"]["latitude"], 2.0);

        geocoder.release.notify_one();
        let (status, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coordinate"]["latitude"], 1.0);
    }
}
