use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{Coordinate, Location, LocationId, Pin};
use crate::geocode::{Candidate, GeocodeError, GeocodeFailure};
use crate::region::Region;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/locations ──────────────────────────────────────────

pub async fn list_pins(State(state): State<Arc<AppState>>) -> Json<Vec<Pin>> {
    Json(state.catalog.pins())
}

// ─── GET /api/locations/{id} ─────────────────────────────────────

pub async fn location_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Location>, ApiError> {
    let id: usize = id
        .parse()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("Invalid location id '{}'", id)))?;

    state
        .catalog
        .require(LocationId(id))
        .map(|loc| Json(loc.clone()))
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))
}

// ─── GET /api/lookup ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LookupQuery {
    pub title: Option<String>,
}

pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<Location>, ApiError> {
    let title = params
        .title
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'title' parameter"))?;

    state
        .catalog
        .require_title(&title)
        .map(|loc| Json(loc.clone()))
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))
}

// ─── GET /api/region ─────────────────────────────────────────────

pub async fn catalog_region(State(state): State<Arc<AppState>>) -> Result<Json<Region>, ApiError> {
    state
        .catalog
        .bounds()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Catalog is empty"))
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct GeocodeResponse {
    pub query: String,
    pub coordinate: Coordinate,
    pub region: Region,
}

#[derive(Serialize)]
struct AmbiguousResponse {
    multiple: bool,
    query: String,
    options: Vec<Candidate>,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, Response> {
    let query = params.query.unwrap_or_default();

    match state.gateway.resolve(&query).await {
        Ok(coordinate) => Ok(Json(GeocodeResponse {
            query: query.trim().to_string(),
            coordinate,
            region: Region::around(coordinate, state.region_meters),
        })),
        Err(GeocodeError::Failed(GeocodeFailure::Ambiguous { query, candidates })) => {
            let resp = AmbiguousResponse {
                multiple: true,
                query,
                options: candidates,
            };
            Err((StatusCode::MULTIPLE_CHOICES, Json(resp)).into_response())
        }
        Err(e) => Err(api_error(geocode_status(&e), e.to_string()).into_response()),
    }
}

fn geocode_status(e: &GeocodeError) -> StatusCode {
    match e {
        GeocodeError::EmptyQuery => StatusCode::BAD_REQUEST,
        GeocodeError::Superseded { .. } => StatusCode::CONFLICT,
        GeocodeError::Failed(GeocodeFailure::NotFound { .. }) => StatusCode::NOT_FOUND,
        GeocodeError::Failed(GeocodeFailure::Ambiguous { .. }) => StatusCode::MULTIPLE_CHOICES,
        GeocodeError::Failed(GeocodeFailure::Network(_))
        | GeocodeError::Failed(GeocodeFailure::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_status_mapping() {
        let failed = |f: GeocodeFailure| geocode_status(&GeocodeError::Failed(f));

        assert_eq!(geocode_status(&GeocodeError::EmptyQuery), StatusCode::BAD_REQUEST);
        assert_eq!(
            geocode_status(&GeocodeError::Superseded { query: "Paris".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(failed(GeocodeFailure::NotFound { query: "x".into() }), StatusCode::NOT_FOUND);
        assert_eq!(
            failed(GeocodeFailure::Ambiguous {
                query: "x".into(),
                candidates: vec![],
            }),
            StatusCode::MULTIPLE_CHOICES
        );
        assert_eq!(failed(GeocodeFailure::Network("refused".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            failed(GeocodeFailure::InvalidResponse("not json".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
