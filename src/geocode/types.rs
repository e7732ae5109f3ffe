//! Geocoding result and error types.

use crate::catalog::Coordinate;
use serde::Serialize;

/// One possible match for an ambiguous query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub display_name: String,
    pub coordinate: Coordinate,
    /// Provider relevance, 0.0 to 1.0.
    pub importance: f64,
}

/// Why a geocoder could not produce a coordinate.
///
/// Passed through to callers untouched; the gateway never retries on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeFailure {
    #[error("Place not found: '{query}'")]
    NotFound { query: String },
    #[error("Ambiguous place name '{query}': {} matches", .candidates.len())]
    Ambiguous {
        query: String,
        candidates: Vec<Candidate>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}

/// Outcome of [`GeocodingGateway::resolve`](super::GeocodingGateway::resolve).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeError {
    /// Empty or whitespace-only input; the geocoder was not called.
    #[error("Nothing to geocode: input is empty")]
    EmptyQuery,
    #[error(transparent)]
    Failed(#[from] GeocodeFailure),
    /// A newer request started before this one finished (`LatestWins` only).
    #[error("Geocode for '{query}' was superseded by a newer request")]
    Superseded { query: String },
}
