//! Place-name geocoding.
//!
//! [`GeocodingGateway`] wraps any [`Geocoder`] with the empty-input filter,
//! the request policy, and logging. Failures pass through untouched.

pub mod gateway;
pub mod providers;
pub mod types;

pub use gateway::{Geocoder, GeocodingGateway, RequestPolicy};
pub use providers::{CatalogGeocoder, NominatimGeocoder};
pub use types::{Candidate, GeocodeError, GeocodeFailure};
