//! Core types for the location catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A latitude/longitude pair in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within -90..=90 and longitude within -180..=180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}\u{00B0} {}, {:.4}\u{00B0} {}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Stable identifier of a catalog entry: its position in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub usize);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named place in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: LocationId,
    pub title: String,
    pub coordinate: Coordinate,
    /// Key of the bundled image shown on the detail screen. Never resolved here.
    pub image_name: String,
}

impl Location {
    pub fn new(
        title: impl Into<String>,
        coordinate: Coordinate,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            id: LocationId::default(),
            title: title.into(),
            coordinate,
            image_name: image_name.into(),
        }
    }
}

/// What the display layer needs to draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    pub id: LocationId,
    pub title: String,
    pub coordinate: Coordinate,
}

impl From<&Location> for Pin {
    fn from(loc: &Location) -> Self {
        Self {
            id: loc.id,
            title: loc.title.clone(),
            coordinate: loc.coordinate,
        }
    }
}

/// On-disk catalog record (flat lat/lon, no id).
#[derive(Debug, Deserialize)]
pub(crate) struct LocationRecord {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_name: String,
}

/// Catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Location not found: '{0}'")]
    NotFound(String),
    #[error("No location with id {0}")]
    UnknownId(LocationId),
    #[error("Cannot read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid coordinate for '{title}': {latitude}, {longitude}")]
    InvalidCoordinate {
        title: String,
        latitude: f64,
        longitude: f64,
    },
    #[error("Catalog entry {index} has an empty title")]
    EmptyTitle { index: usize },
}
