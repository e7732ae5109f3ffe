//! The location catalog: an immutable table with lookup by title and id.

use super::builtin::builtin_locations;
use super::types::{CatalogError, Coordinate, Location, LocationId, LocationRecord, Pin};
use crate::region::Region;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Extra room around the pins when framing the whole catalog.
const BOUNDS_PADDING: f64 = 1.2;

/// Read-only collection of named locations, fixed at construction.
///
/// Build one at startup and share it by reference (`Arc`) with whatever
/// needs it.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Build a catalog, assigning ids by position.
    ///
    /// Duplicate titles are logged but kept; title lookup returns the first.
    pub fn new(mut locations: Vec<Location>) -> Self {
        let mut seen = HashSet::new();
        for (i, loc) in locations.iter_mut().enumerate() {
            loc.id = LocationId(i);
            if !seen.insert(loc.title.clone()) {
                tracing::warn!(
                    title = %loc.title,
                    id = i,
                    "duplicate catalog title; lookups by title return the first entry"
                );
            }
        }
        Self { locations }
    }

    /// The compiled-in default catalog.
    pub fn builtin() -> Self {
        Self::new(builtin_locations())
    }

    /// Load a catalog from a JSON array of `{title, latitude, longitude, image_name}`.
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<LocationRecord> =
            serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut locations = Vec::with_capacity(records.len());
        for (index, r) in records.into_iter().enumerate() {
            if r.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle { index });
            }
            let coordinate = Coordinate::new(r.latitude, r.longitude);
            if !coordinate.is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    title: r.title,
                    latitude: r.latitude,
                    longitude: r.longitude,
                });
            }
            locations.push(Location::new(r.title, coordinate, r.image_name));
        }

        tracing::info!(path = %path.display(), count = locations.len(), "loaded location catalog");
        Ok(Self::new(locations))
    }

    /// Every location, in catalog order.
    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    /// First location whose title matches exactly (case-sensitive).
    pub fn find_by_title(&self, title: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.title == title)
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    /// Like [`find_by_title`](Self::find_by_title) but a miss is an error.
    pub fn require_title(&self, title: &str) -> Result<&Location, CatalogError> {
        self.find_by_title(title)
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))
    }

    pub fn require(&self, id: LocationId) -> Result<&Location, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownId(id))
    }

    /// One pin per location, in catalog order.
    pub fn pins(&self) -> Vec<Pin> {
        self.locations.iter().map(Pin::from).collect()
    }

    /// Map a selected pin back to its location by id.
    ///
    /// Returns `None` when the id is unknown or the title no longer agrees,
    /// i.e. the pin came from a different catalog.
    pub fn select(&self, pin: &Pin) -> Option<&Location> {
        self.get(pin.id).filter(|loc| loc.title == pin.title)
    }

    /// A region framing every pin, or `None` for an empty catalog.
    pub fn bounds(&self) -> Option<Region> {
        let coords: Vec<Coordinate> = self.locations.iter().map(|l| l.coordinate).collect();
        Region::enclosing(&coords, BOUNDS_PADDING)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
