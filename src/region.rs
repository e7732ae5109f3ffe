//! Map regions handed to the display layer.
//!
//! Nothing here renders; a region is a center plus a span in degrees.

use crate::catalog::Coordinate;
use serde::Serialize;

/// Metres per degree of latitude (mean).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default recentre distance after a successful geocode.
pub const DEFAULT_REGION_METERS: f64 = 1600.0;

/// A visible map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// A square region `meters` tall and wide around `center`.
    pub fn around(center: Coordinate, meters: f64) -> Self {
        let latitude_delta = meters / METERS_PER_DEGREE;
        // cos() collapses at the poles; keep the span finite.
        let scale = center.latitude.to_radians().cos().max(0.01);
        let longitude_delta = (meters / (METERS_PER_DEGREE * scale)).min(360.0);
        Self {
            center,
            latitude_delta: latitude_delta.min(180.0),
            longitude_delta,
        }
    }

    /// Smallest region containing every coordinate, spans scaled by `padding`.
    ///
    /// Never narrower than [`Region::around`] with [`DEFAULT_REGION_METERS`],
    /// so a single point (or coincident points) still frames a viewable area.
    pub fn enclosing(coords: &[Coordinate], padding: f64) -> Option<Self> {
        let first = coords.first()?;
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
        for c in &coords[1..] {
            min_lat = min_lat.min(c.latitude);
            max_lat = max_lat.max(c.latitude);
            min_lon = min_lon.min(c.longitude);
            max_lon = max_lon.max(c.longitude);
        }

        let center = Coordinate::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0);
        let floor = Self::around(center, DEFAULT_REGION_METERS);
        Some(Self {
            center,
            latitude_delta: ((max_lat - min_lat) * padding)
                .max(floor.latitude_delta)
                .min(180.0),
            longitude_delta: ((max_lon - min_lon) * padding)
                .max(floor.longitude_delta)
                .min(360.0),
        })
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        (c.latitude - self.center.latitude).abs() <= self.latitude_delta / 2.0
            && (c.longitude - self.center.longitude).abs() <= self.longitude_delta / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_around_equator() {
        let r = Region::around(Coordinate::new(0.0, 0.0), DEFAULT_REGION_METERS);
        assert_relative_eq!(r.latitude_delta, 1600.0 / 111_320.0, epsilon = 1e-9);
        assert_relative_eq!(r.longitude_delta, r.latitude_delta, epsilon = 1e-9);
    }

    #[test]
    fn test_around_widens_longitude_with_latitude() {
        let r = Region::around(Coordinate::new(60.0, 10.0), 1000.0);
        // cos(60°) = 0.5
        assert_relative_eq!(r.longitude_delta, 2.0 * r.latitude_delta, epsilon = 1e-6);
    }

    #[test]
    fn test_around_pole_is_finite() {
        let r = Region::around(Coordinate::new(90.0, 0.0), 1600.0);
        assert!(r.longitude_delta.is_finite());
        assert!(r.longitude_delta <= 360.0);
    }

    #[test]
    fn test_enclosing() {
        let coords = [
            Coordinate::new(40.0, -74.0),
            Coordinate::new(41.0, -73.0),
            Coordinate::new(40.5, -73.5),
        ];
        let r = Region::enclosing(&coords, 1.0).unwrap();
        assert_relative_eq!(r.center.latitude, 40.5);
        assert_relative_eq!(r.center.longitude, -73.5);
        assert_relative_eq!(r.latitude_delta, 1.0);
        assert_relative_eq!(r.longitude_delta, 1.0);
        assert!(coords.iter().all(|c| r.contains(c)));
    }

    #[test]
    fn test_enclosing_padding() {
        let coords = [Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 4.0)];
        let r = Region::enclosing(&coords, 1.5).unwrap();
        assert_relative_eq!(r.latitude_delta, 3.0);
        assert_relative_eq!(r.longitude_delta, 6.0);
    }

    #[test]
    fn test_enclosing_single_point_has_viewable_span() {
        let c = Coordinate::new(1.0, 2.0);
        let r = Region::enclosing(&[c], 1.2).unwrap();
        let floor = Region::around(c, DEFAULT_REGION_METERS);
        assert_eq!(r.center, c);
        assert!(r.latitude_delta > 0.0);
        assert_relative_eq!(r.latitude_delta, floor.latitude_delta);
        assert_relative_eq!(r.longitude_delta, floor.longitude_delta);
        assert!(r.contains(&c));
    }

    #[test]
    fn test_enclosing_coincident_points() {
        let c = Coordinate::new(40.7, -74.0);
        let r = Region::enclosing(&[c, c, c], 1.2).unwrap();
        assert!(r.latitude_delta > 0.0 && r.longitude_delta > 0.0);
    }

    #[test]
    fn test_enclosing_empty() {
        assert!(Region::enclosing(&[], 1.2).is_none());
    }
}
