//! Compiled-in default location table.

use super::types::{Coordinate, Location};

struct BuiltinLocation {
    title: &'static str,
    lat: f64,
    lon: f64,
    image: &'static str,
}

const BUILTIN_LOCATIONS: &[BuiltinLocation] = &[
    BuiltinLocation {
        title: "Duck Pond",
        lat: 40.7, lon: -74.0,
        image: "duck_pond.png",
    },
    BuiltinLocation {
        title: "Central Park",
        lat: 40.7829, lon: -73.9654,
        image: "central_park.png",
    },
    BuiltinLocation {
        title: "Prospect Park Lake",
        lat: 40.6559, lon: -73.9680,
        image: "prospect_park_lake.png",
    },
    BuiltinLocation {
        title: "Brooklyn Bridge Park",
        lat: 40.7003, lon: -73.9967,
        image: "brooklyn_bridge_park.png",
    },
    BuiltinLocation {
        title: "The Battery",
        lat: 40.7033, lon: -74.0170,
        image: "the_battery.png",
    },
    BuiltinLocation {
        title: "Flushing Meadows",
        lat: 40.7400, lon: -73.8407,
        image: "flushing_meadows.png",
    },
    BuiltinLocation {
        title: "Jamaica Bay Wildlife Refuge",
        lat: 40.6170, lon: -73.8250,
        image: "jamaica_bay.png",
    },
    BuiltinLocation {
        title: "Van Cortlandt Lake",
        lat: 40.8985, lon: -73.8890,
        image: "van_cortlandt_lake.png",
    },
];

/// The default location table, in display order.
pub fn builtin_locations() -> Vec<Location> {
    BUILTIN_LOCATIONS
        .iter()
        .map(|b| Location::new(b.title, Coordinate::new(b.lat, b.lon), b.image))
        .collect()
}
