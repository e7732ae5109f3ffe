//! Location catalog subsystem.
//!
//! A fixed table of named locations with lookup by title and by stable id,
//! plus the pin data a map layer draws from it.

pub mod builtin;
pub mod store;
pub mod types;

pub use store::LocationCatalog;
pub use types::{CatalogError, Coordinate, Location, LocationId, Pin};
