//! pinpoint — location catalog and place-name geocoding for map pin apps.
//!
//! The catalog holds a fixed table of named locations that a display layer
//! turns into pins; the geocoding gateway resolves free text into a
//! coordinate the display layer can recentre on.

pub mod catalog;
pub mod config;
pub mod geocode;
pub mod logging;
pub mod region;
pub mod server;
