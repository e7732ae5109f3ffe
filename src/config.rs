//! Runtime configuration from ~/.pinpoint/config.json.
//!
//! Every field is optional; a missing file means all defaults.

use crate::catalog::{CatalogError, LocationCatalog};
use crate::geocode::providers::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use crate::geocode::{CatalogGeocoder, Geocoder, GeocodingGateway, NominatimGeocoder, RequestPolicy};
use crate::region::DEFAULT_REGION_METERS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Which geocoder backs the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderKind {
    #[default]
    Nominatim,
    /// Offline: match against catalog titles.
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON catalog file; the built-in table when unset.
    pub catalog_path: Option<PathBuf>,
    pub geocoder: GeocoderKind,
    pub nominatim_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub result_limit: usize,
    pub ambiguity_threshold: Option<f64>,
    pub policy: RequestPolicy,
    /// Size of the region returned around a geocoded coordinate.
    pub region_meters: f64,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            geocoder: GeocoderKind::default(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            result_limit: 5,
            ambiguity_threshold: None,
            policy: RequestPolicy::default(),
            region_meters: DEFAULT_REGION_METERS,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pinpoint")
            .join("config.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.region_meters.is_finite() && self.region_meters > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "region_meters must be positive, got {}",
                self.region_meters
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if let Some(gap) = self.ambiguity_threshold {
            if !(0.0..=1.0).contains(&gap) {
                return Err(ConfigError::Invalid(format!(
                    "ambiguity_threshold must be within 0..1, got {}",
                    gap
                )));
            }
        }
        Ok(())
    }

    pub fn load_catalog(&self) -> Result<LocationCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => LocationCatalog::load_from(path),
            None => Ok(LocationCatalog::builtin()),
        }
    }

    /// Build the geocoding gateway this config describes.
    pub fn build_gateway(&self, catalog: Arc<LocationCatalog>) -> GeocodingGateway {
        let geocoder: Arc<dyn Geocoder> = match self.geocoder {
            GeocoderKind::Nominatim => Arc::new(
                NominatimGeocoder::new(self.nominatim_url.clone())
                    .with_user_agent(self.user_agent.clone())
                    .with_timeout(Duration::from_secs(self.timeout_secs))
                    .with_limit(self.result_limit)
                    .with_ambiguity_threshold(self.ambiguity_threshold),
            ),
            GeocoderKind::Catalog => Arc::new(CatalogGeocoder::new(catalog)),
        };
        GeocodingGateway::new(geocoder).with_policy(self.policy)
    }
}
