//! Geocoder providers: OpenStreetMap Nominatim and an offline catalog matcher.

use super::gateway::Geocoder;
use super::types::{Candidate, GeocodeFailure};
use crate::catalog::{Coordinate, Location, LocationCatalog};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

// ─── Nominatim provider ─────────────────────────────────────────

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "pinpoint/0.1 (place-name geocoding)";

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(default)]
    pub importance: Option<f64>,
}

/// Geocodes through a Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    limit: usize,
    ambiguity_threshold: Option<f64>,
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            limit: 5,
            ambiguity_threshold: None,
        }
    }
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Report `Ambiguous` when the top two results are closer than `gap` in importance.
    pub fn with_ambiguity_threshold(mut self, gap: Option<f64>) -> Self {
        self.ambiguity_threshold = gap;
        self
    }

    fn search_request(&self, query: &str) -> ureq::Request {
        ureq::get(&format!("{}/search", self.base_url))
            .query("q", query)
            .query("format", "json")
            .query("limit", &self.limit.clamp(1, 10).to_string())
            .query("addressdetails", "0")
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
    }

    fn fetch(&self, query: &str) -> Result<Vec<NominatimResult>, GeocodeFailure> {
        let response = self
            .search_request(query)
            .call()
            .map_err(|e| GeocodeFailure::Network(e.to_string()))?;

        response
            .into_json()
            .map_err(|e| GeocodeFailure::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeFailure> {
        let this = self.clone();
        let q = query.to_string();
        let results = tokio::task::spawn_blocking(move || this.fetch(&q))
            .await
            .map_err(|e| GeocodeFailure::Network(format!("geocoder task failed: {}", e)))??;

        let candidates = parse_candidates(query, &results)?;
        pick_candidate(query, candidates, self.ambiguity_threshold)
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

/// Turn raw results into candidates, most important first.
pub fn parse_candidates(
    query: &str,
    results: &[NominatimResult],
) -> Result<Vec<Candidate>, GeocodeFailure> {
    if results.is_empty() {
        return Err(GeocodeFailure::NotFound { query: query.to_string() });
    }

    let mut candidates = Vec::with_capacity(results.len());
    for r in results {
        let lat: f64 = r
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeFailure::InvalidResponse(format!("bad latitude '{}'", r.lat)))?;
        let lon: f64 = r
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeFailure::InvalidResponse(format!("bad longitude '{}'", r.lon)))?;
        let coordinate = Coordinate::new(lat, lon);
        if !coordinate.is_valid() {
            return Err(GeocodeFailure::InvalidResponse(format!(
                "coordinate out of range: {}, {}",
                lat, lon
            )));
        }

        let name = r.display_name.split(',').next().unwrap_or(query).trim().to_string();
        candidates.push(Candidate {
            name,
            display_name: r.display_name.clone(),
            coordinate,
            importance: r.importance.unwrap_or(0.0),
        });
    }

    // Stable: equal importance keeps provider order.
    candidates.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(candidates)
}

/// Choose the top candidate, or report ambiguity when a threshold is set.
pub fn pick_candidate(
    query: &str,
    candidates: Vec<Candidate>,
    threshold: Option<f64>,
) -> Result<Coordinate, GeocodeFailure> {
    let (top, second) = match candidates.as_slice() {
        [] => return Err(GeocodeFailure::NotFound { query: query.to_string() }),
        [top] => return Ok(top.coordinate),
        [top, second, ..] => (top, second),
    };
    let best = top.coordinate;

    let too_close = threshold.is_some_and(|gap| top.importance - second.importance < gap);
    if too_close && top.display_name != second.display_name {
        return Err(GeocodeFailure::Ambiguous {
            query: query.to_string(),
            candidates: candidates.into_iter().take(5).collect(),
        });
    }

    Ok(best)
}

// ─── Offline catalog provider ───────────────────────────────────

/// Resolves text against catalog titles; needs no network.
///
/// Order: exact (case-insensitive) → unique substring → edit distance ≤ 2.
pub struct CatalogGeocoder {
    catalog: Arc<LocationCatalog>,
}

impl CatalogGeocoder {
    pub fn new(catalog: Arc<LocationCatalog>) -> Self {
        Self { catalog }
    }

    fn lookup(&self, query: &str) -> Result<&Location, GeocodeFailure> {
        let q = query.to_lowercase();
        let locations = self.catalog.all();

        if let Some(loc) = locations.iter().find(|l| l.title.to_lowercase() == q) {
            return Ok(loc);
        }

        let partial: Vec<&Location> = locations
            .iter()
            .filter(|l| {
                let t = l.title.to_lowercase();
                t.contains(&q) || q.contains(&t)
            })
            .collect();
        match partial.len() {
            1 => return Ok(partial[0]),
            n if n > 1 => {
                return Err(GeocodeFailure::Ambiguous {
                    query: query.to_string(),
                    candidates: partial.iter().map(|l| to_candidate(l)).collect(),
                })
            }
            _ => {}
        }

        let mut best: Option<(&Location, usize)> = None;
        for loc in locations {
            let dist = edit_distance(&q, &loc.title.to_lowercase());
            if dist <= 2 && best.map_or(true, |(_, d)| dist < d) {
                best = Some((loc, dist));
            }
        }

        best.map(|(loc, _)| loc)
            .ok_or_else(|| GeocodeFailure::NotFound { query: query.to_string() })
    }
}

#[async_trait]
impl Geocoder for CatalogGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeFailure> {
        self.lookup(query).map(|loc| loc.coordinate)
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}

fn to_candidate(loc: &Location) -> Candidate {
    Candidate {
        name: loc.title.clone(),
        display_name: loc.title.clone(),
        coordinate: loc.coordinate,
        importance: 1.0,
    }
}

/// Levenshtein distance over one rolling row.
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        // `diag` is the previous row at column j.
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in target.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[target.len()]
}
