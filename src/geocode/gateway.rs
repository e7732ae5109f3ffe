//! Geocoding gateway — one async call per request, result passed through.
//!
//! Flow:  input → trim/empty check → geocoder (once) → [supersede check] → caller

use super::types::{GeocodeError, GeocodeFailure};
use crate::catalog::Coordinate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// An external place-name resolution capability.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve non-empty text into a coordinate.
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeFailure>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// How overlapping `resolve` calls on one gateway interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPolicy {
    /// Every request completes with its own result.
    #[default]
    Concurrent,
    /// A request that finishes after a newer one started reports `Superseded`.
    LatestWins,
}

/// Resolves free text into a coordinate through a [`Geocoder`].
pub struct GeocodingGateway {
    geocoder: Arc<dyn Geocoder>,
    policy: RequestPolicy,
    generation: AtomicU64,
}

impl GeocodingGateway {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            policy: RequestPolicy::default(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_policy(mut self, policy: RequestPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    pub fn provider(&self) -> &'static str {
        self.geocoder.name()
    }

    /// Resolve `text` into a coordinate.
    ///
    /// Empty or whitespace-only input returns [`GeocodeError::EmptyQuery`]
    /// without touching the geocoder. Otherwise the geocoder is called
    /// exactly once with the trimmed text and its failure, if any, is
    /// returned as-is.
    pub async fn resolve(&self, text: &str) -> Result<Coordinate, GeocodeError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(provider = self.geocoder.name(), query, ticket, "geocode request");

        let result = self.geocoder.geocode(query).await;

        if self.policy == RequestPolicy::LatestWins
            && self.generation.load(Ordering::SeqCst) != ticket
        {
            tracing::debug!(query, ticket, "geocode result dropped: superseded");
            return Err(GeocodeError::Superseded {
                query: query.to_string(),
            });
        }

        match result {
            Ok(coordinate) => {
                tracing::info!(provider = self.geocoder.name(), query, %coordinate, "geocoded");
                Ok(coordinate)
            }
            Err(failure) => {
                tracing::warn!(
                    provider = self.geocoder.name(),
                    query,
                    error = %failure,
                    "geocode failed"
                );
                Err(GeocodeError::Failed(failure))
            }
        }
    }

    /// Callback form of [`resolve`](Self::resolve): runs on a spawned task
    /// and invokes `on_complete` exactly once.
    pub fn spawn_resolve<F>(
        self: &Arc<Self>,
        text: impl Into<String>,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<Coordinate, GeocodeError>) + Send + 'static,
    {
        let gateway = Arc::clone(self);
        let text = text.into();
        tokio::spawn(async move {
            let result = gateway.resolve(&text).await;
            on_complete(result);
        })
    }
}
