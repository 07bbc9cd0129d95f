//! Caching layer for network responses.
//!
//! Every journey request rebuilds its graph, which asks the network for the
//! stop list of every line and the correspondences of every stop. That data
//! changes rarely, so responses are cached across requests with a TTL.
//! Errors are never cached: a failed fetch is retried by the next request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Correspondence, RouteId, Stop, StopId};
use crate::network::{NetworkError, NetworkProvider};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per kind of response.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 10_000,
        }
    }
}

/// A `NetworkProvider` that caches another provider's successful responses.
pub struct CachedNetwork<P> {
    inner: P,
    route_stops: MokaCache<RouteId, Arc<Vec<Stop>>>,
    correspondences: MokaCache<StopId, Arc<Vec<Correspondence>>>,
    shapes: MokaCache<RouteId, Arc<Vec<Coordinate>>>,
}

impl<P: NetworkProvider> CachedNetwork<P> {
    /// Wrap `inner` with caches built from `config`.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        Self {
            inner,
            route_stops: build_cache(config),
            correspondences: build_cache(config),
            shapes: build_cache(config),
        }
    }

    /// Access the underlying provider for operations that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Approximate number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.route_stops.entry_count()
            + self.correspondences.entry_count()
            + self.shapes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.route_stops.invalidate_all();
        self.correspondences.invalidate_all();
        self.shapes.invalidate_all();
    }
}

fn build_cache<K, V>(config: &CacheConfig) -> MokaCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl<P: NetworkProvider> NetworkProvider for CachedNetwork<P> {
    async fn fetch_stops_for_route(&self, route: &RouteId) -> Result<Vec<Stop>, NetworkError> {
        if let Some(cached) = self.route_stops.get(route).await {
            return Ok(cached.as_ref().clone());
        }

        let stops = self.inner.fetch_stops_for_route(route).await?;
        self.route_stops
            .insert(route.clone(), Arc::new(stops.clone()))
            .await;
        Ok(stops)
    }

    async fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> Result<Vec<Correspondence>, NetworkError> {
        if let Some(cached) = self.correspondences.get(stop).await {
            return Ok(cached.as_ref().clone());
        }

        let correspondences = self.inner.fetch_correspondences(stop).await?;
        self.correspondences
            .insert(stop.clone(), Arc::new(correspondences.clone()))
            .await;
        Ok(correspondences)
    }

    async fn fetch_route_shape(&self, route: &RouteId) -> Result<Vec<Coordinate>, NetworkError> {
        if let Some(cached) = self.shapes.get(route).await {
            return Ok(cached.as_ref().clone());
        }

        let shape = self.inner.fetch_route_shape(route).await?;
        self.shapes
            .insert(route.clone(), Arc::new(shape.clone()))
            .await;
        Ok(shape)
    }
}
