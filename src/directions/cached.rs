use crate::directions::{DirectionsApi, Segment};
use crate::error::Result;
use crate::models::{Coordinate, TransportMode};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};

/// Memoizing decorator over a [`DirectionsApi`], backed by moka with TTL and
/// bounded capacity. All methods are `&self`; no locking needed.
///
/// Re-optimizing the same selection re-resolves the same consecutive pairs;
/// memoization keeps those round trips off the provider. Errors are never
/// cached.
pub struct CachedDirections<D> {
    inner: D,
    segments: Cache<String, Segment>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl<D> CachedDirections<D> {
    pub fn new(inner: D, ttl_seconds: u64, max_capacity: u64) -> Self {
        let segments = Cache::builder()
            .time_to_live(std::time::Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        CachedDirections {
            inner,
            segments,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Key endpoints at 4 decimal places (~11 m), enough to merge repeat
    /// requests for the same physical stops.
    fn cache_key(origin: Coordinate, destination: Coordinate, mode: TransportMode) -> String {
        format!(
            "{:.4},{:.4}|{:.4},{:.4}|{}",
            origin.lat, origin.lng, destination.lat, destination.lng, mode
        )
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl<D: DirectionsApi> DirectionsApi for CachedDirections<D> {
    async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<Segment> {
        let key = Self::cache_key(origin, destination, mode);

        if let Some(segment) = self.segments.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Segment cache hit: {}", key);
            return Ok(segment);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let segment = self.inner.resolve(origin, destination, mode).await?;
        self.segments.insert(key, segment.clone()).await;
        Ok(segment)
    }
}
