//! Caching layer for path engine responses.
//!
//! Candidate paths for a leg depend only on the pair of stops and `k`, so a
//! response can be reused by later runs sharing the same fetcher. The HTTP
//! server keeps one for its whole lifetime. Concurrent
//! requests for the same key are coalesced into one upstream call. Errors are
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{LegCandidate, StopCode};
use crate::planner::{FetchError, LegPathFetcher};

/// Cache key for path candidates: (source, destination, k).
type PathKey = (StopCode, StopCode, usize);

/// Cached candidates for a leg.
type PathEntry = Arc<Vec<LegCandidate>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Path fetcher with caching.
///
/// Wraps any [`LegPathFetcher`] and caches its successful answers,
/// including empty ones.
pub struct CachedPathFetcher<F> {
    inner: F,
    paths: MokaCache<PathKey, PathEntry>,
}

impl<F: LegPathFetcher> CachedPathFetcher<F> {
    /// Create a new cached fetcher.
    pub fn new(inner: F, config: &CacheConfig) -> Self {
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, paths }
    }

    /// Access the underlying fetcher for requests that bypass the cache.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Get cache statistics. The count lags recent inserts until
    /// [`run_pending_tasks`](Self::run_pending_tasks) has run.
    pub fn entry_count(&self) -> u64 {
        self.paths.entry_count()
    }

    /// Apply pending cache maintenance, e.g. before reading statistics.
    pub async fn run_pending_tasks(&self) {
        self.paths.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.paths.invalidate_all();
    }
}

impl<F: LegPathFetcher> LegPathFetcher for CachedPathFetcher<F> {
    async fn fetch(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> Result<Vec<LegCandidate>, FetchError> {
        let key = (source.clone(), destination.clone(), k);

        let entry = self
            .paths
            .try_get_with(key, async {
                debug!(%source, %destination, k, "Path cache miss");
                self.inner
                    .fetch(source, destination, k)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())?;

        Ok(entry.as_ref().clone())
    }
}
