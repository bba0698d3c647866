//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedPathFetcher};
use crate::domain::StopCode;
use crate::graph::PathEngine;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// The path cache lives as long as the server, so legs fetched for one
/// request are reused by later ones.
#[derive(Clone)]
pub struct AppState {
    /// Cached path engine
    pub paths: Arc<CachedPathFetcher<PathEngine>>,

    /// Planner configuration applied to every request
    pub config: Arc<PlannerConfig>,

    /// Origin used when a request does not name one
    pub origin: StopCode,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        engine: PathEngine,
        cache_config: &CacheConfig,
        config: PlannerConfig,
        origin: StopCode,
    ) -> Self {
        Self {
            paths: Arc::new(CachedPathFetcher::new(engine, cache_config)),
            config: Arc::new(config),
            origin,
        }
    }
}
