//! Mock graph client for running without a database.
//!
//! Loads canned candidates per leg from a JSON fixture and serves them as
//! if they came from the path engine. The fixture's airport catalog, if
//! any, is served as is.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{LegCandidate, LegKey, StopCode};
use crate::planner::{FetchError, LegPathFetcher};

use super::convert::convert_fixture;
use super::error::GraphError;
use super::types::{Airport, PathFixture};

/// Mock graph client that serves data from a fixture file.
#[derive(Debug, Clone)]
pub struct MockGraphClient {
    /// Candidates keyed by leg, best first.
    paths: Arc<HashMap<LegKey, Vec<LegCandidate>>>,
    airports: Arc<[Airport]>,
}

impl MockGraphClient {
    /// Load a fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Fixture(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Parse a fixture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let fixture: PathFixture = serde_json::from_str(json)
            .map_err(|e| GraphError::Fixture(format!("failed to parse fixture: {e}")))?;

        let mut paths = HashMap::with_capacity(fixture.legs.len());
        for leg in &fixture.legs {
            let source = StopCode::parse(&leg.source)
                .map_err(|e| GraphError::Fixture(e.to_string()))?;
            let destination = StopCode::parse(&leg.destination)
                .map_err(|e| GraphError::Fixture(e.to_string()))?;
            let key = LegKey::new(source, destination);

            let candidates = convert_fixture(&key, &leg.candidates);
            if paths.insert(key.clone(), candidates).is_some() {
                return Err(GraphError::Fixture(format!("leg {key} listed twice")));
            }
        }

        Ok(Self {
            paths: Arc::new(paths),
            airports: fixture.airports.into(),
        })
    }

    /// Legs present in the fixture.
    pub fn legs(&self) -> impl Iterator<Item = &LegKey> {
        self.paths.keys()
    }

    /// Airport catalog listed in the fixture.
    pub fn airports(&self) -> Vec<Airport> {
        self.airports.to_vec()
    }
}

impl LegPathFetcher for MockGraphClient {
    async fn fetch(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> Result<Vec<LegCandidate>, FetchError> {
        let key = LegKey::new(source.clone(), destination.clone());
        let candidates: Vec<LegCandidate> = self
            .paths
            .get(&key)
            .map(|c| c.iter().take(k).cloned().collect())
            .unwrap_or_default();

        debug!(leg = %key, k, candidates = candidates.len(), "Served mock paths");
        Ok(candidates)
    }
}
