//! The path engine chosen at startup.

use crate::domain::{LegCandidate, StopCode};
use crate::planner::{FetchError, LegPathFetcher};

use super::client::GraphClient;
use super::error::GraphError;
use super::mock::MockGraphClient;
use super::types::Airport;

/// Either the live graph database or a fixture standing in for it.
#[derive(Debug, Clone)]
pub enum PathEngine {
    Graph(GraphClient),
    Mock(MockGraphClient),
}

impl PathEngine {
    /// Airport catalog offered to clients picking destinations.
    pub async fn airports(&self) -> Result<Vec<Airport>, GraphError> {
        match self {
            PathEngine::Graph(client) => client.airports().await,
            PathEngine::Mock(client) => Ok(client.airports()),
        }
    }
}

impl From<GraphClient> for PathEngine {
    fn from(client: GraphClient) -> Self {
        PathEngine::Graph(client)
    }
}

impl From<MockGraphClient> for PathEngine {
    fn from(client: MockGraphClient) -> Self {
        PathEngine::Mock(client)
    }
}

impl LegPathFetcher for PathEngine {
    async fn fetch(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> Result<Vec<LegCandidate>, FetchError> {
        match self {
            PathEngine::Graph(client) => client.fetch(source, destination, k).await,
            PathEngine::Mock(client) => client.fetch(source, destination, k).await,
        }
    }
}
