//! Neo4j Graph Data Science HTTP client.
//!
//! Runs Yen's k-shortest-paths over a named graph projection through the
//! HTTP transaction API. Handles authentication, bounded concurrency, and
//! conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{LegCandidate, LegKey, StopCode};
use crate::planner::{FetchError, LegPathFetcher};

use super::convert::{convert_airports, convert_statement};
use super::error::GraphError;
use super::types::{
    Airport, CatalogParameters, CypherRequest, CypherResponse, CypherStatement, PathParameters,
    StatementResult,
};

/// Default database name.
const DEFAULT_DATABASE: &str = "neo4j";

/// Default in-memory graph projection.
const DEFAULT_PROJECTION: &str = "shortestPathGraph";

/// Default relationship property used as path weight.
const DEFAULT_WEIGHT_PROPERTY: &str = "distance";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default country filter of the airport catalog.
const DEFAULT_CATALOG_COUNTRY: &str = "United States";

/// Default maximum airports in the catalog.
const DEFAULT_CATALOG_LIMIT: usize = 500;

/// K shortest paths between two airports.
///
/// Each hop of a path contributes exactly one flight, the lightest
/// `FLEW_TO` edge between its two airports, so repeated values along a path
/// are all counted and parallel edges are not. Paths with a hop that has no
/// flight are dropped.
const K_SHORTEST_PATHS: &str = "\
MATCH (source:Airport {code: $source}), (dest:Airport {code: $dest})
CALL gds.shortestPath.yens.stream($graph, {
    sourceNode: source,
    targetNode: dest,
    k: $k,
    relationshipWeightProperty: $weight
})
YIELD index, totalCost, nodeIds
UNWIND range(0, size(nodeIds) - 2) AS hop
WITH index, totalCost, nodeIds, hop,
    gds.util.asNode(nodeIds[hop]) AS n,
    gds.util.asNode(nodeIds[hop + 1]) AS m
MATCH (n)-[f:FLEW_TO]->(m)
WITH index, totalCost, nodeIds, hop, f
ORDER BY f[$weight]
WITH index, totalCost, nodeIds, hop, head(collect(f)) AS flight
ORDER BY hop
WITH index, totalCost, nodeIds, collect(flight) AS flights
WHERE size(flights) = size(nodeIds) - 1
RETURN
    index AS rank,
    totalCost AS totalDistance,
    [nodeId IN nodeIds | gds.util.asNode(nodeId).code] AS nodeNames,
    ROUND(reduce(total = 0.0, flight IN flights | total + flight.value), 2) AS value,
    ROUND(reduce(total = 0.0, flight IN flights | total + flight.duration), 3) AS duration
ORDER BY rank";

/// Airports offered to clients picking destinations.
const AIRPORT_CATALOG: &str = "\
MATCH (a:Airport)
WHERE a.country = $country
RETURN DISTINCT
    a.code AS code,
    a.country AS country,
    a.city AS city,
    a.latitude AS latitude,
    a.longitude AS longitude
ORDER BY code
LIMIT $limit";

/// Configuration for the graph client.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Base HTTP URL of the server, e.g. `http://localhost:7474`
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Database to run statements against
    pub database: String,
    /// Named GDS graph projection
    pub projection: String,
    /// Relationship property minimised by the path search
    pub weight_property: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Country the airport catalog is restricted to
    pub catalog_country: String,
    /// Maximum airports in the catalog
    pub catalog_limit: usize,
}

impl GraphConfig {
    /// Create a new config with the given server and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            database: DEFAULT_DATABASE.to_string(),
            projection: DEFAULT_PROJECTION.to_string(),
            weight_property: DEFAULT_WEIGHT_PROPERTY.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            catalog_country: DEFAULT_CATALOG_COUNTRY.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = projection.into();
        self
    }

    pub fn with_weight_property(mut self, property: impl Into<String>) -> Self {
        self.weight_property = property.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Restrict the airport catalog to one country and at most `limit` entries.
    pub fn with_catalog(mut self, country: impl Into<String>, limit: usize) -> Self {
        self.catalog_country = country.into();
        self.catalog_limit = limit;
        self
    }
}

/// Graph engine client.
///
/// Uses a semaphore to limit concurrent requests to the server.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    commit_url: String,
    username: String,
    password: String,
    projection: String,
    weight_property: String,
    catalog_country: String,
    catalog_limit: usize,
    semaphore: Arc<Semaphore>,
}

impl GraphClient {
    /// Create a new graph client with the given configuration.
    pub fn new(config: GraphConfig) -> Result<Self, GraphError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let commit_url = format!(
            "{}/db/{}/tx/commit",
            config.base_url.trim_end_matches('/'),
            config.database
        );

        Ok(Self {
            http,
            commit_url,
            username: config.username,
            password: config.password,
            projection: config.projection,
            weight_property: config.weight_property,
            catalog_country: config.catalog_country,
            catalog_limit: config.catalog_limit,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch up to `k` shortest paths from `source` to `destination`.
    ///
    /// An unknown airport or unreachable destination yields an empty list,
    /// not an error.
    pub async fn k_shortest_paths(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> Result<Vec<LegCandidate>, GraphError> {
        let parameters = PathParameters {
            source: source.as_str(),
            dest: destination.as_str(),
            k,
            graph: &self.projection,
            weight: &self.weight_property,
        };
        let result = self.commit(K_SHORTEST_PATHS, parameters).await?;

        let key = LegKey::new(source.clone(), destination.clone());
        let candidates = result
            .map(|result| convert_statement(&key, &result))
            .unwrap_or_default();

        debug!(leg = %key, k, candidates = candidates.len(), "Graph query complete");

        Ok(candidates)
    }

    /// Fetch the airport catalog, ordered by code.
    pub async fn airports(&self) -> Result<Vec<Airport>, GraphError> {
        let parameters = CatalogParameters {
            country: &self.catalog_country,
            limit: self.catalog_limit,
        };
        let airports = self
            .commit(AIRPORT_CATALOG, parameters)
            .await?
            .map(|result| convert_airports(&result))
            .unwrap_or_default();

        debug!(country = %self.catalog_country, airports = airports.len(), "Airport catalog loaded");

        Ok(airports)
    }

    /// Run one statement in its own transaction and return its result.
    async fn commit<P: Serialize>(
        &self,
        statement: &str,
        parameters: P,
    ) -> Result<Option<StatementResult>, GraphError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GraphError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let request = CypherRequest {
            statements: vec![CypherStatement {
                statement,
                parameters,
            }],
        };

        let response = self
            .http
            .post(&self.commit_url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GraphError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: CypherResponse = serde_json::from_str(&body).map_err(|e| GraphError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        if let Some(failure) = parsed.errors.into_iter().next() {
            return Err(GraphError::Cypher {
                code: failure.code,
                message: failure.message,
            });
        }

        Ok(parsed.results.into_iter().next())
    }
}

impl LegPathFetcher for GraphClient {
    async fn fetch(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> Result<Vec<LegCandidate>, FetchError> {
        Ok(self.k_shortest_paths(source, destination, k).await?)
    }
}
