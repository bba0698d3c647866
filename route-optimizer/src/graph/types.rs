//! Wire types for the Neo4j HTTP transaction API and the mock fixture.
//!
//! Requests go to `POST /db/{database}/tx/commit`. Responses carry one
//! result per statement, each with positional rows, and an `errors` list
//! that is non-empty when a statement failed even though the HTTP status
//! was 200.

use serde::{Deserialize, Serialize};

use crate::domain::StopCode;

/// Body of a transaction commit request.
#[derive(Debug, Serialize)]
pub struct CypherRequest<'a, P> {
    pub statements: Vec<CypherStatement<'a, P>>,
}

/// One Cypher statement with its parameters.
#[derive(Debug, Serialize)]
pub struct CypherStatement<'a, P> {
    pub statement: &'a str,
    pub parameters: P,
}

/// Parameters of the k-shortest-paths statement.
#[derive(Debug, Serialize)]
pub struct PathParameters<'a> {
    pub source: &'a str,
    pub dest: &'a str,
    pub k: usize,
    pub graph: &'a str,
    pub weight: &'a str,
}

/// Parameters of the airport catalog statement.
#[derive(Debug, Serialize)]
pub struct CatalogParameters<'a> {
    pub country: &'a str,
    pub limit: usize,
}

/// Response from a transaction commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CypherResponse {
    #[serde(default)]
    pub results: Vec<StatementResult>,

    #[serde(default)]
    pub errors: Vec<CypherFailure>,
}

/// Rows returned by a single statement.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub data: Vec<DataRow>,
}

/// One result row. Kept untyped so that a malformed row can be skipped
/// without rejecting the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct DataRow {
    pub row: serde_json::Value,
}

/// Error entry reported by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct CypherFailure {
    pub code: String,
    pub message: String,
}

/// Typed view of one path row:
/// `[rank, totalDistance, nodeNames, value, duration]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathRow(pub usize, pub f64, pub Vec<String>, pub f64, pub f64);

/// Typed view of one catalog row:
/// `[code, country, city, latitude, longitude]`. Only the code is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirportRow(
    pub String,
    pub Option<String>,
    pub Option<String>,
    pub Option<f64>,
    pub Option<f64>,
);

/// An airport in the catalog offered to clients picking destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: StopCode,
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Mock fixture file: canned candidates per leg, plus an optional
/// airport catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PathFixture {
    pub legs: Vec<FixtureLeg>,

    #[serde(default)]
    pub airports: Vec<Airport>,
}

/// Candidates for one ordered pair in a fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureLeg {
    pub source: String,
    pub destination: String,
    pub candidates: Vec<FixtureCandidate>,
}

/// One candidate path in a fixture, best first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCandidate {
    pub total_distance: f64,
    pub node_names: Vec<String>,
    pub value: f64,
    pub duration: f64,
}
