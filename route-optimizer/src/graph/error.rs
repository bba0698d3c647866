//! Graph engine client error types.

use crate::planner::FetchError;

/// Errors from the graph engine adapters.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Server returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Credentials rejected
    #[error("unauthorized (check graph credentials)")]
    Unauthorized,

    /// The Cypher statement failed inside the database
    #[error("Cypher error {code}: {message}")]
    Cypher { code: String, message: String },

    /// Mock fixture could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl From<GraphError> for FetchError {
    fn from(err: GraphError) -> Self {
        FetchError::Engine(err.to_string())
    }
}
