//! Data transfer objects for web requests.
//!
//! Responses reuse [`crate::report::Report`] and [`crate::graph::Airport`],
//! so the HTTP payloads match what the command line prints.

use serde::Deserialize;

/// Body of `POST /api/submit-airports`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAirportsRequest {
    /// Destination codes, visited in any order
    pub selected_codes: Vec<String>,

    /// Origin code; the server default when absent
    #[serde(default)]
    pub origin: Option<String>,
}
