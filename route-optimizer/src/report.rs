//! Result payloads.
//!
//! A run produces exactly one JSON payload: either the chosen route or an
//! error message. The exit status tells the two apart and also separates
//! "no answer exists" from "the search was too large". The command line
//! prints the payload as one line and exits with the status; the HTTP
//! server returns it as the body with a matching status code.

use std::process::ExitCode;

use serde::Serialize;

use crate::domain::Itinerary;
use crate::planner::{PlanError, PlanResult};

/// Chosen route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    /// Node codes of each leg, in travel order.
    pub route: Vec<Vec<String>>,
    pub total_value: f64,
    pub total_duration: f64,
}

impl From<&Itinerary> for RouteReport {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            route: itinerary
                .route()
                .into_iter()
                .map(|leg| leg.into_iter().map(String::from).collect())
                .collect(),
            total_value: itinerary.total_value(),
            total_duration: itinerary.total_duration(),
        }
    }
}

/// Failed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// The single payload of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Route(RouteReport),
    Error(ErrorReport),
}

impl Report {
    /// Render as one line of JSON.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            // Only reachable if serialization itself is broken
            format!(r#"{{"error":"failed to encode result: {}"}}"#, e.to_string().replace('"', "'"))
        })
    }
}

impl From<&Itinerary> for Report {
    fn from(itinerary: &Itinerary) -> Self {
        Report::Route(itinerary.into())
    }
}

impl From<&PlanError> for Report {
    fn from(err: &PlanError) -> Self {
        Report::Error(ErrorReport::new(err.to_string()))
    }
}

/// Payload and exit status for the outcome of a planning run.
pub fn summarize(outcome: &Result<PlanResult, PlanError>) -> (Report, ExitStatus) {
    match outcome {
        Ok(result) => (Report::from(&result.itinerary), ExitStatus::Success),
        Err(err) => (Report::from(err), ExitStatus::from(err)),
    }
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// A route was chosen
    Success,
    /// No answer exists: infeasible budget or no viable itineraries
    NoRoute,
    /// Bad destinations or configuration
    InvalidInput,
    /// Itinerary cap exceeded or solver timed out
    SearchTooLarge,
    /// Path engine could not be set up
    SetupFailure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::NoRoute => 1,
            ExitStatus::InvalidInput => 2,
            ExitStatus::SearchTooLarge => 3,
            ExitStatus::SetupFailure => 4,
        }
    }
}

impl From<&PlanError> for ExitStatus {
    fn from(err: &PlanError) -> Self {
        match err {
            PlanError::InvalidInput(_) | PlanError::InvalidConfig(_) => ExitStatus::InvalidInput,
            PlanError::NoViableItineraries { .. } | PlanError::SolverInfeasible { .. } => {
                ExitStatus::NoRoute
            }
            PlanError::ItineraryCapExceeded { .. } | PlanError::SolverTimeout(_) => {
                ExitStatus::SearchTooLarge
            }
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, LegCandidate, OrderId, StopCode};
    use std::sync::Arc;
    use std::time::Duration;

    fn candidate(nodes: &[&str], value: f64, duration: f64) -> Arc<LegCandidate> {
        let nodes = nodes.iter().map(|c| StopCode::parse(c).unwrap()).collect();
        Arc::new(LegCandidate::new(0, 100.0, nodes, value, duration).unwrap())
    }

    #[test]
    fn route_payload() {
        let itinerary = Itinerary::new(
            OrderId(0),
            vec![
                candidate(&["O", "A"], 5.0, 2.0),
                candidate(&["A", "X", "B"], 4.0, 3.0),
            ],
        )
        .unwrap();

        let line = Report::from(&itinerary).to_json_line();
        assert_eq!(
            line,
            r#"{"route":[["O","A"],["A","X","B"]],"total_value":9.0,"total_duration":5.0}"#
        );
    }

    #[test]
    fn error_payload() {
        let err = PlanError::SolverInfeasible {
            itineraries: 2,
            budget: 4.0,
        };

        let line = Report::from(&err).to_json_line();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert!(json.get("route").is_none());
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("no route found that meets the constraints")
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn summarize_outcomes() {
        let itinerary = Itinerary::new(OrderId(0), vec![candidate(&["O", "A"], 5.0, 2.0)]).unwrap();
        let ok = Ok(PlanResult {
            itinerary,
            stats: Default::default(),
        });
        let (report, status) = summarize(&ok);
        assert!(matches!(report, Report::Route(ref r) if r.total_value == 5.0));
        assert_eq!(status, ExitStatus::Success);

        let err = Err(PlanError::ItineraryCapExceeded { count: 9, cap: 1 });
        let (report, status) = summarize(&err);
        assert!(matches!(report, Report::Error(_)));
        assert_eq!(status, ExitStatus::SearchTooLarge);
    }

    #[test]
    fn exit_statuses() {
        let cases = [
            (PlanError::InvalidInput(DomainError::NoDestinations), 2),
            (PlanError::InvalidConfig("k".into()), 2),
            (PlanError::NoViableItineraries { orderings: 2 }, 1),
            (
                PlanError::SolverInfeasible {
                    itineraries: 1,
                    budget: 1.0,
                },
                1,
            ),
            (PlanError::ItineraryCapExceeded { count: 9, cap: 1 }, 3),
            (PlanError::SolverTimeout(Duration::from_secs(1)), 3),
        ];

        for (err, code) in cases {
            assert_eq!(ExitStatus::from(&err).code(), code, "{err}");
        }
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::SetupFailure.code(), 4);
    }
}
