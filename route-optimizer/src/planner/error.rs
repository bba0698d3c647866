//! Planner error types.

use std::time::Duration;

use crate::domain::{DomainError, LegKey};

/// Error from a planning run.
///
/// Variants are ordered roughly by pipeline stage. Callers can tell
/// "no answer exists" (`NoViableItineraries`, `SolverInfeasible`) apart
/// from "the search was too large" (`ItineraryCapExceeded`, `SolverTimeout`).
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// Bad destination set; raised before any external call
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    /// Planner configuration cannot drive a run
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Assembling every combination would exceed the configured cap
    #[error("search too large: at least {count} itineraries exceed the cap of {cap}")]
    ItineraryCapExceeded { count: usize, cap: usize },

    /// Every stop order lost at least one leg
    #[error("no viable itineraries: all {orderings} stop orders have a leg with no candidates")]
    NoViableItineraries { orderings: usize },

    /// Itineraries exist but none fits the duration budget
    #[error(
        "no route found that meets the constraints: none of {itineraries} itineraries fits a duration budget of {budget}"
    )]
    SolverInfeasible { itineraries: usize, budget: f64 },

    /// Selection did not finish within its wall-clock cap
    #[error("solver timed out after {0:?}")]
    SolverTimeout(Duration),
}

/// A leg for which the path engine produced no usable candidate.
///
/// This is recovered locally: every stop order containing the leg is
/// dropped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("leg {key} unavailable: {reason}")]
pub struct LegUnavailable {
    pub key: LegKey,
    pub reason: String,
}
