//! Planner configuration.

use std::time::Duration;

use super::error::PlanError;

/// Configuration parameters for one planning run.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum total duration of the chosen itinerary.
    /// Itineraries whose summed duration exceeds this are infeasible.
    pub max_duration: f64,

    /// Number of alternative paths (k) requested per leg.
    pub candidates_per_leg: usize,

    /// Upper bound on itineraries assembled in one run.
    /// Runs that would exceed it fail instead of materialising them.
    pub max_itineraries: usize,

    /// Wall-clock cap on the selection solve (seconds).
    pub solver_timeout_secs: u64,

    /// Timeout for a single path engine request (seconds).
    pub fetch_timeout_secs: u64,

    /// Retries after a failed or timed-out fetch, before the leg is given up.
    pub fetch_retries: u32,

    /// Delay before the first retry (milliseconds). Doubles per retry.
    pub fetch_backoff_ms: u64,

    /// Maximum number of leg fetches in flight at once.
    pub max_concurrent_fetches: usize,
}

impl PlannerConfig {
    /// Set the duration budget.
    pub fn with_max_duration(mut self, max_duration: f64) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Set the number of candidates requested per leg.
    pub fn with_candidates_per_leg(mut self, k: usize) -> Self {
        self.candidates_per_leg = k;
        self
    }

    /// Set the itinerary cap.
    pub fn with_max_itineraries(mut self, cap: usize) -> Self {
        self.max_itineraries = cap;
        self
    }

    /// Set the solver timeout.
    pub fn with_solver_timeout(mut self, secs: u64) -> Self {
        self.solver_timeout_secs = secs;
        self
    }

    /// Set the retry policy for leg fetches.
    pub fn with_fetch_retries(mut self, retries: u32, backoff_ms: u64) -> Self {
        self.fetch_retries = retries;
        self.fetch_backoff_ms = backoff_ms;
        self
    }

    /// Set the per-request fetch timeout.
    pub fn with_fetch_timeout(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Set the fetch concurrency.
    pub fn with_max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n;
        self
    }

    /// Returns the solver timeout as a Duration.
    pub fn solver_timeout(&self) -> Duration {
        Duration::from_secs(self.solver_timeout_secs)
    }

    /// Returns the fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Returns the backoff before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        Duration::from_millis(self.fetch_backoff_ms.saturating_mul(factor))
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.max_duration.is_finite() {
            return Err(PlanError::InvalidConfig(
                "max_duration must be a finite number".to_string(),
            ));
        }
        if self.candidates_per_leg == 0 {
            return Err(PlanError::InvalidConfig(
                "candidates_per_leg must be at least 1".to_string(),
            ));
        }
        if self.max_itineraries == 0 {
            return Err(PlanError::InvalidConfig(
                "max_itineraries must be at least 1".to_string(),
            ));
        }
        if self.solver_timeout_secs == 0 {
            return Err(PlanError::InvalidConfig(
                "solver_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(PlanError::InvalidConfig(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(PlanError::InvalidConfig(
                "max_concurrent_fetches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_duration: 14.25,
            candidates_per_leg: 2,
            max_itineraries: 100_000,
            solver_timeout_secs: 10,
            fetch_timeout_secs: 30,
            fetch_retries: 2,
            fetch_backoff_ms: 250,
            max_concurrent_fetches: 5,
        }
    }
}
