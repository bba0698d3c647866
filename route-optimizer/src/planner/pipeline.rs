//! The planning pipeline.
//!
//! Enumerate stop orders, fetch each distinct leg once, assemble the
//! Cartesian product of per-leg candidates, and select the single best
//! itinerary within the duration budget.

use tracing::{debug, info};

use crate::domain::{DomainError, Itinerary, OrderId, StopCode};

use super::assemble::assemble;
use super::config::PlannerConfig;
use super::enumerate::{enumerate_orders, order_count, unique_leg_keys, validate_destinations};
use super::error::{LegUnavailable, PlanError};
use super::fetch::{LegPathFetcher, fetch_legs};
use super::select::{Selection, SelectionProblem, SolveError};

/// Request for one planning run.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Fixed first stop of every order.
    pub origin: StopCode,

    /// Stops to visit, in any order.
    pub destinations: Vec<StopCode>,
}

impl PlanRequest {
    /// Create a new request.
    pub fn new(origin: StopCode, destinations: Vec<StopCode>) -> Self {
        Self {
            origin,
            destinations,
        }
    }

    /// Parse a request from raw codes.
    pub fn parse<S: AsRef<str>>(origin: &str, destinations: &[S]) -> Result<Self, DomainError> {
        let origin = StopCode::parse(origin)?;
        let destinations = destinations
            .iter()
            .map(|d| StopCode::parse(d.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(origin, destinations))
    }

    /// Validate the destination set.
    pub fn validate(&self) -> Result<(), PlanError> {
        validate_destinations(&self.origin, &self.destinations)?;
        Ok(())
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Default)]
pub struct PlanStats {
    /// Stop orders enumerated.
    pub orderings: usize,

    /// Distinct legs fetched.
    pub unique_legs: usize,

    /// Requests issued to the fetcher, retries included.
    pub fetch_requests: usize,

    /// Legs with no usable candidate.
    pub unavailable_legs: Vec<LegUnavailable>,

    /// Orders dropped because of unavailable legs.
    pub eliminated_orders: Vec<OrderId>,

    /// Itineraries handed to the selector.
    pub itineraries: usize,

    /// Variables examined by the selector.
    pub solver_nodes: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// The single chosen itinerary.
    pub itinerary: Itinerary,

    pub stats: PlanStats,
}

/// Route planner over an injected path fetcher.
pub struct Planner<'a, F: LegPathFetcher> {
    fetcher: &'a F,
    config: &'a PlannerConfig,
}

impl<'a, F: LegPathFetcher> Planner<'a, F> {
    /// Create a new planner.
    pub fn new(fetcher: &'a F, config: &'a PlannerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Run the whole pipeline for one request.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        self.config.validate()?;
        request.validate()?;

        let cap = self.config.max_itineraries;
        match order_count(request.destinations.len()) {
            Some(count) if count <= cap => {}
            count => {
                return Err(PlanError::ItineraryCapExceeded {
                    count: count.unwrap_or(usize::MAX),
                    cap,
                });
            }
        }

        let orders = enumerate_orders(&request.origin, &request.destinations)?;
        let keys = unique_leg_keys(&orders);

        debug!(
            origin = %request.origin,
            destinations = request.destinations.len(),
            orderings = orders.len(),
            unique_legs = keys.len(),
            "Enumerated stop orders"
        );

        let mut stats = PlanStats {
            orderings: orders.len(),
            unique_legs: keys.len(),
            ..PlanStats::default()
        };

        let table = fetch_legs(self.fetcher, keys, self.config).await;
        stats.fetch_requests = table.requests();
        stats.unavailable_legs = table.unavailable().to_vec();

        let mut assembly = assemble(&orders, &table, cap)?;
        stats.eliminated_orders = assembly.eliminated.clone();
        stats.itineraries = assembly.itineraries.len();

        if assembly.itineraries.is_empty() {
            return Err(PlanError::NoViableItineraries {
                orderings: orders.len(),
            });
        }

        let problem = SelectionProblem::from_itineraries(&assembly.itineraries, self.config.max_duration);
        let solution = problem
            .solve(self.config.solver_timeout())
            .map_err(|e| match e {
                SolveError::Timeout(limit) => PlanError::SolverTimeout(limit),
            })?;
        stats.solver_nodes = solution.nodes_explored();

        let chosen = match solution.selection() {
            Selection::Chosen(index) => index,
            Selection::Infeasible => {
                return Err(PlanError::SolverInfeasible {
                    itineraries: assembly.itineraries.len(),
                    budget: self.config.max_duration,
                });
            }
        };

        let itinerary = assembly.itineraries.swap_remove(chosen);

        info!(
            order = %itinerary.order(),
            total_value = itinerary.total_value(),
            total_duration = itinerary.total_duration(),
            orderings = stats.orderings,
            unique_legs = stats.unique_legs,
            unavailable_legs = stats.unavailable_legs.len(),
            itineraries = stats.itineraries,
            "Selected itinerary"
        );

        Ok(PlanResult { itinerary, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LegCandidate, LegKey};
    use crate::planner::fetch::FetchError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn code(s: &str) -> StopCode {
        StopCode::parse(s).unwrap()
    }

    /// Mock fetcher: one direct candidate per known pair, counting calls.
    struct MockFetcher {
        legs: HashMap<LegKey, (f64, f64)>,
        calls: Mutex<usize>,
    }

    impl MockFetcher {
        fn new(legs: &[(&str, &str, f64, f64)]) -> Self {
            Self {
                legs: legs
                    .iter()
                    .map(|(a, b, v, d)| (LegKey::new(code(a), code(b)), (*v, *d)))
                    .collect(),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl LegPathFetcher for MockFetcher {
        async fn fetch(
            &self,
            source: &StopCode,
            destination: &StopCode,
            _k: usize,
        ) -> Result<Vec<LegCandidate>, FetchError> {
            *self.calls.lock().unwrap() += 1;
            let key = LegKey::new(source.clone(), destination.clone());
            Ok(self
                .legs
                .get(&key)
                .map(|(value, duration)| {
                    vec![
                        LegCandidate::new(
                            0,
                            100.0,
                            vec![source.clone(), destination.clone()],
                            *value,
                            *duration,
                        )
                        .unwrap(),
                    ]
                })
                .unwrap_or_default())
        }
    }

    fn request(origin: &str, dests: &[&str]) -> PlanRequest {
        PlanRequest::parse(origin, dests).unwrap()
    }

    #[tokio::test]
    async fn single_destination() {
        let fetcher = MockFetcher::new(&[("O", "A", 5.0, 2.0)]);
        let config = PlannerConfig::default().with_max_duration(6.0);
        let planner = Planner::new(&fetcher, &config);

        let result = planner.plan(&request("O", &["A"])).await.unwrap();

        assert_eq!(result.itinerary.total_value(), 5.0);
        assert_eq!(result.stats.orderings, 1);
        assert_eq!(result.stats.itineraries, 1);
    }

    #[tokio::test]
    async fn invalid_input_makes_no_fetches() {
        let fetcher = MockFetcher::new(&[]);
        let config = PlannerConfig::default();
        let planner = Planner::new(&fetcher, &config);

        let err = planner.plan(&request("O", &["A", "A"])).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(DomainError::DuplicateDestination(_))
        ));

        let err = planner.plan(&request("O", &[])).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(DomainError::NoDestinations)));

        let err = planner.plan(&request("O", &["O"])).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(DomainError::DestinationIsOrigin(_))
        ));

        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let fetcher = MockFetcher::new(&[]);
        let config = PlannerConfig::default().with_candidates_per_leg(0);
        let planner = Planner::new(&fetcher, &config);

        let err = planner.plan(&request("O", &["A"])).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn shared_legs_fetched_once() {
        let fetcher = MockFetcher::new(&[
            ("O", "A", 1.0, 1.0),
            ("O", "B", 1.0, 1.0),
            ("O", "C", 1.0, 1.0),
            ("A", "B", 1.0, 1.0),
            ("B", "A", 1.0, 1.0),
            ("A", "C", 1.0, 1.0),
            ("C", "A", 1.0, 1.0),
            ("B", "C", 1.0, 1.0),
            ("C", "B", 1.0, 1.0),
        ]);
        let config = PlannerConfig::default().with_max_duration(10.0);
        let planner = Planner::new(&fetcher, &config);

        let result = planner.plan(&request("O", &["A", "B", "C"])).await.unwrap();

        // 6 orders * 3 legs = 18 legs, but only 9 distinct pairs
        assert_eq!(result.stats.orderings, 6);
        assert_eq!(result.stats.unique_legs, 9);
        assert_eq!(fetcher.call_count(), 9);
        assert_eq!(result.stats.fetch_requests, 9);
    }

    #[tokio::test]
    async fn every_leg_failing_is_no_viable_itineraries() {
        let fetcher = MockFetcher::new(&[]);
        let config = PlannerConfig::default();
        let planner = Planner::new(&fetcher, &config);

        let err = planner.plan(&request("O", &["A", "B"])).await.unwrap_err();
        assert!(matches!(err, PlanError::NoViableItineraries { orderings: 2 }));
    }

    #[tokio::test]
    async fn factorial_over_cap_fails_before_fetching() {
        let fetcher = MockFetcher::new(&[]);
        let config = PlannerConfig::default().with_max_itineraries(5);
        let planner = Planner::new(&fetcher, &config);

        let err = planner.plan(&request("O", &["A", "B", "C"])).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::ItineraryCapExceeded { count: 6, cap: 5 }
        ));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn zero_solver_timeout_is_rejected_before_fetching() {
        let fetcher = MockFetcher::new(&[("O", "A", 5.0, 2.0)]);
        let config = PlannerConfig::default().with_solver_timeout(0);
        let planner = Planner::new(&fetcher, &config);

        let err = planner.plan(&request("O", &["A"])).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: solver_timeout_secs must be at least 1"
        );
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn plan_future_is_send() {
        fn assert_send<T: Send>(_: T) {}

        let fetcher = MockFetcher::new(&[("O", "A", 5.0, 2.0)]);
        let config = PlannerConfig::default();
        let request = request("O", &["A"]);
        assert_send(Planner::new(&fetcher, &config).plan(&request));
    }
}
