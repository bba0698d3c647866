//! Leg candidate fetching.
//!
//! The path engine is an external collaborator behind [`LegPathFetcher`].
//! Each distinct leg key is fetched once, through a bounded pool of
//! in-flight requests, with a per-request timeout and bounded retries.
//! Results are merged into an immutable [`LegTable`] before assembly.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::{LegCandidate, LegKey, StopCode};

use super::config::PlannerConfig;
use super::error::LegUnavailable;

/// Error from a single path engine request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The engine or its transport reported a failure
    #[error("path engine request failed: {0}")]
    Engine(String),

    /// The request did not complete in time
    #[error("path engine request timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for providing ranked path candidates for a leg.
///
/// This abstraction lets the planner run against the real graph engine,
/// a fixture file, or in-memory test data. The returned future is `Send`
/// so a plan can run on a multi-threaded runtime, e.g. inside an HTTP
/// handler. Implementations may still be written as `async fn`.
pub trait LegPathFetcher: Send + Sync {
    /// Fetch up to `k` candidate paths from `source` to `destination`,
    /// ranked best-first by the engine's own cost metric.
    ///
    /// An empty vector means the engine knows no path for this pair.
    fn fetch(
        &self,
        source: &StopCode,
        destination: &StopCode,
        k: usize,
    ) -> impl Future<Output = Result<Vec<LegCandidate>, FetchError>> + Send;
}

/// Resolved candidates for every distinct leg of a run.
#[derive(Debug, Default)]
pub struct LegTable {
    paths: HashMap<LegKey, Arc<[Arc<LegCandidate>]>>,
    unavailable: Vec<LegUnavailable>,
    requests: usize,
}

impl LegTable {
    /// Candidates for a leg; empty when the leg is unavailable or unknown.
    pub fn candidates(&self, key: &LegKey) -> &[Arc<LegCandidate>] {
        self.paths.get(key).map(|c| &c[..]).unwrap_or(&[])
    }

    /// Returns true if the leg has at least one candidate.
    pub fn is_available(&self, key: &LegKey) -> bool {
        !self.candidates(key).is_empty()
    }

    /// Legs for which no candidate could be obtained.
    pub fn unavailable(&self) -> &[LegUnavailable] {
        &self.unavailable
    }

    /// Number of legs with candidates.
    pub fn available_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of requests issued to the fetcher, retries included.
    pub fn requests(&self) -> usize {
        self.requests
    }
}

/// Fetch candidates for each distinct key, at most
/// `max_concurrent_fetches` at a time.
///
/// Never fails: a leg that cannot be resolved is recorded as unavailable.
pub async fn fetch_legs<F: LegPathFetcher>(
    fetcher: &F,
    keys: Vec<LegKey>,
    config: &PlannerConfig,
) -> LegTable {
    let results: Vec<_> = stream::iter(keys)
        .map(|key| async move {
            let (outcome, attempts) = fetch_leg(fetcher, &key, config).await;
            (key, outcome, attempts)
        })
        .buffer_unordered(config.max_concurrent_fetches)
        .collect()
        .await;

    let mut table = LegTable::default();

    for (key, outcome, attempts) in results {
        table.requests += attempts;
        match outcome {
            Ok(candidates) => {
                debug!(leg = %key, candidates = candidates.len(), attempts, "Fetched leg");
                table.paths.insert(key, candidates.into());
            }
            Err(unavailable) => {
                warn!(leg = %key, reason = %unavailable.reason, "Leg unavailable");
                table.unavailable.push(unavailable);
            }
        }
    }

    // Completion order is arbitrary; keep diagnostics reproducible
    table.unavailable.sort_by(|a, b| a.key.cmp(&b.key));

    table
}

/// Fetch one leg with timeout and retries. Returns the outcome and the
/// number of attempts made.
async fn fetch_leg<F: LegPathFetcher>(
    fetcher: &F,
    key: &LegKey,
    config: &PlannerConfig,
) -> (Result<Vec<Arc<LegCandidate>>, LegUnavailable>, usize) {
    let k = config.candidates_per_leg;
    let timeout = config.fetch_timeout();
    let mut attempts = 0;

    loop {
        let result =
            match tokio::time::timeout(timeout, fetcher.fetch(&key.source, &key.destination, k))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };

        let retry = attempts as u32;
        attempts += 1;

        match result {
            Ok(candidates) => return (usable_candidates(key, candidates, k), attempts),
            Err(e) if retry < config.fetch_retries => {
                let delay = config.backoff(retry);
                debug!(leg = %key, error = %e, ?delay, "Fetch failed, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return (
                    Err(LegUnavailable {
                        key: key.clone(),
                        reason: e.to_string(),
                    }),
                    attempts,
                );
            }
        }
    }
}

/// Keep candidates that actually connect the leg's endpoints, up to `k`.
fn usable_candidates(
    key: &LegKey,
    candidates: Vec<LegCandidate>,
    k: usize,
) -> Result<Vec<Arc<LegCandidate>>, LegUnavailable> {
    let returned = candidates.len();

    let usable: Vec<Arc<LegCandidate>> = candidates
        .into_iter()
        .filter(|c| c.connects(&key.source, &key.destination))
        .take(k)
        .map(Arc::new)
        .collect();

    if usable.is_empty() {
        let reason = if returned == 0 {
            "path engine returned no candidates".to_string()
        } else {
            format!("none of {returned} candidates connects the leg endpoints")
        };
        return Err(LegUnavailable {
            key: key.clone(),
            reason,
        });
    }

    Ok(usable)
}
