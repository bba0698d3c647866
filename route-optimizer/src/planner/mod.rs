//! Route planner.
//!
//! This module answers: "Starting here, in which order should I visit these
//! stops, and along which paths, to collect the most value within my time
//! budget?"
//!
//! Every visiting order is enumerated, each distinct leg is fetched once from
//! the path engine, candidate paths are combined into full itineraries, and
//! a binary selection program picks the single best one.

mod assemble;
mod config;
mod enumerate;
mod error;
mod fetch;
mod pipeline;
mod select;

pub use assemble::{Assembly, LegGroups, assemble};
pub use config::PlannerConfig;
pub use enumerate::{enumerate_orders, order_count, unique_leg_keys, validate_destinations};
pub use error::{LegUnavailable, PlanError};
pub use fetch::{FetchError, LegPathFetcher, LegTable, fetch_legs};
pub use pipeline::{PlanRequest, PlanResult, PlanStats, Planner};
pub use select::{Selection, SelectionProblem, Solution, SolveError, Variable};
