//! Path engine adapter.
//!
//! Candidate paths for a leg come from a Neo4j database running Graph Data
//! Science, queried over its HTTP transaction API. Airports are `Airport`
//! nodes keyed by `code`; flights are `FLEW_TO` relationships carrying
//! `distance`, `value` and `duration`.
//!
//! [`MockGraphClient`] serves the same shape of data from a JSON fixture.
//! [`PathEngine`] is whichever of the two was configured.

mod client;
mod convert;
mod engine;
mod error;
mod mock;
mod types;

pub use client::{GraphClient, GraphConfig};
pub use convert::ConversionError;
pub use engine::PathEngine;
pub use error::GraphError;
pub use mock::MockGraphClient;
pub use types::{Airport, FixtureCandidate, FixtureLeg, PathFixture};
