//! Domain types for the route optimizer.
//!
//! This module contains the core domain model types: stop codes, stop
//! orders and their legs, leg candidates from the path engine, and the
//! itineraries assembled from them. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod candidate;
mod error;
mod itinerary;
mod stop_code;
mod stop_order;

pub use candidate::LegCandidate;
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use stop_code::{InvalidStopCode, StopCode};
pub use stop_order::{Leg, LegKey, OrderId, StopOrder};
