//! Domain error types.
//!
//! These errors represent validation failures in the domain layer: a
//! destination set that cannot be turned into stop orders, or a leg
//! candidate whose numbers cannot be aggregated. They are distinct from
//! collaborator/IO errors.

use super::{InvalidStopCode, StopCode};

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A code could not be parsed
    #[error(transparent)]
    InvalidCode(#[from] InvalidStopCode),

    /// No destinations were supplied
    #[error("at least one destination is required")]
    NoDestinations,

    /// The same destination appears more than once
    #[error("destination {0} is listed more than once")]
    DuplicateDestination(StopCode),

    /// A destination equals the origin
    #[error("destination {0} is the origin")]
    DestinationIsOrigin(StopCode),

    /// A candidate carries a NaN or infinite number
    #[error("leg candidate field {0} is not a finite number")]
    NonFiniteField(&'static str),

    /// A candidate path has fewer than two nodes
    #[error("leg candidate path must have at least two nodes, got {0}")]
    PathTooShort(usize),

    /// An itinerary was built with no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}
