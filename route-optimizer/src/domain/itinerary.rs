//! Itinerary types.
//!
//! An `Itinerary` is one stop order with exactly one chosen candidate per
//! leg. Its totals are computed once at construction as plain sums over the
//! candidates, in leg order.

use std::sync::Arc;

use super::{DomainError, LegCandidate, OrderId, StopCode};

/// A complete, fully-resolved route.
///
/// # Invariants
///
/// - At least one leg
/// - Legs are ordered as in the stop order they came from
/// - Totals equal the sums of the per-leg candidate fields
#[derive(Debug, Clone)]
pub struct Itinerary {
    order: OrderId,
    legs: Vec<Arc<LegCandidate>>,
    total_distance: f64,
    total_value: f64,
    total_duration: f64,
}

impl Itinerary {
    /// Builds an itinerary from one candidate per leg, aggregating totals.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyItinerary` if `legs` is empty.
    pub fn new(order: OrderId, legs: Vec<Arc<LegCandidate>>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        let total_distance = legs.iter().map(|c| c.total_distance()).sum();
        let total_value = legs.iter().map(|c| c.value()).sum();
        let total_duration = legs.iter().map(|c| c.duration()).sum();

        Ok(Self {
            order,
            legs,
            total_distance,
            total_value,
            total_duration,
        })
    }

    /// Stop order this itinerary was assembled from.
    pub fn order(&self) -> OrderId {
        self.order
    }

    /// Chosen candidate for each leg, in leg order.
    pub fn legs(&self) -> &[Arc<LegCandidate>] {
        &self.legs
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Per-leg node sequences, in leg order.
    ///
    /// Junction nodes shared by consecutive legs appear in both sequences.
    pub fn route(&self) -> Vec<Vec<StopCode>> {
        self.legs.iter().map(|c| c.nodes().to_vec()).collect()
    }

    /// Engine rank of the chosen candidate for each leg.
    pub fn ranks(&self) -> Vec<usize> {
        self.legs.iter().map(|c| c.rank()).collect()
    }
}
