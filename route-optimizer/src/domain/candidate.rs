//! Leg candidates: alternative paths returned by the path engine.

use super::{DomainError, StopCode};

/// One alternative path satisfying a leg.
///
/// Candidates are immutable once built. The numeric fields keep whatever
/// precision the path engine supplied; nothing here rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct LegCandidate {
    rank: usize,
    total_distance: f64,
    nodes: Vec<StopCode>,
    value: f64,
    duration: f64,
}

impl LegCandidate {
    /// Builds a candidate, rejecting non-finite numbers and degenerate paths.
    pub fn new(
        rank: usize,
        total_distance: f64,
        nodes: Vec<StopCode>,
        value: f64,
        duration: f64,
    ) -> Result<Self, DomainError> {
        for (name, field) in [
            ("total_distance", total_distance),
            ("value", value),
            ("duration", duration),
        ] {
            if !field.is_finite() {
                return Err(DomainError::NonFiniteField(name));
            }
        }

        if nodes.len() < 2 {
            return Err(DomainError::PathTooShort(nodes.len()));
        }

        Ok(Self {
            rank,
            total_distance,
            nodes,
            value,
            duration,
        })
    }

    /// Rank assigned by the path engine (0 is its best path).
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Node codes along the path, source first.
    pub fn nodes(&self) -> &[StopCode] {
        &self.nodes
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// First node of the path.
    pub fn source(&self) -> &StopCode {
        &self.nodes[0]
    }

    /// Last node of the path.
    pub fn destination(&self) -> &StopCode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Returns true if the path starts at `source` and ends at `destination`.
    pub fn connects(&self, source: &StopCode, destination: &StopCode) -> bool {
        self.source() == source && self.destination() == destination
    }
}
