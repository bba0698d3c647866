//! Constrained selection of the best itinerary.
//!
//! The selection is a binary program with one decision variable `x_i` per
//! itinerary:
//!
//! ```text
//! maximize    sum(value_i * x_i)
//! subject to  sum(duration_i * x_i) <= budget
//!             sum(x_i) = 1
//!             x_i in {0, 1}
//! ```
//!
//! The cardinality row makes every feasible point set exactly one
//! variable, so the program is solved exactly by fixing to zero every
//! variable whose duration alone breaks the budget row and taking the best
//! remaining one. When no variable survives, the program is infeasible;
//! that state is carried explicitly and never confused with a zero-value
//! choice.
//!
//! Ties on value are broken by lower duration, then lower distance, then
//! the earlier variable (enumeration order).

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::Itinerary;

/// Absolute slack allowed on the budget row, absorbing summation error.
const BUDGET_TOLERANCE: f64 = 1e-9;

/// Variables examined between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 4096;

/// Coefficients of one decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    /// Objective coefficient.
    pub value: f64,
    /// Budget row coefficient.
    pub duration: f64,
    /// Tie-break only.
    pub distance: f64,
}

impl Variable {
    /// Returns true if `self` beats `other` as the selected variable.
    /// Variables equal under `==` do not beat each other, so the earlier
    /// one stays. In particular `-0.0` and `0.0` tie.
    fn beats(&self, other: &Variable) -> bool {
        let ordering = compare(self.value, other.value)
            .then_with(|| compare(other.duration, self.duration))
            .then_with(|| compare(other.distance, self.distance));
        ordering == Ordering::Greater
    }
}

/// Numeric comparison; incomparable values (NaN) count as equal.
fn compare(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Exactly this variable is set.
    Chosen(usize),
    /// No assignment satisfies the constraints.
    Infeasible,
}

/// Result of a successful solve.
#[derive(Debug, Clone)]
pub struct Solution {
    selection: Selection,
    variables: usize,
    nodes_explored: usize,
}

impl Solution {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Index of the chosen variable, if any.
    pub fn chosen(&self) -> Option<usize> {
        match self.selection {
            Selection::Chosen(i) => Some(i),
            Selection::Infeasible => None,
        }
    }

    /// Value of decision variable `i`.
    pub fn decision(&self, i: usize) -> bool {
        self.chosen() == Some(i)
    }

    /// Full decision vector, one entry per variable.
    pub fn decisions(&self) -> Vec<bool> {
        (0..self.variables).map(|i| self.decision(i)).collect()
    }

    /// Number of variables examined by the solver.
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }
}

/// Error from the selection solver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The wall-clock cap elapsed before the solve finished
    #[error("selection did not finish within {0:?}")]
    Timeout(Duration),
}

/// A selection program over a fixed set of variables.
#[derive(Debug, Clone)]
pub struct SelectionProblem {
    variables: Vec<Variable>,
    budget: f64,
}

impl SelectionProblem {
    pub fn new(variables: Vec<Variable>, budget: f64) -> Self {
        Self { variables, budget }
    }

    /// One variable per itinerary, in the given order.
    pub fn from_itineraries(itineraries: &[Itinerary], budget: f64) -> Self {
        let variables = itineraries
            .iter()
            .map(|i| Variable {
                value: i.total_value(),
                duration: i.total_duration(),
                distance: i.total_distance(),
            })
            .collect();
        Self::new(variables, budget)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Returns true if setting only variable `i` satisfies the budget row.
    fn fits_budget(&self, i: usize) -> bool {
        self.variables[i].duration <= self.budget + BUDGET_TOLERANCE
    }

    /// Solve to optimality, or fail once `time_limit` has elapsed.
    pub fn solve(&self, time_limit: Duration) -> Result<Solution, SolveError> {
        let started = Instant::now();
        let mut best: Option<usize> = None;
        let mut nodes_explored = 0;

        for (i, variable) in self.variables.iter().enumerate() {
            if i % DEADLINE_CHECK_INTERVAL == 0 && started.elapsed() >= time_limit {
                return Err(SolveError::Timeout(time_limit));
            }
            nodes_explored += 1;

            if !self.fits_budget(i) {
                continue;
            }

            best = match best {
                Some(b) if !variable.beats(&self.variables[b]) => Some(b),
                _ => Some(i),
            };
        }

        let selection = match best {
            Some(i) => Selection::Chosen(i),
            None => Selection::Infeasible,
        };

        debug!(
            variables = self.variables.len(),
            nodes_explored,
            ?selection,
            elapsed = ?started.elapsed(),
            "Selection solved"
        );

        Ok(Solution {
            selection,
            variables: self.variables.len(),
            nodes_explored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(value: f64, duration: f64, distance: f64) -> Variable {
        Variable {
            value,
            duration,
            distance,
        }
    }

    const LIMIT: Duration = Duration::from_secs(10);

    #[test]
    fn picks_max_value_within_budget() {
        let problem = SelectionProblem::new(
            vec![var(10.0, 8.0, 1.0), var(7.0, 5.0, 1.0), var(3.0, 1.0, 1.0)],
            6.0,
        );

        let solution = problem.solve(LIMIT).unwrap();
        assert_eq!(solution.selection(), Selection::Chosen(1));
        assert_eq!(solution.decisions(), vec![false, true, false]);
    }

    #[test]
    fn all_over_budget_is_infeasible() {
        let problem = SelectionProblem::new(vec![var(9.0, 5.0, 1.0), var(9.0, 5.0, 1.0)], 4.0);

        let solution = problem.solve(LIMIT).unwrap();
        assert_eq!(solution.selection(), Selection::Infeasible);
        assert_eq!(solution.chosen(), None);
        assert!(solution.decisions().iter().all(|d| !d));
    }

    #[test]
    fn empty_problem_is_infeasible() {
        let problem = SelectionProblem::new(Vec::new(), 10.0);
        assert!(problem.is_empty());
        assert_eq!(problem.solve(LIMIT).unwrap().selection(), Selection::Infeasible);
    }

    #[test]
    fn negative_and_zero_values_can_win() {
        let problem = SelectionProblem::new(vec![var(-2.0, 1.0, 1.0), var(-1.0, 1.0, 1.0)], 5.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(1));

        let problem = SelectionProblem::new(vec![var(0.0, 1.0, 1.0)], 5.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(0));
    }

    #[test]
    fn budget_is_inclusive() {
        let problem = SelectionProblem::new(vec![var(1.0, 6.0, 1.0)], 6.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(0));
    }

    #[test]
    fn budget_absorbs_summation_error() {
        // 0.1 + 0.2 = 0.30000000000000004
        let problem = SelectionProblem::new(vec![var(1.0, 0.1 + 0.2, 1.0)], 0.3);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(0));
    }

    #[test]
    fn tie_break_prefers_lower_duration() {
        let problem = SelectionProblem::new(vec![var(9.0, 5.0, 1.0), var(9.0, 4.0, 9.0)], 6.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(1));
    }

    #[test]
    fn tie_break_then_lower_distance() {
        let problem = SelectionProblem::new(vec![var(9.0, 5.0, 300.0), var(9.0, 5.0, 200.0)], 6.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(1));
    }

    #[test]
    fn tie_break_then_first_enumerated() {
        let problem = SelectionProblem::new(
            vec![var(1.0, 9.0, 1.0), var(9.0, 5.0, 200.0), var(9.0, 5.0, 200.0)],
            6.0,
        );
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(1));
    }

    #[test]
    fn signed_zeros_tie_to_first_enumerated() {
        let problem = SelectionProblem::new(vec![var(-0.0, 1.0, 1.0), var(0.0, 1.0, 1.0)], 6.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(0));

        let problem = SelectionProblem::new(vec![var(1.0, 0.0, -0.0), var(1.0, -0.0, 0.0)], 6.0);
        assert_eq!(problem.solve(LIMIT).unwrap().chosen(), Some(0));
    }

    #[test]
    fn zero_time_limit_times_out() {
        let problem = SelectionProblem::new(vec![var(1.0, 1.0, 1.0)], 6.0);
        assert_eq!(
            problem.solve(Duration::ZERO).unwrap_err(),
            SolveError::Timeout(Duration::ZERO)
        );
    }

    #[test]
    fn counts_nodes() {
        let problem = SelectionProblem::new(vec![var(1.0, 1.0, 1.0); 5], 6.0);
        let solution = problem.solve(LIMIT).unwrap();
        assert_eq!(solution.nodes_explored(), 5);
        assert_eq!(problem.len(), 5);
        assert_eq!(problem.budget(), 6.0);
    }
}
