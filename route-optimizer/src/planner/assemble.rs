//! Itinerary assembly.
//!
//! For each stop order, the candidates of every leg are looked up through an
//! explicit `(order id, leg index)` map and combined by Cartesian product:
//! one itinerary per choice of one candidate per leg. The product size is
//! computed before anything is materialised so the itinerary cap is
//! enforced up front.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{Itinerary, LegCandidate, OrderId, StopOrder};

use super::error::PlanError;
use super::fetch::LegTable;

/// Candidates grouped by (order id, leg index).
pub struct LegGroups<'a> {
    groups: BTreeMap<(OrderId, usize), &'a [Arc<LegCandidate>]>,
}

impl<'a> LegGroups<'a> {
    /// Resolve every leg of every order against the fetched table.
    pub fn build(orders: &[StopOrder], table: &'a LegTable) -> Self {
        let mut groups = BTreeMap::new();
        for order in orders {
            for leg in order.legs() {
                groups.insert((leg.order, leg.index), table.candidates(&leg.key));
            }
        }
        Self { groups }
    }

    /// Candidates for one leg of one order.
    pub fn get(&self, order: OrderId, leg_index: usize) -> &'a [Arc<LegCandidate>] {
        self.groups.get(&(order, leg_index)).copied().unwrap_or(&[])
    }

    /// Candidate groups for all legs of an order, in leg order.
    fn for_order(&self, order: &StopOrder) -> Vec<&'a [Arc<LegCandidate>]> {
        (0..order.leg_count())
            .map(|index| self.get(order.id(), index))
            .collect()
    }
}

/// Output of assembly.
#[derive(Debug)]
pub struct Assembly {
    /// Itineraries in enumeration order: by order id, then by candidate
    /// position in each leg (last leg varying fastest).
    pub itineraries: Vec<Itinerary>,

    /// Orders dropped because at least one leg has no candidates.
    pub eliminated: Vec<OrderId>,
}

/// Number of itineraries an order would contribute (product of candidate
/// counts), saturating at `usize::MAX`. Zero if any leg has no candidates.
fn combination_count(groups: &[&[Arc<LegCandidate>]]) -> usize {
    groups
        .iter()
        .try_fold(1usize, |acc, g| acc.checked_mul(g.len()))
        .unwrap_or(usize::MAX)
}

/// Assemble every itinerary of every order, failing if there would be more
/// than `cap`.
pub fn assemble(
    orders: &[StopOrder],
    table: &LegTable,
    cap: usize,
) -> Result<Assembly, PlanError> {
    let groups = LegGroups::build(orders, table);

    let mut viable = Vec::with_capacity(orders.len());
    let mut eliminated = Vec::new();
    let mut total = 0usize;

    for order in orders {
        let order_groups = groups.for_order(order);
        let count = combination_count(&order_groups);
        if count == 0 {
            debug!(order = %order, "Order eliminated: a leg has no candidates");
            eliminated.push(order.id());
            continue;
        }
        total = total.saturating_add(count);
        viable.push((order.id(), order_groups));
    }

    if total > cap {
        return Err(PlanError::ItineraryCapExceeded { count: total, cap });
    }

    let mut itineraries = Vec::with_capacity(total);
    for (order, order_groups) in &viable {
        push_combinations(*order, order_groups, &mut itineraries);
    }

    debug!(
        itineraries = itineraries.len(),
        viable_orders = viable.len(),
        eliminated_orders = eliminated.len(),
        "Assembly complete"
    );

    Ok(Assembly {
        itineraries,
        eliminated,
    })
}

/// Push the Cartesian product of `groups` as itineraries of `order`.
/// Every group must be non-empty.
fn push_combinations(
    order: OrderId,
    groups: &[&[Arc<LegCandidate>]],
    out: &mut Vec<Itinerary>,
) {
    let mut choice = vec![0usize; groups.len()];

    loop {
        let legs = choice
            .iter()
            .zip(groups)
            .map(|(&i, group)| group[i].clone())
            .collect();

        // Orders always have at least one leg
        if let Ok(itinerary) = Itinerary::new(order, legs) {
            out.push(itinerary);
        }

        // Odometer increment, last leg fastest
        let mut pos = groups.len();
        loop {
            if pos == 0 {
                return;
            }
            pos -= 1;
            choice[pos] += 1;
            if choice[pos] < groups[pos].len() {
                break;
            }
            choice[pos] = 0;
        }
    }
}
