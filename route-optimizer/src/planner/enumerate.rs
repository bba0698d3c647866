//! Stop order enumeration and leg decomposition.
//!
//! Orders are produced in lexicographic order of the destinations' input
//! positions, so the same request always yields the same order ids.

use std::collections::HashSet;

use crate::domain::{DomainError, LegKey, OrderId, StopCode, StopOrder};

/// Validate a destination set against the origin.
pub fn validate_destinations(
    origin: &StopCode,
    destinations: &[StopCode],
) -> Result<(), DomainError> {
    if destinations.is_empty() {
        return Err(DomainError::NoDestinations);
    }

    let mut seen = HashSet::with_capacity(destinations.len());
    for destination in destinations {
        if destination == origin {
            return Err(DomainError::DestinationIsOrigin(destination.clone()));
        }
        if !seen.insert(destination) {
            return Err(DomainError::DuplicateDestination(destination.clone()));
        }
    }

    Ok(())
}

/// Number of stop orders for `n` destinations (n!), or `None` on overflow.
pub fn order_count(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, i| acc.checked_mul(i))
}

/// Build every stop order: the origin followed by each permutation of the
/// destinations.
pub fn enumerate_orders(
    origin: &StopCode,
    destinations: &[StopCode],
) -> Result<Vec<StopOrder>, DomainError> {
    validate_destinations(origin, destinations)?;

    let mut orders = Vec::with_capacity(order_count(destinations.len()).unwrap_or(0));
    let mut perm: Vec<usize> = (0..destinations.len()).collect();

    loop {
        let mut stops = Vec::with_capacity(destinations.len() + 1);
        stops.push(origin.clone());
        stops.extend(perm.iter().map(|&i| destinations[i].clone()));
        orders.push(StopOrder::new(OrderId(orders.len()), stops));

        if !next_permutation(&mut perm) {
            break;
        }
    }

    Ok(orders)
}

/// Distinct leg keys across all orders, in first-seen order.
pub fn unique_leg_keys(orders: &[StopOrder]) -> Vec<LegKey> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for order in orders {
        for leg in order.legs() {
            if seen.insert(leg.key.clone()) {
                keys.push(leg.key);
            }
        }
    }

    keys
}

/// Advance `perm` to the next lexicographic permutation.
/// Returns false (leaving `perm` untouched) when it is already the last.
fn next_permutation(perm: &mut [usize]) -> bool {
    if perm.len() < 2 {
        return false;
    }

    let Some(pivot) = (0..perm.len() - 1).rev().find(|&i| perm[i] < perm[i + 1]) else {
        return false;
    };

    // Rightmost element greater than the pivot; one exists since perm[pivot] < perm[pivot + 1]
    let successor = (pivot + 1..perm.len())
        .rev()
        .find(|&j| perm[j] > perm[pivot])
        .unwrap_or(pivot + 1);

    perm.swap(pivot, successor);
    perm[pivot + 1..].reverse();
    true
}
