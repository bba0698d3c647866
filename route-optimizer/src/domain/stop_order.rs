//! Stop orders and the legs they decompose into.

use std::fmt;
use std::sync::Arc;

use super::StopCode;

/// Position of a stop order in the enumeration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub usize);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed (source, destination) pair, independent of any stop order.
///
/// This is the key under which leg candidates are fetched and cached: every
/// stop order that contains the same hop shares one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegKey {
    pub source: StopCode,
    pub destination: StopCode,
}

impl LegKey {
    /// Creates a new leg key.
    pub fn new(source: StopCode, destination: StopCode) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl fmt::Display for LegKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.destination)
    }
}

/// One hop of a stop order, identified by (order id, leg index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub order: OrderId,
    pub index: usize,
    pub key: LegKey,
}

/// The origin followed by one permutation of the destinations.
///
/// # Invariants
///
/// - At least two stops (origin plus one destination)
/// - The origin is the first stop and appears nowhere else
/// - No stop appears twice
///
/// These are enforced by the enumerator, the only producer of stop orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOrder {
    id: OrderId,
    stops: Arc<[StopCode]>,
}

impl StopOrder {
    /// Constructs a stop order from pre-validated stops.
    pub(crate) fn new(id: OrderId, stops: Vec<StopCode>) -> Self {
        debug_assert!(stops.len() >= 2, "stop order needs an origin and a destination");
        Self {
            id,
            stops: stops.into(),
        }
    }

    /// Returns the id of this order within its run.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns all stops, origin first.
    pub fn stops(&self) -> &[StopCode] {
        &self.stops
    }

    /// Returns the fixed origin.
    pub fn origin(&self) -> &StopCode {
        &self.stops[0]
    }

    /// Number of legs (one fewer than the number of stops).
    pub fn leg_count(&self) -> usize {
        self.stops.len() - 1
    }

    /// Decomposes this order into its legs: `leg[i] = (stops[i], stops[i + 1])`.
    pub fn legs(&self) -> Vec<Leg> {
        self.stops
            .windows(2)
            .enumerate()
            .map(|(index, pair)| Leg {
                order: self.id,
                index,
                key: LegKey::new(pair[0].clone(), pair[1].clone()),
            })
            .collect()
    }
}

impl fmt::Display for StopOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StopCode {
        StopCode::parse(s).unwrap()
    }

    fn order(stops: &[&str]) -> StopOrder {
        StopOrder::new(OrderId(0), stops.iter().map(|s| code(s)).collect())
    }

    #[test]
    fn legs_are_consecutive_pairs() {
        let order = order(&["DFW", "IAH", "YYZ", "AMS"]);
        let legs = order.legs();

        assert_eq!(legs.len(), 3);
        assert_eq!(order.leg_count(), 3);

        assert_eq!(legs[0].key, LegKey::new(code("DFW"), code("IAH")));
        assert_eq!(legs[1].key, LegKey::new(code("IAH"), code("YYZ")));
        assert_eq!(legs[2].key, LegKey::new(code("YYZ"), code("AMS")));

        for (i, leg) in legs.iter().enumerate() {
            assert_eq!(leg.index, i);
            assert_eq!(leg.order, OrderId(0));
        }
    }

    #[test]
    fn single_destination_has_one_leg() {
        let order = order(&["DFW", "IAH"]);
        let legs = order.legs();
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].key.to_string(), "DFW->IAH");
    }

    #[test]
    fn display() {
        let order = order(&["O", "B", "A"]);
        assert_eq!(order.to_string(), "O-B-A");
        assert_eq!(order.origin(), &code("O"));
        assert_eq!(OrderId(3).to_string(), "#3");
    }
}
