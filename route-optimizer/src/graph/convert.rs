//! Conversion from graph engine rows to domain types.
//!
//! Bad rows are logged and skipped rather than failing the whole leg.

use tracing::warn;

use crate::domain::{DomainError, LegCandidate, LegKey, StopCode};

use super::types::{Airport, AirportRow, FixtureCandidate, PathRow, StatementResult};

/// Error converting one row.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Row does not have the expected shape
    #[error("malformed row: {0}")]
    Malformed(String),

    /// Row parsed but violates a domain invariant
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Convert the rows of a k-shortest-paths statement.
pub fn convert_statement(key: &LegKey, result: &StatementResult) -> Vec<LegCandidate> {
    let mut candidates = Vec::with_capacity(result.data.len());

    for (position, data) in result.data.iter().enumerate() {
        let converted = serde_json::from_value::<PathRow>(data.row.clone())
            .map_err(|e| ConversionError::Malformed(e.to_string()))
            .and_then(convert_row);

        match converted {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!(leg = %key, position, error = %e, "Skipping path row"),
        }
    }

    // Engine rows arrive best-first, but keep rank order explicit
    candidates.sort_by_key(|c| c.rank());
    candidates
}

/// Convert one typed row.
pub fn convert_row(row: PathRow) -> Result<LegCandidate, ConversionError> {
    let PathRow(rank, total_distance, node_names, value, duration) = row;
    let nodes = parse_nodes(&node_names)?;
    Ok(LegCandidate::new(rank, total_distance, nodes, value, duration)?)
}

/// Convert the rows of the airport catalog statement.
pub fn convert_airports(result: &StatementResult) -> Vec<Airport> {
    result
        .data
        .iter()
        .enumerate()
        .filter_map(|(position, data)| {
            serde_json::from_value::<AirportRow>(data.row.clone())
                .map_err(|e| ConversionError::Malformed(e.to_string()))
                .and_then(convert_airport)
                .inspect_err(|e| warn!(position, error = %e, "Skipping airport row"))
                .ok()
        })
        .collect()
}

fn convert_airport(row: AirportRow) -> Result<Airport, ConversionError> {
    let AirportRow(code, country, city, latitude, longitude) = row;
    let code = StopCode::parse(&code).map_err(|e| ConversionError::Invalid(e.into()))?;
    Ok(Airport {
        code,
        country,
        city,
        latitude,
        longitude,
    })
}

/// Convert the candidates of one fixture leg, ranked by position.
pub fn convert_fixture(key: &LegKey, fixture: &[FixtureCandidate]) -> Vec<LegCandidate> {
    fixture
        .iter()
        .enumerate()
        .filter_map(|(rank, c)| {
            let converted = parse_nodes(&c.node_names).and_then(|nodes| {
                Ok(LegCandidate::new(
                    rank,
                    c.total_distance,
                    nodes,
                    c.value,
                    c.duration,
                )?)
            });
            converted
                .inspect_err(|e| warn!(leg = %key, rank, error = %e, "Skipping fixture candidate"))
                .ok()
        })
        .collect()
}

fn parse_nodes(names: &[String]) -> Result<Vec<StopCode>, ConversionError> {
    names
        .iter()
        .map(|n| StopCode::parse(n).map_err(|e| ConversionError::Invalid(e.into())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::DataRow;
    use serde_json::json;

    fn key() -> LegKey {
        LegKey::new(StopCode::parse("DFW").unwrap(), StopCode::parse("AMS").unwrap())
    }

    fn result(rows: Vec<serde_json::Value>) -> StatementResult {
        StatementResult {
            data: rows.into_iter().map(|row| DataRow { row }).collect(),
        }
    }

    #[test]
    fn converts_valid_rows() {
        let result = result(vec![
            json!([0, 4900.5, ["DFW", "AMS"], 7.25, 9.5]),
            json!([1, 5100.0, ["DFW", "YYZ", "AMS"], 9.0, 11.125]),
        ]);

        let candidates = convert_statement(&key(), &result);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].rank(), 0);
        assert_eq!(candidates[0].total_distance(), 4900.5);
        assert_eq!(candidates[1].nodes().len(), 3);
        assert_eq!(candidates[1].duration(), 11.125);
    }

    #[test]
    fn skips_bad_rows() {
        let result = result(vec![
            json!([0, 4900.5, ["DFW", "AMS"], 7.25, 9.5]),
            // value is null when no relationship matched
            json!([1, 5100.0, ["DFW", "YYZ", "AMS"], null, 11.0]),
            // single node
            json!([2, 0.0, ["DFW"], 1.0, 1.0]),
            // invalid code
            json!([3, 10.0, ["DFW", ""], 1.0, 1.0]),
            json!("not a row"),
        ]);

        let candidates = convert_statement(&key(), &result);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rank(), 0);
    }

    #[test]
    fn sorts_by_rank() {
        let result = result(vec![
            json!([1, 20.0, ["DFW", "AMS"], 1.0, 1.0]),
            json!([0, 10.0, ["DFW", "AMS"], 2.0, 2.0]),
        ]);

        let ranks: Vec<usize> = convert_statement(&key(), &result)
            .iter()
            .map(|c| c.rank())
            .collect();
        assert_eq!(ranks, vec![0, 1]);
    }

    #[test]
    fn fixture_candidates_ranked_by_position() {
        let fixture = vec![
            FixtureCandidate {
                total_distance: 10.0,
                node_names: vec!["DFW".into(), "AMS".into()],
                value: 3.0,
                duration: 1.0,
            },
            FixtureCandidate {
                total_distance: f64::NAN,
                node_names: vec!["DFW".into(), "AMS".into()],
                value: 3.0,
                duration: 1.0,
            },
            FixtureCandidate {
                total_distance: 12.0,
                node_names: vec!["DFW".into(), "YYZ".into(), "AMS".into()],
                value: 4.0,
                duration: 2.0,
            },
        ];

        let candidates = convert_fixture(&key(), &fixture);
        let ranks: Vec<usize> = candidates.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![0, 2]);
    }

    #[test]
    fn converts_airports_skipping_bad_codes() {
        let result = result(vec![
            json!(["DFW", "United States", "Dallas-Fort Worth", 32.8968, -97.038]),
            json!(["", "United States", "Nowhere", 0.0, 0.0]),
            json!(["IAH", null, null, null, null]),
            json!({"code": "JFK"}),
        ]);

        let airports = convert_airports(&result);

        let codes: Vec<&str> = airports.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["DFW", "IAH"]);
        assert_eq!(airports[0].city.as_deref(), Some("Dallas-Fort Worth"));
        assert_eq!(airports[1].latitude, None);
    }
}
