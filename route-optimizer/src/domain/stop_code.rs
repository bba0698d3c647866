//! Stop code type.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code {input:?}: {reason}")]
pub struct InvalidStopCode {
    input: String,
    reason: &'static str,
}

/// An opaque token identifying a stop (e.g. an airport code such as `DFW`).
///
/// The planner never interprets the contents; it only compares, hashes and
/// prints codes. Construction rejects empty input, whitespace and control
/// characters so a code can always be echoed back in a payload unchanged.
///
/// # Examples
///
/// ```
/// use route_optimizer::domain::StopCode;
///
/// let dfw = StopCode::parse("DFW").unwrap();
/// assert_eq!(dfw.as_str(), "DFW");
///
/// // Empty and whitespace-bearing codes are rejected
/// assert!(StopCode::parse("").is_err());
/// assert!(StopCode::parse("D FW").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopCode(Arc<str>);

impl StopCode {
    /// Parse a stop code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let invalid = |reason| InvalidStopCode {
            input: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("must not contain whitespace or control characters"));
        }

        Ok(StopCode(Arc::from(s)))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopCode {
    type Error = InvalidStopCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopCode::parse(&value)
    }
}

impl From<StopCode> for String {
    fn from(code: StopCode) -> Self {
        code.0.to_string()
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.as_str())
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
