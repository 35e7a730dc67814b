//! Time unit used to size rate windows.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LimiterError;

/// Unit of limiter granularity.
///
/// Tokens are the abbreviations `SEC`, `MIN`, `HOU` and `DAY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Unit {
    /// Seconds
    #[default]
    #[serde(rename = "SEC")]
    Sec,
    /// Minutes
    #[serde(rename = "MIN")]
    Min,
    /// Hours
    #[serde(rename = "HOU")]
    Hou,
    /// Days
    #[serde(rename = "DAY")]
    Day,
}

impl Unit {
    /// All units, shortest first.
    pub const ALL: [Unit; 4] = [Unit::Sec, Unit::Min, Unit::Hou, Unit::Day];

    /// Length of one unit in milliseconds.
    pub const fn millis(&self) -> u64 {
        match self {
            Unit::Sec => 1_000,
            Unit::Min => 60_000,
            Unit::Hou => 3_600_000,
            Unit::Day => 86_400_000,
        }
    }

    /// Length of a window of `granularity` units, in milliseconds.
    ///
    /// Saturates at `u64::MAX` rather than wrapping.
    pub const fn window_millis(&self, granularity: u64) -> u64 {
        granularity.saturating_mul(self.millis())
    }

    /// The token this unit is written as.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Sec => "SEC",
            Unit::Min => "MIN",
            Unit::Hou => "HOU",
            Unit::Day => "DAY",
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Unit::Sec => "The second of limiter granularity unit, abbreviation 'SEC'",
            Unit::Min => "The minute of limiter granularity unit, abbreviation 'MIN'",
            Unit::Hou => "The hour of limiter granularity unit, abbreviation 'HOU'",
            Unit::Day => "The day of limiter granularity unit, abbreviation 'DAY'",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = LimiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEC" => Ok(Unit::Sec),
            "MIN" => Ok(Unit::Min),
            "HOU" => Ok(Unit::Hou),
            "DAY" => Ok(Unit::Day),
            _ => Err(LimiterError::UnknownVariant {
                kind: "unit",
                token: s.to_string(),
                expected: "SEC, MIN, HOU, DAY",
            }),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = LimiterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_millis_exact() {
        assert_eq!(Unit::Sec.millis(), 1000);
        assert_eq!(Unit::Min.millis(), 60000);
        assert_eq!(Unit::Hou.millis(), 3600000);
        assert_eq!(Unit::Day.millis(), 86400000);
    }

    #[test]
    fn test_window_millis_large_granularity() {
        for unit in Unit::ALL {
            assert_eq!(unit.window_millis(1_000_000), 1_000_000 * unit.millis());
        }
        assert_eq!(Unit::Day.window_millis(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_unit_parse() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_unit_parse_rejects_unknown() {
        for token in ["BOGUS", "sec", "", "SECOND"] {
            let err = token.parse::<Unit>().unwrap_err();
            assert!(matches!(err, LimiterError::UnknownVariant { kind: "unit", .. }));
        }
    }

    #[test]
    fn test_unit_serde() {
        assert_eq!(serde_json::to_string(&Unit::Hou).unwrap(), "\"HOU\"");
        assert_eq!(serde_json::from_str::<Unit>("\"MIN\"").unwrap(), Unit::Min);
        assert!(serde_json::from_str::<Unit>("\"BOGUS\"").is_err());
    }
}
