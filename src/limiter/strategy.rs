//! Overflow strategy selector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LimiterError;

/// Action a limiter engine takes when an enabled axis overflows.
///
/// The same strategy applies to whichever axis rejected the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Strategy {
    /// Reject the excess call with no side channel
    #[default]
    #[serde(rename = "NON")]
    Non,
    /// Run the caller-supplied fallback instead of the primary operation
    #[serde(rename = "FALLBACK")]
    Fallback,
    /// Raise a "limit exceeded" error to the caller
    #[serde(rename = "EXCEPTION")]
    Exception,
}

impl Strategy {
    /// All strategies.
    pub const ALL: [Strategy; 3] = [Strategy::Non, Strategy::Fallback, Strategy::Exception];

    /// The token this strategy is written as.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Non => "NON",
            Strategy::Fallback => "FALLBACK",
            Strategy::Exception => "EXCEPTION",
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Strategy::Non => "The skip of limiter, when over flow",
            Strategy::Fallback => "The fallback of limiter, when over flow",
            Strategy::Exception => "The throw 'limit exceeded' error of limiter, when over flow",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = LimiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NON" => Ok(Strategy::Non),
            "FALLBACK" => Ok(Strategy::Fallback),
            "EXCEPTION" => Ok(Strategy::Exception),
            _ => Err(LimiterError::UnknownVariant {
                kind: "strategy",
                token: s.to_string(),
                expected: "NON, FALLBACK, EXCEPTION",
            }),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = LimiterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
