//! Error types for limiter configuration.

use thiserror::Error;

/// Main error type for limiter configuration operations.
#[derive(Error, Debug)]
pub enum LimiterError {
    /// A field violates its invariant (negative, zero granularity, above `i64::MAX`)
    #[error("Invalid configuration: field `{field}` has invalid value {value}")]
    InvalidConfiguration { field: &'static str, value: i128 },

    /// A limiter entry carries a key that names no field
    #[error("Invalid configuration: unknown field `{0}`")]
    UnknownField(String),

    /// A token does not name any variant of a closed enum
    #[error("Unknown {kind} `{token}`, expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        token: String,
        expected: &'static str,
    },

    /// The same rule identity appears more than once in a rule set
    #[error("Duplicate limiter rule: {0}")]
    DuplicateRule(String),

    /// Configuration documents that cannot be parsed or loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LimiterError {
    /// Name of the offending field, for invariant violations.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LimiterError::InvalidConfiguration { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result type alias for limiter configuration operations.
pub type Result<T> = std::result::Result<T, LimiterError>;
