//! Error types for the simulator.
//!
//! Two families matter to callers: configuration errors, which are raised
//! before a simulator exists, and invariant violations, which mean the engine
//! itself is broken and must never be retried.

use thiserror::Error;

/// Main error type for simulator operations.
///
/// # Examples
///
/// ```
/// use aprender_vmsim::error::SimError;
///
/// let err = SimError::invalid_config("num_frames", 0, "> 0");
/// assert!(err.to_string().contains("num_frames"));
/// assert!(err.is_configuration());
/// ```
#[derive(Error, Debug)]
pub enum SimError {
    /// A sizing parameter is out of range.
    #[error("Invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Replacement policy name not recognized.
    #[error("Unknown replacement policy: {0} (expected LRU or SecondChance)")]
    UnknownPolicy(String),

    /// Engine bookkeeping is inconsistent. Indicates a defect, not bad input.
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    /// A trace line could not be parsed as an address.
    #[error("Trace parse error at line {line}: {content:?}")]
    TraceParse {
        /// 1-based line number
        line: usize,
        /// Offending line content
        content: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Create an invalid configuration error with descriptive context
    #[must_use]
    pub fn invalid_config(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create an invariant violation error
    #[must_use]
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// True for errors raised while validating configuration
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::UnknownPolicy(_))
    }

    /// True for errors that indicate an engine defect
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SimError>;
