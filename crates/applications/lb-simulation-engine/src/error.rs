//! Error types for the simulation engine

use thiserror::Error;

/// Simulation result type
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that can occur while configuring or running a simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Fewer positional values than the declared server count requires
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// More positional values than the declared server count allows
    #[error("Unexpected trailing arguments: {0:?}")]
    TrailingArguments(Vec<String>),

    /// A value that does not parse as the expected number type
    #[error("Invalid number for {name}: {value:?}")]
    InvalidNumber { name: String, value: String },

    #[error("Server count must be at least 1, got {0}")]
    InvalidServerCount(i64),

    /// Arrival or service rate that is not a positive finite number
    #[error("Rate for {name} must be positive and finite, got {value}")]
    InvalidRate { name: String, value: f64 },

    #[error("Horizon must be finite, got {0}")]
    InvalidHorizon(f64),

    /// Routing weights that cannot form a categorical distribution
    #[error("Invalid routing weights: {0}")]
    InvalidWeights(String),

    #[error("Capacity for server {server} must be a non-negative integer, got {value}")]
    InvalidCapacity { server: usize, value: i64 },

    /// Internal state the engine should never reach
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SimulationError {
    /// Create an invalid number error
    pub fn invalid_number(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an invalid rate error
    pub fn invalid_rate(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidRate {
            name: name.into(),
            value,
        }
    }

    /// Create an invalid weights error
    pub fn invalid_weights(msg: impl Into<String>) -> Self {
        Self::InvalidWeights(msg.into())
    }

    /// Create an invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Whether this error stems from bad input rather than an engine defect
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}
