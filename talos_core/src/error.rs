// talos_core/src/error.rs

use thiserror::Error;

/// Errors reported by cost-term lifecycle and evaluation calls.
///
/// All failures are synchronous: the call that detects the problem returns
/// the error and leaves the term in its last valid state. Nothing is retried
/// internally and nothing panics.
#[derive(Debug, Error)]
pub enum CostTermError {
    /// The planning model has no distance field for the requested group.
    #[error("no distance field has been built for group '{0}'")]
    MissingDistanceField(String),

    /// A required configuration key is absent.
    #[error("missing required configuration parameter '{0}'")]
    MissingParameter(&'static str),

    /// A required configuration key is present but not numeric.
    #[error("configuration parameter '{0}' must be a number")]
    ParameterType(&'static str),

    /// A configuration value is outside its valid domain.
    #[error("configuration parameter '{key}' is out of range: {value}")]
    ParameterRange { key: &'static str, value: f64 },

    /// The request's start state could not be converted into a working
    /// configuration.
    #[error("failed to build start state: {0}")]
    StartStateConversion(String),

    /// A lifecycle call arrived before `initialize` succeeded.
    #[error("cost term has not been initialized with a planning model")]
    NotInitialized,

    /// Evaluation was attempted without a bound planning request.
    #[error("no planning request is bound; call bind_request first")]
    NotBound,

    /// The trajectory has fewer columns than the requested timestep window.
    #[error("trajectory has {have} timesteps but the requested window ends at {need}")]
    TrajectoryTooShort { have: usize, need: usize },
}

/// Result type for cost-term operations.
pub type Result<T> = std::result::Result<T, CostTermError>;
