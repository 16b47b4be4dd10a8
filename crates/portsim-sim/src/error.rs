//! Error types for simulation.

use portsim_risk::CovarianceError;
use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that can occur while preparing or running a simulation.
///
/// Every variant is raised before the first trial runs; a simulation either
/// produces a complete ensemble or fails.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Weight, mean, covariance or universe dimensions disagree
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which input disagreed
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Covariance matrix cannot be Cholesky-factorised
    #[error("Covariance matrix is not positive definite: {0}")]
    NonPositiveDefiniteCovariance(#[source] CovarianceError),

    /// Invalid scalar configuration (horizon, simulation count, initial value...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Weight vector violates non-negativity or sum-to-one
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Asset universe is empty or contains duplicates
    #[error("Invalid asset universe: {0}")]
    InvalidUniverse(String),
}

impl From<CovarianceError> for SimulationError {
    fn from(err: CovarianceError) -> Self {
        match err {
            CovarianceError::DimensionMismatch { expected, actual } => Self::DimensionMismatch {
                what: "covariance matrix",
                expected,
                actual,
            },
            other => Self::NonPositiveDefiniteCovariance(other),
        }
    }
}
