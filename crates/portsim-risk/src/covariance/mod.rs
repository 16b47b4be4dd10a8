//! Asset return covariance estimation
//!
//! Provides estimators for the daily return covariance matrix that drives the
//! correlated shock generator, along with the factorisation and
//! positive-definiteness utilities the simulator relies on.

pub mod ewma;
pub mod sample;
pub mod utils;

pub use ewma::{EwmaConfig, EwmaCovarianceEstimator};
pub use sample::SampleCovarianceEstimator;
pub use utils::{
    cholesky, correlation_from_covariance, is_positive_definite, regularize_with_jitter,
    reconstruct_from_cholesky,
};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during covariance estimation
#[derive(Debug, Error)]
pub enum CovarianceError {
    /// Insufficient data for estimation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Matrix is not positive definite
    #[error("Covariance matrix is not positive definite (pivot {pivot} = {value:e})")]
    NotPositiveDefinite {
        /// Row at which the factorisation broke down
        pivot: usize,
        /// Offending diagonal value before the square root
        value: f64,
    },

    /// Invalid decay parameter
    #[error("Invalid decay parameter: {0} (must be between 0 and 1)")]
    InvalidDecay(f64),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Trait for covariance matrix estimators
pub trait CovarianceEstimator {
    /// Estimate the covariance matrix from asset returns
    ///
    /// # Arguments
    /// * `returns` - Matrix where each row is a day and each column is an asset
    ///
    /// # Returns
    /// * Estimated covariance matrix (N x N where N is number of assets)
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError>;
}

/// Covariance estimation method selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum CovarianceMethod {
    /// Equally weighted sample covariance (unbiased, n - 1 denominator)
    #[default]
    Sample,
    /// Exponentially weighted covariance with the given decay factor
    Ewma {
        /// Decay factor λ in (0, 1)
        decay: f64,
    },
}

impl CovarianceMethod {
    /// Estimate a covariance matrix from daily returns with this method.
    pub fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        match *self {
            Self::Sample => SampleCovarianceEstimator::new().estimate(returns),
            Self::Ewma { decay } => EwmaCovarianceEstimator::new(EwmaConfig {
                decay,
                ..EwmaConfig::default()
            })?
            .estimate(returns),
        }
    }

    /// Short human-readable name of the method.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Ewma { .. } => "ewma",
        }
    }
}

impl CovarianceEstimator for CovarianceMethod {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        Self::estimate(self, returns)
    }
}
