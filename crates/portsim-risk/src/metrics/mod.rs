//! Risk metrics over a Monte Carlo ensemble
//!
//! Reduces a `T x M` matrix of simulated portfolio values (rows are days,
//! columns are independent trials) into tail-risk statistics, a
//! risk-adjusted return, per-day percentile bands and the drawdown of the
//! mean path.

pub mod drawdown;
pub mod paths;
pub mod performance;
pub mod series;
pub mod summary;
pub mod tail;

pub use drawdown::{drawdown_series, max_drawdown};
pub use paths::{mean_path, percentile_band};
pub use performance::{sample_std_dev, sharpe_ratio};
pub use series::ReturnSeries;
pub use summary::{LOWER_BAND_PERCENTILE, RiskCalculator, RiskSummary, UPPER_BAND_PERCENTILE};
pub use tail::{conditional_value_at_risk, percentile, value_at_risk};

use thiserror::Error;

/// Errors that can occur while computing risk metrics
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    /// Input is not a well-formed one-dimensional numeric series
    #[error("Invalid return series: {0}")]
    InvalidSeries(String),

    /// Confidence level or percentile outside its valid range
    #[error("Invalid confidence level {value}: must lie in {range}")]
    InvalidConfidence {
        /// Offending value
        value: f64,
        /// Human-readable valid range
        range: &'static str,
    },

    /// Standard deviation is zero or undefined, so a ratio over it is undefined
    #[error("Return series has zero variance ({observations} observations)")]
    ZeroVariance {
        /// Number of observations in the series
        observations: usize,
    },

    /// Dimension mismatch between inputs
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}
