//! Error types for data operations.

use portsim_risk::CovarianceError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while retrieving prices or estimating statistics.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// No price data for a symbol in the requested range
    #[error("No data available for {symbol}: {reason}")]
    DataUnavailable {
        /// Symbol that was queried
        symbol: String,
        /// Reason the data is missing
        reason: String,
    },

    /// Too few return observations to estimate statistics
    #[error("Insufficient history: need at least {required} return observations, got {actual}")]
    InsufficientHistory {
        /// Minimum number of observations
        required: usize,
        /// Observations available after alignment
        actual: usize,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Prices, dates and symbols disagree in shape
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Price data that cannot be turned into returns
    #[error("Invalid price data: {0}")]
    InvalidPrice(String),

    /// Covariance estimation failed
    #[error("Covariance estimation failed: {0}")]
    Covariance(#[from] CovarianceError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Invalid fetch configuration
    #[error("Invalid fetch configuration: {0}")]
    InvalidConfig(String),
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}
