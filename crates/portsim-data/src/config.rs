//! Configuration for historical data retrieval.

use crate::error::{DataError, Result};
use chrono::{DateTime, Duration, Utc};
use portsim_risk::CovarianceMethod;
use serde::{Deserialize, Serialize};

/// How much history to fetch and how to turn it into statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Calendar days of history ending today (default: 300).
    pub lookback_days: u32,

    /// Maximum symbols fetched at once (default: 4).
    pub concurrency: usize,

    /// Pause after each request in milliseconds (default: 250).
    pub rate_limit_ms: u64,

    /// Covariance estimator applied to the aligned returns.
    pub covariance_method: CovarianceMethod,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            lookback_days: 300,
            concurrency: 4,
            rate_limit_ms: 250,
            covariance_method: CovarianceMethod::Sample,
        }
    }
}

impl FetchConfig {
    /// Set the lookback window.
    pub const fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Set the fetch concurrency.
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the covariance estimator.
    pub const fn with_covariance_method(mut self, method: CovarianceMethod) -> Self {
        self.covariance_method = method;
        self
    }

    /// `(end - lookback_days, end)`.
    pub fn date_range(&self, end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (end - Duration::days(i64::from(self.lookback_days)), end)
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidConfig`] if the lookback or concurrency is zero.
    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 {
            return Err(DataError::InvalidConfig(
                "lookback_days must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(DataError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
