//! Sources of return statistics.

use crate::error::{DataError, Result};
use crate::statistics::ReturnStatistics;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use std::future::Future;

/// Something that can produce mean returns and covariance for a list of symbols
///
/// The returned statistics must be in the order of `symbols`.
pub trait ReturnStatisticsProvider {
    /// Estimate statistics from daily returns between `start` and `end`.
    fn fetch_statistics(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<ReturnStatistics>> + Send;
}

/// Serves fixed, precomputed statistics regardless of the date range
#[derive(Debug, Clone)]
pub struct InMemoryStatisticsProvider {
    statistics: ReturnStatistics,
}

impl InMemoryStatisticsProvider {
    /// Serve `statistics`.
    pub const fn new(statistics: ReturnStatistics) -> Self {
        Self { statistics }
    }

    /// Build from raw parts.
    ///
    /// # Errors
    /// Same conditions as [`ReturnStatistics::new`].
    pub fn from_parts(
        symbols: Vec<String>,
        mean_returns: Array1<f64>,
        covariance: Array2<f64>,
    ) -> Result<Self> {
        Ok(Self::new(ReturnStatistics::new(symbols, mean_returns, covariance)?))
    }

    fn select(&self, symbols: &[String]) -> Result<ReturnStatistics> {
        let known = self.statistics.symbols();
        let indices = symbols
            .iter()
            .map(|symbol| {
                known
                    .iter()
                    .position(|k| k == symbol)
                    .ok_or_else(|| DataError::DataUnavailable {
                        symbol: symbol.clone(),
                        reason: "not present in the in-memory statistics".to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mean = self.statistics.mean_returns().select(ndarray::Axis(0), &indices);
        let cov = Array2::from_shape_fn((indices.len(), indices.len()), |(i, j)| {
            self.statistics.covariance()[[indices[i], indices[j]]]
        });
        ReturnStatistics::new(symbols.to_vec(), mean, cov)
    }
}

impl ReturnStatisticsProvider for InMemoryStatisticsProvider {
    async fn fetch_statistics(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReturnStatistics> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        self.select(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn provider() -> InMemoryStatisticsProvider {
        InMemoryStatisticsProvider::from_parts(
            vec!["A".into(), "B".into(), "C".into()],
            array![0.1, 0.2, 0.3],
            array![[1.0, 0.1, 0.2], [0.1, 2.0, 0.3], [0.2, 0.3, 3.0]],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_reorders_to_requested_symbols() {
        let now = Utc::now();
        let stats = provider()
            .fetch_statistics(&["C".into(), "A".into()], now, now)
            .await
            .unwrap();
        assert_eq!(stats.symbols(), ["C", "A"]);
        assert_eq!(stats.mean_returns().to_vec(), vec![0.3, 0.1]);
        assert_eq!(stats.covariance(), &array![[3.0, 0.2], [0.2, 1.0]]);
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let now = Utc::now();
        let result = provider().fetch_statistics(&["Z".into()], now, now).await;
        assert!(matches!(result, Err(DataError::DataUnavailable { symbol, .. }) if symbol == "Z"));
    }
}
