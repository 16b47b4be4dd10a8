//! Return statistics estimated from Yahoo Finance closing prices.

use super::quotes::{YahooQuoteProvider, panel_to_prices};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::history::ReturnHistory;
use crate::provider::ReturnStatisticsProvider;
use crate::statistics::ReturnStatistics;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

/// [`ReturnStatisticsProvider`] backed by Yahoo Finance adjusted closes
///
/// Closes are aligned on the dates every symbol traded, converted to daily
/// percent changes, and reduced to a mean vector and a covariance matrix
/// with the configured estimator.
#[derive(Debug)]
pub struct YahooStatisticsProvider {
    quotes: YahooQuoteProvider,
    config: FetchConfig,
}

impl YahooStatisticsProvider {
    /// Create a provider with `config`.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let quotes =
            YahooQuoteProvider::with_rate_limit(Duration::from_millis(config.rate_limit_ms))?;
        Ok(Self { quotes, config })
    }

    /// The fetch configuration.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch and align daily returns without reducing them.
    ///
    /// # Errors
    /// Returns [`crate::DataError::DataUnavailable`] if a symbol has no
    /// quotes and [`crate::DataError::InsufficientHistory`] if fewer than two
    /// aligned returns remain.
    pub async fn fetch_history(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReturnHistory> {
        let panel = self
            .quotes
            .fetch_close_panel(symbols, start, end, self.config.concurrency)
            .await?;
        let (dates, prices) = panel_to_prices(&panel, symbols)?;
        ReturnHistory::from_prices(symbols.to_vec(), dates, &prices)
    }
}

impl ReturnStatisticsProvider for YahooStatisticsProvider {
    async fn fetch_statistics(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReturnStatistics> {
        let history = self.fetch_history(symbols, start, end).await?;
        let statistics = ReturnStatistics::from_history(&history, &self.config.covariance_method)?;
        info!(
            assets = statistics.n_assets(),
            observations = statistics.observations(),
            method = self.config.covariance_method.name(),
            "Estimated return statistics from Yahoo Finance"
        );
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    #[test]
    fn test_rejects_invalid_config() {
        let result = YahooStatisticsProvider::new(FetchConfig::default().with_concurrency(0));
        assert!(matches!(result, Err(DataError::InvalidConfig(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_statistics() {
        let config = FetchConfig::default();
        let provider = YahooStatisticsProvider::new(config.clone()).unwrap();
        let (start, end) = config.date_range(Utc::now());
        let symbols = vec!["SPY".to_string(), "QQQ".to_string()];

        let stats = provider.fetch_statistics(&symbols, start, end).await.unwrap();
        assert_eq!(stats.symbols(), symbols.as_slice());
        assert!(stats.observations() > 100);
        assert!(stats.covariance()[[0, 1]] > 0.0);
    }
}
