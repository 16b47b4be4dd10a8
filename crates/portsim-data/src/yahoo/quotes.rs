//! Daily closing prices from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use polars::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

const SECONDS_PER_DAY: i64 = 86_400;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider that pauses 250ms after each request.
    ///
    /// # Errors
    /// Returns [`DataError::YahooApi`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a provider with a custom pause after each request.
    ///
    /// # Errors
    /// Returns [`DataError::YahooApi`] if the HTTP client cannot be built.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch daily quotes for a single symbol.
    ///
    /// # Returns
    /// A DataFrame with columns `symbol, date, close, adjusted_close`, one
    /// row per trading day in ascending date order.
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        debug!(symbol, %start, %end, "fetching quote history");
        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;
        let quotes = response.quotes()?;

        sleep(self.rate_limit_delay).await;

        if quotes.is_empty() {
            return Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no quotes returned for the requested range".to_string(),
            });
        }

        // Yahoo occasionally repeats the latest session; keep the last row per day.
        let mut days: Vec<i32> = Vec::with_capacity(quotes.len());
        let mut closes: Vec<f64> = Vec::with_capacity(quotes.len());
        let mut adj_closes: Vec<f64> = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let day = i32::try_from(quote.timestamp.div_euclid(SECONDS_PER_DAY))
                .map_err(|e| DataError::TimeConversion(e.to_string()))?;
            if days.last() == Some(&day) {
                closes.pop();
                adj_closes.pop();
                days.pop();
            }
            days.push(day);
            closes.push(quote.close);
            adj_closes.push(quote.adjclose);
        }

        let height = days.len();
        let df = DataFrame::new(vec![
            Series::new("symbol".into(), vec![symbol; height]).into(),
            Series::new("date".into(), days)
                .cast(&DataType::Date)?
                .into(),
            Series::new("close".into(), closes).into(),
            Series::new("adjusted_close".into(), adj_closes).into(),
        ])?;

        Ok(df)
    }

    /// Fetch adjusted closes for several symbols, aligned on common dates.
    ///
    /// Up to `concurrency` requests run at once. Any symbol without data
    /// fails the whole batch.
    ///
    /// # Returns
    /// A DataFrame with a `date` column followed by one adjusted-close column
    /// per symbol, in the order given, restricted to dates on which every
    /// symbol traded.
    pub async fn fetch_close_panel(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        concurrency: usize,
    ) -> Result<DataFrame> {
        let Some(first) = symbols.first() else {
            return Err(DataError::InvalidSymbol("no symbols requested".to_string()));
        };

        let mut frames: Vec<(String, DataFrame)> = stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                match self.fetch_quotes(&symbol, start, end).await {
                    Ok(df) => Ok((symbol, df)),
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "failed to fetch quotes");
                        Err(e)
                    }
                }
            })
            .buffer_unordered(concurrency.max(1))
            .try_collect()
            .await?;

        // Restore the requested order before joining.
        frames.sort_by_key(|(symbol, _)| symbols.iter().position(|s| s == symbol));

        let mut panel: Option<LazyFrame> = None;
        for (symbol, df) in frames {
            let prices = df
                .lazy()
                .select([col("date"), col("adjusted_close").alias(symbol.as_str())]);
            panel = Some(match panel {
                None => prices,
                Some(joined) => joined.join(
                    prices,
                    [col("date")],
                    [col("date")],
                    JoinArgs::new(JoinType::Inner),
                ),
            });
        }
        let Some(panel) = panel else {
            return Err(DataError::DataUnavailable {
                symbol: first.clone(),
                reason: "no data fetched".to_string(),
            });
        };

        let panel = panel
            .sort(["date"], SortMultipleOptions::default())
            .collect()?;
        debug!(symbols = symbols.len(), rows = panel.height(), "aligned close panel");
        Ok(panel)
    }
}

/// Split a `date, <symbol>...` panel into dates and a `T x N` price matrix.
///
/// # Errors
/// Fails if a column is missing, has the wrong type, or contains nulls.
pub fn panel_to_prices(
    panel: &DataFrame,
    symbols: &[String],
) -> Result<(Vec<NaiveDate>, ndarray::Array2<f64>)> {
    let dates = panel
        .column("date")?
        .cast(&DataType::Int32)?
        .as_materialized_series()
        .i32()?
        .into_iter()
        .map(|day| {
            day.and_then(|d| DateTime::from_timestamp(i64::from(d) * SECONDS_PER_DAY, 0))
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DataError::TimeConversion("null or out-of-range date".to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut prices = ndarray::Array2::<f64>::zeros((dates.len(), symbols.len()));
    for (j, symbol) in symbols.iter().enumerate() {
        let series = panel.column(symbol)?.as_materialized_series();
        for (i, value) in series.f64()?.into_iter().enumerate() {
            prices[[i, j]] = value.ok_or_else(|| DataError::DataUnavailable {
                symbol: symbol.clone(),
                reason: format!("missing close on {}", dates[i]),
            })?;
        }
    }

    Ok((dates, prices))
}
