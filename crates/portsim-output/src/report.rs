//! Human-readable and JSON reports of a simulation run.

use chrono::{DateTime, Utc};
use portsim_risk::RiskSummary;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required part of the report was not supplied.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),

    /// Symbols and weights have different lengths.
    #[error("{symbols} symbols but {weights} weights")]
    LengthMismatch {
        /// Number of symbols
        symbols: usize,
        /// Number of weights
        weights: usize,
    },
}

/// One asset line of the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Asset symbol.
    pub symbol: String,
    /// Portfolio weight.
    pub weight: f64,
}

/// A report of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Portfolio composition.
    pub holdings: Vec<Holding>,

    /// Risk statistics of the run.
    pub summary: RiskSummary,
}

impl Report {
    /// Convert report to JSON string.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as boxed plain text.
    pub fn render_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();
        let rule = "━".repeat(62);

        let _ = writeln!(out, "╔══════════════════════════════════════════════════════════════╗");
        let _ = writeln!(out, "║ {:^60} ║", self.title);
        let _ = writeln!(out, "╚══════════════════════════════════════════════════════════════╝");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Simulations: {}   Horizon: {} days   Initial value: {:.2}",
            s.n_simulations, s.horizon_days, s.initial_value
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "PORTFOLIO");
        let _ = writeln!(out, "{rule}");
        for holding in &self.holdings {
            let _ = writeln!(out, "  {:<10} {:>7.2}%", holding.symbol, holding.weight * 100.0);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "RISK METRICS");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "  VaR ({:.0}%):          {:>9.2}%  ({:.2} loss)",
            s.confidence_pct(),
            s.var * 100.0,
            s.var_amount()
        );
        let _ = writeln!(
            out,
            "  CVaR ({:.0}%):         {:>9.2}%  ({:.2} loss)",
            s.confidence_pct(),
            s.cvar * 100.0,
            s.cvar_amount()
        );
        match s.sharpe_ratio {
            Some(sharpe) => {
                let _ = writeln!(out, "  Sharpe ratio:       {sharpe:>10.4}");
            }
            None => {
                let _ = writeln!(out, "  Sharpe ratio:              n/a");
            }
        }
        let _ = writeln!(out, "  Mean return:        {:>9.2}%", s.mean_return * 100.0);
        let _ = writeln!(out, "  Worst return:       {:>9.2}%", s.min_return * 100.0);
        let _ = writeln!(out, "  Best return:        {:>9.2}%", s.max_return * 100.0);
        let _ = writeln!(out, "  P(loss):            {:>9.2}%", s.probability_of_loss * 100.0);
        let _ = writeln!(out, "  Max drawdown:       {:>9.2}%", s.max_drawdown * 100.0);

        if let (Some(mean), Some(low), Some(high)) = (
            s.mean_path.last(),
            s.lower_band.last(),
            s.upper_band.last(),
        ) {
            let _ = writeln!(out);
            let _ = writeln!(out, "{rule}");
            let _ = writeln!(out, "FINAL DAY");
            let _ = writeln!(out, "{rule}");
            let _ = writeln!(out, "  5th percentile:     {low:>12.2}");
            let _ = writeln!(out, "  Mean:               {mean:>12.2}");
            let _ = writeln!(out, "  95th percentile:    {high:>12.2}");
        }
        out
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    symbols: Vec<String>,
    weights: Vec<f64>,
    summary: Option<RiskSummary>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the asset symbols.
    pub fn symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Set the portfolio weights.
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Set the risk summary.
    pub fn summary(mut self, summary: RiskSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Build the report.
    ///
    /// # Errors
    /// Fails if no summary was set or symbols and weights differ in length.
    pub fn build(self) -> Result<Report, ReportError> {
        let summary = self.summary.ok_or(ReportError::MissingField("summary"))?;
        if self.symbols.len() != self.weights.len() {
            return Err(ReportError::LengthMismatch {
                symbols: self.symbols.len(),
                weights: self.weights.len(),
            });
        }
        let holdings = self
            .symbols
            .into_iter()
            .zip(self.weights)
            .map(|(symbol, weight)| Holding { symbol, weight })
            .collect();

        Ok(Report {
            title: self
                .title
                .unwrap_or_else(|| "Monte Carlo Portfolio Simulation".to_string()),
            timestamp: Utc::now(),
            holdings,
            summary,
        })
    }
}
