//! Mean returns and covariance estimated from a return history.

use crate::error::{DataError, Result};
use crate::history::ReturnHistory;
use ndarray::{Array1, Array2, Axis};
use portsim_risk::CovarianceEstimator;
use portsim_risk::covariance::correlation_from_covariance;
use tracing::debug;

/// Per-asset mean daily return and the covariance of daily returns
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatistics {
    symbols: Vec<String>,
    mean_returns: Array1<f64>,
    covariance: Array2<f64>,
    observations: usize,
}

impl ReturnStatistics {
    /// Wrap statistics computed elsewhere.
    ///
    /// # Errors
    /// Returns [`DataError::ShapeMismatch`] unless the mean vector has one
    /// entry per symbol and the covariance matrix is square of that size.
    pub fn new(
        symbols: Vec<String>,
        mean_returns: Array1<f64>,
        covariance: Array2<f64>,
    ) -> Result<Self> {
        let n = symbols.len();
        if mean_returns.len() != n {
            return Err(DataError::ShapeMismatch(format!(
                "{} mean returns for {n} symbols",
                mean_returns.len()
            )));
        }
        if covariance.dim() != (n, n) {
            return Err(DataError::ShapeMismatch(format!(
                "covariance is {:?} for {n} symbols",
                covariance.dim()
            )));
        }
        Ok(Self {
            symbols,
            mean_returns,
            covariance,
            observations: 0,
        })
    }

    /// Column means of the history and the covariance from `estimator`.
    ///
    /// # Errors
    /// Returns [`DataError::Covariance`] if the estimator fails.
    pub fn from_history<E>(history: &ReturnHistory, estimator: &E) -> Result<Self>
    where
        E: CovarianceEstimator + ?Sized,
    {
        let returns = history.returns();
        let mean_returns = returns
            .mean_axis(Axis(0))
            .ok_or(DataError::InsufficientHistory {
                required: 2,
                actual: 0,
            })?;
        let covariance = estimator.estimate(returns)?;

        debug!(
            assets = history.n_assets(),
            observations = history.n_observations(),
            "estimated return statistics"
        );

        Ok(Self {
            symbols: history.symbols().to_vec(),
            mean_returns,
            covariance,
            observations: history.n_observations(),
        })
    }

    /// Symbols in row/column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Mean daily simple return per asset.
    pub const fn mean_returns(&self) -> &Array1<f64> {
        &self.mean_returns
    }

    /// Covariance matrix of daily returns.
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Number of return observations behind the estimate (0 if supplied directly).
    pub const fn observations(&self) -> usize {
        self.observations
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Daily volatility per asset.
    pub fn volatilities(&self) -> Array1<f64> {
        self.covariance.diag().mapv(|v| v.max(0.0).sqrt())
    }

    /// Correlation matrix.
    ///
    /// # Errors
    /// Propagates a non-square covariance as [`DataError::Covariance`].
    pub fn correlation(&self) -> Result<Array2<f64>> {
        Ok(correlation_from_covariance(&self.covariance)?)
    }

    /// Split into `(symbols, mean_returns, covariance)`.
    pub fn into_parts(self) -> (Vec<String>, Array1<f64>, Array2<f64>) {
        (self.symbols, self.mean_returns, self.covariance)
    }
}
