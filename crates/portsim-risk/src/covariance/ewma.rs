//! Exponentially Weighted Moving Average (EWMA) Covariance Estimator
//!
//! EWMA gives more weight to recent observations, making it responsive to
//! changing market conditions. Day `t` of a `T`-day window receives the
//! weight
//!
//! w_t ∝ λ^(T-1-t)
//!
//! normalised to sum to one, where λ is the decay factor (0.94 is the
//! RiskMetrics convention for daily data).

use super::{CovarianceError, CovarianceEstimator};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// EWMA covariance estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EwmaConfig {
    /// Decay factor λ (default: 0.94)
    /// Higher values = more weight on past, slower adaptation
    /// Lower values = more weight on recent, faster adaptation
    pub decay: f64,

    /// Minimum number of observations required (default: 2)
    pub min_observations: usize,

    /// Whether to rescale by 1 / (1 - Σw²) to remove small sample bias (default: true)
    pub bias_correction: bool,
}

impl Default for EwmaConfig {
    fn default() -> Self {
        Self {
            decay: 0.94,
            min_observations: 2,
            bias_correction: true,
        }
    }
}

/// EWMA covariance estimator
#[derive(Debug)]
pub struct EwmaCovarianceEstimator {
    config: EwmaConfig,
}

impl EwmaCovarianceEstimator {
    /// Create a new EWMA estimator with the given configuration
    pub fn new(config: EwmaConfig) -> Result<Self, CovarianceError> {
        if !(config.decay > 0.0 && config.decay < 1.0) {
            return Err(CovarianceError::InvalidDecay(config.decay));
        }
        if config.min_observations < 2 {
            return Err(CovarianceError::InvalidParameter(format!(
                "min_observations must be at least 2, got {}",
                config.min_observations
            )));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self, CovarianceError> {
        Self::new(EwmaConfig::default())
    }

    /// Get the half-life of the EWMA (in periods)
    ///
    /// Half-life = ln(0.5) / ln(λ)
    pub fn half_life(&self) -> f64 {
        0.5_f64.ln() / self.config.decay.ln()
    }

    /// Normalised observation weights, oldest first.
    fn weights(&self, n_periods: usize) -> Array1<f64> {
        let lambda = self.config.decay;
        let raw =
            Array1::from_iter((0..n_periods).map(|t| lambda.powi((n_periods - 1 - t) as i32)));
        let total = raw.sum();
        raw / total
    }
}

impl CovarianceEstimator for EwmaCovarianceEstimator {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        let (n_periods, _n_assets) = returns.dim();

        if n_periods < self.config.min_observations {
            return Err(CovarianceError::InsufficientData {
                required: self.config.min_observations,
                actual: n_periods,
            });
        }

        let weights = self.weights(n_periods);

        // Weighted means per asset, then centre every row
        let means = weights.dot(returns);
        let centred = returns - &means.view().insert_axis(Axis(0));

        // Σ w_t x_t x_tᵀ computed as (W^½ X)ᵀ (W^½ X)
        let scaled = &centred * &weights.mapv(f64::sqrt).insert_axis(Axis(1));
        let mut cov = scaled.t().dot(&scaled);

        if self.config.bias_correction {
            let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
            cov /= 1.0 - sum_sq;
        }

        Ok(cov)
    }
}
