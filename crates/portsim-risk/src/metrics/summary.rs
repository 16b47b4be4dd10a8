//! Risk summary of a simulated ensemble.

use super::{
    MetricsError, ReturnSeries, conditional_value_at_risk, drawdown_series, max_drawdown,
    mean_path, percentile_band, sharpe_ratio, value_at_risk,
};
use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lower percentile of the per-day confidence band.
pub const LOWER_BAND_PERCENTILE: f64 = 5.0;

/// Upper percentile of the per-day confidence band.
pub const UPPER_BAND_PERCENTILE: f64 = 95.0;

/// Scalar and per-day risk statistics of one simulation run
///
/// Returns are total returns over the horizon, `(final - initial) / initial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Percentile `α` used for VaR and CVaR (5.0 = 95% confidence).
    pub confidence_level: f64,

    /// Number of simulated paths.
    pub n_simulations: usize,

    /// Number of simulated days.
    pub horizon_days: usize,

    /// Starting portfolio value.
    pub initial_value: f64,

    /// Value at Risk: the `α`-th percentile of total returns.
    pub var: f64,

    /// Conditional VaR: mean of total returns at or below `var`.
    pub cvar: f64,

    /// Mean / standard deviation of total returns; `None` when the returns
    /// have zero variance and the ratio is undefined.
    pub sharpe_ratio: Option<f64>,

    /// Mean total return.
    pub mean_return: f64,

    /// Worst total return.
    pub min_return: f64,

    /// Best total return.
    pub max_return: f64,

    /// Share of simulations ending below the initial value.
    pub probability_of_loss: f64,

    /// Deepest drawdown of the mean path.
    pub max_drawdown: f64,

    /// Mean portfolio value per day.
    pub mean_path: Vec<f64>,

    /// 5th percentile of portfolio value per day.
    pub lower_band: Vec<f64>,

    /// 95th percentile of portfolio value per day.
    pub upper_band: Vec<f64>,

    /// Drawdown of the mean path per day.
    pub drawdown: Vec<f64>,
}

impl RiskSummary {
    /// VaR expressed as a currency loss on the initial value (positive = loss).
    pub fn var_amount(&self) -> f64 {
        -self.var * self.initial_value
    }

    /// CVaR expressed as a currency loss on the initial value (positive = loss).
    pub fn cvar_amount(&self) -> f64 {
        -self.cvar * self.initial_value
    }

    /// Confidence of the VaR threshold in percent (95.0 for `α = 5`).
    pub fn confidence_pct(&self) -> f64 {
        100.0 - self.confidence_level
    }
}

/// Stateless reducer from a `T x M` path matrix to a [`RiskSummary`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskCalculator {
    confidence_level: f64,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self {
            confidence_level: 5.0,
        }
    }
}

impl RiskCalculator {
    /// Create a calculator for VaR/CVaR at percentile `confidence_level`.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidConfidence`] unless `0 < confidence_level < 100`.
    pub fn new(confidence_level: f64) -> Result<Self, MetricsError> {
        if !(confidence_level > 0.0 && confidence_level < 100.0) {
            return Err(MetricsError::InvalidConfidence {
                value: confidence_level,
                range: "(0, 100)",
            });
        }
        Ok(Self { confidence_level })
    }

    /// Percentile used for VaR and CVaR.
    pub const fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Compute the full risk summary of `paths` (days x simulations).
    ///
    /// # Errors
    /// Fails if the matrix is empty or contains non-finite values. A mean path
    /// that touches zero or goes negative (an average loss of 100% or more)
    /// has no relative drawdown, so the whole summary fails with
    /// [`MetricsError::InvalidSeries`] rather than reporting partial metrics.
    pub fn compute(
        &self,
        paths: ArrayView2<'_, f64>,
        initial_value: f64,
    ) -> Result<RiskSummary, MetricsError> {
        let (horizon_days, n_simulations) = paths.dim();
        if horizon_days == 0 || n_simulations == 0 {
            return Err(MetricsError::DimensionMismatch(format!(
                "path matrix must be non-empty, got {horizon_days} x {n_simulations}"
            )));
        }

        let final_values = paths.index_axis(Axis(0), horizon_days - 1).to_vec();
        let returns = ReturnSeries::from_final_values(&final_values, initial_value)?;

        let var = value_at_risk(&returns, self.confidence_level)?;
        let cvar = conditional_value_at_risk(&returns, self.confidence_level)?;
        let sharpe_ratio = match sharpe_ratio(&returns) {
            Ok(ratio) => Some(ratio),
            Err(MetricsError::ZeroVariance { observations }) => {
                warn!(observations, "Sharpe ratio undefined: returns have zero variance");
                None
            }
            Err(e) => return Err(e),
        };

        let mean = mean_path(paths)?;
        let lower_band = percentile_band(paths, LOWER_BAND_PERCENTILE)?;
        let upper_band = percentile_band(paths, UPPER_BAND_PERCENTILE)?;
        let drawdown = drawdown_series(mean.view())?;
        let deepest = max_drawdown(mean.view())?;

        let losses = returns.iter().filter(|&&r| r < 0.0).count();
        let probability_of_loss = losses as f64 / n_simulations as f64;

        debug!(
            horizon_days,
            n_simulations,
            var,
            cvar,
            "computed risk summary"
        );

        Ok(RiskSummary {
            confidence_level: self.confidence_level,
            n_simulations,
            horizon_days,
            initial_value,
            var,
            cvar,
            sharpe_ratio,
            mean_return: returns.mean(),
            min_return: returns.min(),
            max_return: returns.max(),
            probability_of_loss,
            max_drawdown: deepest,
            mean_path: mean.to_vec(),
            lower_band: lower_band.to_vec(),
            upper_band: upper_band.to_vec(),
            drawdown: drawdown.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    fn sample_paths() -> Array2<f64> {
        // 3 days x 4 simulations
        array![
            [101.0, 99.0, 102.0, 98.0],
            [103.0, 97.0, 104.0, 95.0],
            [110.0, 90.0, 105.0, 94.0],
        ]
    }

    #[test]
    fn test_invalid_confidence() {
        assert!(RiskCalculator::new(0.0).is_err());
        assert!(RiskCalculator::new(100.0).is_err());
        assert_eq!(RiskCalculator::new(5.0).unwrap(), RiskCalculator::default());
    }

    #[test]
    fn test_summary_shapes_and_scalars() {
        let summary = RiskCalculator::default()
            .compute(sample_paths().view(), 100.0)
            .unwrap();

        assert_eq!(summary.horizon_days, 3);
        assert_eq!(summary.n_simulations, 4);
        assert_eq!(summary.mean_path.len(), 3);
        assert_eq!(summary.lower_band.len(), 3);
        assert_eq!(summary.upper_band.len(), 3);
        assert_eq!(summary.drawdown.len(), 3);

        // Returns: 0.10, -0.10, 0.05, -0.06
        assert_abs_diff_eq!(summary.mean_return, -0.0025, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.min_return, -0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.max_return, 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.probability_of_loss, 0.5, epsilon = 1e-12);
        assert!(summary.cvar <= summary.var);
        assert!(summary.sharpe_ratio.is_some());
    }

    #[test]
    fn test_single_simulation_has_no_sharpe() {
        let paths = array![[101.0], [102.0]];
        let summary = RiskCalculator::default().compute(paths.view(), 100.0).unwrap();
        assert_eq!(summary.sharpe_ratio, None);
        assert_abs_diff_eq!(summary.var, 0.02, epsilon = 1e-12);
        assert_eq!(summary.cvar, summary.var);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let calculator = RiskCalculator::new(10.0).unwrap();
        let paths = sample_paths();
        let first = calculator.compute(paths.view(), 100.0).unwrap();
        let second = calculator.compute(paths.view(), 100.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_loss_amounts() {
        let summary = RiskCalculator::default()
            .compute(sample_paths().view(), 100.0)
            .unwrap();
        assert_abs_diff_eq!(summary.var_amount(), -summary.var * 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.confidence_pct(), 95.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_drawdown_is_deepest_daily_drawdown() {
        let paths = array![[100.0, 100.0], [80.0, 60.0], [90.0, 110.0]];
        let summary = RiskCalculator::default().compute(paths.view(), 100.0).unwrap();
        let deepest = summary.drawdown.iter().copied().fold(0.0_f64, f64::min);
        assert_abs_diff_eq!(summary.max_drawdown, -0.3, epsilon = 1e-12);
        assert_eq!(summary.max_drawdown, deepest);
    }

    #[test]
    fn test_wiped_out_mean_path_fails_summary() {
        // Day 2 mean is -10: the average trial lost more than everything.
        let paths = array![[100.0, 100.0], [50.0, 30.0], [-20.0, 0.0]];
        assert!(matches!(
            RiskCalculator::default().compute(paths.view(), 100.0),
            Err(MetricsError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_empty_paths_rejected() {
        let paths = Array2::<f64>::zeros((0, 0));
        assert!(RiskCalculator::default().compute(paths.view(), 100.0).is_err());
    }
}
