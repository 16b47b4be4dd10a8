//! Sample covariance estimator
//!
//! Equally weighted covariance of daily returns with the unbiased `n - 1`
//! denominator, matching what spreadsheet and dataframe tooling report for a
//! table of percent changes.

use super::{CovarianceError, CovarianceEstimator};
use ndarray::{Array1, Array2, Axis};

/// Unbiased sample covariance estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCovarianceEstimator;

impl SampleCovarianceEstimator {
    /// Minimum number of observations for a defined covariance.
    pub const MIN_OBSERVATIONS: usize = 2;

    /// Create a new sample covariance estimator
    pub const fn new() -> Self {
        Self
    }

    /// Column means of a returns matrix.
    ///
    /// # Errors
    /// Returns [`CovarianceError::InsufficientData`] for an empty matrix.
    pub fn mean_returns(returns: &Array2<f64>) -> Result<Array1<f64>, CovarianceError> {
        returns
            .mean_axis(Axis(0))
            .ok_or(CovarianceError::InsufficientData {
                required: 1,
                actual: 0,
            })
    }
}

impl CovarianceEstimator for SampleCovarianceEstimator {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        let n_periods = returns.nrows();
        if n_periods < Self::MIN_OBSERVATIONS {
            return Err(CovarianceError::InsufficientData {
                required: Self::MIN_OBSERVATIONS,
                actual: n_periods,
            });
        }

        let means = Self::mean_returns(returns)?;
        let centred = returns - &means.insert_axis(Axis(0));
        let cov = centred.t().dot(&centred) / (n_periods - 1) as f64;

        Ok(cov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_known_covariance() {
        // x = [1, 2, 3, 4], y = [2, 4, 6, 8]: var(x) = 5/3, cov = 10/3, var(y) = 20/3
        let returns = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let cov = SampleCovarianceEstimator::new().estimate(&returns).unwrap();

        assert_abs_diff_eq!(cov[[0, 0]], 5.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[0, 1]], 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 0]], 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_observation_is_rejected() {
        let returns = array![[0.01, 0.02, 0.03]];
        let result = SampleCovarianceEstimator::new().estimate(&returns);
        assert!(matches!(
            result,
            Err(CovarianceError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_mean_returns() {
        let returns = array![[0.01, -0.02], [0.03, 0.02]];
        let means = SampleCovarianceEstimator::mean_returns(&returns).unwrap();
        assert_abs_diff_eq!(means[0], 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(means[1], 0.0, epsilon = 1e-12);
    }
}
