//! Risk-adjusted return.

use super::{MetricsError, ReturnSeries};

/// Sample standard deviation (`n - 1` denominator).
///
/// Returns `None` for fewer than two observations.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Sharpe ratio of the simulated total returns: mean / standard deviation
///
/// No risk-free rate is subtracted; the ratio is taken over the whole
/// simulation horizon and is not annualised.
///
/// # Errors
/// Returns [`MetricsError::ZeroVariance`] when the series has fewer than two
/// values or all values are identical, since the ratio is then undefined.
pub fn sharpe_ratio(returns: &ReturnSeries) -> Result<f64, MetricsError> {
    let std_dev = sample_std_dev(returns).unwrap_or(0.0);
    if std_dev <= f64::EPSILON * returns.mean().abs().max(1.0) {
        return Err(MetricsError::ZeroVariance {
            observations: returns.len(),
        });
    }
    Ok(returns.mean() / std_dev)
}
