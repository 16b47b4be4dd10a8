//! Drawdown of a value path relative to its running peak.

use super::MetricsError;
use ndarray::{Array1, ArrayView1};

/// Drawdown at every day of `path`
///
/// `drawdown[t] = (path[t] - peak[t]) / peak[t]` where `peak[t]` is the
/// running maximum up to and including day `t`. Values are always `<= 0` and
/// exactly `0` wherever the path sets a new peak.
///
/// # Errors
/// Returns [`MetricsError::InvalidSeries`] if the path is empty or contains a
/// non-positive or non-finite value.
pub fn drawdown_series(path: ArrayView1<'_, f64>) -> Result<Array1<f64>, MetricsError> {
    if path.is_empty() {
        return Err(MetricsError::InvalidSeries(
            "cannot compute drawdown of an empty path".to_string(),
        ));
    }
    if let Some(bad) = path.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(MetricsError::InvalidSeries(format!(
            "path values must be positive and finite, found {bad}"
        )));
    }

    let mut peak = f64::NEG_INFINITY;
    let drawdown = path
        .iter()
        .map(|&value| {
            if value >= peak {
                peak = value;
                0.0
            } else {
                (value - peak) / peak
            }
        })
        .collect();

    Ok(drawdown)
}

/// Deepest drawdown of `path` (the minimum of [`drawdown_series`]).
pub fn max_drawdown(path: ArrayView1<'_, f64>) -> Result<f64, MetricsError> {
    Ok(drawdown_series(path)?
        .iter()
        .copied()
        .fold(0.0_f64, f64::min))
}
