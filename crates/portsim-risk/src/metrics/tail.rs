//! Tail risk: percentiles, Value-at-Risk and Conditional Value-at-Risk
//!
//! Percentiles use linear interpolation between the two closest ranks: for
//! `n` sorted values and percentile `q`, the rank is `(n - 1) * q / 100`.

use super::{MetricsError, ReturnSeries};

/// Percentile `q` (in `[0, 100]`) of `values` with linear interpolation.
///
/// # Errors
/// Returns [`MetricsError::InvalidSeries`] for empty or non-finite input and
/// [`MetricsError::InvalidConfidence`] for `q` outside `[0, 100]`.
pub fn percentile(values: &[f64], q: f64) -> Result<f64, MetricsError> {
    if !(0.0..=100.0).contains(&q) {
        return Err(MetricsError::InvalidConfidence {
            value: q,
            range: "[0, 100]",
        });
    }
    if values.is_empty() {
        return Err(MetricsError::InvalidSeries(
            "cannot take a percentile of an empty series".to_string(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MetricsError::InvalidSeries(
            "series contains non-finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentile_of_sorted(&sorted, q))
}

/// Interpolated percentile of an already sorted, non-empty slice.
pub(crate) fn percentile_of_sorted(sorted: &[f64], q: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * q / 100.0;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn check_alpha(alpha: f64) -> Result<(), MetricsError> {
    if alpha > 0.0 && alpha < 100.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidConfidence {
            value: alpha,
            range: "(0, 100)",
        })
    }
}

/// Value-at-Risk: the `alpha`-th percentile of the return series
///
/// `alpha = 5.0` yields the 95%-confidence threshold. The result is a return
/// (negative for a loss), not a currency amount.
///
/// # Errors
/// Returns [`MetricsError::InvalidConfidence`] unless `0 < alpha < 100`.
pub fn value_at_risk(returns: &ReturnSeries, alpha: f64) -> Result<f64, MetricsError> {
    check_alpha(alpha)?;
    Ok(percentile_of_sorted(&returns.sorted(), alpha))
}

/// Conditional Value-at-Risk (expected shortfall)
///
/// Mean of every return at or below `value_at_risk(returns, alpha)`. Because
/// the interpolated percentile never falls below the smallest return, the
/// tail always holds at least one value; should it ever be empty the VaR
/// itself is returned.
///
/// # Errors
/// Returns [`MetricsError::InvalidConfidence`] unless `0 < alpha < 100`.
pub fn conditional_value_at_risk(returns: &ReturnSeries, alpha: f64) -> Result<f64, MetricsError> {
    check_alpha(alpha)?;
    let sorted = returns.sorted();
    let var = percentile_of_sorted(&sorted, alpha);

    let tail: Vec<f64> = sorted.iter().copied().take_while(|&r| r <= var).collect();
    if tail.is_empty() {
        return Ok(var);
    }
    Ok(tail.iter().sum::<f64>() / tail.len() as f64)
}
