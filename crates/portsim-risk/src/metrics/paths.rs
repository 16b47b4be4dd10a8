//! Per-day reductions across the simulation axis.
//!
//! Path matrices are laid out `T x M`: row `t` holds every trial's value on
//! day `t`, column `m` is one simulated path.

use super::MetricsError;
use super::tail::percentile_of_sorted;
use ndarray::{Array1, ArrayView2, Axis};

fn check_paths(paths: &ArrayView2<'_, f64>) -> Result<(), MetricsError> {
    let (days, sims) = paths.dim();
    if days == 0 || sims == 0 {
        return Err(MetricsError::DimensionMismatch(format!(
            "path matrix must be non-empty, got {days} x {sims}"
        )));
    }
    if paths.iter().any(|v| !v.is_finite()) {
        return Err(MetricsError::InvalidSeries(
            "path matrix contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Elementwise mean across simulations, one value per day.
pub fn mean_path(paths: ArrayView2<'_, f64>) -> Result<Array1<f64>, MetricsError> {
    check_paths(&paths)?;
    paths
        .mean_axis(Axis(1))
        .ok_or_else(|| MetricsError::DimensionMismatch("no simulations".to_string()))
}

/// Elementwise `q`-th percentile across simulations, one value per day.
pub fn percentile_band(paths: ArrayView2<'_, f64>, q: f64) -> Result<Array1<f64>, MetricsError> {
    if !(0.0..=100.0).contains(&q) {
        return Err(MetricsError::InvalidConfidence {
            value: q,
            range: "[0, 100]",
        });
    }
    check_paths(&paths)?;

    let band = paths
        .axis_iter(Axis(0))
        .map(|day| {
            let mut sorted = day.to_vec();
            sorted.sort_by(f64::total_cmp);
            percentile_of_sorted(&sorted, q)
        })
        .collect();

    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_mean_path() {
        let paths = array![[100.0, 102.0, 98.0], [101.0, 105.0, 96.0]];
        let mean = mean_path(paths.view()).unwrap();
        assert_eq!(mean.len(), 2);
        assert_abs_diff_eq!(mean[0], 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mean[1], 302.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_band_brackets_mean() {
        let paths = Array2::from_shape_fn((4, 21), |(t, m)| 100.0 + t as f64 * (m as f64 - 10.0));
        let lower = percentile_band(paths.view(), 5.0).unwrap();
        let upper = percentile_band(paths.view(), 95.0).unwrap();
        let mean = mean_path(paths.view()).unwrap();
        for t in 0..4 {
            assert!(lower[t] <= mean[t] && mean[t] <= upper[t]);
        }
        // Day 0 has no dispersion
        assert_eq!(lower[0], upper[0]);
        // Day 3: values 70..130 in steps of 3, rank 1 and rank 19
        assert_abs_diff_eq!(lower[3], 73.0, epsilon = 1e-12);
        assert_abs_diff_eq!(upper[3], 127.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        let paths = Array2::<f64>::zeros((0, 5));
        assert!(mean_path(paths.view()).is_err());
        assert!(percentile_band(paths.view(), 5.0).is_err());
    }
}
