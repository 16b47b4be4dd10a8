//! Utilities for covariance matrix manipulation
//!
//! This module provides the Cholesky factorisation used to impose a
//! covariance structure on independent normal draws, together with
//! positive-definiteness checks and a diagonal jitter regulariser for
//! matrices that fail the factorisation.

use super::CovarianceError;
use ndarray::Array2;

/// Relative tolerance for symmetry checks.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix
///
/// Returns `L` such that `L * Lᵀ = matrix`. Pivots that are not strictly
/// positive relative to the matrix scale are rejected, so singular and
/// near-singular matrices fail rather than producing a degenerate factor.
///
/// # Arguments
/// * `matrix` - Symmetric matrix to factorise
///
/// # Returns
/// * Lower-triangular factor `L`
///
/// # Example
/// ```
/// use ndarray::array;
/// use portsim_risk::covariance::{cholesky, reconstruct_from_cholesky};
///
/// let cov = array![[0.0004, 0.0001], [0.0001, 0.0009]];
/// let l = cholesky(&cov).unwrap();
/// let back = reconstruct_from_cholesky(&l);
/// assert!((back[[0, 1]] - 0.0001).abs() < 1e-15);
/// ```
pub fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }
    if n == 0 {
        return Err(CovarianceError::InvalidParameter(
            "cannot factorise an empty matrix".to_string(),
        ));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(CovarianceError::InvalidParameter(
            "matrix contains non-finite values".to_string(),
        ));
    }
    if !is_symmetric(matrix) {
        return Err(CovarianceError::InvalidParameter(
            "matrix is not symmetric".to_string(),
        ));
    }

    let scale = (0..n).map(|i| matrix[[i, i]].abs()).fold(0.0_f64, f64::max);
    let pivot_floor = f64::EPSILON * n as f64 * scale;

    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();

            if i == j {
                let diag = matrix[[i, i]] - partial;
                if diag <= pivot_floor {
                    return Err(CovarianceError::NotPositiveDefinite {
                        pivot: i,
                        value: diag,
                    });
                }
                l[[i, i]] = diag.sqrt();
            } else {
                l[[i, j]] = (matrix[[i, j]] - partial) / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Rebuild `L * Lᵀ` from a Cholesky factor.
pub fn reconstruct_from_cholesky(l: &Array2<f64>) -> Array2<f64> {
    l.dot(&l.t())
}

/// Check if a matrix is positive definite
///
/// A symmetric matrix is positive definite exactly when its Cholesky
/// factorisation succeeds.
pub fn is_positive_definite(matrix: &Array2<f64>) -> bool {
    cholesky(matrix).is_ok()
}

/// Add `jitter` times the mean diagonal to every diagonal element
///
/// This is the usual remedy for a sample covariance that is singular because
/// two assets move in lockstep or the history is shorter than the universe.
///
/// # Arguments
/// * `cov` - Covariance matrix to regularise
/// * `jitter` - Relative ridge size (e.g. `1e-8`), must be positive
pub fn regularize_with_jitter(
    cov: &Array2<f64>,
    jitter: f64,
) -> Result<Array2<f64>, CovarianceError> {
    let n = cov.nrows();
    if n != cov.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: cov.ncols(),
        });
    }
    if !(jitter > 0.0 && jitter.is_finite()) {
        return Err(CovarianceError::InvalidParameter(format!(
            "jitter must be positive and finite, got {jitter}"
        )));
    }

    let mean_diag = if n == 0 {
        0.0
    } else {
        cov.diag().sum() / n as f64
    };
    // Fall back to an absolute ridge when the diagonal is all zeros
    let ridge = if mean_diag > 0.0 {
        jitter * mean_diag
    } else {
        jitter
    };

    let mut regularized = cov.clone();
    regularized.diag_mut().mapv_inplace(|v| v + ridge);
    Ok(regularized)
}

/// Convert a covariance matrix to a correlation matrix
///
/// Assets with zero variance get a zero row and column (and a unit diagonal).
pub fn correlation_from_covariance(cov: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
    let n = cov.nrows();
    if n != cov.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: cov.ncols(),
        });
    }

    let std_devs = cov.diag().mapv(|v| v.max(0.0).sqrt());
    let corr = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            1.0
        } else if std_devs[i] > 0.0 && std_devs[j] > 0.0 {
            cov[[i, j]] / (std_devs[i] * std_devs[j])
        } else {
            0.0
        }
    });

    Ok(corr)
}

fn is_symmetric(matrix: &Array2<f64>) -> bool {
    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = matrix[[i, j]];
            let b = matrix[[j, i]];
            let tol = SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0);
            if (a - b).abs() > tol {
                return false;
            }
        }
    }
    true
}
