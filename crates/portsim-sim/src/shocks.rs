//! Correlated Gaussian shocks.

use crate::error::Result;
use ndarray::Array2;
use portsim_risk::cholesky;
use rand::Rng;
use rand_distr::StandardNormal;

/// Draws `T x N` shocks whose rows have covariance `Σ`
///
/// Holds the lower-triangular Cholesky factor `L` of `Σ`; each call draws an
/// independent standard-normal matrix `Z` and returns `Z · Lᵀ`, whose rows
/// then satisfy `Cov(row) = L Lᵀ = Σ`.
#[derive(Debug, Clone)]
pub struct ShockGenerator {
    factor: Array2<f64>,
}

impl ShockGenerator {
    /// Factorise `cov` once for repeated draws.
    ///
    /// # Errors
    /// Returns [`crate::SimulationError::NonPositiveDefiniteCovariance`] if
    /// the matrix cannot be factorised, or
    /// [`crate::SimulationError::DimensionMismatch`] if it is not square.
    pub fn new(cov: &Array2<f64>) -> Result<Self> {
        let factor = cholesky(cov)?;
        Ok(Self { factor })
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.factor.nrows()
    }

    /// The Cholesky factor `L`.
    pub const fn factor(&self) -> &Array2<f64> {
        &self.factor
    }

    /// Draw `days` rows of correlated shocks.
    pub fn generate<R: Rng + ?Sized>(&self, days: usize, rng: &mut R) -> Array2<f64> {
        let z = Array2::from_shape_simple_fn((days, self.n_assets()), || {
            rng.sample::<f64, _>(StandardNormal)
        });
        z.dot(&self.factor.t())
    }
}
