//! Portfolio weight vectors.

use crate::error::{Result, SimulationError};
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tolerance on `Σw = 1`.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Non-negative asset weights summing to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PortfolioWeights {
    weights: Array1<f64>,
}

impl PortfolioWeights {
    /// Wrap weights that already satisfy the invariant.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidWeights`] if the vector is empty, an
    /// entry is negative or non-finite, or the entries do not sum to one.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        Self::check_entries(&weights)?;
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimulationError::InvalidWeights(format!(
                "weights must sum to 1, got {sum}"
            )));
        }
        Ok(Self {
            weights: Array1::from(weights),
        })
    }

    /// Scale arbitrary non-negative raw weights so they sum to one.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidWeights`] if an entry is negative or
    /// non-finite, or all entries are zero.
    pub fn normalized(raw: Vec<f64>) -> Result<Self> {
        Self::check_entries(&raw)?;
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            return Err(SimulationError::InvalidWeights(
                "raw weights sum to zero".to_string(),
            ));
        }
        Ok(Self {
            weights: Array1::from(raw) / sum,
        })
    }

    /// Equal weight `1/n` on every asset.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidWeights`] if `n` is zero.
    pub fn equal(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SimulationError::InvalidWeights(
                "cannot weight an empty portfolio".to_string(),
            ));
        }
        Ok(Self {
            weights: Array1::from_elem(n, 1.0 / n as f64),
        })
    }

    /// Uniform random draws in `[0, 1)` normalised to sum to one.
    ///
    /// Falls back to equal weights in the degenerate case where every draw
    /// is zero.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidWeights`] if `n` is zero.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        if n == 0 {
            return Self::equal(0);
        }
        let raw: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>()).collect();
        if raw.iter().sum::<f64>() > 0.0 {
            Self::normalized(raw)
        } else {
            Self::equal(n)
        }
    }

    fn check_entries(weights: &[f64]) -> Result<()> {
        if weights.is_empty() {
            return Err(SimulationError::InvalidWeights(
                "weight vector is empty".to_string(),
            ));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SimulationError::InvalidWeights(format!(
                "weight {i} must be non-negative and finite, got {w}"
            )));
        }
        Ok(())
    }

    /// Weights as an array.
    pub const fn as_array(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a constructed value.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl TryFrom<Vec<f64>> for PortfolioWeights {
    type Error = SimulationError;

    fn try_from(weights: Vec<f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<PortfolioWeights> for Vec<f64> {
    fn from(weights: PortfolioWeights) -> Self {
        weights.weights.to_vec()
    }
}
