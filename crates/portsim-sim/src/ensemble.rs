//! Simulated portfolio value paths.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// `T x M` matrix of portfolio values, one column per trial
///
/// Row `t` holds the values at the end of day `t + 1`; the initial value is
/// kept alongside rather than as row zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEnsemble {
    values: Array2<f64>,
    initial_value: f64,
}

impl SimulationEnsemble {
    pub(crate) const fn new(values: Array2<f64>, initial_value: f64) -> Self {
        Self {
            values,
            initial_value,
        }
    }

    /// Number of simulated days `T`.
    pub fn horizon_days(&self) -> usize {
        self.values.nrows()
    }

    /// Number of trials `M`.
    pub fn n_simulations(&self) -> usize {
        self.values.ncols()
    }

    /// Starting value `V₀` shared by every trial.
    pub const fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// The full value matrix.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Path of trial `m`.
    ///
    /// # Panics
    /// Panics if `m >= n_simulations()`.
    pub fn path(&self, m: usize) -> ArrayView1<'_, f64> {
        self.values.column(m)
    }

    /// Values on the last day.
    pub fn final_values(&self) -> Array1<f64> {
        match self.horizon_days() {
            0 => Array1::zeros(0),
            t => self.values.index_axis(Axis(0), t - 1).to_owned(),
        }
    }

    /// Take the value matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}
