//! Monte Carlo path simulation.
//!
//! A trial draws `T x N` correlated shocks, adds the mean daily returns,
//! collapses each day to a portfolio return `r_t = w · R_t`, and compounds
//! `V_t = V₀ · Π(1 + r_s)`. Trials are independent and write disjoint columns
//! of the output matrix.

use crate::config::{ExecutionMode, SimulationConfig};
use crate::ensemble::SimulationEnsemble;
use crate::error::{Result, SimulationError};
use crate::rng::trial_rng;
use crate::shocks::ShockGenerator;
use crate::weights::PortfolioWeights;
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, ArrayViewMut1, Axis};
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info};

/// Estimated return statistics and the portfolio weights to simulate
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInputs {
    mean_returns: Array1<f64>,
    covariance: Array2<f64>,
    weights: PortfolioWeights,
}

impl SimulationInputs {
    /// Bundle inputs after checking their dimensions agree.
    ///
    /// # Errors
    /// Returns [`SimulationError::DimensionMismatch`] if the mean vector,
    /// covariance matrix and weights do not all describe the same number of
    /// assets, or [`SimulationError::InvalidConfig`] if a mean is not finite.
    pub fn new(
        mean_returns: Array1<f64>,
        covariance: Array2<f64>,
        weights: PortfolioWeights,
    ) -> Result<Self> {
        let n = weights.len();
        if mean_returns.len() != n {
            return Err(SimulationError::DimensionMismatch {
                what: "mean return vector",
                expected: n,
                actual: mean_returns.len(),
            });
        }
        if covariance.nrows() != n {
            return Err(SimulationError::DimensionMismatch {
                what: "covariance rows",
                expected: n,
                actual: covariance.nrows(),
            });
        }
        if covariance.ncols() != n {
            return Err(SimulationError::DimensionMismatch {
                what: "covariance columns",
                expected: n,
                actual: covariance.ncols(),
            });
        }
        if mean_returns.iter().any(|m| !m.is_finite()) {
            return Err(SimulationError::InvalidConfig(
                "mean returns must be finite".to_string(),
            ));
        }
        Ok(Self {
            mean_returns,
            covariance,
            weights,
        })
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.weights.len()
    }

    /// Mean daily return per asset.
    pub const fn mean_returns(&self) -> &Array1<f64> {
        &self.mean_returns
    }

    /// Covariance of daily returns.
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Portfolio weights.
    pub const fn weights(&self) -> &PortfolioWeights {
        &self.weights
    }
}

/// Simulates single portfolio paths from fixed inputs
///
/// The covariance matrix is factorised once here and shared read-only by
/// every trial.
#[derive(Debug, Clone)]
pub struct PathSimulator {
    shocks: ShockGenerator,
    mean_returns: Array1<f64>,
    weights: Array1<f64>,
}

impl PathSimulator {
    /// Prepare a simulator, factorising the covariance matrix.
    ///
    /// # Errors
    /// Returns [`SimulationError::NonPositiveDefiniteCovariance`] if the
    /// covariance matrix has no Cholesky factor.
    pub fn new(inputs: &SimulationInputs) -> Result<Self> {
        Ok(Self {
            shocks: ShockGenerator::new(&inputs.covariance)?,
            mean_returns: inputs.mean_returns.clone(),
            weights: inputs.weights.as_array().clone(),
        })
    }

    /// Daily portfolio returns of one trial.
    pub fn portfolio_returns<R: Rng + ?Sized>(&self, days: usize, rng: &mut R) -> Array1<f64> {
        let mut asset_returns = self.shocks.generate(days, rng);
        asset_returns += &self.mean_returns;
        asset_returns.dot(&self.weights)
    }

    /// Value path of one trial, `days` long, starting from `initial_value`.
    pub fn simulate_trial<R: Rng + ?Sized>(
        &self,
        days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Array1<f64> {
        let mut path = self.portfolio_returns(days, rng);
        compound_in_place(path.view_mut(), initial_value);
        path
    }

    fn fill_column(
        &self,
        mut column: ArrayViewMut1<'_, f64>,
        initial_value: f64,
        seed: u64,
        m: usize,
    ) {
        let mut rng = trial_rng(seed, m);
        let returns = self.portfolio_returns(column.len(), &mut rng);
        column.assign(&returns);
        compound_in_place(column, initial_value);
    }
}

/// Replace daily returns with the compounded value path `V₀ · cumprod(1 + r)`.
fn compound_in_place(mut returns: ArrayViewMut1<'_, f64>, initial_value: f64) {
    let mut value = initial_value;
    for r in returns.iter_mut() {
        value *= 1.0 + *r;
        *r = value;
    }
}

/// Run `config.n_simulations` independent trials over `config.horizon_days`.
///
/// # Errors
/// Fails before any trial runs if the configuration is invalid, the universe
/// size disagrees with the inputs, or the covariance matrix cannot be
/// factorised.
pub fn simulate(
    inputs: &SimulationInputs,
    config: &SimulationConfig,
) -> Result<SimulationEnsemble> {
    config.validate()?;
    if config.universe.len() != inputs.n_assets() {
        return Err(SimulationError::DimensionMismatch {
            what: "asset universe",
            expected: inputs.n_assets(),
            actual: config.universe.len(),
        });
    }

    let simulator = PathSimulator::new(inputs)?;
    let (days, trials) = (config.horizon_days, config.n_simulations);
    let (initial_value, seed) = (config.initial_value, config.seed);

    info!(
        assets = inputs.n_assets(),
        days,
        trials,
        mode = ?config.execution,
        "Running Monte Carlo simulation"
    );
    let start = Instant::now();

    let mut values = Array2::<f64>::zeros((days, trials));
    match config.execution {
        ExecutionMode::Sequential => values
            .axis_iter_mut(Axis(1))
            .enumerate()
            .for_each(|(m, column)| simulator.fill_column(column, initial_value, seed, m)),
        ExecutionMode::Parallel => values
            .axis_iter_mut(Axis(1))
            .into_par_iter()
            .enumerate()
            .for_each(|(m, column)| simulator.fill_column(column, initial_value, seed, m)),
    }

    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Simulation finished");
    Ok(SimulationEnsemble::new(values, initial_value))
}
