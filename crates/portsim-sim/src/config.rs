//! Simulation configuration.

use crate::error::{Result, SimulationError};
use crate::universe::AssetUniverse;
use serde::{Deserialize, Serialize};

/// Symbols used when no universe is supplied.
pub const DEFAULT_SYMBOLS: [&str; 8] =
    ["TSM", "AAPL", "NVDA", "AMZN", "SPY", "QQQ", "^N225", "TSLA"];

/// How independent trials are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One trial after another on the calling thread.
    Sequential,
    /// Trials spread over the rayon thread pool.
    #[default]
    Parallel,
}

/// Parameters of one Monte Carlo run
///
/// Passed by reference into [`crate::simulate`]; nothing about a run lives
/// in process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Assets, in the order of the weight vector and covariance matrix.
    pub universe: AssetUniverse,

    /// Number of simulated trading days `T` (default: 100).
    pub horizon_days: usize,

    /// Number of independent paths `M` (default: 100).
    pub n_simulations: usize,

    /// Starting portfolio value `V₀` (default: 10,000).
    pub initial_value: f64,

    /// VaR/CVaR percentile `α` in `(0, 100)` (default: 5.0, i.e. 95% confidence).
    pub confidence_level: f64,

    /// Base seed from which every trial's generator is derived (default: 42).
    pub seed: u64,

    /// Trial scheduling (default: parallel).
    pub execution: ExecutionMode,

    /// Relative diagonal ridge added to a covariance that fails to factorise
    /// (default: none, such a covariance is an error).
    pub covariance_jitter: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(AssetUniverse::from_static(&DEFAULT_SYMBOLS))
    }
}

impl SimulationConfig {
    /// Create a configuration for `universe` with default parameters.
    pub const fn new(universe: AssetUniverse) -> Self {
        Self {
            universe,
            horizon_days: 100,
            n_simulations: 100,
            initial_value: 10_000.0,
            confidence_level: 5.0,
            seed: 42,
            execution: ExecutionMode::Parallel,
            covariance_jitter: None,
        }
    }

    /// Set the horizon in days.
    pub const fn with_horizon_days(mut self, days: usize) -> Self {
        self.horizon_days = days;
        self
    }

    /// Set the number of simulated paths.
    pub const fn with_simulations(mut self, n: usize) -> Self {
        self.n_simulations = n;
        self
    }

    /// Set the initial portfolio value.
    pub const fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    /// Set the VaR/CVaR percentile.
    pub const fn with_confidence_level(mut self, alpha: f64) -> Self {
        self.confidence_level = alpha;
        self
    }

    /// Set the base seed.
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the execution mode.
    pub const fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Regularise a non positive definite covariance with `jitter` instead
    /// of failing.
    pub const fn with_covariance_jitter(mut self, jitter: f64) -> Self {
        self.covariance_jitter = Some(jitter);
        self
    }

    /// Check the scalar parameters.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfig`] if the horizon or the
    /// simulation count is zero, the initial value is not positive and
    /// finite, the confidence level lies outside `(0, 100)`, or a covariance
    /// jitter is set but not positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(SimulationError::InvalidConfig(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.n_simulations == 0 {
            return Err(SimulationError::InvalidConfig(
                "n_simulations must be at least 1".to_string(),
            ));
        }
        if !(self.initial_value > 0.0 && self.initial_value.is_finite()) {
            return Err(SimulationError::InvalidConfig(format!(
                "initial_value must be positive and finite, got {}",
                self.initial_value
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 100.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "confidence_level must lie in (0, 100), got {}",
                self.confidence_level
            )));
        }
        if let Some(jitter) = self
            .covariance_jitter
            .filter(|j| !(*j > 0.0 && j.is_finite()))
        {
            return Err(SimulationError::InvalidConfig(format!(
                "covariance_jitter must be positive and finite, got {jitter}"
            )));
        }
        Ok(())
    }
}
