//! Synthetic two-asset scenario that runs without network access.

use crate::pipeline::{PipelineError, SimulationRun, WeightScheme, run_with_statistics};
use ndarray::array;
use portsim_data::{DataError, ReturnStatistics};
use portsim_sim::{AssetUniverse, SimulationConfig};

/// Symbols of the demo assets.
pub const DEMO_SYMBOLS: [&str; 2] = ["AAA", "BBB"];

/// Daily means 0.10% and 0.05%, volatilities 2% and 3%, covariance 0.0001.
///
/// # Errors
/// Never fails for the fixed inputs; the signature mirrors [`ReturnStatistics::new`].
pub fn demo_statistics() -> Result<ReturnStatistics, DataError> {
    ReturnStatistics::new(
        DEMO_SYMBOLS.iter().map(ToString::to_string).collect(),
        array![0.001, 0.0005],
        array![[0.0004, 0.0001], [0.0001, 0.0009]],
    )
}

/// 10 days, 1000 simulations, initial value 10,000.
///
/// # Errors
/// Never fails for the fixed symbols.
pub fn demo_config() -> Result<SimulationConfig, PipelineError> {
    let universe = AssetUniverse::new(DEMO_SYMBOLS.iter().map(ToString::to_string).collect())?;
    Ok(SimulationConfig::new(universe)
        .with_horizon_days(10)
        .with_simulations(1_000)
        .with_initial_value(10_000.0))
}

/// Fixed 60/40 weights of the demo portfolio.
pub fn demo_weights() -> WeightScheme {
    WeightScheme::Custom(vec![0.6, 0.4])
}

/// Run the demo scenario with `config`, which must use the demo universe.
///
/// # Errors
/// Fails if `config` is invalid or names other assets.
pub fn run_demo(config: &SimulationConfig) -> Result<SimulationRun, PipelineError> {
    run_with_statistics(demo_statistics()?, config, &demo_weights())
}
