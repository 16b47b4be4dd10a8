//! End-to-end checks of the simulation engine.

use approx::assert_abs_diff_eq;
use ndarray::{Axis, array};
use portsim_risk::RiskCalculator;
use portsim_sim::{
    AssetUniverse, ExecutionMode, PortfolioWeights, SimulationConfig, SimulationError,
    SimulationInputs, simulate,
};
use rstest::rstest;

fn two_assets() -> (SimulationInputs, SimulationConfig) {
    let inputs = SimulationInputs::new(
        array![0.001, 0.0005],
        array![[0.0004, 0.0001], [0.0001, 0.0009]],
        PortfolioWeights::new(vec![0.6, 0.4]).unwrap(),
    )
    .unwrap();
    let config = SimulationConfig::new(AssetUniverse::parse("AAA,BBB").unwrap())
        .with_horizon_days(10)
        .with_simulations(1_000)
        .with_seed(42);
    (inputs, config)
}

#[test]
fn test_two_asset_scenario() {
    let (inputs, config) = two_assets();
    let ensemble = simulate(&inputs, &config).unwrap();
    let values = ensemble.values();

    assert_eq!(values.dim(), (10, 1_000));
    assert!(values.iter().all(|v| *v > 0.0 && v.is_finite()));

    let summary = RiskCalculator::default().compute(values, config.initial_value).unwrap();
    for (t, row) in values.axis_iter(Axis(0)).enumerate() {
        let min = row.iter().copied().fold(f64::INFINITY, f64::min);
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min < summary.mean_path[t] && summary.mean_path[t] < max);
        assert!(summary.lower_band[t] <= summary.upper_band[t]);
    }
    assert!(summary.cvar <= summary.var);
    assert!(summary.var < 0.0);
}

#[test]
fn test_single_asset_daily_moments_converge() {
    let mu = 0.001;
    let sigma2 = 0.0004;
    let inputs = SimulationInputs::new(
        array![mu],
        array![[sigma2]],
        PortfolioWeights::equal(1).unwrap(),
    )
    .unwrap();
    let config = SimulationConfig::new(AssetUniverse::parse("ONE").unwrap())
        .with_horizon_days(100)
        .with_simulations(2_000)
        .with_initial_value(1.0);
    let ensemble = simulate(&inputs, &config).unwrap();

    let mut daily = Vec::with_capacity(100 * 2_000);
    for m in 0..ensemble.n_simulations() {
        let mut previous = ensemble.initial_value();
        for &value in ensemble.path(m) {
            daily.push(value / previous - 1.0);
            previous = value;
        }
    }

    let n = daily.len() as f64;
    let mean = daily.iter().sum::<f64>() / n;
    let variance = daily.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    assert_abs_diff_eq!(mean, mu, epsilon = 3e-4);
    assert_abs_diff_eq!(variance, sigma2, epsilon = 2e-5);
}

#[test]
fn test_sequential_and_parallel_are_identical() {
    let (inputs, config) = two_assets();
    let sequential =
        simulate(&inputs, &config.clone().with_execution(ExecutionMode::Sequential)).unwrap();
    let parallel = simulate(&inputs, &config.with_execution(ExecutionMode::Parallel)).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_seed_controls_paths() {
    let (inputs, config) = two_assets();
    let a = simulate(&inputs, &config).unwrap();
    let b = simulate(&inputs, &config).unwrap();
    let c = simulate(&inputs, &config.with_seed(43)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_non_positive_definite_covariance_fails_before_running() {
    let inputs = SimulationInputs::new(
        array![0.0, 0.0],
        array![[0.0004, 0.0008], [0.0008, 0.0004]],
        PortfolioWeights::equal(2).unwrap(),
    )
    .unwrap();
    let (_, config) = two_assets();
    assert!(matches!(
        simulate(&inputs, &config),
        Err(SimulationError::NonPositiveDefiniteCovariance(_))
    ));
}

#[rstest]
#[case(0, 10)]
#[case(10, 0)]
fn test_empty_runs_are_rejected(#[case] days: usize, #[case] sims: usize) {
    let (inputs, config) = two_assets();
    let config = config.with_horizon_days(days).with_simulations(sims);
    assert!(matches!(
        simulate(&inputs, &config),
        Err(SimulationError::InvalidConfig(_))
    ));
}
