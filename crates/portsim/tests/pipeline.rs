//! Full runs through the facade with in-memory statistics.

use chrono::{Duration, Utc};
use ndarray::{Axis, array};
use portsim::data::{InMemoryStatisticsProvider, ReturnStatistics};
use portsim::demo::{demo_config, demo_statistics, demo_weights, run_demo};
use portsim::output::ExportFormat;
use portsim::sim::{AssetUniverse, ExecutionMode, SimulationError};
use portsim::{PipelineError, WeightScheme, run_simulation};

#[tokio::test]
async fn test_run_through_provider_matches_direct_run() {
    let provider = InMemoryStatisticsProvider::new(demo_statistics().unwrap());
    let config = demo_config().unwrap();
    let end = Utc::now();

    let fetched = run_simulation(
        &provider,
        &config,
        &demo_weights(),
        end - Duration::days(300),
        end,
    )
    .await
    .unwrap();
    let direct = run_demo(&config).unwrap();

    assert_eq!(fetched.ensemble, direct.ensemble);
    assert_eq!(fetched.summary, direct.summary);
}

#[test]
fn test_demo_scenario_properties() {
    let run = run_demo(&demo_config().unwrap()).unwrap();
    let values = run.ensemble.values();

    assert_eq!(values.dim(), (10, 1_000));
    assert!(values.iter().all(|v| *v > 0.0));
    for (t, row) in values.axis_iter(Axis(0)).enumerate() {
        let min = row.iter().copied().fold(f64::INFINITY, f64::min);
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min < run.summary.mean_path[t] && run.summary.mean_path[t] < max);
    }
    assert!(run.summary.drawdown.iter().all(|d| *d <= 0.0));
    assert!(run.summary.sharpe_ratio.is_some());
}

#[test]
fn test_execution_mode_does_not_change_results() {
    let config = demo_config().unwrap();
    let sequential = run_demo(&config.clone().with_execution(ExecutionMode::Sequential)).unwrap();
    let parallel = run_demo(&config.with_execution(ExecutionMode::Parallel)).unwrap();
    assert_eq!(sequential.ensemble, parallel.ensemble);
}

#[test]
fn test_universe_mismatch() {
    let config = demo_config().unwrap().with_seed(1);
    let mut other = config.clone();
    other.universe = AssetUniverse::parse("AAA,CCC").unwrap();

    let result =
        portsim::run_with_statistics(demo_statistics().unwrap(), &other, &WeightScheme::Equal);
    assert!(matches!(result, Err(PipelineError::UniverseMismatch { .. })));
}

#[tokio::test]
async fn test_unknown_symbol_surfaces_data_error() {
    let provider = InMemoryStatisticsProvider::new(demo_statistics().unwrap());
    let mut config = demo_config().unwrap();
    config.universe = AssetUniverse::parse("AAA,ZZZ").unwrap();
    let end = Utc::now();

    let result = run_simulation(&provider, &config, &WeightScheme::Equal, end, end).await;
    assert!(matches!(result, Err(PipelineError::Data(_))));
}

#[test]
fn test_run_exports_files() {
    let run = run_demo(&demo_config().unwrap()).unwrap();
    let dir = std::env::temp_dir().join(format!("portsim-pipeline-{}", std::process::id()));

    let written = run.exporter().unwrap().write_all(&dir, ExportFormat::Csv).unwrap();
    assert_eq!(written.len(), 4);
    assert!(written.iter().all(|p| p.exists()));

    let chart = run.chart(25).unwrap();
    assert_eq!(chart.paths.len(), 25);

    let report = run.report().unwrap().render_text();
    assert!(report.contains("AAA"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_lockstep_assets_need_jitter() {
    let lockstep = || {
        ReturnStatistics::new(
            vec!["AAA".to_string(), "BBB".to_string()],
            array![0.001, 0.001],
            array![[0.0004, 0.0004], [0.0004, 0.0004]],
        )
        .unwrap()
    };
    let config = demo_config().unwrap().with_simulations(200);

    let strict = portsim::run_with_statistics(lockstep(), &config, &WeightScheme::Equal);
    assert!(matches!(
        strict,
        Err(PipelineError::Simulation(
            SimulationError::NonPositiveDefiniteCovariance(_)
        ))
    ));

    let ridged = portsim::run_with_statistics(
        lockstep(),
        &config.with_covariance_jitter(1e-6),
        &WeightScheme::Equal,
    )
    .unwrap();
    assert_eq!(ridged.ensemble.values().dim(), (10, 200));
    assert!(ridged.ensemble.values().iter().all(|v| *v > 0.0));
}
