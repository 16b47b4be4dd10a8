//! Writing a full run to disk.

use ndarray::Array2;
use portsim_output::{ChartData, ExportFormat, ResultExporter, RunMetadata};
use portsim_risk::RiskCalculator;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("portsim-output-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn paths() -> Array2<f64> {
    Array2::from_shape_fn((6, 25), |(t, m)| {
        10_000.0 * (1.0 + 0.002 * t as f64) * (1.0 + 0.004 * (m as f64 - 12.0))
    })
}

#[test]
fn test_write_all_csv() {
    let paths = paths();
    let summary = RiskCalculator::default().compute(paths.view(), 10_000.0).unwrap();
    let dir = scratch_dir("csv");

    let written = ResultExporter::new(paths.view(), &summary)
        .unwrap()
        .with_metadata(RunMetadata {
            symbols: vec!["SPY".into(), "QQQ".into()],
            weights: vec![0.5, 0.5],
            seed: Some(42),
        })
        .write_all(&dir, ExportFormat::Csv)
        .unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["simulations.csv", "daily_summary.csv", "drawdown.csv", "summary.json"]
    );

    let simulations = fs::read_to_string(dir.join("simulations.csv")).unwrap();
    assert!(simulations.starts_with("simulation,final_value,return\n"));
    assert_eq!(simulations.lines().count(), 26);

    let daily = fs::read_to_string(dir.join("daily_summary.csv")).unwrap();
    assert!(daily.starts_with("day,mean,p5,p95\n"));
    assert_eq!(daily.lines().count(), 7);

    let drawdown = fs::read_to_string(dir.join("drawdown.csv")).unwrap();
    assert!(drawdown.starts_with("day,drawdown\n"));

    let summary_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary_json["n_simulations"], 25);
    assert_eq!(summary_json["seed"], 42);
    assert_eq!(summary_json["symbols"][1], "QQQ");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_write_all_json_and_chart() {
    let paths = paths();
    let summary = RiskCalculator::default().compute(paths.view(), 10_000.0).unwrap();
    let dir = scratch_dir("json");

    let written = ResultExporter::new(paths.view(), &summary)
        .unwrap()
        .write_all(&dir, ExportFormat::PrettyJson)
        .unwrap();
    assert!(written[0].ends_with("simulations.json"));

    let records: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 25);
    assert!(records[0].get("return").is_some());

    let chart_path = dir.join("chart.json");
    ChartData::from_results(paths.view(), &summary, 10_000.0, 10)
        .unwrap()
        .write(&chart_path)
        .unwrap();
    let chart: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&chart_path).unwrap()).unwrap();
    assert_eq!(chart["paths"].as_array().unwrap().len(), 10);
    assert_eq!(chart["baseline"], 10_000.0);

    fs::remove_dir_all(&dir).unwrap();
}
