//! Flat-file export of simulation results.
//!
//! A run is written as three record tables plus a scalar summary:
//!
//! - `simulations`: one row per trial with its final value and total return
//! - `daily_summary`: per-day mean and 5th/95th percentile portfolio value
//! - `drawdown`: per-day drawdown of the mean path
//! - `summary.json`: VaR, CVaR, Sharpe ratio and run metadata

use chrono::{DateTime, Utc};
use ndarray::{ArrayView2, Axis};
use portsim_risk::RiskSummary;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized CSV was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Path matrix and summary describe different runs.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Final outcome of one trial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationRecord {
    /// Trial index, 0-based.
    pub simulation: usize,

    /// Portfolio value on the last day.
    pub final_value: f64,

    /// Total return `(final - initial) / initial`.
    #[serde(rename = "return")]
    pub total_return: f64,
}

/// Cross-section of all trials on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummaryRecord {
    /// Day index, 0-based.
    pub day: usize,

    /// Mean portfolio value.
    pub mean: f64,

    /// 5th percentile portfolio value.
    pub p5: f64,

    /// 95th percentile portfolio value.
    pub p95: f64,
}

/// Drawdown of the mean path on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawdownRecord {
    /// Day index, 0-based.
    pub day: usize,

    /// Fractional decline from the running peak (0 or negative).
    pub drawdown: f64,
}

/// Row type that can be written as a CSV table or a JSON array.
pub trait ExportRecord: Serialize {}

impl ExportRecord for SimulationRecord {}
impl ExportRecord for DailySummaryRecord {}
impl ExportRecord for DrawdownRecord {}

/// Inputs of a run that are not part of the risk summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    /// Asset symbols in weight order.
    pub symbols: Vec<String>,

    /// Portfolio weights.
    pub weights: Vec<f64>,

    /// Base seed of the run.
    pub seed: Option<u64>,
}

/// Scalar risk statistics written to `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryExport {
    /// When the file was produced.
    pub generated_at: DateTime<Utc>,

    /// Run inputs.
    #[serde(flatten)]
    pub metadata: RunMetadata,

    /// Percentile `α` of VaR/CVaR.
    pub confidence_level: f64,

    /// Number of trials.
    pub n_simulations: usize,

    /// Number of days.
    pub horizon_days: usize,

    /// Starting value.
    pub initial_value: f64,

    /// Value at Risk as a return.
    pub var: f64,

    /// Conditional VaR as a return.
    pub cvar: f64,

    /// VaR as a currency loss on the initial value.
    pub var_amount: f64,

    /// CVaR as a currency loss on the initial value.
    pub cvar_amount: f64,

    /// Sharpe ratio of total returns, absent when undefined.
    pub sharpe_ratio: Option<f64>,

    /// Mean total return.
    pub mean_return: f64,

    /// Worst total return.
    pub min_return: f64,

    /// Best total return.
    pub max_return: f64,

    /// Share of trials ending below the initial value.
    pub probability_of_loss: f64,

    /// Deepest drawdown of the mean path.
    pub max_drawdown: f64,
}

impl SummaryExport {
    /// Scalar view of `summary`.
    pub fn new(summary: &RiskSummary, metadata: RunMetadata) -> Self {
        Self {
            generated_at: Utc::now(),
            metadata,
            confidence_level: summary.confidence_level,
            n_simulations: summary.n_simulations,
            horizon_days: summary.horizon_days,
            initial_value: summary.initial_value,
            var: summary.var,
            cvar: summary.cvar,
            var_amount: summary.var_amount(),
            cvar_amount: summary.cvar_amount(),
            sharpe_ratio: summary.sharpe_ratio,
            mean_return: summary.mean_return,
            min_return: summary.min_return,
            max_return: summary.max_return,
            probability_of_loss: summary.probability_of_loss,
            max_drawdown: summary.max_drawdown,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl<T: ExportRecord> Exporter for Vec<T> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                Ok(String::from_utf8(bytes)?)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for SummaryExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => Err(ExportError::InvalidFormat(
                "the run summary is nested and has no CSV form".to_string(),
            )),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Record tables of one run, ready to be written
#[derive(Debug, Clone)]
pub struct ResultExporter {
    simulations: Vec<SimulationRecord>,
    daily: Vec<DailySummaryRecord>,
    drawdown: Vec<DrawdownRecord>,
    summary: SummaryExport,
}

impl ResultExporter {
    /// File stem of the per-trial table.
    pub const SIMULATIONS: &'static str = "simulations";
    /// File stem of the per-day table.
    pub const DAILY_SUMMARY: &'static str = "daily_summary";
    /// File stem of the drawdown table.
    pub const DRAWDOWN: &'static str = "drawdown";
    /// File name of the scalar summary.
    pub const SUMMARY_FILE: &'static str = "summary.json";

    /// Build the tables from a `T x M` path matrix and its summary.
    ///
    /// # Errors
    /// Returns [`ExportError::ShapeMismatch`] if the matrix dimensions do not
    /// match the summary or a per-day curve of the summary has the wrong length.
    pub fn new(paths: ArrayView2<'_, f64>, summary: &RiskSummary) -> Result<Self, ExportError> {
        let (days, trials) = paths.dim();
        if days == 0 || days != summary.horizon_days || trials != summary.n_simulations {
            return Err(ExportError::ShapeMismatch(format!(
                "paths are {days} x {trials}, summary describes {} x {}",
                summary.horizon_days, summary.n_simulations
            )));
        }
        check_daily_curves(days, summary)?;

        let initial = summary.initial_value;
        let simulations = paths
            .index_axis(Axis(0), days - 1)
            .iter()
            .enumerate()
            .map(|(simulation, &final_value)| SimulationRecord {
                simulation,
                final_value,
                total_return: (final_value - initial) / initial,
            })
            .collect();

        let daily = (0..days)
            .map(|day| DailySummaryRecord {
                day,
                mean: summary.mean_path[day],
                p5: summary.lower_band[day],
                p95: summary.upper_band[day],
            })
            .collect();

        let drawdown = summary
            .drawdown
            .iter()
            .enumerate()
            .map(|(day, &drawdown)| DrawdownRecord { day, drawdown })
            .collect();

        Ok(Self {
            simulations,
            daily,
            drawdown,
            summary: SummaryExport::new(summary, RunMetadata::default()),
        })
    }

    /// Attach run inputs to the summary file.
    pub fn with_metadata(mut self, metadata: RunMetadata) -> Self {
        self.summary.metadata = metadata;
        self
    }

    /// Per-trial records.
    pub fn simulations(&self) -> &[SimulationRecord] {
        &self.simulations
    }

    /// Per-day records.
    pub fn daily_summary(&self) -> &[DailySummaryRecord] {
        &self.daily
    }

    /// Drawdown records.
    pub fn drawdown(&self) -> &[DrawdownRecord] {
        &self.drawdown
    }

    /// Scalar summary.
    pub const fn summary(&self) -> &SummaryExport {
        &self.summary
    }

    /// Write all tables and the summary into `dir`, creating it if needed.
    ///
    /// # Returns
    /// The written paths, tables first and `summary.json` last.
    ///
    /// # Errors
    /// Fails on the first serialization or IO error.
    pub fn write_all(&self, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        let ext = format.extension();

        let simulations = dir.join(format!("{}.{ext}", Self::SIMULATIONS));
        self.simulations.export_to_file(&simulations, format)?;

        let daily = dir.join(format!("{}.{ext}", Self::DAILY_SUMMARY));
        self.daily.export_to_file(&daily, format)?;

        let drawdown = dir.join(format!("{}.{ext}", Self::DRAWDOWN));
        self.drawdown.export_to_file(&drawdown, format)?;

        let summary = dir.join(Self::SUMMARY_FILE);
        self.summary.export_to_file(&summary, ExportFormat::PrettyJson)?;

        info!(dir = %dir.display(), format = ext, "Exported simulation results");
        Ok(vec![simulations, daily, drawdown, summary])
    }
}

/// Every per-day curve of `summary` must have exactly `days` entries.
pub(crate) fn check_daily_curves(days: usize, summary: &RiskSummary) -> Result<(), ExportError> {
    let curves = [
        ("mean_path", summary.mean_path.len()),
        ("lower_band", summary.lower_band.len()),
        ("upper_band", summary.upper_band.len()),
        ("drawdown", summary.drawdown.len()),
    ];
    match curves.into_iter().find(|&(_, len)| len != days) {
        Some((curve, len)) => Err(ExportError::ShapeMismatch(format!(
            "{days} days of paths, {len} days of {curve}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use portsim_risk::RiskCalculator;
    use rstest::rstest;

    fn exporter() -> ResultExporter {
        let paths = array![[101.0, 99.0, 100.0], [103.0, 97.0, 100.0]];
        let summary = RiskCalculator::default().compute(paths.view(), 100.0).unwrap();
        ResultExporter::new(paths.view(), &summary).unwrap()
    }

    #[test]
    fn test_simulations_csv_header_and_rows() {
        let csv = exporter()
            .simulations()
            .to_vec()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("simulation,final_value,return"));
        assert_eq!(lines.next(), Some("0,103.0,0.03"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_daily_summary_csv_header() {
        let csv = exporter()
            .daily_summary()
            .to_vec()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("day,mean,p5,p95\n0,"));
    }

    #[test]
    fn test_drawdown_json() {
        let json = exporter()
            .drawdown()
            .to_vec()
            .export_to_string(ExportFormat::Json)
            .unwrap();
        assert!(json.starts_with(r#"[{"day":0,"drawdown":"#));
    }

    #[test]
    fn test_summary_has_no_csv_form() {
        let result = exporter().summary().export_to_string(ExportFormat::Csv);
        assert!(matches!(result, Err(ExportError::InvalidFormat(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let paths = array![[101.0, 99.0], [103.0, 97.0]];
        let summary = RiskCalculator::default().compute(paths.view(), 100.0).unwrap();
        let other = array![[101.0, 99.0, 100.0], [103.0, 97.0, 100.0]];
        assert!(matches!(
            ResultExporter::new(other.view(), &summary),
            Err(ExportError::ShapeMismatch(_))
        ));
    }

    #[rstest]
    #[case::lower_band(|s: &mut RiskSummary| s.lower_band.truncate(1))]
    #[case::upper_band(|s: &mut RiskSummary| s.upper_band.truncate(1))]
    #[case::drawdown(|s: &mut RiskSummary| s.drawdown.push(0.0))]
    #[case::mean_path(|s: &mut RiskSummary| s.mean_path.clear())]
    fn test_short_summary_curve_is_rejected(#[case] damage: fn(&mut RiskSummary)) {
        let paths = array![[101.0, 99.0], [103.0, 97.0]];
        let mut summary = RiskCalculator::default().compute(paths.view(), 100.0).unwrap();
        damage(&mut summary);
        assert!(matches!(
            ResultExporter::new(paths.view(), &summary),
            Err(ExportError::ShapeMismatch(_))
        ));
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
