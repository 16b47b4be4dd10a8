//! Plot-ready data for a fan chart of simulated paths.

use crate::export::{ExportError, check_daily_curves};
use ndarray::ArrayView2;
use portsim_risk::RiskSummary;
use portsim_risk::metrics::{LOWER_BAND_PERCENTILE, UPPER_BAND_PERCENTILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One simulated path selected for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampledPath {
    /// Trial index in the ensemble.
    pub simulation: usize,
    /// Portfolio value per day.
    pub values: Vec<f64>,
}

/// Everything a plotting front end needs to draw the run
///
/// Days are numbered from 0, matching the `day` column of the exported
/// tables; the baseline is the initial value drawn as a horizontal reference
/// line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    /// Day numbers, `0..T`.
    pub days: Vec<usize>,
    /// Evenly spaced subset of the trials.
    pub paths: Vec<SampledPath>,
    /// Mean value per day.
    pub mean_path: Vec<f64>,
    /// Lower band per day.
    pub lower_band: Vec<f64>,
    /// Upper band per day.
    pub upper_band: Vec<f64>,
    /// Percentile of the lower band.
    pub lower_percentile: f64,
    /// Percentile of the upper band.
    pub upper_percentile: f64,
    /// Initial portfolio value.
    pub baseline: f64,
}

impl ChartData {
    /// Select up to `max_paths` trials and attach the summary curves.
    ///
    /// # Errors
    /// Returns [`ExportError::ShapeMismatch`] if the summary curves do not
    /// have one entry per row of `paths`.
    pub fn from_results(
        paths: ArrayView2<'_, f64>,
        summary: &RiskSummary,
        initial_value: f64,
        max_paths: usize,
    ) -> Result<Self, ExportError> {
        let (days, trials) = paths.dim();
        check_daily_curves(days, summary)?;

        let paths = evenly_spaced(trials, max_paths)
            .into_iter()
            .map(|simulation| SampledPath {
                simulation,
                values: paths.column(simulation).to_vec(),
            })
            .collect();

        Ok(Self {
            days: (0..days).collect(),
            paths,
            mean_path: summary.mean_path.clone(),
            lower_band: summary.lower_band.clone(),
            upper_band: summary.upper_band.clone(),
            lower_percentile: LOWER_BAND_PERCENTILE,
            upper_percentile: UPPER_BAND_PERCENTILE,
            baseline: initial_value,
        })
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`.
    ///
    /// # Errors
    /// Fails on serialization or IO errors.
    pub fn write(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn evenly_spaced(total: usize, max: usize) -> Vec<usize> {
    if max >= total {
        return (0..total).collect();
    }
    (0..max).map(|i| i * total / max).collect()
}
