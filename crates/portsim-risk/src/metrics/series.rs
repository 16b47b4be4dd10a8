//! Validated one-dimensional return series.

use super::MetricsError;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Per-simulation total returns
///
/// Construction guarantees a non-empty series of finite values, so the
/// metric functions that take a `&ReturnSeries` never need to re-inspect
/// their input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a series from raw returns.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidSeries`] if `values` is empty or holds a
    /// NaN or infinite value.
    pub fn new(values: Vec<f64>) -> Result<Self, MetricsError> {
        if values.is_empty() {
            return Err(MetricsError::InvalidSeries(
                "series must contain at least one value".to_string(),
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(MetricsError::InvalidSeries(format!(
                "value at index {idx} is not finite ({})",
                values[idx]
            )));
        }
        Ok(Self { values })
    }

    /// Build total returns `(final - initial) / initial` from final portfolio values.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidSeries`] if `initial_value` is not a
    /// positive finite number or the resulting series is malformed.
    pub fn from_final_values(
        final_values: &[f64],
        initial_value: f64,
    ) -> Result<Self, MetricsError> {
        if !(initial_value > 0.0 && initial_value.is_finite()) {
            return Err(MetricsError::InvalidSeries(format!(
                "initial value must be positive and finite, got {initial_value}"
            )));
        }
        Self::new(
            final_values
                .iter()
                .map(|v| (v - initial_value) / initial_value)
                .collect(),
        )
    }

    /// Borrow the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Smallest value.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Values sorted ascending.
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// Consume the series and return the raw values.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl Deref for ReturnSeries {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl TryFrom<Vec<f64>> for ReturnSeries {
    type Error = MetricsError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<ReturnSeries> for Vec<f64> {
    fn from(series: ReturnSeries) -> Self {
        series.values
    }
}
