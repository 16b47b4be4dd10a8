//! Aligned daily return history.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, s};

/// Minimum number of daily return observations for statistics.
pub const MIN_RETURN_OBSERVATIONS: usize = 2;

/// Daily simple returns of several assets on a common calendar
///
/// Row `t` holds the percent change from the previous aligned close to the
/// close on `dates[t]`; column `i` belongs to `symbols[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnHistory {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    returns: Array2<f64>,
}

impl ReturnHistory {
    /// Wrap precomputed returns.
    ///
    /// # Errors
    /// Returns [`DataError::ShapeMismatch`] if the matrix does not have one
    /// row per date and one column per symbol,
    /// [`DataError::InvalidPrice`] if a return is non-finite, or
    /// [`DataError::InsufficientHistory`] for fewer than two rows.
    pub fn new(symbols: Vec<String>, dates: Vec<NaiveDate>, returns: Array2<f64>) -> Result<Self> {
        check_shape(&symbols, &dates, returns.dim())?;
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(DataError::InvalidPrice(
                "returns contain non-finite values".to_string(),
            ));
        }
        if returns.nrows() < MIN_RETURN_OBSERVATIONS {
            return Err(DataError::InsufficientHistory {
                required: MIN_RETURN_OBSERVATIONS,
                actual: returns.nrows(),
            });
        }
        Ok(Self {
            symbols,
            dates,
            returns,
        })
    }

    /// Percent changes of aligned closing prices, dropping the first row.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidPrice`] if a price is not positive and
    /// finite, plus the conditions of [`ReturnHistory::new`].
    pub fn from_prices(
        symbols: Vec<String>,
        dates: Vec<NaiveDate>,
        prices: &Array2<f64>,
    ) -> Result<Self> {
        check_shape(&symbols, &dates, prices.dim())?;
        if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(DataError::InvalidPrice(format!(
                "prices must be positive and finite, got {bad}"
            )));
        }
        if prices.nrows() <= MIN_RETURN_OBSERVATIONS {
            return Err(DataError::InsufficientHistory {
                required: MIN_RETURN_OBSERVATIONS,
                actual: prices.nrows().saturating_sub(1),
            });
        }

        let current = prices.slice(s![1.., ..]);
        let previous = prices.slice(s![..-1, ..]);
        let returns = &current / &previous - 1.0;

        Self::new(symbols, dates[1..].to_vec(), returns)
    }

    /// Asset symbols, in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Date of each return row.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The `T x N` return matrix.
    pub const fn returns(&self) -> &Array2<f64> {
        &self.returns
    }

    /// Number of return observations.
    pub fn n_observations(&self) -> usize {
        self.returns.nrows()
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.returns.ncols()
    }

    /// Returns of one symbol.
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.returns.column(i))
    }
}

fn check_shape(
    symbols: &[String],
    dates: &[NaiveDate],
    (rows, cols): (usize, usize),
) -> Result<()> {
    if symbols.len() != cols {
        return Err(DataError::ShapeMismatch(format!(
            "{} symbols for {cols} columns",
            symbols.len()
        )));
    }
    if dates.len() != rows {
        return Err(DataError::ShapeMismatch(format!(
            "{} dates for {rows} rows",
            dates.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
    }

    #[test]
    fn test_from_prices() {
        let prices = array![[100.0, 50.0], [110.0, 50.0], [99.0, 55.0]];
        let history =
            ReturnHistory::from_prices(vec!["A".into(), "B".into()], dates(3), &prices).unwrap();

        assert_eq!(history.n_observations(), 2);
        assert_eq!(history.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_abs_diff_eq!(history.returns()[[0, 0]], 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(history.returns()[[1, 0]], -0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(history.returns()[[1, 1]], 0.10, epsilon = 1e-12);
        assert_eq!(history.column("B").unwrap().len(), 2);
        assert!(history.column("C").is_none());
    }

    #[test]
    fn test_two_prices_are_insufficient() {
        let prices = array![[100.0], [101.0]];
        let result = ReturnHistory::from_prices(vec!["A".into()], dates(2), &prices);
        assert!(matches!(
            result,
            Err(DataError::InsufficientHistory {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let prices = array![[100.0], [0.0], [101.0]];
        let result = ReturnHistory::from_prices(vec!["A".into()], dates(3), &prices);
        assert!(matches!(result, Err(DataError::InvalidPrice(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let prices = array![[100.0], [101.0], [102.0]];
        let result = ReturnHistory::from_prices(vec!["A".into(), "B".into()], dates(3), &prices);
        assert!(matches!(result, Err(DataError::ShapeMismatch(_))));
    }
}
