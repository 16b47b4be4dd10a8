//! Ordered asset universe.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Ordered, non-empty list of asset identifiers
///
/// Position `i` in the universe lines up with entry `i` of the weight vector,
/// the mean return vector and row/column `i` of the covariance matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AssetUniverse {
    symbols: Vec<String>,
}

impl AssetUniverse {
    /// Create a universe from symbols, trimming whitespace.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidUniverse`] if the list is empty, a
    /// symbol is blank, or a symbol appears twice.
    pub fn new(symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(SimulationError::InvalidUniverse(
                "universe must contain at least one asset".to_string(),
            ));
        }

        let symbols: Vec<String> = symbols.into_iter().map(|s| s.trim().to_string()).collect();
        {
            let mut seen = HashSet::with_capacity(symbols.len());
            for symbol in &symbols {
                if symbol.is_empty() {
                    return Err(SimulationError::InvalidUniverse(
                        "asset identifiers must not be blank".to_string(),
                    ));
                }
                if !seen.insert(symbol.as_str()) {
                    return Err(SimulationError::InvalidUniverse(format!(
                        "duplicate asset identifier: {symbol}"
                    )));
                }
            }
        }

        Ok(Self { symbols })
    }

    /// Build from a known-good constant list.
    pub(crate) fn from_static(symbols: &[&str]) -> Self {
        debug_assert!(!symbols.is_empty());
        Self {
            symbols: symbols.iter().map(ToString::to_string).collect(),
        }
    }

    /// Parse a comma-separated list such as `"AAPL, MSFT,SPY"`.
    ///
    /// # Errors
    /// Same conditions as [`AssetUniverse::new`].
    pub fn parse(list: &str) -> Result<Self> {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Symbols in order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: a universe holds at least one asset.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Position of `symbol` in the universe.
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Check if a symbol is in the universe.
    pub fn contains(&self, symbol: &str) -> bool {
        self.index_of(symbol).is_some()
    }
}

impl TryFrom<Vec<String>> for AssetUniverse {
    type Error = SimulationError;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<AssetUniverse> for Vec<String> {
    fn from(universe: AssetUniverse) -> Self {
        universe.symbols
    }
}

impl fmt::Display for AssetUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols.join(", "))
    }
}
