//! Named asset universes.

use portsim_sim::AssetUniverse;
use portsim_sim::config::DEFAULT_SYMBOLS;
use std::fmt;
use std::str::FromStr;

/// Predefined symbol lists for quick runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Semiconductors, mega-cap tech, broad US indices and the Nikkei 225.
    #[default]
    Mixed,
    /// Large US technology names.
    MegaCapTech,
    /// Broad index ETFs.
    IndexEtfs,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Mixed, Self::MegaCapTech, Self::IndexEtfs];

    /// Lower-case identifier.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::MegaCapTech => "mega-cap-tech",
            Self::IndexEtfs => "index-etfs",
        }
    }

    /// Symbols of the preset.
    pub const fn symbols(&self) -> &'static [&'static str] {
        match self {
            Self::Mixed => &DEFAULT_SYMBOLS,
            Self::MegaCapTech => &["AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META"],
            Self::IndexEtfs => &["SPY", "QQQ", "IWM", "EFA", "AGG"],
        }
    }

    /// The preset as an [`AssetUniverse`].
    ///
    /// # Errors
    /// Propagates universe validation, which preset lists always pass.
    pub fn universe(&self) -> portsim_sim::Result<AssetUniverse> {
        AssetUniverse::new(self.symbols().iter().map(ToString::to_string).collect())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown preset '{s}'"))
    }
}
