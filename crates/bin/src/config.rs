//! JSON run files accepted by `--config`.

use portsim::WeightScheme;
use portsim_data::FetchConfig;
use portsim_sim::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Contents of a run file; every section is optional
///
/// ```json
/// {
///   "simulation": { "universe": ["SPY", "QQQ"], "horizon_days": 60 },
///   "fetch": { "lookback_days": 500 },
///   "weights": { "scheme": "custom", "weights": [0.7, 0.3] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RunFile {
    pub(crate) simulation: SimulationConfig,
    pub(crate) fetch: FetchConfig,
    pub(crate) weights: WeightScheme,
}

impl RunFile {
    /// Read and parse `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Parse `--weights`: `random`, `equal`, or a comma-separated list.
pub(crate) fn parse_weights(s: &str) -> Result<WeightScheme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(WeightScheme::Random),
        "equal" => Ok(WeightScheme::Equal),
        list => list
            .split(',')
            .map(|w| {
                w.trim()
                    .parse::<f64>()
                    .map_err(|e| format!("invalid weight '{}': {e}", w.trim()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(WeightScheme::Custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("random", WeightScheme::Random)]
    #[case("Equal", WeightScheme::Equal)]
    #[case("0.2, 0.3,0.5", WeightScheme::Custom(vec![0.2, 0.3, 0.5]))]
    fn test_parse_weights(#[case] input: &str, #[case] expected: WeightScheme) {
        assert_eq!(parse_weights(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_weights_rejects_garbage() {
        assert!(parse_weights("0.5,abc").is_err());
    }

    #[test]
    fn test_partial_run_file() {
        let file: RunFile = serde_json::from_str(
            r#"{
                "simulation": {"universe": ["SPY", "QQQ"], "horizon_days": 60},
                "weights": {"scheme": "equal"}
            }"#,
        )
        .unwrap();
        assert_eq!(file.simulation.horizon_days, 60);
        assert_eq!(file.simulation.n_simulations, 100);
        assert_eq!(file.fetch, FetchConfig::default());
        assert_eq!(file.weights, WeightScheme::Equal);
    }
}
