//! End-to-end run: statistics, weights, simulation, risk summary.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use portsim_data::{DataError, ReturnStatistics, ReturnStatisticsProvider};
use portsim_output::{
    ChartData, ExportError, ReportBuilder, ReportError, ResultExporter, RunMetadata,
};
use portsim_risk::covariance::{is_positive_definite, regularize_with_jitter};
use portsim_risk::{MetricsError, RiskCalculator, RiskSummary};
use portsim_sim::rng::splitmix64;
use portsim_sim::{
    PortfolioWeights, SimulationConfig, SimulationEnsemble, SimulationError, SimulationInputs,
    simulate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Any failure of a pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Retrieving or estimating statistics failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Preparing or running the simulation failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Computing risk metrics failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Writing results failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Building a report failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Statistics do not describe the configured universe.
    #[error("Statistics cover {actual:?}, expected {expected:?}")]
    UniverseMismatch {
        /// Symbols of the configured universe
        expected: Vec<String>,
        /// Symbols of the statistics
        actual: Vec<String>,
    },
}

/// How portfolio weights are chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "scheme", content = "weights")]
pub enum WeightScheme {
    /// Uniform random draws normalised to one, seeded from the run seed.
    #[default]
    Random,
    /// `1/N` on every asset.
    Equal,
    /// Caller-supplied non-negative weights, normalised to one.
    Custom(Vec<f64>),
}

impl WeightScheme {
    /// Produce weights for `n_assets` assets.
    ///
    /// # Errors
    /// Fails if custom weights have the wrong length or are invalid.
    pub fn resolve(
        &self,
        n_assets: usize,
        seed: u64,
    ) -> Result<PortfolioWeights, SimulationError> {
        match self {
            Self::Random => {
                // Separate stream from the trial generators.
                let mut rng = StdRng::seed_from_u64(splitmix64(!seed));
                PortfolioWeights::random(n_assets, &mut rng)
            }
            Self::Equal => PortfolioWeights::equal(n_assets),
            Self::Custom(raw) => {
                if raw.len() != n_assets {
                    return Err(SimulationError::DimensionMismatch {
                        what: "weight vector",
                        expected: n_assets,
                        actual: raw.len(),
                    });
                }
                PortfolioWeights::normalized(raw.clone())
            }
        }
    }
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// Inputs the simulation was driven by.
    pub statistics: ReturnStatistics,
    /// Portfolio weights used for every trial.
    pub weights: PortfolioWeights,
    /// Simulated value paths.
    pub ensemble: SimulationEnsemble,
    /// Risk statistics of the ensemble.
    pub summary: RiskSummary,
    /// Base seed of the run.
    pub seed: u64,
}

impl SimulationRun {
    /// Metadata for exported files.
    pub fn metadata(&self) -> RunMetadata {
        RunMetadata {
            symbols: self.statistics.symbols().to_vec(),
            weights: self.weights.as_array().to_vec(),
            seed: Some(self.seed),
        }
    }

    /// Exporter over this run's tables.
    ///
    /// # Errors
    /// Fails if the ensemble and summary disagree in shape.
    pub fn exporter(&self) -> Result<ResultExporter, PipelineError> {
        Ok(ResultExporter::new(self.ensemble.values(), &self.summary)?
            .with_metadata(self.metadata()))
    }

    /// Chart data with at most `max_paths` sample paths.
    ///
    /// # Errors
    /// Fails if the ensemble and summary disagree in shape.
    pub fn chart(&self, max_paths: usize) -> Result<ChartData, PipelineError> {
        Ok(ChartData::from_results(
            self.ensemble.values(),
            &self.summary,
            self.ensemble.initial_value(),
            max_paths,
        )?)
    }

    /// Report of the run.
    ///
    /// # Errors
    /// Fails if symbols and weights disagree in length.
    pub fn report(&self) -> Result<portsim_output::Report, PipelineError> {
        Ok(ReportBuilder::new()
            .symbols(self.statistics.symbols().to_vec())
            .weights(self.weights.as_array().to_vec())
            .summary(self.summary.clone())
            .build()?)
    }
}

/// Simulate `config` from already estimated statistics.
///
/// # Errors
/// Fails if the statistics do not match the universe, the weights or
/// configuration are invalid, the covariance cannot be factorised, or the
/// risk metrics cannot be computed.
pub fn run_with_statistics(
    statistics: ReturnStatistics,
    config: &SimulationConfig,
    scheme: &WeightScheme,
) -> Result<SimulationRun, PipelineError> {
    if statistics.symbols() != config.universe.symbols() {
        return Err(PipelineError::UniverseMismatch {
            expected: config.universe.symbols().to_vec(),
            actual: statistics.symbols().to_vec(),
        });
    }

    let weights = scheme.resolve(statistics.n_assets(), config.seed)?;
    let inputs = SimulationInputs::new(
        statistics.mean_returns().clone(),
        simulation_covariance(statistics.covariance(), config.covariance_jitter)?,
        weights.clone(),
    )?;
    let ensemble = simulate(&inputs, config)?;
    let summary = RiskCalculator::new(config.confidence_level)?
        .compute(ensemble.values(), config.initial_value)?;

    info!(
        var = summary.var,
        cvar = summary.cvar,
        mean_return = summary.mean_return,
        "Simulation complete"
    );

    Ok(SimulationRun {
        statistics,
        weights,
        ensemble,
        summary,
        seed: config.seed,
    })
}

/// The covariance to simulate with, ridged by `jitter` only if it does not
/// factorise as given.
fn simulation_covariance(
    covariance: &Array2<f64>,
    jitter: Option<f64>,
) -> Result<Array2<f64>, SimulationError> {
    match jitter {
        Some(jitter) if !is_positive_definite(covariance) => {
            warn!(jitter, "Covariance is not positive definite, adding diagonal jitter");
            Ok(regularize_with_jitter(covariance, jitter)?)
        }
        _ => Ok(covariance.clone()),
    }
}

/// Fetch statistics for the configured universe and simulate.
///
/// # Errors
/// Fails on any provider error or any error of [`run_with_statistics`].
pub async fn run_simulation<P>(
    provider: &P,
    config: &SimulationConfig,
    scheme: &WeightScheme,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<SimulationRun, PipelineError>
where
    P: ReturnStatisticsProvider + Sync,
{
    config.validate()?;
    let statistics = provider
        .fetch_statistics(config.universe.symbols(), start, end)
        .await?;
    run_with_statistics(statistics, config, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(WeightScheme::Random)]
    #[case(WeightScheme::Equal)]
    #[case(WeightScheme::Custom(vec![3.0, 1.0, 0.0, 4.0]))]
    fn test_schemes_produce_valid_weights(#[case] scheme: WeightScheme) {
        let weights = scheme.resolve(4, 42).unwrap();
        assert_eq!(weights.len(), 4);
        assert_abs_diff_eq!(weights.as_array().sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_random_weights_follow_seed() {
        let a = WeightScheme::Random.resolve(5, 1).unwrap();
        let b = WeightScheme::Random.resolve(5, 1).unwrap();
        let c = WeightScheme::Random.resolve(5, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_custom_length_mismatch() {
        let result = WeightScheme::Custom(vec![0.5, 0.5]).resolve(3, 0);
        assert!(matches!(
            result,
            Err(SimulationError::DimensionMismatch {
                what: "weight vector",
                ..
            })
        ));
    }

    #[test]
    fn test_jitter_only_applies_to_singular_covariance() {
        let healthy = ndarray::array![[0.0004, 0.0001], [0.0001, 0.0009]];
        assert_eq!(simulation_covariance(&healthy, Some(1e-4)).unwrap(), healthy);

        let singular = ndarray::array![[0.0004, 0.0004], [0.0004, 0.0004]];
        assert_eq!(simulation_covariance(&singular, None).unwrap(), singular);
        let ridged = simulation_covariance(&singular, Some(1e-4)).unwrap();
        assert!(is_positive_definite(&ridged));
        assert_abs_diff_eq!(ridged[[0, 1]], 0.0004, epsilon = 1e-15);
    }

    #[test]
    fn test_scheme_serde() {
        let scheme: WeightScheme =
            serde_json::from_str(r#"{"scheme": "custom", "weights": [0.2, 0.8]}"#).unwrap();
        assert_eq!(scheme, WeightScheme::Custom(vec![0.2, 0.8]));
        let equal: WeightScheme = serde_json::from_str(r#"{"scheme": "equal"}"#).unwrap();
        assert_eq!(equal, WeightScheme::Equal);
    }
}
