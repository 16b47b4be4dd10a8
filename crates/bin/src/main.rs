//! Portsim CLI binary.
//!
//! Monte Carlo simulation of portfolio values from Yahoo Finance history.

mod config;
mod logging;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{RunFile, parse_weights};
use indicatif::{ProgressBar, ProgressStyle};
use portsim::demo::{DEMO_SYMBOLS, demo_config, run_demo};
use portsim::{Preset, SimulationRun, WeightScheme, run_simulation};
use portsim_data::{
    FetchConfig, ReturnStatistics, ReturnStatisticsProvider, YahooStatisticsProvider,
};
use portsim_output::ExportFormat;
use portsim_risk::CovarianceMethod;
use portsim_sim::{AssetUniverse, ExecutionMode, SimulationConfig};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;
use tracing::info;

#[derive(Parser)]
#[command(name = "portsim")]
#[command(about = "Portsim: Monte Carlo portfolio risk simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging for portsim crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history, simulate the portfolio and report its risk
    Simulate(SimulateArgs),

    /// Simulate the built-in two-asset portfolio without network access
    Demo {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show estimated daily return statistics
    Stats(StatsArgs),

    /// List the named symbol presets
    Presets,
}

/// Where the symbols come from
#[derive(Args, Debug, Clone, Default)]
struct UniverseArgs {
    /// Ticker symbols, space or comma separated, e.g. SPY QQQ AGG
    #[arg(value_delimiter = ',', conflicts_with = "preset")]
    symbols: Vec<String>,

    /// Named symbol list (see `portsim presets`)
    #[arg(long)]
    preset: Option<Preset>,

    /// Calendar days of history to estimate from
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Use EWMA covariance with this decay instead of the sample covariance
    #[arg(long)]
    ewma: Option<f64>,
}

impl UniverseArgs {
    fn apply_universe(
        &self,
        mut config: SimulationConfig,
    ) -> Result<SimulationConfig, Box<dyn Error>> {
        if !self.symbols.is_empty() {
            config.universe = AssetUniverse::parse(&self.symbols.join(","))?;
        } else if let Some(preset) = self.preset {
            config.universe = preset.universe()?;
        }
        Ok(config)
    }

    fn apply_fetch(&self, mut fetch: FetchConfig) -> FetchConfig {
        if let Some(days) = self.lookback_days {
            fetch = fetch.with_lookback_days(days);
        }
        if let Some(decay) = self.ewma {
            fetch = fetch.with_covariance_method(CovarianceMethod::Ewma { decay });
        }
        fetch
    }
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Trading days to simulate
    #[arg(long)]
    days: Option<usize>,

    /// Number of simulated paths
    #[arg(long)]
    sims: Option<usize>,

    /// Starting portfolio value
    #[arg(long)]
    initial_value: Option<f64>,

    /// Tail percentile for VaR/CVaR, e.g. 5
    #[arg(long)]
    alpha: Option<f64>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials on one thread
    #[arg(long)]
    sequential: bool,

    /// Ridge a covariance that fails Cholesky by this fraction of its mean variance
    #[arg(long)]
    jitter: Option<f64>,
}

impl RunArgs {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(days) = self.days {
            config = config.with_horizon_days(days);
        }
        if let Some(sims) = self.sims {
            config = config.with_simulations(sims);
        }
        if let Some(value) = self.initial_value {
            config = config.with_initial_value(value);
        }
        if let Some(alpha) = self.alpha {
            config = config.with_confidence_level(alpha);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.sequential {
            config = config.with_execution(ExecutionMode::Sequential);
        }
        if let Some(jitter) = self.jitter {
            config = config.with_covariance_jitter(jitter);
        }
        config
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Directory for result tables and chart data
    #[arg(long)]
    output: Option<PathBuf>,

    /// Table format: csv, json or pretty-json
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Sample paths kept in chart.json
    #[arg(long, default_value = "50")]
    max_chart_paths: usize,
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    #[command(flatten)]
    universe: UniverseArgs,

    /// Weights: "random", "equal" or a comma-separated list
    #[arg(long, value_parser = parse_weights)]
    weights: Option<WeightScheme>,

    /// JSON run file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
struct StatsArgs {
    #[command(flatten)]
    universe: UniverseArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => simulate(args).await?,
        Commands::Demo { run, output } => {
            let config = run.apply(demo_config()?);
            info!(symbols = ?DEMO_SYMBOLS, "Running demo portfolio");
            let result = run_demo(&config)?;
            emit(&result, &output)?;
        }
        Commands::Stats(args) => stats(args).await?,
        Commands::Presets => list_presets(),
    }

    Ok(())
}

/// Resolve the run file and flags into the three run inputs.
fn resolve_simulate(
    args: &SimulateArgs,
) -> Result<(SimulationConfig, FetchConfig, WeightScheme), Box<dyn Error>> {
    let file = match &args.config {
        Some(path) => RunFile::load(path)?,
        None => RunFile::default(),
    };

    let simulation = args.run.apply(args.universe.apply_universe(file.simulation)?);
    let fetch = args.universe.apply_fetch(file.fetch);
    let scheme = args.weights.clone().unwrap_or(file.weights);

    simulation.validate()?;
    fetch.validate()?;
    Ok((simulation, fetch, scheme))
}

async fn simulate(args: SimulateArgs) -> Result<(), Box<dyn Error>> {
    let (simulation, fetch, scheme) = resolve_simulate(&args)?;
    let provider = YahooStatisticsProvider::new(fetch.clone())?;
    let (start, end) = fetch.date_range(Utc::now());

    let pb = spinner(format!(
        "Fetching {} symbols and simulating {} paths...",
        simulation.universe.len(),
        simulation.n_simulations
    ))?;
    let result = run_simulation(&provider, &simulation, &scheme, start, end).await;
    match &result {
        Ok(run) => pb.finish_with_message(format!(
            "✓ {} observations per asset",
            run.statistics.observations()
        )),
        Err(_) => pb.finish_with_message("Failed!"),
    }

    emit(&result?, &args.output)
}

async fn stats(args: StatsArgs) -> Result<(), Box<dyn Error>> {
    let simulation = args.universe.apply_universe(SimulationConfig::default())?;
    let fetch = args.universe.apply_fetch(FetchConfig::default());
    fetch.validate()?;

    let provider = YahooStatisticsProvider::new(fetch.clone())?;
    let (start, end) = fetch.date_range(Utc::now());

    let pb = spinner(format!("Fetching {} symbols...", simulation.universe.len()))?;
    let result = provider
        .fetch_statistics(simulation.universe.symbols(), start, end)
        .await;
    match &result {
        Ok(_) => pb.finish_with_message("✓ Done"),
        Err(_) => pb.finish_with_message("Failed!"),
    }
    let statistics = result?;

    match args.format {
        OutputFormat::Text => print_statistics(&statistics, &fetch)?,
        OutputFormat::Json => {
            let correlation = statistics.correlation()?;
            let output = json!({
                "symbols": statistics.symbols(),
                "observations": statistics.observations(),
                "covariance_method": fetch.covariance_method.name(),
                "mean_returns": statistics.mean_returns().to_vec(),
                "volatilities": statistics.volatilities().to_vec(),
                "correlation": correlation.outer_iter().map(|row| row.to_vec()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(StdDuration::from_millis(100));
    Ok(pb)
}

/// Print the report and write files when an output directory is given.
fn emit(run: &SimulationRun, output: &OutputArgs) -> Result<(), Box<dyn Error>> {
    let report = run.report()?;
    match output.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if let Some(dir) = &output.output {
        let mut written = run.exporter()?.write_all(dir, output.export_format)?;
        let chart_path = dir.join("chart.json");
        run.chart(output.max_chart_paths)?.write(&chart_path)?;
        written.push(chart_path);

        for path in &written {
            info!(path = %path.display(), "Wrote output file");
        }
    }
    Ok(())
}

fn print_statistics(
    statistics: &ReturnStatistics,
    fetch: &FetchConfig,
) -> Result<(), Box<dyn Error>> {
    let correlation = statistics.correlation()?;
    let volatilities = statistics.volatilities();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  DAILY RETURN STATISTICS                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!(
        "  Observations: {}    Covariance: {}",
        statistics.observations(),
        fetch.covariance_method.name()
    );

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<10} {:>14} {:>14}", "Symbol", "Mean (%)", "Vol (%)");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (i, symbol) in statistics.symbols().iter().enumerate() {
        println!(
            "{:<10} {:>14.4} {:>14.4}",
            symbol,
            statistics.mean_returns()[i] * 100.0,
            volatilities[i] * 100.0
        );
    }

    println!("\nCorrelation");
    print!("{:<10}", "");
    for symbol in statistics.symbols() {
        print!("{:>8}", symbol);
    }
    println!();
    for (symbol, row) in statistics.symbols().iter().zip(correlation.outer_iter()) {
        print!("{:<10}", symbol);
        for value in row {
            print!("{:>8.2}", value);
        }
        println!();
    }
    println!();
    Ok(())
}

fn list_presets() {
    println!("\nSymbol presets:\n");
    for preset in Preset::ALL {
        println!("  {:<16} {}", preset.name(), preset.symbols().join(", "));
    }
    println!();
}
