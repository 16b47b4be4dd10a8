//! Logging setup for the command line.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 6] = [
    "portsim",
    "portsim_bin",
    "portsim_data",
    "portsim_sim",
    "portsim_risk",
    "portsim_output",
];

/// Default filter: workspace crates at `level`, dependencies at `warn`.
pub(crate) fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

/// Install a stderr subscriber; `RUST_LOG` overrides the default filter.
pub(crate) fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false),
        )
        .init();
}
