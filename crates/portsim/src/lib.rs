#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/portsim/portsim/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod demo;
pub mod pipeline;
pub mod universe;

// Re-export main types from sub-crates
pub use portsim_data as data;
pub use portsim_output as output;
pub use portsim_risk as risk;
pub use portsim_sim as sim;

pub use pipeline::{
    PipelineError, SimulationRun, WeightScheme, run_simulation, run_with_statistics,
};
pub use universe::Preset;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
