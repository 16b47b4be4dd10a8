#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/portsim/portsim/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod ensemble;
pub mod error;
pub mod rng;
pub mod shocks;
pub mod simulator;
pub mod universe;
pub mod weights;

pub use config::{ExecutionMode, SimulationConfig};
pub use ensemble::SimulationEnsemble;
pub use error::{Result, SimulationError};
pub use shocks::ShockGenerator;
pub use simulator::{PathSimulator, SimulationInputs, simulate};
pub use universe::AssetUniverse;
pub use weights::PortfolioWeights;
