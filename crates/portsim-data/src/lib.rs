#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/portsim/portsim/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod history;
pub mod provider;
pub mod statistics;
pub mod yahoo;

pub use config::FetchConfig;
pub use error::{DataError, Result};
pub use history::ReturnHistory;
pub use provider::{InMemoryStatisticsProvider, ReturnStatisticsProvider};
pub use statistics::ReturnStatistics;
pub use yahoo::{YahooQuoteProvider, YahooStatisticsProvider};
