#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/portsim/portsim/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod covariance;
pub mod metrics;

// Re-export main types
pub use covariance::{
    CovarianceError, CovarianceEstimator, CovarianceMethod, EwmaCovarianceEstimator,
    SampleCovarianceEstimator, cholesky,
};
pub use metrics::{MetricsError, ReturnSeries, RiskCalculator, RiskSummary};
