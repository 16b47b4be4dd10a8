#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/portsim/portsim/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;

pub use chart::{ChartData, SampledPath};
pub use export::{
    DailySummaryRecord, DrawdownRecord, ExportError, ExportFormat, ExportRecord, Exporter,
    ResultExporter, RunMetadata, SimulationRecord, SummaryExport,
};
pub use report::{Holding, Report, ReportBuilder, ReportError};
