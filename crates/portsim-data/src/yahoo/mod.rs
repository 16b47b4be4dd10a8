//! Yahoo Finance data providers.

pub mod quotes;
pub mod statistics;

pub use quotes::{YahooQuoteProvider, panel_to_prices};
pub use statistics::YahooStatisticsProvider;
