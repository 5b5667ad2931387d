//! Metrics Module
//! Mission: Summary statistics over the current participant set

pub mod aggregator;
pub mod api;

pub use aggregator::{summarize, GenderDistribution, MetricsSummary};
