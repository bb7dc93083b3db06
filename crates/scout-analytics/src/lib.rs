//! Scoring, statistics, comparison graphs and match prediction for robotics scouting.
//!
//! Observations flow through [`scoring::ScoringEvaluator`] and [`scoring::MetricResolver`]
//! into [`stats::StatisticsAggregator`], whose summaries feed
//! [`graphs::ComparisonGraphBuilder`] and [`prediction::MatchPredictor`]. Every analytics
//! operation is a pure function of its inputs and degrades bad data to zero or empty output.

pub mod config;
pub mod error;
pub mod graphs;
pub mod ingest;
pub mod prediction;
pub mod scoring;
pub mod stats;
pub mod telemetry;
