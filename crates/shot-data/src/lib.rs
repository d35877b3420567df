//! Data layer for shot-stats.
//!
//! Discovers photo files, reads their EXIF metadata, folds it into
//! frequency maps and hourly buckets, and runs the top-level analysis
//! pipeline that produces summary statistics and chart-ready series.

pub mod aggregator;
pub mod analysis;
pub mod chart_data;
pub mod discovery;
pub mod provider;

pub use shot_core as core;
