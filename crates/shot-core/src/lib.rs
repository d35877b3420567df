//! Core types and pure logic for shot-stats.
//!
//! Raw metadata values are normalised into canonical fields, and aggregated
//! shooting data is reduced to summary statistics and histogram bins.

pub mod error;
pub mod formatting;
pub mod histogram;
pub mod models;
pub mod normalizer;
pub mod settings;
pub mod statistics;

pub use error::{Result, ShotStatsError};
