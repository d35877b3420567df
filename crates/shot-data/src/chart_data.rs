//! Chart-ready series for an external renderer.
//!
//! Every frequency map becomes a key-ordered list of points with a display
//! label; the focal-length samples become a histogram with its midpoint.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use shot_core::error::{Result, ShotStatsError};
use shot_core::formatting::{format_aperture, format_shutter_speed};
use shot_core::models::{FrequencyMap, SummaryStatistics};
use shot_core::statistics::HourlyAverage;

use crate::analysis::{AnalysisMetadata, AnalysisResult};

/// File name written into the output directory.
pub const CHART_DATA_FILE: &str = "chart_data.json";

/// One bar of a frequency chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<K> {
    pub key: K,
    pub label: String,
    pub count: u64,
}

/// Focal-length histogram bars plus the population midpoint annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub edges: Vec<f64>,
    pub centers: Vec<f64>,
    pub counts: Vec<u64>,
    pub population_midpoint: Option<f64>,
}

/// Everything a renderer needs to draw the seven shooting-habit charts.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub summary: SummaryStatistics,
    pub metadata: AnalysisMetadata,
    pub focal_length_samples: Vec<i64>,
    pub focal_length: Option<HistogramSeries>,
    pub daily: Vec<SeriesPoint<NaiveDate>>,
    pub hourly: Vec<SeriesPoint<u32>>,
    pub iso: Vec<SeriesPoint<u32>>,
    pub aperture: Vec<SeriesPoint<f64>>,
    pub shutter_speed: Vec<SeriesPoint<f64>>,
    pub hourly_settings: Vec<HourlyAverage>,
}

impl ChartData {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let agg = &result.aggregation;
        Self {
            summary: result.summary,
            metadata: result.metadata.clone(),
            focal_length_samples: agg.focal_lengths.clone(),
            focal_length: result.histogram.as_ref().map(|h| HistogramSeries {
                edges: h.edges.clone(),
                centers: h.centers(),
                counts: h.counts.clone(),
                population_midpoint: result.population_midpoint,
            }),
            daily: series(&agg.dates, |d| *d, |d| d.format("%Y-%m-%d").to_string()),
            hourly: series(&agg.hours, |h| *h, |h| format!("{:02}", h)),
            iso: series(&agg.isos, |iso| *iso, |iso| iso.to_string()),
            aperture: series(&agg.apertures, |a| a.f_number(), |a| format_aperture(a.f_number())),
            shutter_speed: series(
                &agg.shutter_speeds,
                |s| s.seconds(),
                |s| format_shutter_speed(s.seconds()),
            ),
            hourly_settings: result.hourly_averages.clone(),
        }
    }

    /// Write `chart_data.json` into `dir`, creating it if needed.
    ///
    /// The file is written to a temporary name first and renamed into place.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CHART_DATA_FILE);
        let io_err = |source| ShotStatsError::OutputWrite {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;

        Ok(path)
    }
}

fn series<K: Ord, V>(
    map: &FrequencyMap<K>,
    key: impl Fn(&K) -> V,
    label: impl Fn(&K) -> String,
) -> Vec<SeriesPoint<V>> {
    map.iter()
        .map(|(k, count)| SeriesPoint {
            key: key(k),
            label: label(k),
            count,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
