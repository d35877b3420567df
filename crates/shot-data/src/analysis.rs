//! Top-level analysis pipeline.
//!
//! Validates the folder, discovers photos, reads and folds their metadata on
//! a worker pool, then derives the summary, histogram and hourly averages.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use shot_core::error::{Result, ShotStatsError};
use shot_core::histogram::{Histogram, HistogramBinner, DEFAULT_BIN_COUNT};
use shot_core::models::SummaryStatistics;
use shot_core::statistics::HourlyAverage;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregation;
use crate::discovery::find_photo_files;
use crate::provider::MetadataProvider;

// ── Public types ──────────────────────────────────────────────────────────────

/// Tuning knobs for [`analyze_folder`].
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Focal-length histogram bins.
    pub bins: usize,
    /// Worker threads; `0` lets rayon pick one per core.
    pub jobs: usize,
    /// When set to `true` mid-run, remaining photos are skipped and the
    /// photos folded so far are returned.
    pub cancel: Arc<AtomicBool>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BIN_COUNT,
            jobs: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Folder that was scanned.
    pub folder: PathBuf,
    /// Photo files found under the folder.
    pub photos_discovered: usize,
    /// Photos whose metadata was read and folded in.
    pub photos_processed: u64,
    /// Photos that were unreadable or carried no metadata.
    pub photos_without_metadata: u64,
    /// Whether the run was cancelled before every photo was processed.
    pub interrupted: bool,
    /// Wall-clock seconds spent discovering photos.
    pub discovery_time_seconds: f64,
    /// Wall-clock seconds spent reading and aggregating metadata.
    pub aggregation_time_seconds: f64,
}

/// The complete output of [`analyze_folder`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub summary: SummaryStatistics,
    /// Raw aggregation structures, for chart rendering.
    pub aggregation: Aggregation,
    /// Focal-length histogram; `None` when no photo had a focal length.
    pub histogram: Option<Histogram>,
    /// Interpolated focal length where half the photos have accumulated.
    pub population_midpoint: Option<f64>,
    pub hourly_averages: Vec<HourlyAverage>,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline over `folder`.
///
/// Fails only when the folder is missing, not a directory, or unreadable.
/// Per-photo and per-field problems degrade to "no contribution".
pub fn analyze_folder<P: MetadataProvider>(
    folder: &Path,
    provider: &P,
    options: &AnalysisOptions,
) -> Result<AnalysisResult> {
    validate_folder(folder)?;
    info!("Analysing photos under {}", folder.display());

    // ── Step 1: Discover ──────────────────────────────────────────────────────
    let discovery_start = Instant::now();
    let files = find_photo_files(folder);
    let discovery_time = discovery_start.elapsed().as_secs_f64();

    // ── Step 2: Read + fold ───────────────────────────────────────────────────
    let aggregation_start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;
    let mut aggregation = pool.install(|| aggregate_files(&files, provider, &options.cancel));
    aggregation.sort_samples();
    let aggregation_time = aggregation_start.elapsed().as_secs_f64();

    let interrupted = aggregation.photos_processed < files.len() as u64;
    if interrupted {
        warn!(
            "Analysis interrupted after {} of {} photos",
            aggregation.photos_processed,
            files.len()
        );
    }

    // ── Step 3: Derive ────────────────────────────────────────────────────────
    let summary = aggregation.summary();
    let histogram = aggregation.focal_length_histogram(&HistogramBinner::new(options.bins));
    let population_midpoint = histogram.as_ref().and_then(Histogram::population_midpoint);
    let hourly_averages = aggregation.hourly_averages();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        folder: folder.to_path_buf(),
        photos_discovered: files.len(),
        photos_processed: aggregation.photos_processed,
        photos_without_metadata: aggregation.photos_without_metadata,
        interrupted,
        discovery_time_seconds: discovery_time,
        aggregation_time_seconds: aggregation_time,
    };

    info!(
        "Processed {} photos ({} dated) in {:.2}s",
        metadata.photos_processed, summary.total_photos, aggregation_time
    );

    Ok(AnalysisResult {
        summary,
        aggregation,
        histogram,
        population_midpoint,
        hourly_averages,
        metadata,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// The folder must exist, be a directory, and be listable.
fn validate_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        return Err(ShotStatsError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(ShotStatsError::NotADirectory(folder.to_path_buf()));
    }
    std::fs::read_dir(folder).map_err(|source| ShotStatsError::FolderUnreadable {
        path: folder.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Per-worker fold followed by a single reduce; no aggregation structure is
/// shared between threads.
fn aggregate_files<P: MetadataProvider>(
    files: &[PathBuf],
    provider: &P,
    cancel: &AtomicBool,
) -> Aggregation {
    files
        .par_iter()
        .fold(Aggregation::new, |mut acc, path| {
            if cancel.load(Ordering::Relaxed) {
                return acc;
            }
            debug!("Reading {}", path.display());
            acc.add_record(&provider.read(path));
            acc
        })
        .reduce(Aggregation::new, Aggregation::merge)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
