//! Folding per-photo metadata into frequency maps and hourly buckets.

use chrono::{NaiveDate, Timelike};

use shot_core::histogram::{Histogram, HistogramBinner};
use shot_core::models::{
    Aperture, FrequencyMap, HourlyBuckets, NormalizedObservation, RawMetadataRecord, ShutterSpeed,
    SummaryStatistics,
};
use shot_core::normalizer::ValueNormalizer;
use shot_core::statistics::{HourlyAverage, StatisticsCalculator};

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Everything accumulated during one analysis run.
///
/// Adding records is a commutative fold: any processing order, and any split
/// into partial aggregations recombined with [`Aggregation::merge`], yields the
/// same frequency maps and the same bucket contents up to ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Non-zero focal lengths in millimetres, one per photo that had one.
    pub focal_lengths: Vec<i64>,
    /// Photos per calendar day (lenient date parsing).
    pub dates: FrequencyMap<NaiveDate>,
    /// Photos per hour of day (lenient date parsing).
    pub hours: FrequencyMap<u32>,
    pub isos: FrequencyMap<u32>,
    pub apertures: FrequencyMap<Aperture>,
    pub shutter_speeds: FrequencyMap<ShutterSpeed>,
    /// Settings per hour, for photos whose timestamp is in strict EXIF form.
    pub hourly: HourlyBuckets,
    /// Records folded in.
    pub photos_processed: u64,
    /// Records that arrived empty.
    pub photos_without_metadata: u64,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequentially fold a batch of records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawMetadataRecord>,
    {
        let mut aggregation = Self::new();
        for record in records {
            aggregation.add_record(record);
        }
        aggregation
    }

    /// Normalise one photo's record and fold it in.
    pub fn add_record(&mut self, record: &RawMetadataRecord) {
        self.photos_processed += 1;
        if record.is_empty() {
            self.photos_without_metadata += 1;
            return;
        }
        self.add_observation(ValueNormalizer::observe(record));
    }

    /// Fold in one normalised observation. Zero readings count as missing.
    fn add_observation(&mut self, obs: NormalizedObservation) {
        if let Some(mm) = obs.focal_length_mm.filter(|&mm| mm != 0) {
            self.focal_lengths.push(mm);
        }

        if let Some(ts) = obs.capture_timestamp {
            self.dates.increment(ts.date());
            self.hours.increment(ts.hour());
        }

        if let Some(iso) = obs.iso {
            self.isos.increment(iso);
            if let Some(hour) = obs.bucket_hour {
                self.hourly.bucket_mut(hour).isos.push(iso);
            }
        }

        if let Some(aperture) = obs.aperture.filter(|a| a.tenths() != 0) {
            self.apertures.increment(aperture);
            if let Some(hour) = obs.bucket_hour {
                self.hourly.bucket_mut(hour).apertures.push(aperture);
            }
        }

        if let Some(speed) = obs.shutter_speed.filter(|s| s.ten_thousandths() != 0) {
            self.shutter_speeds.increment(speed);
            if let Some(hour) = obs.bucket_hour {
                self.hourly.bucket_mut(hour).shutter_speeds.push(speed);
            }
        }
    }

    /// Combine two partial aggregations: frequency maps are summed per key,
    /// samples and bucket sequences concatenated.
    pub fn merge(mut self, other: Aggregation) -> Aggregation {
        self.focal_lengths.extend(other.focal_lengths);
        self.dates.merge(other.dates);
        self.hours.merge(other.hours);
        self.isos.merge(other.isos);
        self.apertures.merge(other.apertures);
        self.shutter_speeds.merge(other.shutter_speeds);
        self.hourly.merge(other.hourly);
        self.photos_processed += other.photos_processed;
        self.photos_without_metadata += other.photos_without_metadata;
        self
    }

    /// Sort the sample list and every bucket sequence so that results of a
    /// parallel run are reproducible.
    pub fn sort_samples(&mut self) {
        self.focal_lengths.sort_unstable();
        for hour in 0..24 {
            let bucket = self.hourly.bucket_mut(hour);
            bucket.apertures.sort_unstable();
            bucket.shutter_speeds.sort_unstable();
            bucket.isos.sort_unstable();
        }
    }

    pub fn summary(&self) -> SummaryStatistics {
        StatisticsCalculator::summarize(&self.dates, &self.focal_lengths)
    }

    pub fn focal_length_histogram(&self, binner: &HistogramBinner) -> Option<Histogram> {
        let samples: Vec<f64> = self.focal_lengths.iter().map(|&mm| mm as f64).collect();
        binner.bin(&samples)
    }

    pub fn hourly_averages(&self) -> Vec<HourlyAverage> {
        StatisticsCalculator::hourly_averages(&self.hourly)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
