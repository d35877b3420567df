use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// EXIF tag names looked up in a [`RawMetadataRecord`].
pub mod tags {
    pub const FOCAL_LENGTH: &str = "FocalLength";
    pub const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";
    pub const ISO_SPEED_RATINGS: &str = "ISOSpeedRatings";
    pub const F_NUMBER: &str = "FNumber";
    pub const EXPOSURE_TIME: &str = "ExposureTime";
}

// ── Raw metadata ──────────────────────────────────────────────────────────────

/// One raw metadata value as delivered by a metadata provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A plain scalar (integer or floating point).
    Number(f64),
    /// Free text, e.g. a timestamp or a numeric string.
    Text(String),
    /// A numerator/denominator pair. Components may be NaN or the
    /// denominator zero; normalisation treats both as absent.
    Rational { num: f64, den: f64 },
}

impl RawValue {
    pub fn rational(num: impl Into<f64>, den: impl Into<f64>) -> Self {
        Self::Rational {
            num: num.into(),
            den: den.into(),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The text payload, if this is a [`RawValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Per-photo mapping from tag name to raw value.
///
/// An unreadable photo, or one without metadata, is an empty record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadataRecord {
    values: HashMap<String, RawValue>,
}

impl RawMetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, tag: impl Into<String>, value: RawValue) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: RawValue) {
        self.values.insert(tag.into(), value);
    }

    pub fn get(&self, tag: &str) -> Option<&RawValue> {
        self.values.get(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl FromIterator<(String, RawValue)> for RawMetadataRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// ── Fixed-point field values ──────────────────────────────────────────────────

/// An f-number rounded to one decimal place, stored in tenths so it can key
/// an ordered map exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Aperture(i64);

impl Aperture {
    pub fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> i64 {
        self.0
    }

    pub fn f_number(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.f_number())
    }
}

/// An exposure time in seconds rounded to four decimal places, stored in
/// ten-thousandths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShutterSpeed(i64);

impl ShutterSpeed {
    pub fn from_ten_thousandths(units: i64) -> Self {
        Self(units)
    }

    pub fn ten_thousandths(self) -> i64 {
        self.0
    }

    pub fn seconds(self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

impl fmt::Display for ShutterSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.seconds())
    }
}

// ── NormalizedObservation ─────────────────────────────────────────────────────

/// Canonical per-photo fields. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedObservation {
    pub focal_length_mm: Option<i64>,
    /// Timestamp parsed through the lenient fallback chain.
    pub capture_timestamp: Option<NaiveDateTime>,
    pub iso: Option<u32>,
    pub aperture: Option<Aperture>,
    pub shutter_speed: Option<ShutterSpeed>,
    /// Hour of the raw timestamp under the strict EXIF format only. Governs
    /// membership in the hourly parameter buckets.
    pub bucket_hour: Option<u32>,
}

// ── FrequencyMap ──────────────────────────────────────────────────────────────

/// Occurrence counts keyed by a normalised value, kept in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyMap<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for FrequencyMap<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FrequencyMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, count: u64) {
        *self.counts.entry(key).or_insert(0) += count;
    }

    /// Count for `key`, zero when absent.
    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// Sum `other` into `self` key by key.
    pub fn merge(&mut self, other: FrequencyMap<K>) {
        for (key, count) in other.counts {
            self.add(key, count);
        }
    }

    /// The `n` highest counts, ties broken by ascending key.
    pub fn most_common(&self, n: usize) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl<K: Ord> FromIterator<(K, u64)> for FrequencyMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, count) in iter {
            map.add(key, count);
        }
        map
    }
}

/// Photo counts per calendar day.
pub type DateCounts = FrequencyMap<NaiveDate>;

// ── Hourly buckets ────────────────────────────────────────────────────────────

/// Settings recorded during one hour of the day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyParameterBucket {
    pub apertures: Vec<Aperture>,
    pub shutter_speeds: Vec<ShutterSpeed>,
    pub isos: Vec<u32>,
}

impl HourlyParameterBucket {
    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty() && self.shutter_speeds.is_empty() && self.isos.is_empty()
    }

    fn append(&mut self, mut other: HourlyParameterBucket) {
        self.apertures.append(&mut other.apertures);
        self.shutter_speeds.append(&mut other.shutter_speeds);
        self.isos.append(&mut other.isos);
    }
}

/// One [`HourlyParameterBucket`] for each hour 0–23.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBuckets {
    buckets: [HourlyParameterBucket; 24],
}

impl Default for HourlyBuckets {
    fn default() -> Self {
        Self {
            buckets: std::array::from_fn(|_| HourlyParameterBucket::default()),
        }
    }
}

impl HourlyBuckets {
    /// Bucket for `hour`. Hours past 23 wrap, which never happens for
    /// timestamps produced by chrono.
    pub fn bucket(&self, hour: u32) -> &HourlyParameterBucket {
        &self.buckets[(hour % 24) as usize]
    }

    pub fn bucket_mut(&mut self, hour: u32) -> &mut HourlyParameterBucket {
        &mut self.buckets[(hour % 24) as usize]
    }

    /// `(hour, bucket)` pairs in hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &HourlyParameterBucket)> {
        self.buckets.iter().enumerate().map(|(h, b)| (h as u32, b))
    }

    /// Concatenate every bucket of `other` onto the matching bucket of `self`.
    pub fn merge(&mut self, other: HourlyBuckets) {
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets) {
            mine.append(theirs);
        }
    }
}

// ── SummaryStatistics ─────────────────────────────────────────────────────────

/// Headline numbers for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Photos whose capture date parsed under the fallback chain.
    pub total_photos: u64,
    /// Median of non-zero focal lengths in millimetres, `0.0` when none.
    pub focal_length_median: f64,
    /// `total_photos` divided by the number of distinct shooting days.
    pub daily_average: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
