//! Conversion of raw metadata values into canonical field values.
//!
//! Every function here is total: malformed input (NaN components, zero
//! denominators, out-of-range ISO, unparseable text) yields `None`.

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::models::{tags, Aperture, NormalizedObservation, RawMetadataRecord, RawValue, ShutterSpeed};

/// Lowest ISO sensitivity accepted as a real reading.
pub const ISO_MIN: i64 = 50;
/// Highest ISO sensitivity accepted as a real reading.
pub const ISO_MAX: i64 = 512_000;

/// Capture-date patterns tried in order; the first exact match wins.
pub const CAPTURE_DATE_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%d_%H%M%S",
    "%Y_%m_%d %H:%M:%S",
    "%Y%m%d%H%M%S",
];

/// The canonical EXIF timestamp layout, required for hourly bucket membership.
pub const STRICT_CAPTURE_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// ── ValueNormalizer ───────────────────────────────────────────────────────────

/// Stateless collection of per-field normalisation rules.
pub struct ValueNormalizer;

impl ValueNormalizer {
    /// Focal length in whole millimetres.
    pub fn focal_length(raw: &RawValue) -> Option<i64> {
        scalar(raw).map(|mm| mm.round_ties_even() as i64)
    }

    /// ISO sensitivity within [`ISO_MIN`]..=[`ISO_MAX`].
    ///
    /// A rational pair contributes its first component, text must be an
    /// integer literal, and a plain number is truncated.
    pub fn iso(raw: &RawValue) -> Option<u32> {
        let value = match raw {
            RawValue::Number(n) => truncate(*n)?,
            RawValue::Rational { num, .. } => truncate(*num)?,
            RawValue::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (ISO_MIN..=ISO_MAX)
            .contains(&value)
            .then_some(value as u32)
    }

    /// F-number rounded to one decimal place.
    pub fn aperture(raw: &RawValue) -> Option<Aperture> {
        scalar(raw)
            .and_then(|f| round_to_units(f, 1))
            .map(Aperture::from_tenths)
    }

    /// Exposure time in seconds rounded to four decimal places.
    pub fn shutter_speed(raw: &RawValue) -> Option<ShutterSpeed> {
        scalar(raw)
            .and_then(|s| round_to_units(s, 4))
            .map(ShutterSpeed::from_ten_thousandths)
    }

    /// Parse a capture timestamp through the fallback chain in
    /// [`CAPTURE_DATE_FORMATS`].
    ///
    /// NUL characters are removed and surrounding whitespace trimmed first.
    /// Non-text values are absent.
    pub fn capture_date(raw: &RawValue) -> Option<NaiveDateTime> {
        let text = raw.as_text()?;
        let cleaned: String = text.chars().filter(|&c| c != '\0').collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }

        let parsed = CAPTURE_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok());

        if parsed.is_none() {
            debug!("could not parse capture date \"{}\"", cleaned.escape_debug());
        }
        parsed
    }

    /// Parse a capture timestamp under [`STRICT_CAPTURE_DATE_FORMAT`] only,
    /// applied to the raw text as-is.
    pub fn strict_capture_date(raw: &RawValue) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw.as_text()?, STRICT_CAPTURE_DATE_FORMAT).ok()
    }

    /// Normalise every field of one photo independently.
    pub fn observe(record: &RawMetadataRecord) -> NormalizedObservation {
        let date = record.get(tags::DATE_TIME_ORIGINAL);
        NormalizedObservation {
            focal_length_mm: record.get(tags::FOCAL_LENGTH).and_then(Self::focal_length),
            capture_timestamp: date.and_then(Self::capture_date),
            iso: record.get(tags::ISO_SPEED_RATINGS).and_then(Self::iso),
            aperture: record.get(tags::F_NUMBER).and_then(Self::aperture),
            shutter_speed: record.get(tags::EXPOSURE_TIME).and_then(Self::shutter_speed),
            bucket_hour: date
                .and_then(Self::strict_capture_date)
                .map(|dt| dt.hour()),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Resolve a scalar or rational value to a finite `f64`.
fn scalar(raw: &RawValue) -> Option<f64> {
    let value = match raw {
        RawValue::Number(n) => *n,
        RawValue::Rational { num, den } => {
            if num.is_nan() || den.is_nan() || *den == 0.0 {
                return None;
            }
            num / den
        }
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Round `value` to `decimals` places and return it as a count of
/// `10^-decimals` units.
///
/// Formatting rounds the exact binary value; scaling by `10^decimals`
/// first would round twice (`3.45 * 10.0` is `34.5` exactly).
fn round_to_units(value: f64, decimals: usize) -> Option<i64> {
    format!("{:.*}", decimals, value).replace('.', "").parse().ok()
}

fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
