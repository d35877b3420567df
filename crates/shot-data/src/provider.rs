//! Metadata providers: given a photo path, produce its raw tag values.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag, Value};
use shot_core::models::{tags, RawMetadataRecord, RawValue};
use tracing::debug;

/// Source of per-photo raw metadata.
///
/// Implementations must never fail: an unreadable photo, or one without
/// metadata, yields an empty [`RawMetadataRecord`].
pub trait MetadataProvider: Send + Sync {
    fn read(&self, path: &Path) -> RawMetadataRecord;
}

// ── ExifMetadataProvider ──────────────────────────────────────────────────────

/// EXIF tags read from each photo, with the record key they are stored under.
const EXIF_TAGS: &[(Tag, &str)] = &[
    (Tag::FocalLength, tags::FOCAL_LENGTH),
    (Tag::DateTimeOriginal, tags::DATE_TIME_ORIGINAL),
    (Tag::PhotographicSensitivity, tags::ISO_SPEED_RATINGS),
    (Tag::FNumber, tags::F_NUMBER),
    (Tag::ExposureTime, tags::EXPOSURE_TIME),
];

/// Reads embedded EXIF metadata from JPEG, PNG, TIFF and other containers
/// supported by `kamadak-exif`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataProvider;

impl MetadataProvider for ExifMetadataProvider {
    fn read(&self, path: &Path) -> RawMetadataRecord {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                debug!("Failed to open {}: {}", path.display(), e);
                return RawMetadataRecord::new();
            }
        };

        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("No readable EXIF in {}: {}", path.display(), e);
                return RawMetadataRecord::new();
            }
        };

        EXIF_TAGS
            .iter()
            .filter_map(|&(tag, name)| {
                let field = exif.get_field(tag, In::PRIMARY)?;
                raw_value(&field.value).map(|v| (name.to_string(), v))
            })
            .collect()
    }
}

/// Map the first component of an EXIF value onto a [`RawValue`].
fn raw_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::Rational(v) => v.first().map(|r| RawValue::rational(r.num, r.denom)),
        Value::SRational(v) => v.first().map(|r| RawValue::rational(r.num, r.denom)),
        Value::Byte(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::Short(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::Long(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::SShort(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::SLong(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::Float(v) => v.first().map(|&n| RawValue::Number(f64::from(n))),
        Value::Double(v) => v.first().map(|&n| RawValue::Number(n)),
        Value::Ascii(v) => v
            .first()
            .map(|bytes| RawValue::Text(String::from_utf8_lossy(bytes).into_owned())),
        _ => None,
    }
}

// ── InMemoryMetadataProvider ──────────────────────────────────────────────────

/// Serves pre-extracted records, e.g. from an exiftool dump. Unknown paths
/// yield an empty record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataProvider {
    records: HashMap<PathBuf, RawMetadataRecord>,
}

impl InMemoryMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, record: RawMetadataRecord) {
        self.records.insert(path.into(), record);
    }
}

impl MetadataProvider for InMemoryMetadataProvider {
    fn read(&self, path: &Path) -> RawMetadataRecord {
        self.records.get(path).cloned().unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_raw_value_rational() {
        let value = Value::Rational(vec![exif::Rational { num: 28, denom: 10 }]);
        assert_eq!(raw_value(&value), Some(RawValue::rational(28, 10)));
    }

    #[test]
    fn test_raw_value_zero_denominator_is_preserved() {
        let value = Value::Rational(vec![exif::Rational { num: 1, denom: 0 }]);
        assert_eq!(raw_value(&value), Some(RawValue::rational(1, 0)));
    }

    #[test]
    fn test_raw_value_short_takes_first() {
        let value = Value::Short(vec![400, 800]);
        assert_eq!(raw_value(&value), Some(RawValue::Number(400.0)));
    }

    #[test]
    fn test_raw_value_ascii() {
        let value = Value::Ascii(vec![b"2023:01:01 08:00:00".to_vec()]);
        assert_eq!(raw_value(&value), Some(RawValue::text("2023:01:01 08:00:00")));
    }

    #[test]
    fn test_raw_value_empty_or_opaque() {
        assert_eq!(raw_value(&Value::Short(vec![])), None);
        assert_eq!(raw_value(&Value::Undefined(vec![1, 2, 3], 0)), None);
    }

    #[test]
    fn test_exif_provider_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let record = ExifMetadataProvider.read(&dir.path().join("missing.jpg"));
        assert!(record.is_empty());
    }

    #[test]
    fn test_exif_provider_non_image_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(ExifMetadataProvider.read(&path).is_empty());
    }

    #[test]
    fn test_exif_provider_reads_tiff_tags() {
        use exif::experimental::Writer;
        use exif::Field;

        let fields = [
            Field {
                tag: Tag::FNumber,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![exif::Rational { num: 28, denom: 10 }]),
            },
            Field {
                tag: Tag::PhotographicSensitivity,
                ifd_num: In::PRIMARY,
                value: Value::Short(vec![400]),
            },
            Field {
                tag: Tag::DateTimeOriginal,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![b"2023:01:01 08:00:00".to_vec()]),
            },
        ];
        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        writer.write(&mut buf, true).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.tiff");
        std::fs::write(&path, buf.into_inner()).unwrap();

        let record = ExifMetadataProvider.read(&path);
        assert_eq!(record.get(tags::F_NUMBER), Some(&RawValue::rational(28, 10)));
        assert_eq!(record.get(tags::ISO_SPEED_RATINGS), Some(&RawValue::Number(400.0)));
        assert_eq!(
            record.get(tags::DATE_TIME_ORIGINAL),
            Some(&RawValue::text("2023:01:01 08:00:00"))
        );
        assert!(record.get(tags::FOCAL_LENGTH).is_none());
    }

    #[test]
    fn test_in_memory_provider() {
        let mut provider = InMemoryMetadataProvider::new();
        let record = RawMetadataRecord::new().with(tags::ISO_SPEED_RATINGS, RawValue::Number(100.0));
        provider.insert("/photos/a.jpg", record.clone());

        assert_eq!(provider.read(Path::new("/photos/a.jpg")), record);
        assert!(provider.read(Path::new("/photos/b.jpg")).is_empty());
    }
}
