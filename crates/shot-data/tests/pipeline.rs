use std::path::{Path, PathBuf};

use shot_data::aggregator::Aggregation;
use shot_data::analysis::{analyze_folder, AnalysisOptions};
use shot_data::core::error::ShotStatsError;
use shot_data::core::models::{tags, Aperture, RawMetadataRecord, RawValue};
use shot_data::provider::InMemoryMetadataProvider;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"").unwrap();
    path
}

/// A: ISO 100, f/2.8, dated; B: invalid ISO, undated; C: no metadata.
fn three_photo_provider(dir: &Path) -> InMemoryMetadataProvider {
    let mut provider = InMemoryMetadataProvider::new();
    provider.insert(
        touch(dir, "a.jpg"),
        RawMetadataRecord::new()
            .with(tags::ISO_SPEED_RATINGS, RawValue::Number(100.0))
            .with(tags::F_NUMBER, RawValue::rational(28, 10))
            .with(tags::DATE_TIME_ORIGINAL, RawValue::text("2023:01:01 08:00:00")),
    );
    provider.insert(
        touch(dir, "b.JPG"),
        RawMetadataRecord::new().with(tags::ISO_SPEED_RATINGS, RawValue::text("abc")),
    );
    touch(dir, "sub/c.png");
    provider
}

#[test]
fn end_to_end_three_photos() {
    let dir = TempDir::new().unwrap();
    let provider = three_photo_provider(dir.path());

    let result = analyze_folder(dir.path(), &provider, &AnalysisOptions::default()).unwrap();
    let agg = &result.aggregation;

    assert_eq!(agg.isos.iter().map(|(&k, v)| (k, v)).collect::<Vec<_>>(), vec![(100, 1)]);
    assert_eq!(
        agg.apertures.iter().map(|(&k, v)| (k, v)).collect::<Vec<_>>(),
        vec![(Aperture::from_tenths(28), 1)]
    );
    assert_eq!(result.summary.total_photos, 1);
    assert_eq!(result.summary.daily_average, 1.0);
    assert_eq!(result.summary.focal_length_median, 0.0);
    assert_eq!(agg.hourly.bucket(8).apertures, vec![Aperture::from_tenths(28)]);

    assert_eq!(result.metadata.photos_discovered, 3);
    assert_eq!(result.metadata.photos_without_metadata, 1);
    assert!(result.histogram.is_none());
}

#[test]
fn missing_folder_produces_no_output() {
    let dir = TempDir::new().unwrap();
    let result = analyze_folder(
        &dir.path().join("does-not-exist"),
        &InMemoryMetadataProvider::new(),
        &AnalysisOptions::default(),
    );
    match result {
        Err(ShotStatsError::FolderNotFound(path)) => assert!(path.ends_with("does-not-exist")),
        other => panic!("expected FolderNotFound, got {other:?}"),
    }
}

#[test]
fn focal_length_midpoint_through_pipeline() {
    let dir = TempDir::new().unwrap();
    let mut provider = InMemoryMetadataProvider::new();
    for (i, mm) in [20.0, 20.0, 20.0, 200.0, 200.0, 200.0].into_iter().enumerate() {
        provider.insert(
            touch(dir.path(), &format!("img{i}.jpg")),
            RawMetadataRecord::new().with(tags::FOCAL_LENGTH, RawValue::Number(mm)),
        );
    }

    let result = analyze_folder(dir.path(), &provider, &AnalysisOptions::default()).unwrap();
    let hist = result.histogram.unwrap();
    assert_eq!(hist.counts[0], 3);
    assert_eq!(hist.counts[19], 3);

    // Half of six photos is reached at the right edge of the first bin.
    assert!((result.population_midpoint.unwrap() - hist.edges[1]).abs() < 1e-9);
    assert!((hist.edges[1] - 29.0).abs() < 1e-9);
    assert_eq!(result.summary.focal_length_median, 110.0);
}

#[test]
fn permuted_records_give_identical_results() {
    let records = vec![
        RawMetadataRecord::new()
            .with(tags::DATE_TIME_ORIGINAL, RawValue::text("2024:02:10 06:00:00"))
            .with(tags::ISO_SPEED_RATINGS, RawValue::Number(100.0))
            .with(tags::EXPOSURE_TIME, RawValue::rational(1, 500))
            .with(tags::FOCAL_LENGTH, RawValue::rational(240, 10)),
        RawMetadataRecord::new()
            .with(tags::DATE_TIME_ORIGINAL, RawValue::text("20240211_193000"))
            .with(tags::ISO_SPEED_RATINGS, RawValue::text("6400"))
            .with(tags::F_NUMBER, RawValue::rational(14, 10))
            .with(tags::FOCAL_LENGTH, RawValue::Number(85.0)),
        RawMetadataRecord::new()
            .with(tags::DATE_TIME_ORIGINAL, RawValue::text("2024:02:11 19:45:00\0"))
            .with(tags::F_NUMBER, RawValue::rational(f64::NAN, 1.0))
            .with(tags::FOCAL_LENGTH, RawValue::Number(50.0)),
        RawMetadataRecord::new()
            .with(tags::DATE_TIME_ORIGINAL, RawValue::text("garbage"))
            .with(tags::EXPOSURE_TIME, RawValue::rational(1, 0))
            .with(tags::ISO_SPEED_RATINGS, RawValue::Number(12.0)),
        RawMetadataRecord::new(),
    ];

    let canonical = |records: &[RawMetadataRecord]| {
        let mut agg = Aggregation::from_records(records);
        agg.sort_samples();
        agg
    };
    let reference = canonical(&records);

    // All 120 permutations via Heap's algorithm.
    let mut perm = records.clone();
    let n = perm.len();
    let mut c = vec![0usize; n];
    let mut i = 0;
    while i < n {
        if c[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(c[i], i);
            }
            let agg = canonical(&perm);
            assert_eq!(agg, reference);
            assert_eq!(agg.summary(), reference.summary());
            c[i] += 1;
            i = 0;
        } else {
            c[i] = 0;
            i += 1;
        }
    }

    assert_eq!(reference.summary().total_photos, 3);
    assert_eq!(reference.focal_lengths, vec![24, 50, 85]);
}
