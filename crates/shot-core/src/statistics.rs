use serde::{Deserialize, Serialize};

use crate::models::{DateCounts, HourlyBuckets, SummaryStatistics};

// ── Median helper ─────────────────────────────────────────────────────────────

/// Median of a **sorted** slice: the middle element for odd lengths, the
/// mean of the two middle elements for even lengths.
///
/// Returns `0.0` for an empty slice.
pub fn median(sorted_data: &[f64]) -> f64 {
    let len = sorted_data.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    if len % 2 == 0 {
        (sorted_data[mid - 1] + sorted_data[mid]) / 2.0
    } else {
        sorted_data[mid]
    }
}

fn mean<I: ExactSizeIterator<Item = f64>>(values: I) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

// ── StatisticsCalculator ──────────────────────────────────────────────────────

/// Stateless derivations over aggregated shooting data.
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    /// Photos with a parseable capture date. Photos lacking one are not
    /// counted here even when their other fields were.
    pub fn total_photos(dates: &DateCounts) -> u64 {
        dates.total()
    }

    /// Median of the non-zero focal lengths, `0.0` when there are none.
    pub fn focal_length_median(focal_lengths: &[i64]) -> f64 {
        let mut valid: Vec<f64> = focal_lengths
            .iter()
            .filter(|&&mm| mm != 0)
            .map(|&mm| mm as f64)
            .collect();
        valid.sort_by(f64::total_cmp);
        median(&valid)
    }

    /// Photos per distinct shooting day, `0.0` when no day was seen.
    pub fn daily_average(dates: &DateCounts) -> f64 {
        let days = dates.len();
        if days == 0 {
            return 0.0;
        }
        Self::total_photos(dates) as f64 / days as f64
    }

    pub fn summarize(dates: &DateCounts, focal_lengths: &[i64]) -> SummaryStatistics {
        SummaryStatistics {
            total_photos: Self::total_photos(dates),
            focal_length_median: Self::focal_length_median(focal_lengths),
            daily_average: Self::daily_average(dates),
        }
    }

    /// Mean settings for each hour of the day.
    pub fn hourly_averages(buckets: &HourlyBuckets) -> Vec<HourlyAverage> {
        buckets
            .iter()
            .map(|(hour, bucket)| HourlyAverage {
                hour,
                aperture: mean(bucket.apertures.iter().map(|a| a.f_number())),
                shutter_speed: mean(bucket.shutter_speeds.iter().map(|s| s.seconds())),
                iso: mean(bucket.isos.iter().map(|&iso| f64::from(iso))),
            })
            .collect()
    }
}

/// Mean aperture, shutter speed and ISO for one hour. A field is `None` when
/// no photo in that hour carried it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub aperture: Option<f64>,
    pub shutter_speed: Option<f64>,
    pub iso: Option<f64>,
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aperture, ShutterSpeed};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_median_odd_even_empty() {
        assert_eq!(median(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0]), 1.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_focal_length_median() {
        assert_eq!(StatisticsCalculator::focal_length_median(&[24, 35, 50]), 35.0);
        assert_eq!(StatisticsCalculator::focal_length_median(&[24, 35]), 29.5);
        assert_eq!(StatisticsCalculator::focal_length_median(&[]), 0.0);
    }

    #[test]
    fn test_focal_length_median_unsorted_and_zeros() {
        assert_eq!(StatisticsCalculator::focal_length_median(&[200, 0, 24, 0, 85]), 85.0);
        assert_eq!(StatisticsCalculator::focal_length_median(&[0, 0]), 0.0);
    }

    #[test]
    fn test_daily_average_two_days_ten_photos() {
        let dates: DateCounts = vec![(day(1), 7), (day(2), 3)].into_iter().collect();
        assert_eq!(StatisticsCalculator::total_photos(&dates), 10);
        assert_eq!(StatisticsCalculator::daily_average(&dates), 5.0);
    }

    #[test]
    fn test_daily_average_no_dates() {
        assert_eq!(StatisticsCalculator::daily_average(&DateCounts::new()), 0.0);
    }

    #[test]
    fn test_summarize() {
        let dates: DateCounts = vec![(day(1), 2), (day(5), 1)].into_iter().collect();
        let summary = StatisticsCalculator::summarize(&dates, &[24, 35, 50]);
        assert_eq!(summary.total_photos, 3);
        assert_eq!(summary.focal_length_median, 35.0);
        assert!((summary.daily_average - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_hourly_averages() {
        let mut buckets = HourlyBuckets::default();
        buckets.bucket_mut(9).apertures.extend([Aperture::from_tenths(28), Aperture::from_tenths(40)]);
        buckets.bucket_mut(9).isos.extend([100, 300]);
        buckets.bucket_mut(22).shutter_speeds.push(ShutterSpeed::from_ten_thousandths(5000));

        let averages = StatisticsCalculator::hourly_averages(&buckets);
        assert_eq!(averages.len(), 24);

        let nine = averages[9];
        assert_eq!(nine.hour, 9);
        assert!((nine.aperture.unwrap() - 3.4).abs() < 1e-9);
        assert_eq!(nine.iso, Some(200.0));
        assert_eq!(nine.shutter_speed, None);

        assert_eq!(averages[22].shutter_speed, Some(0.5));
        assert_eq!(averages[0].aperture, None);
    }
}
