//! Equal-width binning of continuous samples and the interpolated
//! "population midpoint" drawn on the focal-length chart.

use serde::{Deserialize, Serialize};

/// Number of bins used for the focal-length chart.
pub const DEFAULT_BIN_COUNT: usize = 20;

/// Bin edges and per-bin counts. `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Number of samples binned.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// The x-value at which half of all samples have accumulated.
    ///
    /// Walks the bins in ascending order; inside the first bin whose running
    /// sum reaches half the total, interpolates linearly:
    /// `left + ((half - sum_before) / bin_count) * (right - left)`.
    pub fn population_midpoint(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let half = total as f64 / 2.0;
        let mut running = 0u64;
        for (i, &count) in self.counts.iter().enumerate() {
            let before = running;
            running += count;
            if running as f64 >= half {
                let ratio = (half - before as f64) / count as f64;
                let (left, right) = (self.edges[i], self.edges[i + 1]);
                return Some(left + ratio * (right - left));
            }
        }
        None
    }
}

/// Splits samples into a fixed number of equal-width bins spanning their
/// minimum and maximum.
#[derive(Debug, Clone, Copy)]
pub struct HistogramBinner {
    bins: usize,
}

impl Default for HistogramBinner {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT)
    }
}

impl HistogramBinner {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Bin `samples`. Returns `None` for empty input or a zero bin count.
    ///
    /// When every sample is equal the range is widened to `value ± 0.5`.
    /// The last bin is closed on the right, all others half-open.
    pub fn bin(&self, samples: &[f64]) -> Option<Histogram> {
        let n = self.bins;
        if n == 0 {
            return None;
        }
        let finite = samples.iter().copied().filter(|x| x.is_finite());
        let (mut first, mut last) = finite.clone().fold(None, |acc: Option<(f64, f64)>, x| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(x), hi.max(x)),
                None => (x, x),
            })
        })?;
        if first == last {
            first -= 0.5;
            last += 0.5;
        }

        let step = (last - first) / n as f64;
        let mut edges: Vec<f64> = (0..=n).map(|i| first + step * i as f64).collect();
        edges[n] = last;

        let mut counts = vec![0u64; n];
        let scale = n as f64 / (last - first);
        for x in finite {
            let mut idx = (((x - first) * scale) as usize).min(n - 1);
            if idx > 0 && x < edges[idx] {
                idx -= 1;
            } else if idx + 1 < n && x >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_histogram() {
        assert!(HistogramBinner::default().bin(&[]).is_none());
        assert!(HistogramBinner::new(0).bin(&[1.0]).is_none());
    }

    #[test]
    fn test_edges_span_min_to_max() {
        let hist = HistogramBinner::default()
            .bin(&[20.0, 20.0, 20.0, 200.0, 200.0, 200.0])
            .unwrap();
        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.edges[0], 20.0);
        assert_eq!(hist.edges[20], 200.0);
        assert!((hist.edges[1] - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_bimodal_counts_and_midpoint() {
        let hist = HistogramBinner::default()
            .bin(&[20.0, 20.0, 20.0, 200.0, 200.0, 200.0])
            .unwrap();
        assert_eq!(hist.counts[0], 3);
        assert_eq!(hist.counts[19], 3);
        assert_eq!(hist.total(), 6);

        // Cumulative count first reaches 3 at the end of the first bin.
        let midpoint = hist.population_midpoint().unwrap();
        let expected = hist.edges[0] + ((3.0 - 0.0) / 3.0) * (hist.edges[1] - hist.edges[0]);
        assert!((midpoint - expected).abs() < 1e-9);
        assert!((midpoint - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_interpolates_inside_bin() {
        let hist = HistogramBinner::new(4).bin(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(hist.counts, vec![1, 1, 1, 1]);
        assert!((hist.population_midpoint().unwrap() - 25.0).abs() < 1e-9);

        let hist = HistogramBinner::new(2).bin(&[0.0, 10.0, 10.0]).unwrap();
        assert_eq!(hist.counts, vec![1, 2]);
        // half = 1.5, one sample before the second bin: 5 + (0.5 / 2) * 5.
        assert!((hist.population_midpoint().unwrap() - 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_widens_range() {
        let hist = HistogramBinner::default().bin(&[50.0, 50.0]).unwrap();
        assert_eq!(hist.total(), 2);
        assert!((hist.edges[0] - 49.5).abs() < 1e-9);
        assert!((hist.edges[20] - 50.5).abs() < 1e-9);
        let midpoint = hist.population_midpoint().unwrap();
        assert!(midpoint > 49.5 && midpoint < 50.5);
    }

    #[test]
    fn test_centers() {
        let hist = HistogramBinner::new(2).bin(&[0.0, 10.0]).unwrap();
        assert_eq!(hist.centers(), vec![2.5, 7.5]);
    }
}
