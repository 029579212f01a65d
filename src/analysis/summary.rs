//! Descriptive statistics for a numeric series (box-plot figures) and simple
//! fixed-width histograms anchored at zero.

use std::collections::BTreeMap;

use serde::Serialize;

/// Box-plot statistics for one series. Non-finite values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
}

impl SeriesSummary {
    /// Returns `None` when the series has no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            std_dev: variance.sqrt(),
            median: percentile(&sorted, 0.5),
            q1: percentile(&sorted, 0.25),
            q3: percentile(&sorted, 0.75),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Widest run of bins laid out densely from zero. Past this, only occupied
/// bins are kept.
pub const MAX_DENSE_BINS: usize = 512;

/// One histogram bar covering `[start, start + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Bin number counted from zero; `start == index * bin_width`.
    pub index: usize,
    pub start: f64,
    pub count: usize,
}

/// Fixed-width histogram whose first bin starts at zero.
///
/// Bins are dense (empty bars included) while the highest occupied bin is
/// below [`MAX_DENSE_BINS`], and sparse otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
    /// Values below zero, non-finite, or too far out for a bin number.
    pub skipped: usize,
}

impl Histogram {
    /// A width that is not a positive finite number falls back to 1.
    pub fn from_values(values: &[f64], bin_width: f64) -> Self {
        let bin_width = if bin_width.is_finite() && bin_width > 0.0 {
            bin_width
        } else {
            1.0
        };

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut skipped = 0;
        for &value in values {
            match bin_index(value, bin_width) {
                Some(idx) => *counts.entry(idx).or_insert(0) += 1,
                None => skipped += 1,
            }
        }

        let dense_len = counts
            .keys()
            .next_back()
            .and_then(|&max_idx| max_idx.checked_add(1))
            .filter(|&len| len <= MAX_DENSE_BINS);

        let bins: Vec<HistogramBin> = match dense_len {
            Some(len) => (0..len)
                .map(|idx| make_bin(idx, bin_width, counts.get(&idx).copied().unwrap_or(0)))
                .collect(),
            None => counts
                .into_iter()
                .map(|(idx, count)| make_bin(idx, bin_width, count))
                .collect(),
        };

        Self {
            bin_width,
            bins,
            skipped,
        }
    }

    /// Number of values that landed in a bin.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Position in `bins` of the bar a value falls into, if any.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let idx = bin_index(value, self.bin_width)?;
        self.bins.binary_search_by_key(&idx, |b| b.index).ok()
    }

    /// Share of binned values in `bins[pos]`, as a percentage.
    pub fn percent(&self, pos: usize) -> f64 {
        let total = self.total();
        match self.bins.get(pos) {
            Some(bin) if total > 0 => bin.count as f64 / total as f64 * 100.0,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Whether empty bars between occupied ones were left out.
    pub fn is_sparse(&self) -> bool {
        self.bins
            .last()
            .map_or(false, |last| last.index != self.bins.len() - 1)
    }
}

fn make_bin(index: usize, bin_width: f64, count: usize) -> HistogramBin {
    HistogramBin {
        index,
        start: index as f64 * bin_width,
        count,
    }
}

fn bin_index(value: f64, bin_width: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let raw = (value / bin_width).floor();
    // usize::MAX as f64 rounds up, so equality is already out of range
    if !raw.is_finite() || raw >= usize::MAX as f64 {
        return None;
    }
    Some(raw as usize)
}
