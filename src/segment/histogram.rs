//! Bucketed frequency histogram with Gaussian smoothing and peak extraction.
//!
//! The segmenter builds one histogram over nearest-neighbor angles and two
//! over nearest-neighbor distances; the dominant peak of each is the page's
//! orientation, character spacing and line spacing.

use serde::{Deserialize, Serialize};

/// Margin added on both sides of the value range so `max` falls inside the last bucket.
pub const EPSILON: f64 = 1.0e-6;

/// Upper bound on the bucket count; wider ranges get coarser buckets.
pub const MAX_BUCKETS: usize = 1 << 16;

/// Which bucket wins when several share the maximal frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The bucket with the lowest value
    #[default]
    LowestValue,
    /// The bucket with the highest value
    HighestValue,
}

/// A histogram peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Bucket index
    pub index: usize,
    /// Representative value (bucket center)
    pub value: f64,
    /// Smoothed frequency of the bucket
    pub frequency: f64,
}

/// A fixed-size frequency histogram over `[min, max]`.
#[derive(Debug, Clone)]
pub struct Histogram {
    min: f64,
    resolution: f64,
    frequencies: Vec<f64>,
}

impl Histogram {
    /// Create an empty histogram over `[min, max]` with buckets roughly `resolution` wide.
    ///
    /// The effective resolution is adjusted so the buckets exactly tile the
    /// widened range, with at most [`MAX_BUCKETS`] buckets.
    pub fn new(min: f64, max: f64, resolution: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let min = min - EPSILON;
        let max = max + EPSILON;
        let range = max - min;
        let buckets = range / resolution;
        let size = if resolution > 0.0 && buckets.is_finite() {
            (buckets.round().min(MAX_BUCKETS as f64) as usize).max(1)
        } else {
            1
        };
        Self {
            min,
            resolution: range / size as f64,
            frequencies: vec![0.0; size],
        }
    }

    /// Build a histogram over the range of `values` and add them all.
    ///
    /// An empty sample set yields a single empty bucket at zero.
    pub fn from_samples(values: &[f64], resolution: f64) -> Self {
        let (min, max) = values
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 0.0));
        let mut histogram = Self::new(min, max, resolution);
        for &value in values {
            histogram.add(value);
        }
        histogram
    }

    /// Count a sample. Values outside the range land in the edge buckets.
    pub fn add(&mut self, value: f64) {
        self.add_weighted(value, 1.0);
    }

    /// Add `weight` to the bucket holding `value`.
    pub fn add_weighted(&mut self, value: f64, weight: f64) {
        let index = self.bucket_of(value);
        self.frequencies[index] += weight;
    }

    fn bucket_of(&self, value: f64) -> usize {
        let last = self.frequencies.len() - 1;
        let position = ((value - self.min) / self.resolution).floor();
        if position.is_nan() || position < 0.0 {
            0
        } else {
            (position as usize).min(last)
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether no sample was added.
    pub fn is_empty(&self) -> bool {
        self.frequencies.iter().all(|&f| f == 0.0)
    }

    /// Effective bucket width.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Representative value of a bucket (its center).
    pub fn value_at(&self, index: usize) -> f64 {
        self.min + (index as f64 + 0.5) * self.resolution
    }

    /// Frequency of a bucket.
    pub fn frequency(&self, index: usize) -> f64 {
        self.frequencies[index]
    }

    /// Smooth with a Gaussian kernel; out-of-range neighbors are skipped.
    ///
    /// `window_length` and `std_dev` are in value units.
    pub fn gaussian_smooth(&mut self, window_length: f64, std_dev: f64) {
        self.smooth(window_length, std_dev, false);
    }

    /// Smooth with a Gaussian kernel whose indices wrap around, for periodic values.
    pub fn circular_gaussian_smooth(&mut self, window_length: f64, std_dev: f64) {
        self.smooth(window_length, std_dev, true);
    }

    fn smooth(&mut self, window_length: f64, std_dev: f64, circular: bool) {
        let kernel = self.kernel(window_length, std_dev);
        if kernel.is_empty() {
            return;
        }
        let half = (kernel.len() / 2) as isize;
        let n = self.frequencies.len() as isize;
        let original = self.frequencies.clone();

        for (i, target) in self.frequencies.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let mut index = i as isize + k as isize - half;
                if circular {
                    index = index.rem_euclid(n);
                } else if index < 0 || index >= n {
                    continue;
                }
                sum += original[index as usize] * weight;
            }
            *target = sum;
        }
    }

    fn kernel(&self, window_length: f64, std_dev: f64) -> Vec<f64> {
        if std_dev.is_nan() || std_dev <= 0.0 || window_length.is_nan() || window_length <= 0.0 {
            return Vec::new();
        }
        let half = (window_length / self.resolution / 2.0).floor();
        if !half.is_finite() || half < 1.0 {
            return Vec::new();
        }
        // A kernel wider than the histogram adds nothing but work.
        let half = (half as isize).min(self.frequencies.len() as isize);
        (-half..=half)
            .map(|j| {
                let d = j as f64 * self.resolution;
                (-d * d / (2.0 * std_dev * std_dev)).exp()
            })
            .collect()
    }

    /// The bucket with the maximal frequency; ties go to the lowest value.
    pub fn peak(&self) -> Option<Peak> {
        self.peak_with(TieBreak::LowestValue)
    }

    /// The bucket with the maximal frequency under the given tie-break rule.
    ///
    /// Returns `None` when no sample has been added.
    pub fn peak_with(&self, tie_break: TieBreak) -> Option<Peak> {
        if self.is_empty() {
            return None;
        }
        let mut best = 0;
        for (i, &f) in self.frequencies.iter().enumerate().skip(1) {
            let current = self.frequencies[best];
            let better = match tie_break {
                TieBreak::LowestValue => f > current,
                TieBreak::HighestValue => f >= current,
            };
            if better {
                best = i;
            }
        }
        Some(Peak {
            index: best,
            value: self.value_at(best),
            frequency: self.frequencies[best],
        })
    }
}
