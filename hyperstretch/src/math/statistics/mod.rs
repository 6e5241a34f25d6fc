//! Statistical functions: percentiles, median, MAD, and bound estimation.
//!
//! Two families of estimators are provided and selected per call through
//! [`StatisticsMode`]:
//!
//! - **Exact**: linearly interpolated percentiles (NumPy `linear` method) over a
//!   strided subsample. The subsample keeps the sort affordable on
//!   multi-megapixel inputs while holding relative error near 0.1%.
//! - **Mad**: median and median absolute deviation over the full data. No full
//!   sort is needed (quickselect), at the cost of a small bias against the
//!   exact percentiles.

use serde::{Deserialize, Serialize};

/// Subsample capacity for three-channel data.
pub const RGB_SAMPLE_CAPACITY: usize = 500_000;

/// Subsample capacity for single-channel data.
pub const MONO_SAMPLE_CAPACITY: usize = 200_000;

/// Subsample capacity for histogram-grade sampling.
pub const HISTOGRAM_SAMPLE_CAPACITY: usize = 2_000_000;

/// Selects between exact percentiles and the fast median/MAD approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsMode {
    /// Interpolated percentiles on a strided subsample.
    #[default]
    Exact,
    /// Median +/- k * MAD approximations, no sort required.
    Mad,
}

/// Stride that keeps a subsample of `total` values at or below `capacity`.
#[inline]
pub fn subsample_stride(total: usize, capacity: usize) -> usize {
    (total / capacity).max(1)
}

/// Linearly interpolated percentile of already sorted samples.
///
/// `pct` is clamped to `[0, 100]`. Returns 0 for empty input and the only
/// element for single-element input.
pub fn percentile_from_sorted(sorted: &[f32], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let pct = pct.clamp(0.0, 100.0);
    if sorted.len() == 1 {
        return sorted[0] as f64;
    }

    let pos = (pct / 100.0) * (sorted.len() - 1) as f64;
    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(sorted.len() - 1);
    let frac = pos - i0 as f64;

    let v0 = sorted[i0] as f64;
    let v1 = sorted[i1] as f64;
    v0 + frac * (v1 - v0)
}

/// Sort `samples` in place and return the interpolated percentile.
pub fn percentile_mut(samples: &mut [f32], pct: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.sort_unstable_by(f32::total_cmp);
    percentile_from_sorted(samples, pct)
}

/// Collect every `stride`-th value of `data`.
pub fn subsample(data: &[f32], stride: usize) -> Vec<f32> {
    data.iter().step_by(stride.max(1)).copied().collect()
}

/// Percentile of every `stride`-th value of `data`.
pub fn subsample_percentile(data: &[f32], stride: usize, pct: f64) -> f64 {
    let mut sample = subsample(data, stride);
    percentile_mut(&mut sample, pct)
}

/// Calculate the median of f32 values in-place.
///
/// Mutates the input buffer (partial sort via quickselect).
/// Returns 0 for empty input.
pub fn median_f32_mut(data: &mut [f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }

    let len = data.len();
    let mid = len / 2;

    let (left_part, median, _) = data.select_nth_unstable_by(mid, f32::total_cmp);
    let upper = *median;
    if len & 1 == 1 {
        upper
    } else {
        let lower = left_part.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (lower + upper) * 0.5
    }
}

/// Median of a borrowed slice (copies into a scratch buffer).
pub fn median_f32(data: &[f32]) -> f32 {
    let mut scratch = data.to_vec();
    median_f32_mut(&mut scratch)
}

/// Compute median and MAD (Median Absolute Deviation) together.
///
/// MAD = median(|x_i - median(x)|). The MAD is returned raw, not scaled to
/// a normal-distribution sigma. Mutates the input buffer.
pub fn median_and_mad_f32_mut(data: &mut [f32]) -> (f32, f32) {
    if data.is_empty() {
        return (0.0, 0.0);
    }

    let median = median_f32_mut(data);

    for v in data.iter_mut() {
        *v = (*v - median).abs();
    }
    let mad = median_f32_mut(data);

    (median, mad)
}

/// Summary statistics of a sample population.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleStats {
    pub median: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleStats {
    /// Compute median, mean, standard deviation and extremes of `data`.
    ///
    /// Returns all zeros for empty input.
    pub fn compute(data: &[f32]) -> Self {
        if data.is_empty() {
            return Self::default();
        }

        let n = data.len() as f64;
        let mut sum = 0.0f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in data {
            let v = v as f64;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / n;

        let std_dev = if data.len() > 1 {
            let ss: f64 = data
                .iter()
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Self {
            median: median_f32(data) as f64,
            mean,
            std_dev,
            min,
            max,
        }
    }
}

/// A resolved low/high bound pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundPair {
    pub low: f64,
    pub high: f64,
}

impl BoundPair {
    /// True when the pair describes a non-empty interval.
    pub fn is_valid(&self) -> bool {
        self.high > self.low
    }
}

/// Percentiles used for the exact linear-expansion bounds.
pub const EXPANSION_LOW_PERCENTILE: f64 = 0.001;
pub const EXPANSION_HIGH_PERCENTILE: f64 = 99.999;

/// MAD multipliers approximating the expansion percentiles.
pub const EXPANSION_LOW_MAD_K: f64 = 3.5;
pub const EXPANSION_HIGH_MAD_K: f64 = 4.0;

impl StatisticsMode {
    /// Low/high bounds for range expansion of interleaved `samples`.
    ///
    /// `pixel_count` and `channels` describe the interleaving. Exact mode pools
    /// every channel of a pixel-strided subsample (stride = pixels / 500000) and
    /// takes the 0.001st / 99.999th percentiles. Mad mode uses
    /// `median - 3.5 MAD` and `median + 4 MAD`, clamped to `[0, 1]`.
    pub fn expansion_bounds(self, samples: &[f32], pixel_count: usize, channels: usize) -> BoundPair {
        match self {
            StatisticsMode::Exact => {
                let stride = subsample_stride(pixel_count, RGB_SAMPLE_CAPACITY);
                let mut pooled: Vec<f32> = samples
                    .chunks_exact(channels.max(1))
                    .step_by(stride)
                    .flatten()
                    .copied()
                    .collect();
                pooled.sort_unstable_by(f32::total_cmp);
                BoundPair {
                    low: percentile_from_sorted(&pooled, EXPANSION_LOW_PERCENTILE),
                    high: percentile_from_sorted(&pooled, EXPANSION_HIGH_PERCENTILE),
                }
            }
            StatisticsMode::Mad => {
                let mut scratch = samples.to_vec();
                let (median, mad) = median_and_mad_f32_mut(&mut scratch);
                let (median, mad) = (median as f64, mad as f64);
                BoundPair {
                    low: (median - EXPANSION_LOW_MAD_K * mad).max(0.0),
                    high: (median + EXPANSION_HIGH_MAD_K * mad).min(1.0),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
