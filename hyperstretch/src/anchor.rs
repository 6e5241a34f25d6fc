//! Black-point (anchor) estimation.
//!
//! Two strategies, selected per run by [`AnchorMode`]:
//!
//! - **Statistical**: the 0.5th percentile of each channel, minimum across
//!   channels, minus a small safety margin.
//! - **Adaptive**: finds where the sky-background peak of a smoothed 16-bit
//!   luminance histogram rises out of the noise floor, i.e. the true start of
//!   signal. Robust against gradients and clipped dark pixels that drag a
//!   fixed percentile down.

use serde::{Deserialize, Serialize};

use crate::image::NormalizedImage;
use crate::luminance::weighted_luminance;
use crate::math::histogram::{HISTOGRAM_BINS, SMOOTHING_WIDTH, UnitHistogram};
use crate::math::statistics::{
    HISTOGRAM_SAMPLE_CAPACITY, MONO_SAMPLE_CAPACITY, RGB_SAMPLE_CAPACITY, percentile_mut,
    subsample_stride,
};
use crate::sensor::SensorProfile;

/// Low percentile taken as the per-channel noise floor.
pub const FLOOR_PERCENTILE: f64 = 0.5;

/// Margin subtracted below the statistical floor.
pub const FLOOR_MARGIN: f64 = 0.00025;

/// Fraction of the histogram peak that marks the start of signal.
pub const PEAK_FRACTION: f64 = 0.06;

/// First bin of the peak search unless the lowest bins already carry mass.
const PEAK_SEARCH_START: usize = 100;

/// Black-point estimation strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnchorMode {
    /// Fixed low percentile per channel.
    Statistical,
    /// Histogram-shape detection of the background rise.
    #[default]
    Adaptive,
}

/// Anchor for `image` using `mode`. Always `>= 0`.
pub fn compute_anchor(image: &NormalizedImage, mode: AnchorMode, profile: &SensorProfile) -> f64 {
    match mode {
        AnchorMode::Statistical => statistical_anchor(image),
        AnchorMode::Adaptive => adaptive_anchor(image, profile),
    }
}

/// Statistical black point: `max(0, min_c p0.5(channel c) - 0.00025)`.
///
/// The subsample stride is derived from the total sample count, with a
/// capacity of 500k for RGB and 200k for mono.
pub fn statistical_anchor(image: &NormalizedImage) -> f64 {
    let total = image.dimensions().sample_count();
    let capacity = if image.is_rgb() {
        RGB_SAMPLE_CAPACITY
    } else {
        MONO_SAMPLE_CAPACITY
    };
    let stride = subsample_stride(total, capacity);

    let channels = if image.is_rgb() { 3 } else { 1 };
    let min_floor = (0..channels)
        .map(|c| {
            let mut sample = image.channel_subsample(c, stride);
            percentile_mut(&mut sample, FLOOR_PERCENTILE)
        })
        .fold(1.0f64, f64::min);

    (min_floor - FLOOR_MARGIN).max(0.0)
}

/// Adaptive black point from the shape of the luminance histogram.
///
/// The luminance is subsampled (2M capacity) into a 65536-bin histogram and
/// box-smoothed over 50 bins. The anchor is the lower edge of the last bin
/// before the background peak whose smoothed count is below 6% of the peak.
/// Falls back to the 0.5th percentile of the subsample when no bin qualifies.
pub fn adaptive_anchor(image: &NormalizedImage, profile: &SensorProfile) -> f64 {
    let luma = weighted_luminance(image, profile);
    let stride = subsample_stride(luma.len(), HISTOGRAM_SAMPLE_CAPACITY);

    let mut sample: Vec<f32> = luma
        .iter()
        .step_by(stride)
        .map(|v| v.clamp(0.0, 1.0))
        .collect();

    let hist = UnitHistogram::from_samples(sample.iter().copied(), HISTOGRAM_BINS);
    let smoothed = hist.box_smoothed(SMOOTHING_WIDTH);

    let anchor = match signal_start_bin(&smoothed) {
        Some(bin) => hist.bin_lower_edge(bin),
        None => {
            tracing::debug!("Adaptive anchor found no rise before the peak, using percentile floor");
            percentile_mut(&mut sample, FLOOR_PERCENTILE)
        }
    };

    tracing::debug!("Adaptive anchor {:.6} from {} samples", anchor, sample.len());
    anchor.max(0.0)
}

/// Last bin before the histogram peak whose value is below the peak fraction.
fn signal_start_bin(smoothed: &[f64]) -> Option<usize> {
    if smoothed.is_empty() {
        return None;
    }

    // Skip a possible spike of clipped zeros unless genuine signal starts there.
    let low_end = smoothed.len().min(PEAK_SEARCH_START);
    let has_low_mass = smoothed[..low_end].iter().any(|&v| v > 0.0);
    let search_start = if has_low_mass || PEAK_SEARCH_START >= smoothed.len() {
        0
    } else {
        PEAK_SEARCH_START
    };

    let mut peak_idx = search_start;
    let mut peak_val = smoothed[search_start];
    for (i, &v) in smoothed.iter().enumerate().skip(search_start + 1) {
        if v > peak_val {
            peak_val = v;
            peak_idx = i;
        }
    }

    let target = peak_val * PEAK_FRACTION;
    smoothed[..peak_idx].iter().rposition(|&v| v < target)
}

#[cfg(test)]
mod tests;
