//! Adaptive output scaling for the ready-to-use finishing path.
//!
//! Solves a black point from robust luminance statistics and a white point from
//! either a soft contrast ceiling or the physical maximum, maps every sample
//! affinely onto `[pedestal, 1]`, then bends the midtones so the background
//! median lands on the requested target.

use crate::image::NormalizedImage;
use crate::luminance::weighted_luminance;
use crate::math::statistics::{
    MONO_SAMPLE_CAPACITY, RGB_SAMPLE_CAPACITY, SampleStats, StatisticsMode, median_f32,
    percentile_mut, subsample_percentile, subsample_stride,
};
use crate::sensor::SensorProfile;
use crate::smart_max::PeakAnalysis;
use crate::transfer::{apply_midtone_transfer, midtone_balance};

/// Output level of the black point.
pub const PEDESTAL: f64 = 0.001;

/// Sigma multiplier of the black-point clip below the median.
pub const FLOOR_SIGMA: f64 = 2.7;

/// Output level the soft ceiling maps to.
pub const CONTRAST_CEILING: f64 = 0.98;

/// Percentile of the exact soft ceiling.
pub const SOFT_CEILING_PERCENTILE: f64 = 99.0;

/// Sigma multiplier of the fast soft ceiling above the median.
pub const SOFT_CEILING_SIGMA: f64 = 3.0;

/// Minimum background error that triggers the midtone correction.
const BACKGROUND_TOLERANCE: f64 = 1e-3;

/// What the output scaler measured and applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputScalingReport {
    /// Input level mapped to the pedestal.
    pub floor: f64,
    /// Input level mapped to the contrast ceiling.
    pub soft_ceiling: f64,
    /// Observed luminance maximum, nudged above the soft ceiling if needed.
    pub max: f64,
    /// Whether the maximum was trusted as a physical white point.
    pub physical_max_valid: bool,
    /// Applied affine gain.
    pub scale: f64,
    /// Luminance median after the affine map.
    pub background: f64,
    /// Midtone balance applied, if the background needed correction.
    pub midtone_balance: Option<f64>,
}

/// Scale `image` in place so that its background lands on `target_background`.
pub fn adaptive_output_scaling(
    image: &mut NormalizedImage,
    profile: &SensorProfile,
    target_background: f64,
    mode: StatisticsMode,
) -> OutputScalingReport {
    if image.is_empty() {
        return OutputScalingReport::default();
    }

    let luma = NormalizedImage::from_raw(
        image.dimensions().with_channels(1),
        weighted_luminance(image, profile),
    );
    let stats = SampleStats::compute(luma.pixels());
    let floor = stats.min.max(stats.median - FLOOR_SIGMA * stats.std_dev);

    let physical_max_valid = PeakAnalysis::analyze(&luma).is_none_or(|p| p.is_physical_ceiling());

    let soft_ceiling = match mode {
        StatisticsMode::Mad => stats.median + SOFT_CEILING_SIGMA * stats.std_dev,
        StatisticsMode::Exact => exact_soft_ceiling(image, luma.pixels()),
    }
    .min(1.0)
    .max(floor + 1e-6);

    let mut max = stats.max;
    if max <= soft_ceiling {
        max = soft_ceiling + 1e-6;
    }

    let scale_contrast = (CONTRAST_CEILING - PEDESTAL) / (soft_ceiling - floor + 1e-9);
    let scale = if physical_max_valid {
        let scale_physical = (1.0 - PEDESTAL) / (max - floor + 1e-9);
        scale_contrast.min(scale_physical)
    } else {
        scale_contrast
    };

    tracing::debug!(
        "Output scaling: floor {:.6}, soft ceiling {:.6}, max {:.6} (physical: {}), scale {:.4}",
        floor,
        soft_ceiling,
        max,
        physical_max_valid,
        scale
    );

    image.map_in_place(|v| ((v as f64 - floor) * scale + PEDESTAL).clamp(0.0, 1.0) as f32);

    let background = median_f32(&weighted_luminance(image, profile)) as f64;
    let midtone = (background > 0.0
        && background < 1.0
        && (background - target_background).abs() > BACKGROUND_TOLERANCE)
        .then(|| midtone_balance(background, target_background));

    if let Some(m) = midtone {
        tracing::debug!(
            "Midtone correction {:.4} -> {:.4} (m = {:.6})",
            background,
            target_background,
            m
        );
        apply_midtone_transfer(image, m);
    }

    OutputScalingReport {
        floor,
        soft_ceiling,
        max,
        physical_max_valid,
        scale,
        background,
        midtone_balance: midtone,
    }
}

/// 99th percentile ceiling: per-channel maximum for RGB, luminance for mono.
fn exact_soft_ceiling(image: &NormalizedImage, luma: &[f32]) -> f64 {
    if image.is_rgb() {
        let stride = subsample_stride(image.pixel_count(), RGB_SAMPLE_CAPACITY);
        (0..3)
            .map(|c| {
                let mut sample = image.channel_subsample(c, stride);
                percentile_mut(&mut sample, SOFT_CEILING_PERCENTILE)
            })
            .fold(f64::NEG_INFINITY, f64::max)
    } else {
        let stride = subsample_stride(luma.len(), MONO_SAMPLE_CAPACITY);
        subsample_percentile(luma, stride, SOFT_CEILING_PERCENTILE)
    }
}

#[cfg(test)]
mod tests;
