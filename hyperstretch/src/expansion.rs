//! Post-stretch linear range expansion (scientific finishing path).
//!
//! Stretches the occupied range `[low, high]` toward `[0, 1]` and blends the
//! result with the input by `factor`. The high bound comes from the smart-max
//! test when the brightest sample is a supported stellar core, otherwise from
//! the active statistics family, so isolated hot pixels do not compress the
//! whole image.

use crate::image::NormalizedImage;
use crate::math::statistics::StatisticsMode;
use crate::smart_max::PeakAnalysis;

/// Factors at or below this are treated as "off".
pub const MIN_EXPANSION_FACTOR: f64 = 0.001;

/// Diagnostics of one expansion run, measured on the unblended input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearExpansionStats {
    /// Share of samples at or below `low`, in `[0, 1]`.
    pub fraction_low: f64,
    /// Share of samples at or above `high`, in `[0, 1]`.
    pub fraction_high: f64,
    pub low: f64,
    pub high: f64,
}

impl LinearExpansionStats {
    pub fn percent_low(&self) -> f64 {
        self.fraction_low * 100.0
    }

    pub fn percent_high(&self) -> f64 {
        self.fraction_high * 100.0
    }
}

/// Expand `image` in place by `factor` (clamped to `[0, 1]`).
pub fn apply_linear_expansion(image: &mut NormalizedImage, factor: f64, mode: StatisticsMode) {
    expand(image, factor, mode, false);
}

/// Like [`apply_linear_expansion`], also returning clamp diagnostics.
///
/// No-op runs report zero fractions. When the bounds collapse
/// (`high <= low`) the resolved bounds are still reported.
pub fn apply_linear_expansion_with_stats(
    image: &mut NormalizedImage,
    factor: f64,
    mode: StatisticsMode,
) -> LinearExpansionStats {
    expand(image, factor, mode, true)
}

fn expand(
    image: &mut NormalizedImage,
    factor: f64,
    mode: StatisticsMode,
    with_stats: bool,
) -> LinearExpansionStats {
    if factor <= MIN_EXPANSION_FACTOR || image.is_empty() {
        return LinearExpansionStats::default();
    }
    let factor = factor.clamp(0.0, 1.0);

    let peak = PeakAnalysis::analyze(image);
    let bounds = mode.expansion_bounds(image.pixels(), image.pixel_count(), image.channels());

    let low = bounds.low;
    let high = match peak {
        Some(peak) if peak.use_absolute_max() => peak.max as f64,
        _ => bounds.high,
    };

    tracing::debug!(
        "Linear expansion bounds [{:.6}, {:.6}] ({:?}, absolute max: {})",
        low,
        high,
        mode,
        peak.is_some_and(|p| p.use_absolute_max())
    );

    let mut stats = LinearExpansionStats {
        low,
        high,
        ..Default::default()
    };

    if high <= low {
        return stats;
    }

    if with_stats {
        let total = image.pixels().len() as f64;
        let (count_low, count_high) =
            image
                .pixels()
                .iter()
                .fold((0usize, 0usize), |(lo, hi), &v| {
                    let v = v as f64;
                    (lo + (v <= low) as usize, hi + (v >= high) as usize)
                });
        stats.fraction_low = count_low as f64 / total;
        stats.fraction_high = count_high as f64 / total;
    }

    let range = high - low;
    let keep = (1.0 - factor) as f32;
    let factor = factor as f32;
    image.map_in_place(|v| {
        let normalized = ((v as f64 - low) / range).clamp(0.0, 1.0) as f32;
        v * keep + normalized * factor
    });

    stats
}

#[cfg(test)]
mod tests;
