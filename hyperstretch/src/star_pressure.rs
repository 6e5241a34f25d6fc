//! Star pressure: a `[0, 1]` score of how strongly stars dominate the bright tail.
//!
//! Exposed for auto-solvers; nothing inside the stretch consumes it.

use crate::math::statistics::subsample_stride;

const SAMPLE_CAPACITY: usize = 300_000;
const MIN_SAMPLES: usize = 100;
const POSITIVE_THRESHOLD: f32 = 1e-7;

/// Weight of the tail-steepness term; the tail-mass term gets the rest.
const STEEPNESS_WEIGHT: f64 = 0.7;

/// Estimate star pressure from a luminance buffer.
///
/// Positive samples are subsampled and sorted. The 99.9th and 99.99th
/// percentiles are read by direct rank (`floor(n * q)`), not interpolated.
/// Returns 0 with fewer than 100 positive samples.
pub fn estimate_star_pressure(luminance: &[f32]) -> f64 {
    let stride = subsample_stride(luminance.len(), SAMPLE_CAPACITY);
    let mut sample: Vec<f32> = luminance
        .iter()
        .step_by(stride)
        .copied()
        .filter(|&v| v > POSITIVE_THRESHOLD)
        .collect();

    if sample.len() < MIN_SAMPLES {
        return 0.0;
    }
    sample.sort_unstable_by(f32::total_cmp);

    let n = sample.len();
    let p999 = sample[ranked_index(n, 0.999)] as f64;
    let p9999 = sample[ranked_index(n, 0.9999)] as f64;

    let bright = sample.iter().filter(|&&v| v as f64 > p999).count();
    let bright_fraction = bright as f64 / n as f64;

    let steepness = ((p9999 / (p999 + 1e-9) - 1.0) / 4.0).clamp(0.0, 1.0);
    let mass = (bright_fraction * 200.0).clamp(0.0, 1.0);

    let pressure = STEEPNESS_WEIGHT * steepness + (1.0 - STEEPNESS_WEIGHT) * mass;
    tracing::debug!(
        "Star pressure {:.4} (steepness {:.4}, mass {:.4}, {} samples)",
        pressure,
        steepness,
        mass,
        n
    );
    pressure.clamp(0.0, 1.0)
}

#[inline]
fn ranked_index(n: usize, quantile: f64) -> usize {
    ((n as f64 * quantile) as usize).min(n - 1)
}
