//! Color reconstruction from stretched luminance.
//!
//! The vector method keeps each pixel's RGB ratios from the anchored linear
//! data and scales them by the stretched luminance, so hue is invariant under
//! the stretch. Highlights converge to white as `L^convergence`. Optionally the
//! result is blended toward a classical per-channel (scalar) stretch, globally
//! via `grip` or only in the shadows via `shadow_convergence`.

use crate::image::NormalizedImage;
use crate::parallel;
use crate::transfer::{HyperbolicTransfer, StretchParameters};

/// Shadow convergence at or below this is treated as "off".
pub const SHADOW_CONVERGENCE_EPSILON: f64 = 0.01;

const RATIO_EPSILON: f32 = 1e-9;
const PEDESTAL_GAIN: f32 = 0.995;
const PEDESTAL_OFFSET: f32 = 0.005;

/// Tunables of the color reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStrategy {
    /// White-point power (>= 1). Higher keeps saturation further into highlights.
    pub convergence: f64,
    /// Vector-vs-scalar blend in `[0, 1]`; 1 is pure vector.
    pub grip: f64,
    /// Shadow damping power in `[0, 3]`; 0 disables.
    pub shadow_convergence: f64,
}

impl Default for ColorStrategy {
    fn default() -> Self {
        Self {
            convergence: 3.5,
            grip: 1.0,
            shadow_convergence: 0.0,
        }
    }
}

impl ColorStrategy {
    /// Whether the scalar stretch contributes to the output.
    pub fn needs_scalar_blend(&self) -> bool {
        self.grip < 1.0 || self.shadow_convergence > SHADOW_CONVERGENCE_EPSILON
    }
}

/// Rebuild the output image from stretched luminance and anchored linear data.
///
/// Mono input returns the luminance unchanged. RGB output carries a fixed
/// pedestal (`v * 0.995 + 0.005`) and is truncated to `[0, 1]`.
pub fn reconstruct_color(
    luminance: &NormalizedImage,
    anchored: &NormalizedImage,
    strategy: &ColorStrategy,
    params: &StretchParameters,
) -> NormalizedImage {
    debug_assert_eq!(luminance.pixel_count(), anchored.pixel_count());

    if !anchored.is_rgb() {
        return luminance.clone();
    }

    let luma = luminance.pixels();
    let convergence = strategy.convergence as f32;
    let grip = strategy.grip as f32;
    let shadow = strategy.shadow_convergence as f32;
    let shadow_enabled = strategy.shadow_convergence > SHADOW_CONVERGENCE_EPSILON;
    let scalar = strategy
        .needs_scalar_blend()
        .then(|| HyperbolicTransfer::new(params));

    let mut output = anchored.clone();
    parallel::map_groups_in_place(output.pixels_mut(), 3, |i, px| {
        let l = luma[i];
        let orig = [px[0], px[1], px[2]];
        let sum = orig[0] + orig[1] + orig[2] + RATIO_EPSILON;

        let k = l.powf(convergence);
        for (out, &o) in px.iter_mut().zip(&orig) {
            let ratio = o / sum;
            *out = l * (ratio * (1.0 - k) + k);
        }

        if let Some(transfer) = &scalar {
            let grip_map = if shadow_enabled { grip * l.powf(shadow) } else { grip };
            for (out, &o) in px.iter_mut().zip(&orig) {
                *out = *out * grip_map + transfer.apply(o) * (1.0 - grip_map);
            }
        }

        for out in px.iter_mut() {
            *out = (*out * PEDESTAL_GAIN + PEDESTAL_OFFSET).clamp(0.0, 1.0);
        }
    });

    output
}
