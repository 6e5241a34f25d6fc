//! Tone curves: the arcsinh hyperbolic stretch, its inverse solver, the
//! midtone transfer function, and the highlight soft clip.
//!
//! The hyperbolic transfer is
//!
//! ```text
//! f(x) = (asinh(D(x - SP) + b) - asinh(b)) / (asinh(D(1 - SP) + b) - asinh(b))
//! ```
//!
//! `D` sets the intensity (linear gain before compression) and `b` the
//! highlight-protection knee. Both are floored at 0.1.

use crate::image::NormalizedImage;
use crate::math::statistics::median_f32;

/// Lower bound applied to `D` and `b`.
pub const MIN_CURVE_PARAMETER: f64 = 0.1;

/// Replaces a normalization denominator of exactly zero.
const MIN_NORMALIZATION: f64 = 1e-6;

/// Search range of the intensity solver, in log10 units.
pub const LOG_D_RANGE: (f64, f64) = (0.0, 7.0);

/// Returned by the solver when the input is essentially black.
pub const DEFAULT_LOG_D: f64 = 2.0;

const SOLVER_ITERATIONS: usize = 40;
const SOLVER_TOLERANCE: f64 = 1e-4;
const DEGENERATE_MEDIAN: f64 = 1e-9;

/// Curve parameters of the hyperbolic stretch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchParameters {
    /// Intensity `D` (linear, not log).
    pub intensity: f64,
    /// Highlight-protection knee `b`.
    pub protection: f64,
    /// Shadow protection point `SP`.
    pub shadow_protection: f64,
}

impl StretchParameters {
    /// Parameters with `D = 10^log_d` and `SP = 0`.
    pub fn from_log_d(log_d: f64, protection: f64) -> Self {
        Self {
            intensity: 10f64.powf(log_d),
            protection,
            shadow_protection: 0.0,
        }
    }

    pub fn log_d(&self) -> f64 {
        self.intensity.log10()
    }
}

/// Precomputed hyperbolic transfer for fixed parameters.
#[derive(Debug, Clone, Copy)]
pub struct HyperbolicTransfer {
    d: f64,
    b: f64,
    sp: f64,
    offset: f64,
    norm: f64,
}

impl HyperbolicTransfer {
    pub fn new(params: &StretchParameters) -> Self {
        let d = params.intensity.max(MIN_CURVE_PARAMETER);
        let b = params.protection.max(MIN_CURVE_PARAMETER);
        let sp = params.shadow_protection;

        let offset = b.asinh();
        let mut norm = (d * (1.0 - sp) + b).asinh() - offset;
        if norm == 0.0 {
            norm = MIN_NORMALIZATION;
        }

        Self {
            d,
            b,
            sp,
            offset,
            norm,
        }
    }

    /// Unclamped curve value at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        ((self.d * (x - self.sp) + self.b).asinh() - self.offset) / self.norm
    }

    /// Curve value at `x` truncated to `[0, 1]`.
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        (self.eval(x as f64) as f32).clamp(0.0, 1.0)
    }
}

/// Stretch every sample of every channel in place.
pub fn hyperbolic_stretch(image: &mut NormalizedImage, params: &StretchParameters) {
    let transfer = HyperbolicTransfer::new(params);
    image.map_in_place(|v| transfer.apply(v));
}

/// Find `log10(D)` such that the stretched median of `luminance` hits `target`.
///
/// Bisects `log D` over `[0, 7]` for up to 40 iterations with `SP = 0` and the
/// given knee `b`, stopping early once the simulated median is within 1e-4 of
/// the target. A median below 1e-9 returns [`DEFAULT_LOG_D`]. When no early
/// stop occurs the final bracket midpoint is returned, so unreachable targets
/// converge to the nearest end of the range. Best effort: callers should not
/// rely on an exact hit.
pub fn solve_log_d(luminance: &[f32], target: f64, protection: f64) -> f64 {
    let median = median_f32(luminance) as f64;
    if median < DEGENERATE_MEDIAN {
        return DEFAULT_LOG_D;
    }

    let (mut low, mut high) = LOG_D_RANGE;
    let mut mid = (low + high) / 2.0;

    for _ in 0..SOLVER_ITERATIONS {
        mid = (low + high) / 2.0;
        let value = HyperbolicTransfer::new(&StretchParameters::from_log_d(mid, protection)).eval(median);

        if (value - target).abs() < SOLVER_TOLERANCE {
            return mid;
        }
        if value < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    mid
}

/// Midtone transfer `(m - 1) v / ((2m - 1) v - m)`, 0 where the denominator is 0.
#[inline]
pub fn midtone_transfer(v: f64, m: f64) -> f64 {
    let den = (2.0 * m - 1.0) * v - m;
    if den == 0.0 { 0.0 } else { (m - 1.0) * v / den }
}

/// Midtone balance `m` that maps `current` onto `target`.
pub fn midtone_balance(current: f64, target: f64) -> f64 {
    (current * (target - 1.0)) / (current * (2.0 * target - 1.0) - target)
}

/// Apply the midtone transfer with balance `m` to every sample, then truncate.
pub fn apply_midtone_transfer(image: &mut NormalizedImage, m: f64) {
    image.map_in_place(|v| (midtone_transfer(v as f64, m) as f32).clamp(0.0, 1.0));
}

/// Threshold of the export soft clip.
pub const SOFT_CLIP_THRESHOLD: f64 = 0.98;

/// Roll-off exponent of the export soft clip.
pub const SOFT_CLIP_ROLLOFF: f64 = 2.0;

/// Compress values above `threshold` smoothly toward 1.
///
/// `t = clamp((v - th) / (1 - th), 0, 1)`, `v' = th + (1 - th)(1 - (1 - t)^rolloff)`.
/// Values at or below the threshold are untouched. Result truncated to `[0, 1]`.
pub fn soft_clip(image: &mut NormalizedImage, threshold: f64, rolloff: f64) {
    let th = threshold as f32;
    let range_inv = (1.0 / (1.0 - threshold + 1e-9)) as f32;
    let rolloff = rolloff as f32;

    image.map_in_place(|v| {
        let v = if v > th {
            let t = ((v - th) * range_inv).clamp(0.0, 1.0);
            let soft = 1.0 - (1.0 - t).powf(rolloff);
            th + (1.0 - th) * soft
        } else {
            v
        };
        v.clamp(0.0, 1.0)
    });
}
