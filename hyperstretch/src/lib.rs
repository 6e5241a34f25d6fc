//! Hyperstretch - photometric hyperbolic stretch for linear astronomical images.
//!
//! Turns linear (unstretched) image data into a display-ready or
//! photometrically faithful nonlinear rendition:
//! - Adaptive or statistical black-point anchoring
//! - Sensor-weighted luminance from a built-in table of camera profiles
//! - Generalized hyperbolic (arcsinh) stretch with a Log D auto-solver
//! - Vector color reconstruction with grip and shadow convergence controls
//! - Adaptive output scaling, midtone correction and highlight soft clip
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hyperstretch::{Config, NormalizedImage, SensorProfileTable, StretchPipeline};
//!
//! let image = NormalizedImage::from_samples(dimensions, samples)?;
//! let pipeline = StretchPipeline::new(Config::ready_to_use(), &SensorProfileTable::builtin())?;
//! let result = pipeline.run(&image)?;
//!
//! println!("Anchor: {:.6}", result.anchor);
//! ```

pub(crate) mod anchor;
pub(crate) mod color;
mod error;
pub(crate) mod expansion;
mod image;
pub(crate) mod luminance;
pub(crate) mod math;
pub(crate) mod output_scaling;
pub(crate) mod parallel;
pub(crate) mod pipeline;
mod sensor;
pub(crate) mod smart_max;
pub(crate) mod star_pressure;
pub mod synthetic;
pub(crate) mod transfer;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Core image types
// ============================================================================

pub use error::{Error, Result};
pub use image::{ImageDimensions, NormalizedImage, SampleFormat, SourceSamples};

// ============================================================================
// Sensor profiles
// ============================================================================

pub use sensor::{SensorCategory, SensorProfile, SensorProfileTable};

// ============================================================================
// Pipeline
// ============================================================================

pub use pipeline::{
    // Configuration
    CancelFlag,
    Config,
    EffectiveParameters,
    ProcessingMode,
    // Progress reporting
    ProgressCallback,
    // Main API
    StretchPipeline,
    StretchProgress,
    StretchResult,
    StretchStage,
};

// ============================================================================
// Stages
// ============================================================================

pub use anchor::{AnchorMode, adaptive_anchor, compute_anchor, statistical_anchor};
pub use color::{ColorStrategy, reconstruct_color};
pub use expansion::{LinearExpansionStats, apply_linear_expansion, apply_linear_expansion_with_stats};
pub use luminance::{anchored_rgb, extract_luminance, weighted_luminance};
pub use output_scaling::{OutputScalingReport, adaptive_output_scaling};
pub use smart_max::PeakAnalysis;
pub use star_pressure::estimate_star_pressure;
pub use transfer::{
    HyperbolicTransfer, StretchParameters, hyperbolic_stretch, midtone_balance, midtone_transfer,
    soft_clip, solve_log_d,
};

// ============================================================================
// Statistics
// ============================================================================

pub use math::statistics::{BoundPair, SampleStats, StatisticsMode};
