//! Stretch pipeline orchestration.
//!
//! Runs the stages in order:
//!
//! 1. Anchor (adaptive or statistical)
//! 2. Anchored, sensor-weighted luminance
//! 3. Hyperbolic stretch of the luminance
//! 4. Linear range expansion (scientific, when requested)
//! 5. Vector color reconstruction from the anchored input
//! 6. Adaptive output scaling and soft clip (ready-to-use)
//!
//! Every stage reports progress when it completes. All but the last then
//! check the cancellation flag. The input image is never modified.

pub mod config;
pub mod progress;


pub use config::{Config, EffectiveParameters, ProcessingMode};
pub use progress::{
    CancelFlag, ProgressCallback, StretchProgress, StretchStage, is_cancelled, report_progress,
};

use crate::anchor::compute_anchor;
use crate::color::reconstruct_color;
use crate::error::{Error, Result};
use crate::expansion::{LinearExpansionStats, MIN_EXPANSION_FACTOR, apply_linear_expansion_with_stats};
use crate::image::NormalizedImage;
use crate::luminance::{anchored_rgb, extract_luminance};
use crate::output_scaling::{OutputScalingReport, adaptive_output_scaling};
use crate::sensor::{SensorProfile, SensorProfileTable};
use crate::star_pressure::estimate_star_pressure;
use crate::transfer::{SOFT_CLIP_ROLLOFF, SOFT_CLIP_THRESHOLD, hyperbolic_stretch, soft_clip, solve_log_d};

/// Share of samples (in percent) clamped high that triggers a warning.
const HIGH_CLAMP_WARNING_PERCENT: f64 = 0.01;

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct StretchResult {
    /// Stretched image, same dimensions and channel count as the input.
    pub image: NormalizedImage,
    /// Black point subtracted before stretching.
    pub anchor: f64,
    /// Parameters after mode mapping.
    pub parameters: EffectiveParameters,
    /// Linear expansion diagnostics, when the stage ran.
    pub expansion: Option<LinearExpansionStats>,
    /// Output scaling report, in ready-to-use mode.
    pub output_scaling: Option<OutputScalingReport>,
}

/// A validated, reusable stretch configuration bound to one sensor profile.
#[derive(Debug, Clone)]
pub struct StretchPipeline {
    config: Config,
    profile: SensorProfile,
    progress: ProgressCallback,
    cancel: Option<CancelFlag>,
}

impl StretchPipeline {
    /// Validate `config` and resolve its sensor profile from `profiles`.
    pub fn new(config: Config, profiles: &SensorProfileTable) -> Result<Self> {
        config.validate()?;
        let profile = profiles.get(config.sensor_profile)?.clone();

        Ok(Self {
            config,
            profile,
            progress: ProgressCallback::default(),
            cancel: None,
        })
    }

    /// Report stage completion to `progress`.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Abort the run with [`Error::Cancelled`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    /// Stretch `image` and return the result with run diagnostics.
    pub fn run(&self, image: &NormalizedImage) -> Result<StretchResult> {
        let config = &self.config;
        let params = config.effective_parameters();
        let run_expansion =
            config.mode.is_scientific() && params.linear_expansion > MIN_EXPANSION_FACTOR;

        let mut tracker = StageTracker {
            pipeline: self,
            done: 0,
            total: 4 + run_expansion as usize + 2 * config.mode.is_ready_to_use() as usize,
        };

        tracing::info!(
            "Hyperbolic stretch: mode {} | sensor {} | {}x{}x{}",
            config.mode,
            self.profile.name,
            image.width(),
            image.height(),
            image.channels()
        );

        // Anchor
        let anchor = compute_anchor(image, config.anchor, &self.profile);
        tracing::info!("Anchor ({}): {:.6}", config.anchor, anchor);
        tracker.complete(StretchStage::Anchor)?;

        // Luminance
        let mut luma = extract_luminance(image, anchor, &self.profile);
        tracker.complete(StretchStage::Luminance)?;

        // Stretch
        tracing::info!(
            "Applying hyperbolic stretch (log D = {:.2}, b = {:.2})",
            config.log_d,
            config.protect_b
        );
        hyperbolic_stretch(&mut luma, &params.stretch);
        tracker.complete(StretchStage::Stretch)?;

        // Linear expansion
        let expansion = if run_expansion {
            tracing::info!("Applying linear expansion ({:.2})", params.linear_expansion);
            let stats =
                apply_linear_expansion_with_stats(&mut luma, params.linear_expansion, config.statistics);
            if stats.percent_high() >= HIGH_CLAMP_WARNING_PERCENT {
                tracing::warn!(
                    "Linear expansion clamped {:.3}% of samples at the high end",
                    stats.percent_high()
                );
            }
            tracker.complete(StretchStage::LinearExpansion)?;
            Some(stats)
        } else {
            None
        };

        // Color reconstruction
        tracing::info!(
            "Reconstructing color (convergence {:.2}, grip {:.2}, shadow {:.2})",
            params.color.convergence,
            params.color.grip,
            params.color.shadow_convergence
        );
        let anchored = anchored_rgb(image, anchor);
        let mut output = reconstruct_color(&luma, &anchored, &params.color, &params.stretch);
        tracker.complete(StretchStage::ColorReconstruction)?;

        // Ready-to-use finishing
        let output_scaling = if config.mode.is_ready_to_use() {
            tracing::info!(
                "Applying adaptive output scaling (target background {:.3})",
                config.target_background
            );
            let report = adaptive_output_scaling(
                &mut output,
                &self.profile,
                config.target_background,
                config.statistics,
            );
            tracker.complete(StretchStage::OutputScaling)?;

            tracing::info!("Applying soft clip");
            soft_clip(&mut output, SOFT_CLIP_THRESHOLD, SOFT_CLIP_ROLLOFF);
            tracker.complete(StretchStage::SoftClip)?;
            Some(report)
        } else {
            None
        };

        tracing::info!("Hyperbolic stretch done");

        Ok(StretchResult {
            image: output,
            anchor,
            parameters: params,
            expansion,
            output_scaling,
        })
    }

    /// Solve `log10(D)` that places the anchored luminance median at the
    /// configured target background, for the configured knee `b`.
    pub fn solve_log_d(&self, image: &NormalizedImage) -> f64 {
        let (anchor, luma) = self.anchored_luminance(image);
        let log_d = solve_log_d(luma.pixels(), self.config.target_background, self.config.protect_b);
        tracing::info!(
            "Solved log D = {:.3} for target {:.3} (anchor {:.6})",
            log_d,
            self.config.target_background,
            anchor
        );
        log_d
    }

    /// Star pressure of the anchored luminance.
    pub fn star_pressure(&self, image: &NormalizedImage) -> f64 {
        let (_, luma) = self.anchored_luminance(image);
        estimate_star_pressure(luma.pixels())
    }

    fn anchored_luminance(&self, image: &NormalizedImage) -> (f64, NormalizedImage) {
        let anchor = compute_anchor(image, self.config.anchor, &self.profile);
        (anchor, extract_luminance(image, anchor, &self.profile))
    }
}

/// Counts completed stages, reports them and honors cancellation.
struct StageTracker<'a> {
    pipeline: &'a StretchPipeline,
    done: usize,
    total: usize,
}

impl StageTracker<'_> {
    fn complete(&mut self, stage: StretchStage) -> Result<()> {
        self.done += 1;
        report_progress(&self.pipeline.progress, self.done, self.total, stage);

        // The last stage has no cancellation point.
        if self.done < self.total && is_cancelled(self.pipeline.cancel.as_ref()) {
            tracing::info!("Stretch cancelled after stage '{}'", stage);
            return Err(Error::Cancelled { stage });
        }
        Ok(())
    }
}
