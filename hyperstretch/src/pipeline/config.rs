//! Configuration of the stretch pipeline.
//!
//! A flat [`Config`] struct grouped by comments into logical sections, plus
//! the [`ProcessingMode`] variant that selects the finishing stages. Configs
//! serialize to YAML or JSON and are validated before a run.

use std::path::Path;

use common::FileFormat;
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorMode;
use crate::color::ColorStrategy;
use crate::error::{Error, Result};
use crate::math::statistics::StatisticsMode;
use crate::transfer::StretchParameters;

// ============================================================================
// Processing mode
// ============================================================================

/// Which finishing stages run after color reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessingMode {
    /// Export-ready output: adaptive output scaling toward the target
    /// background, then soft clip. Color is steered by one scalar.
    ReadyToUse {
        /// Unified color strategy in `[-100, 100]`. Negative values damp
        /// shadow color noise, positive values soften highlights.
        color_strategy: f64,
    },
    /// Photometric output with explicit color controls and optional
    /// linear range expansion.
    Scientific {
        /// Vector-vs-scalar blend in `[0, 1]`.
        color_grip: f64,
        /// Shadow damping power in `[0, 3]`.
        shadow_convergence: f64,
        /// Linear expansion amount in `[0, 1]`.
        linear_expansion: f64,
    },
}

impl Default for ProcessingMode {
    fn default() -> Self {
        ProcessingMode::ReadyToUse {
            color_strategy: 0.0,
        }
    }
}

impl ProcessingMode {
    pub fn is_ready_to_use(&self) -> bool {
        matches!(self, ProcessingMode::ReadyToUse { .. })
    }

    pub fn is_scientific(&self) -> bool {
        matches!(self, ProcessingMode::Scientific { .. })
    }
}

// ============================================================================
// Config
// ============================================================================

/// Stretch pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -- Mode --
    /// Finishing path and its color controls.
    pub mode: ProcessingMode,

    // -- Sensor --
    /// Index into the sensor profile table. 0 = Rec.709.
    pub sensor_profile: usize,

    // -- Stretch --
    /// Target background level of the finished image. Range: 0.05-0.5.
    /// Also the target median of the Log D auto-solver.
    pub target_background: f64,
    /// Stretch intensity as log10(D). Range: 0-7.
    pub log_d: f64,
    /// Highlight-protection knee b. Range: 0.1-15.
    pub protect_b: f64,
    /// Black-point estimation strategy.
    pub anchor: AnchorMode,

    // -- Color --
    /// White-point power. Range: 1-10.
    pub color_convergence: f64,

    // -- Statistics --
    /// Exact percentiles or the fast median/MAD approximation.
    pub statistics: StatisticsMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Mode
            mode: ProcessingMode::default(),

            // Sensor
            sensor_profile: 0,

            // Stretch
            target_background: 0.20,
            log_d: 2.0,
            protect_b: 6.0,
            anchor: AnchorMode::Adaptive,

            // Color
            color_convergence: 3.5,

            // Statistics
            statistics: StatisticsMode::Exact,
        }
    }
}

/// Parameters the pipeline actually runs with, after mode mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParameters {
    pub stretch: StretchParameters,
    pub color: ColorStrategy,
    /// Linear expansion amount; always 0 in ready-to-use mode.
    pub linear_expansion: f64,
}

// Validation ranges
const TARGET_BACKGROUND_RANGE: (f64, f64) = (0.05, 0.5);
const LOG_D_RANGE: (f64, f64) = (0.0, 7.0);
const PROTECT_B_RANGE: (f64, f64) = (0.1, 15.0);
const COLOR_CONVERGENCE_RANGE: (f64, f64) = (1.0, 10.0);
const COLOR_STRATEGY_RANGE: (f64, f64) = (-100.0, 100.0);
const COLOR_GRIP_RANGE: (f64, f64) = (0.0, 1.0);
const SHADOW_CONVERGENCE_RANGE: (f64, f64) = (0.0, 3.0);
const LINEAR_EXPANSION_RANGE: (f64, f64) = (0.0, 1.0);

/// Shadow convergence reached at color strategy -100.
const MAX_STRATEGY_SHADOW: f64 = 3.0;
/// Grip reduction reached at color strategy +100.
const MAX_STRATEGY_GRIP_REDUCTION: f64 = 0.6;

impl Config {
    /// Export-ready preset (the default).
    pub fn ready_to_use() -> Self {
        Self::default()
    }

    /// Photometric preset: pure vector color, no expansion.
    pub fn scientific() -> Self {
        Self {
            mode: ProcessingMode::Scientific {
                color_grip: 1.0,
                shadow_convergence: 0.0,
                linear_expansion: 0.0,
            },
            ..Self::default()
        }
    }

    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        check_range("target_background", self.target_background, TARGET_BACKGROUND_RANGE)?;
        check_range("log_d", self.log_d, LOG_D_RANGE)?;
        check_range("protect_b", self.protect_b, PROTECT_B_RANGE)?;
        check_range("color_convergence", self.color_convergence, COLOR_CONVERGENCE_RANGE)?;

        match self.mode {
            ProcessingMode::ReadyToUse { color_strategy } => {
                check_range("color_strategy", color_strategy, COLOR_STRATEGY_RANGE)?;
            }
            ProcessingMode::Scientific {
                color_grip,
                shadow_convergence,
                linear_expansion,
            } => {
                check_range("color_grip", color_grip, COLOR_GRIP_RANGE)?;
                check_range("shadow_convergence", shadow_convergence, SHADOW_CONVERGENCE_RANGE)?;
                check_range("linear_expansion", linear_expansion, LINEAR_EXPANSION_RANGE)?;
            }
        }
        Ok(())
    }

    /// Map the mode's controls onto grip, shadow convergence and expansion.
    ///
    /// Ready-to-use: a negative strategy `s` gives `shadow = |s| / 100 * 3` at
    /// full grip; a positive one gives `grip = 1 - s / 100 * 0.6` with no
    /// shadow damping. Expansion is always off.
    pub fn effective_parameters(&self) -> EffectiveParameters {
        let (grip, shadow_convergence, linear_expansion) = match self.mode {
            ProcessingMode::ReadyToUse { color_strategy } => {
                if color_strategy < 0.0 {
                    (1.0, color_strategy.abs() / 100.0 * MAX_STRATEGY_SHADOW, 0.0)
                } else {
                    (
                        1.0 - color_strategy / 100.0 * MAX_STRATEGY_GRIP_REDUCTION,
                        0.0,
                        0.0,
                    )
                }
            }
            ProcessingMode::Scientific {
                color_grip,
                shadow_convergence,
                linear_expansion,
            } => (color_grip, shadow_convergence, linear_expansion),
        };

        EffectiveParameters {
            stretch: StretchParameters::from_log_d(self.log_d, self.protect_b),
            color: ColorStrategy {
                convergence: self.color_convergence,
                grip,
                shadow_convergence,
            },
            linear_expansion,
        }
    }

    /// Parse a config from YAML or JSON text.
    pub fn from_text(text: &str, format: FileFormat) -> Result<Self> {
        Ok(common::deserialize(text, format)?)
    }

    /// Serialize the config to YAML or JSON text.
    pub fn to_text(&self, format: FileFormat) -> Result<String> {
        Ok(common::serialize(self, format)?)
    }

    /// Load a config file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_file_name(&path.to_string_lossy())?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text, format)
    }
}

fn check_range(name: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            min,
            max,
        })
    }
}
