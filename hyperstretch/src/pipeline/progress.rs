//! Progress reporting and cooperative cancellation for stretch runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::SharedFn;

/// Progress information for a stretch run.
#[derive(Debug, Clone)]
pub struct StretchProgress {
    /// Number of completed stages.
    pub current: usize,
    /// Total number of stages in this run.
    pub total: usize,
    /// Stage that just completed.
    pub stage: StretchStage,
}

/// Stage of the stretch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StretchStage {
    /// Black-point estimation.
    Anchor,
    /// Sensor-weighted luminance extraction.
    Luminance,
    /// Hyperbolic stretch of the luminance.
    Stretch,
    /// Linear range expansion (scientific only).
    LinearExpansion,
    /// Vector color reconstruction.
    ColorReconstruction,
    /// Black/white point solve and midtone correction (ready-to-use only).
    OutputScaling,
    /// Highlight soft clip (ready-to-use only).
    SoftClip,
}

/// Callback type for progress reporting.
pub type ProgressCallback = SharedFn<dyn Fn(StretchProgress) + Send + Sync>;

/// Shared flag a host sets to request cancellation between stages.
pub type CancelFlag = Arc<AtomicBool>;

/// Report progress using the callback if set.
pub fn report_progress(
    callback: &ProgressCallback,
    current: usize,
    total: usize,
    stage: StretchStage,
) {
    if let Some(f) = callback.as_ref() {
        f(StretchProgress {
            current,
            total,
            stage,
        });
    }
}

/// Whether cancellation has been requested.
pub fn is_cancelled(flag: Option<&CancelFlag>) -> bool {
    flag.is_some_and(|f| f.load(Ordering::Relaxed))
}
