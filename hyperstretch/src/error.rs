use std::path::PathBuf;

use thiserror::Error;

use crate::image::SampleFormat;
use crate::pipeline::StretchStage;

/// Errors reported by the stretch pipeline.
///
/// Degenerate data (empty images, near-black medians, collapsed bounds) is
/// never an error; those cases resolve to safe defaults inside each stage.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported sample format: {format}")]
    UnsupportedSampleFormat { format: SampleFormat },

    #[error("Unsupported channel count: {channels} (expected 1 or 3)")]
    UnsupportedChannelCount { channels: usize },

    #[error("Pixel buffer length mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown sensor profile index {index} (table has {available} profiles)")]
    UnknownSensorProfile { index: usize, available: usize },

    #[error("Parameter '{name}' = {value} is outside [{min}, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid configuration format: {0}")]
    ConfigFormat(#[from] common::SerdeFormatError),

    #[error("Unsupported configuration file: {0}")]
    ConfigFile(#[from] common::FileExtensionError),

    #[error("Failed to read configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stretch cancelled after stage '{stage}'")]
    Cancelled { stage: StretchStage },
}

pub type Result<T> = std::result::Result<T, Error>;
