//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use hyperstretch::prelude::*;
//! ```

// Core image types
pub use crate::{Error, ImageDimensions, NormalizedImage, Result, SampleFormat, SourceSamples};

// Sensor profiles
pub use crate::{SensorProfile, SensorProfileTable};

// Pipeline - main API
pub use crate::{
    AnchorMode, CancelFlag, Config, ProcessingMode, ProgressCallback, StatisticsMode,
    StretchPipeline, StretchProgress, StretchResult, StretchStage,
};
