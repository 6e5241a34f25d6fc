//! Testing utilities for hyperstretch.

#![allow(dead_code)]

use crate::image::{ImageDimensions, NormalizedImage};
use crate::sensor::{SensorProfile, SensorProfileTable};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// The Rec.709 profile at index 0 of the built-in table.
pub fn rec709() -> SensorProfile {
    SensorProfileTable::builtin().get(0).unwrap().clone()
}

/// Uniform mono image.
pub fn flat_mono(width: usize, height: usize, value: f32) -> NormalizedImage {
    NormalizedImage::filled(ImageDimensions::new(width, height, 1), value)
}

/// Assert every sample lies in `[0, 1]` and is finite.
pub fn assert_normalized(image: &NormalizedImage) {
    for (i, &v) in image.pixels().iter().enumerate() {
        assert!(v.is_finite() && (0.0..=1.0).contains(&v), "sample {i} = {v}");
    }
}
