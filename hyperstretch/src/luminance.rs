//! Projection of RGB or mono images onto one sensor-weighted brightness channel.

use crate::image::NormalizedImage;
use crate::parallel;
use crate::sensor::SensorProfile;

/// Sensor-weighted luminance without black-point subtraction.
///
/// Mono images are copied through. The result is not truncated.
pub fn weighted_luminance(image: &NormalizedImage, profile: &SensorProfile) -> Vec<f32> {
    if image.is_rgb() {
        parallel::map_groups(image.pixels(), 3, |px| {
            profile.luminance(px[0], px[1], px[2])
        })
    } else {
        image.pixels().to_vec()
    }
}

/// Anchor-subtracted, sensor-weighted luminance as a single-channel image.
///
/// RGB: each channel is reduced by `anchor` and floored at zero before
/// weighting. Mono: `max(0, x - anchor)`. Anchors above 1 yield zeros.
pub fn extract_luminance(
    image: &NormalizedImage,
    anchor: f64,
    profile: &SensorProfile,
) -> NormalizedImage {
    let anchor = anchor as f32;
    let dims = image.dimensions().with_channels(1);

    let pixels = if image.is_rgb() {
        parallel::map_groups(image.pixels(), 3, |px| {
            profile.luminance(
                (px[0] - anchor).max(0.0),
                (px[1] - anchor).max(0.0),
                (px[2] - anchor).max(0.0),
            )
        })
    } else {
        let mut luma = image.pixels().to_vec();
        parallel::map_in_place(&mut luma, |v| (v.max(anchor).min(1.0) - anchor).max(0.0));
        luma
    };

    NormalizedImage::from_raw(dims, pixels)
}

/// Copy of `image` with `anchor` subtracted from every sample, floored at zero.
pub fn anchored_rgb(image: &NormalizedImage, anchor: f64) -> NormalizedImage {
    let anchor = anchor as f32;
    let mut anchored = image.clone();
    if image.is_rgb() {
        anchored.map_in_place(|v| (v - anchor).max(0.0));
    } else {
        anchored.map_in_place(|v| (v.max(anchor).min(1.0) - anchor).max(0.0));
    }
    anchored
}
