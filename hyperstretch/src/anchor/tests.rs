use super::*;
use crate::image::ImageDimensions;
use crate::sensor::SensorProfileTable;

fn mono(pixels: Vec<f32>, width: usize) -> NormalizedImage {
    let height = pixels.len() / width;
    NormalizedImage::from_pixels(ImageDimensions::new(width, height, 1), pixels).unwrap()
}

fn rec709() -> SensorProfile {
    SensorProfileTable::builtin().get(0).unwrap().clone()
}

/// `zeros` clipped zeros followed by a uniform ramp over `[lo, hi]`.
fn ramp_with_zero_spike(lo: f32, hi: f32, zeros: usize) -> NormalizedImage {
    let n = 200_000;
    let pixels = (0..n)
        .map(|i| {
            if i < zeros {
                0.0
            } else {
                lo + (hi - lo) * (i - zeros) as f32 / (n - zeros) as f32
            }
        })
        .collect();
    mono(pixels, 1000)
}

// ---------------------------------------------------------------------------
// Statistical mode
// ---------------------------------------------------------------------------

#[test]
fn test_statistical_anchor_all_zero() {
    let image = NormalizedImage::filled(ImageDimensions::new(16, 16, 3), 0.0);
    assert_eq!(statistical_anchor(&image), 0.0);
}

#[test]
fn test_statistical_anchor_mono_ramp() {
    let pixels: Vec<f32> = (0..1000).map(|i| i as f32 / 999.0).collect();
    let image = mono(pixels, 100);
    // p0.5: pos = 0.005 * 999 = 4.995 -> 4.995 / 999 = 0.005
    let anchor = statistical_anchor(&image);
    assert!((anchor - (0.005 - FLOOR_MARGIN)).abs() < 1e-6, "anchor = {anchor}");
}

#[test]
fn test_statistical_anchor_takes_darkest_channel() {
    let mut pixels = Vec::new();
    for _ in 0..400 {
        pixels.extend_from_slice(&[0.2, 0.1, 0.3]);
    }
    let image = NormalizedImage::from_pixels(ImageDimensions::new(20, 20, 3), pixels).unwrap();
    let anchor = statistical_anchor(&image);
    assert!((anchor - (0.1 - FLOOR_MARGIN)).abs() < 1e-6);
}

#[test]
fn test_statistical_anchor_floors_at_zero() {
    let image = mono(vec![0.0001; 64], 8);
    assert_eq!(statistical_anchor(&image), 0.0);
}

// ---------------------------------------------------------------------------
// Adaptive mode
// ---------------------------------------------------------------------------

#[test]
fn test_adaptive_anchor_all_zero() {
    let image = NormalizedImage::filled(ImageDimensions::new(32, 32, 1), 0.0);
    assert_eq!(adaptive_anchor(&image, &rec709()), 0.0);
}

#[test]
fn test_adaptive_anchor_empty_image() {
    let image = NormalizedImage::filled(ImageDimensions::new(0, 0, 3), 0.0);
    assert_eq!(adaptive_anchor(&image, &rec709()), 0.0);
}

#[test]
fn test_adaptive_anchor_finds_background_rise() {
    // The zero spike is smaller than the background plateau, so the peak is
    // the plateau and the anchor sits just below where it starts.
    let image = ramp_with_zero_spike(0.2, 0.25, 2000);
    let anchor = adaptive_anchor(&image, &rec709());
    assert!(anchor > 0.199 && anchor < 0.2, "anchor = {anchor}");
}

#[test]
fn test_adaptive_anchor_ignores_dark_tail_that_statistical_follows() {
    let image = ramp_with_zero_spike(0.2, 0.25, 2000);
    // 1% of the samples are zeros, so the percentile floor collapses to 0.
    assert_eq!(statistical_anchor(&image), 0.0);
    assert!(adaptive_anchor(&image, &rec709()) > 0.19);
}

#[test]
fn test_adaptive_anchor_falls_back_to_percentile() {
    // Signal starts at zero: no bin before the plateau drops below 6% of it.
    let n = 200_000;
    let pixels: Vec<f32> = (0..n).map(|i| 0.05 * i as f32 / n as f32).collect();
    let image = mono(pixels, 1000);
    let anchor = adaptive_anchor(&image, &rec709());
    assert!((anchor - 0.05 * 0.005).abs() < 1e-5, "anchor = {anchor}");
}

#[test]
fn test_adaptive_anchor_rgb_uses_weighted_luminance() {
    // Grey pixels: Rec.709 weights sum to 1, so luminance equals the grey level.
    let mono_image = ramp_with_zero_spike(0.2, 0.25, 2000);
    let pixels: Vec<f32> = mono_image
        .pixels()
        .iter()
        .flat_map(|&v| [v, v, v])
        .collect();
    let image = NormalizedImage::from_pixels(ImageDimensions::new(1000, 200, 3), pixels).unwrap();

    let anchor = adaptive_anchor(&image, &rec709());
    assert!(anchor > 0.199 && anchor < 0.2, "anchor = {anchor}");
}

#[test]
fn test_signal_start_bin_skips_low_bins_without_mass() {
    let mut smoothed = vec![0.0; 400];
    for v in &mut smoothed[200..300] {
        *v = 10.0;
    }
    smoothed[150] = 1.0;
    // Peak at 200, target 0.6: the last bin below it before 200 is 199.
    assert_eq!(signal_start_bin(&smoothed), Some(199));
}

#[test]
fn test_signal_start_bin_none_when_peak_at_start() {
    let smoothed = vec![5.0, 4.0, 3.0, 0.0];
    assert_eq!(signal_start_bin(&smoothed), None);
}

#[test]
fn test_compute_anchor_dispatch_and_default() {
    let image = ramp_with_zero_spike(0.2, 0.25, 2000);
    let profile = rec709();
    assert_eq!(
        compute_anchor(&image, AnchorMode::Statistical, &profile),
        statistical_anchor(&image)
    );
    assert_eq!(
        compute_anchor(&image, AnchorMode::Adaptive, &profile),
        adaptive_anchor(&image, &profile)
    );
    assert_eq!(AnchorMode::default(), AnchorMode::Adaptive);
    assert_eq!(AnchorMode::Statistical.to_string(), "statistical");
}
