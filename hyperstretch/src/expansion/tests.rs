use super::*;
use crate::image::ImageDimensions;

/// 64x64 mono image: values ramp over `[0.2, 0.6]`.
fn ramp() -> NormalizedImage {
    let n = 64 * 64;
    let pixels = (0..n).map(|i| 0.2 + 0.4 * i as f32 / (n - 1) as f32).collect();
    NormalizedImage::from_pixels(ImageDimensions::new(64, 64, 1), pixels).unwrap()
}

fn span(image: &NormalizedImage) -> (f32, f32) {
    image
        .pixels()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[test]
fn test_factor_zero_is_noop() {
    for mode in [StatisticsMode::Exact, StatisticsMode::Mad] {
        let mut image = ramp();
        let before = image.clone();
        let stats = apply_linear_expansion_with_stats(&mut image, 0.0, mode);
        assert_eq!(image, before);
        assert_eq!(stats, LinearExpansionStats::default());

        apply_linear_expansion(&mut image, MIN_EXPANSION_FACTOR, mode);
        assert_eq!(image, before);
    }
}

#[test]
fn test_full_expansion_widens_range() {
    let mut image = ramp();
    let (lo_before, hi_before) = span(&image);

    let stats = apply_linear_expansion_with_stats(&mut image, 1.0, StatisticsMode::Exact);
    let (lo_after, hi_after) = span(&image);

    assert!(lo_after < lo_before);
    assert!(hi_after > hi_before);
    assert!(lo_after < 1e-3, "low end {lo_after}");
    assert!(hi_after > 0.999, "high end {hi_after}");
    assert!(stats.high > stats.low);
}

#[test]
fn test_partial_expansion_blends() {
    let mut full = ramp();
    let mut half = ramp();
    let original = ramp();
    apply_linear_expansion(&mut full, 1.0, StatisticsMode::Exact);
    apply_linear_expansion(&mut half, 0.5, StatisticsMode::Exact);

    for ((&o, &f), &h) in original
        .pixels()
        .iter()
        .zip(full.pixels())
        .zip(half.pixels())
    {
        assert!((h - 0.5 * (o + f)).abs() < 1e-5);
    }
}

#[test]
fn test_factor_above_one_is_clamped() {
    let mut a = ramp();
    let mut b = ramp();
    apply_linear_expansion(&mut a, 1.0, StatisticsMode::Exact);
    apply_linear_expansion(&mut b, 3.0, StatisticsMode::Exact);
    assert_eq!(a, b);
}

#[test]
fn test_hot_pixel_uses_statistical_high_bound() {
    // Background stays below 20% of the hot pixel.
    let mut pixels = vec![0.01f32; 64 * 64];
    for (i, v) in pixels.iter_mut().enumerate() {
        *v += 0.1 * (i % 7) as f32 / 6.0;
    }
    pixels[64 * 32 + 32] = 1.0;
    let mut image =
        NormalizedImage::from_pixels(ImageDimensions::new(64, 64, 1), pixels).unwrap();

    let stats = apply_linear_expansion_with_stats(&mut image, 1.0, StatisticsMode::Exact);
    assert!(stats.high < 1.0, "hot pixel should not set the high bound");
    assert!(stats.fraction_high > 0.0);
}

#[test]
fn test_star_core_uses_absolute_max() {
    let mut pixels = vec![0.3f32; 64 * 64];
    for (i, v) in pixels.iter_mut().enumerate() {
        *v += 0.1 * (i % 7) as f32 / 6.0;
    }
    for y in 30..35 {
        for x in 30..35 {
            pixels[y * 64 + x] = 0.8;
        }
    }
    pixels[32 * 64 + 32] = 0.9;
    let mut image =
        NormalizedImage::from_pixels(ImageDimensions::new(64, 64, 1), pixels).unwrap();

    let stats = apply_linear_expansion_with_stats(&mut image, 1.0, StatisticsMode::Exact);
    assert!((stats.high - 0.9).abs() < 1e-6);
    // Only the peak itself sits at the high bound.
    assert!((stats.fraction_high - 1.0 / 4096.0).abs() < 1e-12);
}

#[test]
fn test_flat_image_collapsed_bounds() {
    for mode in [StatisticsMode::Exact, StatisticsMode::Mad] {
        let mut image = NormalizedImage::filled(ImageDimensions::new(8, 8, 1), 0.4);
        let before = image.clone();
        let stats = apply_linear_expansion_with_stats(&mut image, 1.0, mode);
        assert_eq!(image, before);
        assert_eq!(stats.fraction_low, 0.0);
        assert_eq!(stats.fraction_high, 0.0);
        assert!(stats.high <= stats.low);
    }
}

#[test]
fn test_mad_mode_expands() {
    let mut image = ramp();
    let (lo_before, hi_before) = span(&image);
    let stats = apply_linear_expansion_with_stats(&mut image, 1.0, StatisticsMode::Mad);
    let (lo_after, hi_after) = span(&image);

    // median 0.4, MAD 0.1 -> low 0.05; the ramp's end is a supported peak.
    assert!((stats.low - 0.05).abs() < 1e-3);
    assert!((stats.high - 0.6).abs() < 1e-6);
    assert!(hi_after - lo_after > hi_before - lo_before);
}

#[test]
fn test_percent_helpers() {
    let stats = LinearExpansionStats {
        fraction_low: 0.25,
        fraction_high: 0.0001,
        low: 0.0,
        high: 1.0,
    };
    assert!((stats.percent_low() - 25.0).abs() < 1e-12);
    assert!((stats.percent_high() - 0.01).abs() < 1e-12);
}
