use super::*;
use crate::image::ImageDimensions;
use crate::sensor::SensorProfileTable;

fn rec709() -> SensorProfile {
    SensorProfileTable::builtin().get(0).unwrap().clone()
}

/// 101x101 mono image with a dim background ramp and a bright star.
fn star_field() -> NormalizedImage {
    let (w, h) = (101, 101);
    let mut pixels: Vec<f32> = (0..w * h)
        .map(|i| 0.05 + 0.1 * (i % 37) as f32 / 36.0)
        .collect();
    for y in 48..53 {
        for x in 48..53 {
            pixels[y * w + x] = 0.7;
        }
    }
    pixels[50 * w + 50] = 0.85;
    NormalizedImage::from_pixels(ImageDimensions::new(w, h, 1), pixels).unwrap()
}

fn to_rgb(image: &NormalizedImage) -> NormalizedImage {
    let pixels = image.pixels().iter().flat_map(|&v| [v, v, v]).collect();
    NormalizedImage::from_pixels(image.dimensions().with_channels(3), pixels).unwrap()
}

#[test]
fn test_background_lands_on_target() {
    for mode in [StatisticsMode::Exact, StatisticsMode::Mad] {
        for target in [0.1, 0.2, 0.35] {
            let mut image = star_field();
            let report = adaptive_output_scaling(&mut image, &rec709(), target, mode);

            let bg = median_f32(image.pixels()) as f64;
            assert!(
                (bg - target).abs() < 1e-4,
                "{mode:?} target {target}: background {bg}"
            );
            assert!(report.midtone_balance.is_some());
            assert!(image.pixels().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn test_report_geometry() {
    let mut image = star_field();
    let report = adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Exact);

    assert!(report.floor >= 0.05 - 1e-6);
    assert!(report.soft_ceiling > report.floor);
    assert!(report.soft_ceiling <= 1.0);
    assert!(report.max > report.soft_ceiling);
    assert!(report.physical_max_valid);
    assert!(report.scale > 0.0);
}

#[test]
fn test_isolated_hot_pixel_is_not_physical_max() {
    let mut pixels: Vec<f32> = (0..101 * 101)
        .map(|i| 0.05 + 0.1 * (i % 37) as f32 / 36.0)
        .collect();
    pixels[50 * 101 + 50] = 1.0;
    let mut image =
        NormalizedImage::from_pixels(ImageDimensions::new(101, 101, 1), pixels).unwrap();

    let report = adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Exact);
    assert!(!report.physical_max_valid);
    let expected = (CONTRAST_CEILING - PEDESTAL) / (report.soft_ceiling - report.floor + 1e-9);
    assert!((report.scale - expected).abs() < 1e-9);
}

#[test]
fn test_mad_soft_ceiling_uses_sigma() {
    let mut image = star_field();
    let luma: Vec<f32> = image.pixels().to_vec();
    let stats = SampleStats::compute(&luma);

    let report = adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Mad);
    let expected = (stats.median + SOFT_CEILING_SIGMA * stats.std_dev).min(1.0);
    assert!((report.soft_ceiling - expected).abs() < 1e-9);
}

#[test]
fn test_rgb_grey_matches_mono() {
    let mut mono = star_field();
    let mut rgb = to_rgb(&mono);

    let mono_report = adaptive_output_scaling(&mut mono, &rec709(), 0.2, StatisticsMode::Exact);
    let rgb_report = adaptive_output_scaling(&mut rgb, &rec709(), 0.2, StatisticsMode::Exact);

    assert!((mono_report.soft_ceiling - rgb_report.soft_ceiling).abs() < 1e-5);
    for (m, px) in mono.pixels().iter().zip(rgb.pixels().chunks_exact(3)) {
        assert!((m - px[0]).abs() < 1e-3);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}

#[test]
fn test_flat_image_stays_uniform() {
    let mut image = NormalizedImage::filled(ImageDimensions::new(16, 16, 1), 0.3);
    adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Exact);
    let first = image.pixels()[0];
    assert!(image.pixels().iter().all(|&v| v == first));
    assert!((0.0..=1.0).contains(&first));
}

#[test]
fn test_background_already_on_target_skips_midtone() {
    let mut image = star_field();
    let first = adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Exact);
    assert!(first.midtone_balance.is_some());

    // Feed a background that the affine map alone already places on target.
    let mut image = star_field();
    let target = {
        let mut probe = star_field();
        adaptive_output_scaling(&mut probe, &rec709(), 0.2, StatisticsMode::Exact).background
    };
    let report = adaptive_output_scaling(&mut image, &rec709(), target, StatisticsMode::Exact);
    assert!(report.midtone_balance.is_none());
}

#[test]
fn test_empty_image() {
    let mut image = NormalizedImage::filled(ImageDimensions::new(0, 0, 3), 0.0);
    let report = adaptive_output_scaling(&mut image, &rec709(), 0.2, StatisticsMode::Exact);
    assert_eq!(report, OutputScalingReport::default());
}
