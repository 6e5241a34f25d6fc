//! Tests for statistical functions.

use super::*;

// ---------------------------------------------------------------------------
// Percentile tests
// ---------------------------------------------------------------------------

#[test]
fn test_percentile_median_of_odd() {
    let sorted = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    assert!((percentile_from_sorted(&sorted, 50.0) - 3.0).abs() < 1e-12);
}

#[test]
fn test_percentile_interpolates() {
    let sorted = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    // pos = 0.1 * 4 = 0.4
    assert!((percentile_from_sorted(&sorted, 10.0) - 1.4).abs() < 1e-9);
    assert!((percentile_from_sorted(&sorted, 25.0) - 2.0).abs() < 1e-12);
}

#[test]
fn test_percentile_median_of_even() {
    let sorted = [1.0f32, 2.0, 3.0, 4.0];
    assert_eq!(percentile_from_sorted(&sorted, 50.0), 2.5);
}

#[test]
fn test_percentile_non_decreasing_in_pct() {
    let sorted = [0.0f32, 0.01, 0.01, 0.2, 0.35, 0.8, 0.81, 1.0];
    let mut previous = f64::NEG_INFINITY;
    for step in 0..=1000 {
        let value = percentile_from_sorted(&sorted, step as f64 / 10.0);
        assert!(value >= previous, "pct {} gave {value} < {previous}", step as f64 / 10.0);
        previous = value;
    }
    assert_eq!(previous, 1.0);
}

#[test]
fn test_percentile_extremes_and_clamp() {
    let sorted = [0.25f32, 0.5, 0.75];
    assert!((percentile_from_sorted(&sorted, 0.0) - 0.25).abs() < 1e-12);
    assert!((percentile_from_sorted(&sorted, 100.0) - 0.75).abs() < 1e-12);
    assert!((percentile_from_sorted(&sorted, -10.0) - 0.25).abs() < 1e-12);
    assert!((percentile_from_sorted(&sorted, 250.0) - 0.75).abs() < 1e-12);
}

#[test]
fn test_percentile_empty_and_single() {
    assert_eq!(percentile_from_sorted(&[], 50.0), 0.0);
    assert!((percentile_from_sorted(&[0.7], 3.0) - 0.7f32 as f64).abs() < 1e-12);
}

#[test]
fn test_percentile_mut_sorts_unsorted_input() {
    let mut values = [5.0f32, 1.0, 4.0, 2.0, 3.0];
    assert!((percentile_mut(&mut values, 50.0) - 3.0).abs() < 1e-12);
    assert_eq!(values, [1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_subsample_stride() {
    assert_eq!(subsample_stride(100, 500_000), 1);
    assert_eq!(subsample_stride(1_000_000, 500_000), 2);
    assert_eq!(subsample_stride(1_499_999, 500_000), 2);
    assert_eq!(subsample_stride(0, 200_000), 1);
}

#[test]
fn test_subsample_percentile_uses_stride() {
    // Every second value: 0, 2, 4, 6, 8
    let data: Vec<f32> = (0..10).map(|v| v as f32).collect();
    assert!((subsample_percentile(&data, 2, 50.0) - 4.0).abs() < 1e-12);
    assert!((subsample_percentile(&data, 1, 50.0) - 4.5).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Median tests
// ---------------------------------------------------------------------------

#[test]
fn test_median_odd() {
    let mut values = [1.0f32, 3.0, 2.0, 5.0, 4.0];
    assert!((median_f32_mut(&mut values) - 3.0).abs() < f32::EPSILON);
}

#[test]
fn test_median_even() {
    let mut values = [1.0f32, 2.0, 3.0, 4.0];
    assert!((median_f32_mut(&mut values) - 2.5).abs() < f32::EPSILON);
}

#[test]
fn test_median_empty() {
    let mut values: [f32; 0] = [];
    assert_eq!(median_f32_mut(&mut values), 0.0);
}

#[test]
fn test_median_borrowed_leaves_input() {
    let values = [0.9f32, 0.1, 0.5];
    assert!((median_f32(&values) - 0.5).abs() < f32::EPSILON);
    assert_eq!(values, [0.9, 0.1, 0.5]);
}

// ---------------------------------------------------------------------------
// MAD tests
// ---------------------------------------------------------------------------

#[test]
fn test_median_and_mad_odd() {
    let mut values = [2.0f32, 4.0, 3.0];
    let (median, mad) = median_and_mad_f32_mut(&mut values);
    assert!((median - 3.0).abs() < 1e-6);
    assert!((mad - 1.0).abs() < 1e-6);
}

#[test]
fn test_median_and_mad_is_unscaled() {
    // deviations from 3: 2, 1, 0, 1, 7 -> median 1
    let mut values = [1.0f32, 2.0, 3.0, 4.0, 10.0];
    let (median, mad) = median_and_mad_f32_mut(&mut values);
    assert!((median - 3.0).abs() < 1e-6);
    assert!((mad - 1.0).abs() < 1e-6);
}

#[test]
fn test_median_and_mad_uniform() {
    let mut values = [3.5f32; 5];
    let (median, mad) = median_and_mad_f32_mut(&mut values);
    assert!((median - 3.5).abs() < 1e-6);
    assert!(mad.abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[test]
fn test_sample_stats_basic() {
    let stats = SampleStats::compute(&[1.0, 2.0, 3.0, 4.0]);
    assert!((stats.median - 2.5).abs() < 1e-9);
    assert!((stats.mean - 2.5).abs() < 1e-9);
    // sum of squares 5, n - 1 = 3
    assert!((stats.std_dev - (5.0f64 / 3.0).sqrt()).abs() < 1e-9);
    assert!((stats.min - 1.0).abs() < 1e-12);
    assert!((stats.max - 4.0).abs() < 1e-12);
}

#[test]
fn test_sample_stats_single_and_empty() {
    let single = SampleStats::compute(&[0.5]);
    assert_eq!(single.std_dev, 0.0);
    assert!((single.median - 0.5).abs() < 1e-12);

    assert_eq!(SampleStats::compute(&[]), SampleStats::default());
}

// ---------------------------------------------------------------------------
// Expansion bounds
// ---------------------------------------------------------------------------

#[test]
fn test_exact_expansion_bounds_on_ramp() {
    let data: Vec<f32> = (0..=1000).map(|v| v as f32 / 1000.0).collect();
    let bounds = StatisticsMode::Exact.expansion_bounds(&data, data.len(), 1);
    // pos = 0.00001 * 1000 = 0.01
    assert!((bounds.low - 0.00001).abs() < 1e-6);
    assert!((bounds.high - 0.99999).abs() < 1e-6);
    assert!(bounds.is_valid());
}

#[test]
fn test_exact_expansion_bounds_pool_channels() {
    // Two RGB pixels: channels are pooled into one population.
    let data = [0.0f32, 0.5, 1.0, 0.0, 0.5, 1.0];
    let bounds = StatisticsMode::Exact.expansion_bounds(&data, 2, 3);
    assert!(bounds.low < 1e-3);
    assert!(bounds.high > 0.999);
}

#[test]
fn test_mad_expansion_bounds() {
    // median 0.3, deviations 0.1, 0.0, 0.1 -> MAD 0.1
    let data = [0.2f32, 0.3, 0.4];
    let bounds = StatisticsMode::Mad.expansion_bounds(&data, 3, 1);
    assert!((bounds.low - 0.0).abs() < 1e-6);
    assert!((bounds.high - 0.7).abs() < 1e-6);
}

#[test]
fn test_mad_expansion_bounds_degenerate() {
    let data = [0.5f32; 16];
    let bounds = StatisticsMode::Mad.expansion_bounds(&data, 16, 1);
    assert!(!bounds.is_valid());
}

#[test]
fn test_statistics_mode_default_is_exact() {
    assert_eq!(StatisticsMode::default(), StatisticsMode::Exact);
}
