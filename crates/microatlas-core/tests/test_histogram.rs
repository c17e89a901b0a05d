mod common;

use microatlas_core::consts::HIST_BINS;
use microatlas_core::histogram::{compute_histogram, compute_image_histograms};
use ndarray::Array2;

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

#[test]
fn test_uniform_ramp_fills_every_bin() {
    let data = Array2::from_shape_fn((16, 16), |(y, x)| (y * 16 + x) as f32);
    let h = compute_histogram(data.view(), HIST_BINS);
    assert_eq!(h.bins.len(), HIST_BINS);
    assert_eq!(h.min, 0.0);
    assert_eq!(h.max, 255.0);
    assert!(h.bins.iter().all(|&b| b > 0.0), "uniform data leaves no empty bin");
}

#[test]
fn test_bins_are_normalized_to_unit_height() {
    let data = Array2::from_shape_fn((8, 8), |(y, x)| if y == 0 { 0.0 } else { (x + 1) as f32 });
    let h = compute_histogram(data.view(), 16);
    let peak = h.bins.iter().cloned().fold(0.0, f32::max);
    assert_eq!(peak, 1.0);
    assert!(h.bins.iter().all(|&b| (0.0..=1.0).contains(&b)));
}

#[test]
fn test_log_scaling_compresses_dominant_bin() {
    // 63 zeros and a single 1: linear scaling would make the small bin
    // invisible at 1/63 of the peak; log scaling keeps it legible.
    let mut values = vec![0.0f32; 63];
    values.push(1.0);
    let data = Array2::from_shape_vec((8, 8), values).unwrap();
    let h = compute_histogram(data.view(), 2);
    assert_eq!(h.bins[0], 1.0);
    assert!(h.bins[1] > 1.0 / 63.0);
}

#[test]
fn test_constant_plane_yields_flat_placeholder_range() {
    let data = Array2::from_elem((4, 4), 42.0);
    let h = compute_histogram(data.view(), HIST_BINS);
    assert_eq!(h.min, 42.0);
    assert_eq!(h.max, 43.0);
    assert_eq!(h.bins, vec![1.0; HIST_BINS]);
}

// ---------------------------------------------------------------------------
// Whole-image computation
// ---------------------------------------------------------------------------

#[test]
fn test_image_histograms_cover_all_channels() {
    let image = common::build_test_image(common::metadata_with_unit());
    let histograms = compute_image_histograms(&image);
    assert_eq!(histograms.len(), 2);

    let h0 = histograms[0].as_ref().unwrap();
    let h1 = histograms[1].as_ref().unwrap();
    assert_eq!(h0.bins.len(), HIST_BINS);
    // Channel 1 values sit 100 above channel 0 in the fixture.
    assert_eq!(h1.min, h0.min + 100.0);
    assert_eq!(h1.max, h0.max + 100.0);
}
