//! Per-channel intensity histograms for the contrast slider, sampled from the
//! lowest-resolution pyramid level and log-scaled for display.

use ndarray::ArrayView2;
use rayon::prelude::*;

use crate::consts::HIST_BINS;
use crate::loader::LoadedImage;

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelHistogram {
    /// Per-bin heights normalized to [0, 1] on a log scale.
    pub bins: Vec<f32>,
    pub min: f32,
    pub max: f32,
}

/// Bin a raster plane into `bins` buckets over its own [min, max] range.
///
/// A constant plane yields a flat histogram with `max = min + 1` so the slider
/// still has a non-degenerate range to drag over.
pub fn compute_histogram(data: ArrayView2<'_, f32>, bins: usize) -> ChannelHistogram {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in data.iter() {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    if data.is_empty() || min >= max {
        let min = if min.is_finite() { min } else { 0.0 };
        return ChannelHistogram {
            bins: vec![1.0; bins],
            min,
            max: min + 1.0,
        };
    }

    let mut counts = vec![0u32; bins];
    let range = max - min;
    for &v in data.iter() {
        let idx = (((v - min) / range) * bins as f32) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    // Log scale for better visual spread.
    let max_count = counts.iter().copied().max().unwrap_or(0);
    let denom = (max_count as f32).ln_1p();
    let bins = counts
        .iter()
        .map(|&c| if max_count > 0 { (c as f32).ln_1p() / denom } else { 0.0 })
        .collect();

    ChannelHistogram { bins, min, max }
}

/// Best-effort histograms for every channel of an image, sampled from the
/// lowest-resolution level in parallel. A channel whose plane cannot be read
/// yields `None` and simply renders without a histogram.
pub fn compute_image_histograms(image: &LoadedImage) -> Vec<Option<ChannelHistogram>> {
    let Some(level) = image.lowest_level() else {
        return Vec::new();
    };
    (0..image.num_channels())
        .into_par_iter()
        .map(|c| {
            level
                .raster(image.selection(c))
                .ok()
                .map(|plane| compute_histogram(plane.view(), HIST_BINS))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn constant_plane_is_flat() {
        let data = Array2::from_elem((4, 4), 7.0);
        let h = compute_histogram(data.view(), 8);
        assert_eq!(h.bins, vec![1.0; 8]);
        assert_eq!(h.min, 7.0);
        assert_eq!(h.max, 8.0);
    }

    #[test]
    fn extremes_land_in_outer_bins() {
        let data = Array2::from_shape_vec((1, 4), vec![0.0, 0.0, 0.0, 100.0]).unwrap();
        let h = compute_histogram(data.view(), 10);
        assert_eq!(h.min, 0.0);
        assert_eq!(h.max, 100.0);
        assert!(h.bins[0] > 0.0);
        assert!(h.bins[9] > 0.0);
        assert_eq!(h.bins.iter().cloned().fold(0.0, f32::max), 1.0);
    }
}
