use microatlas_core::config::BlendMode;
use microatlas_core::error::Result;
use microatlas_core::loader::LoadedImage;
use microatlas_core::viewer::LayerParams;

use crate::colormap;

/// Composite the described channels of one pyramid level into an egui image.
///
/// Palette (`single`) mode tints each visible channel with its own color and
/// sums additively; merged mode sums normalized intensities across visible
/// channels and maps the result through the named colormap.
pub fn compose_layer(image: &LoadedImage, params: &LayerParams) -> Result<egui::ColorImage> {
    let level = &image.levels[params.level];
    let (w, h) = (level.width(), level.height());

    let mut accum = vec![0.0f32; w * h * 3];
    let mut intensity = vec![0.0f32; w * h];

    for c in 0..image.num_channels() {
        if !params.channels_visible.get(c).copied().unwrap_or(false) {
            continue;
        }
        let raster = level.raster(params.selections[c])?;
        let [lo, hi] = params.contrast_limits[c];
        let inv = 1.0 / (hi - lo).max(f32::EPSILON);
        let color = params.colors[c];

        match params.blend_mode {
            BlendMode::Single => {
                for (i, &v) in raster.iter().enumerate() {
                    let t = ((v - lo) * inv).clamp(0.0, 1.0);
                    accum[3 * i] += t * f32::from(color[0]);
                    accum[3 * i + 1] += t * f32::from(color[1]);
                    accum[3 * i + 2] += t * f32::from(color[2]);
                }
            }
            BlendMode::Merged => {
                for (i, &v) in raster.iter().enumerate() {
                    intensity[i] += ((v - lo) * inv).clamp(0.0, 1.0);
                }
            }
        }
    }

    let mut pixels = Vec::with_capacity(w * h);
    match params.blend_mode {
        BlendMode::Single => {
            for i in 0..w * h {
                pixels.push(egui::Color32::from_rgb(
                    accum[3 * i].min(255.0) as u8,
                    accum[3 * i + 1].min(255.0) as u8,
                    accum[3 * i + 2].min(255.0) as u8,
                ));
            }
        }
        BlendMode::Merged => {
            let lut = colormap::build_lut(&params.colormap);
            for &t in &intensity {
                let [r, g, b] = lut[(t.clamp(0.0, 1.0) * 255.0) as usize];
                pixels.push(egui::Color32::from_rgb(r, g, b));
            }
        }
    }

    Ok(egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    })
}
