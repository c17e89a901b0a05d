use std::fs;
use std::path::Path;

use ndarray::Array3;
use serde_json::{json, Value};

use microatlas_core::loader::memory::image_from_levels;
use microatlas_core::loader::LoadedImage;

/// Metadata for a two-channel image with micrometer-calibrated axes.
pub fn metadata_with_unit() -> Value {
    json!({
        "multiscales": [{
            "axes": [
                { "name": "c", "type": "channel" },
                { "name": "y", "type": "space", "unit": "micrometer" },
                { "name": "x", "type": "space", "unit": "micrometer" },
            ],
            "datasets": [
                { "path": "0", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 0.5, 0.5] }] },
                { "path": "1", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 1.0, 1.0] }] },
            ],
        }],
        "omero": {
            "channels": [
                { "label": "DNA", "color": "0000ff", "channelsVisible": true, "window": { "start": 0, "end": 255 } },
                { "label": "Actin", "color": "00ff00", "channelsVisible": false, "window": { "start": 10, "end": 200 } },
            ],
        },
    })
}

/// Same shape but no axis units anywhere, so no physical scale is derivable.
pub fn metadata_without_unit() -> Value {
    json!({
        "multiscales": [{
            "axes": [
                { "name": "c", "type": "channel" },
                { "name": "y", "type": "space" },
                { "name": "x", "type": "space" },
            ],
            "datasets": [{ "path": "0" }],
        }],
    })
}

/// Build a two-channel, two-level in-memory image (16x16 base, 8x8 level 1)
/// with a deterministic intensity ramp per channel.
pub fn build_test_image(metadata: Value) -> LoadedImage {
    let mut base = Array3::zeros((2, 16, 16));
    for c in 0..2 {
        for y in 0..16 {
            for x in 0..16 {
                base[[c, y, x]] = (c * 100 + y * 16 + x) as f32;
            }
        }
    }
    let mut low = Array3::zeros((2, 8, 8));
    for c in 0..2 {
        for y in 0..8 {
            for x in 0..8 {
                low[[c, y, x]] = base[[c, 2 * y, 2 * x]];
            }
        }
    }
    image_from_levels(vec![base, low], metadata)
}

/// Write an uncompressed single-level OME-Zarr store to `root`: shape
/// (2, 8, 8) u16, chunks (1, 4, 4), values `c * 1000 + y * 8 + x`.
///
/// The chunk at grid position (c=1, y=1, x=1) is deliberately not written so
/// reads of it exercise the fill-value path.
pub fn write_zarr_store(root: &Path) -> std::io::Result<()> {
    let level = root.join("0");
    fs::create_dir_all(&level)?;

    let zattrs = json!({
        "multiscales": [{
            "axes": [
                { "name": "c", "type": "channel" },
                { "name": "y", "type": "space", "unit": "micrometer" },
                { "name": "x", "type": "space", "unit": "micrometer" },
            ],
            "datasets": [
                { "path": "0", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 0.25, 0.25] }] },
            ],
        }],
        "omero": {
            "channels": [
                { "label": "Ch A", "color": "ff0000", "window": { "start": 0, "end": 4095 } },
                { "label": "Ch B", "color": "00ff00", "window": { "start": 0, "end": 4095 } },
            ],
        },
    });
    fs::write(root.join(".zattrs"), serde_json::to_vec_pretty(&zattrs)?)?;

    let zarray = json!({
        "zarr_format": 2,
        "shape": [2, 8, 8],
        "chunks": [1, 4, 4],
        "dtype": "<u2",
        "compressor": null,
        "fill_value": 0,
        "order": "C",
        "dimension_separator": ".",
    });
    fs::write(level.join(".zarray"), serde_json::to_vec_pretty(&zarray)?)?;

    for c in 0..2usize {
        for gy in 0..2usize {
            for gx in 0..2usize {
                if c == 1 && gy == 1 && gx == 1 {
                    continue;
                }
                let mut bytes = Vec::with_capacity(4 * 4 * 2);
                for ly in 0..4usize {
                    for lx in 0..4usize {
                        let y = gy * 4 + ly;
                        let x = gx * 4 + lx;
                        let v = (c * 1000 + y * 8 + x) as u16;
                        bytes.extend_from_slice(&v.to_le_bytes());
                    }
                }
                fs::write(level.join(format!("{c}.{gy}.{gx}")), bytes)?;
            }
        }
    }
    Ok(())
}
