//! In-memory pyramid: the `demo://` synthetic source and the fixture type
//! integration tests build loaded images from.

use ndarray::{Array2, Array3};
use serde_json::{json, Value};

use crate::error::{AtlasError, Result};
use crate::loader::{channels_from_metadata, default_planes, LoadedImage, RasterLevel, Selection};

/// One resolution level held fully in memory, indexed `[c, y, x]`.
/// Single-timepoint, single-slice; `t`/`z` selections are ignored.
pub struct MemoryLevel {
    data: Array3<f32>,
}

impl MemoryLevel {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }
}

impl RasterLevel for MemoryLevel {
    fn width(&self) -> usize {
        self.data.shape()[2]
    }

    fn height(&self) -> usize {
        self.data.shape()[1]
    }

    fn raster(&self, selection: Selection) -> Result<Array2<f32>> {
        let channels = self.data.shape()[0];
        if selection.c >= channels {
            return Err(AtlasError::ChannelOutOfRange { index: selection.c, total: channels });
        }
        Ok(self.data.index_axis(ndarray::Axis(0), selection.c).to_owned())
    }
}

/// Assemble a [`LoadedImage`] from in-memory levels (highest resolution first)
/// and a metadata document.
pub fn image_from_levels(levels: Vec<Array3<f32>>, metadata: Value) -> LoadedImage {
    let num_channels = levels.first().map_or(0, |l| l.shape()[0]);
    let channels = channels_from_metadata(&metadata, num_channels);
    let (default_t, default_z) = default_planes(&metadata);
    LoadedImage {
        levels: levels
            .into_iter()
            .map(|data| Box::new(MemoryLevel::new(data)) as Box<dyn RasterLevel>)
            .collect(),
        channels,
        metadata,
        default_t,
        default_z,
    }
}

const DEMO_BASE: usize = 512;
const DEMO_LEVELS: usize = 3;

/// Deterministic three-channel demo image: one Gaussian blob per channel plus
/// a faint diagonal gradient, downsampled by 2x averaging per level.
pub fn synthetic_image(name: &str) -> Result<LoadedImage> {
    if !name.is_empty() && name != "cells" {
        return Err(AtlasError::UnknownSource(format!("demo://{name}")));
    }

    let centers = [(160.0, 180.0), (330.0, 260.0), (250.0, 380.0)];
    let sigmas = [70.0, 55.0, 90.0];

    let mut base = Array3::zeros((centers.len(), DEMO_BASE, DEMO_BASE));
    for (c, (&(cx, cy), &sigma)) in centers.iter().zip(sigmas.iter()).enumerate() {
        for y in 0..DEMO_BASE {
            for x in 0..DEMO_BASE {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let blob = (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
                let gradient = (x + y) as f32 / (2 * DEMO_BASE) as f32;
                base[[c, y, x]] = 4095.0 * blob + 200.0 * gradient;
            }
        }
    }

    let mut levels = Vec::with_capacity(DEMO_LEVELS);
    let mut current = base;
    for _ in 1..DEMO_LEVELS {
        let next = downsample_2x(&current);
        levels.push(current);
        current = next;
    }
    levels.push(current);

    Ok(image_from_levels(levels, demo_metadata()))
}

fn downsample_2x(src: &Array3<f32>) -> Array3<f32> {
    let (channels, h, w) = src.dim();
    let (oh, ow) = (h / 2, w / 2);
    let mut out = Array3::zeros((channels, oh, ow));
    for c in 0..channels {
        for y in 0..oh {
            for x in 0..ow {
                out[[c, y, x]] = (src[[c, 2 * y, 2 * x]]
                    + src[[c, 2 * y, 2 * x + 1]]
                    + src[[c, 2 * y + 1, 2 * x]]
                    + src[[c, 2 * y + 1, 2 * x + 1]])
                    / 4.0;
            }
        }
    }
    out
}

fn demo_metadata() -> Value {
    json!({
        "multiscales": [{
            "axes": [
                { "name": "c", "type": "channel" },
                { "name": "y", "type": "space", "unit": "micrometer" },
                { "name": "x", "type": "space", "unit": "micrometer" },
            ],
            "datasets": [
                { "path": "0", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 0.65, 0.65] }] },
                { "path": "1", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 1.3, 1.3] }] },
                { "path": "2", "coordinateTransformations": [{ "type": "scale", "scale": [1.0, 2.6, 2.6] }] },
            ],
        }],
        "omero": {
            "channels": [
                { "label": "DAPI", "color": "0080ff", "channelsVisible": true, "window": { "start": 0, "end": 4095 } },
                { "label": "GFP", "color": "00c864", "channelsVisible": true, "window": { "start": 0, "end": 4095 } },
                { "label": "mCherry", "color": "ff4040", "channelsVisible": true, "window": { "start": 0, "end": 4095 } },
            ],
            "rdefs": { "defaultT": 0, "defaultZ": 0 },
        },
    })
}
