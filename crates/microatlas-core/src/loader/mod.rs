//! Image loader capability: turns a source identifier into a multi-resolution
//! pixel pyramid plus channel/axis metadata, and computes default fit views.
//!
//! The viewer consumes loaders as opaque capability providers; this module
//! ships an in-memory synthetic source (demos, tests) and a filesystem
//! OME-Zarr reader for uncompressed stores. Codec support stays external.

pub mod memory;
pub mod zarr;

use ndarray::Array2;
use serde_json::Value;

use crate::appearance::ChannelDefaults;
use crate::consts::{DEFAULT_CONTRAST_WINDOW, FALLBACK_COLORS};
use crate::error::{AtlasError, Result};
use crate::view::ViewState;

/// Plane selection within a (t, c, z, y, x) hyperstack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub t: usize,
    pub c: usize,
    pub z: usize,
}

/// One resolution level of the pyramid.
pub trait RasterLevel: Send + Sync {
    /// Plane width in pixels at this level.
    fn width(&self) -> usize;

    /// Plane height in pixels at this level.
    fn height(&self) -> usize;

    /// Read the y-x plane for the given selection as f32 intensities.
    fn raster(&self, selection: Selection) -> Result<Array2<f32>>;
}

/// Channel defaults recovered from embedded metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelMeta {
    pub label: String,
    pub color: [u8; 3],
    pub visible: bool,
    pub window: [f32; 2],
}

/// A loaded multi-resolution image: pyramid levels (highest resolution first),
/// channel metadata, and the raw metadata document for scale extraction.
pub struct LoadedImage {
    pub levels: Vec<Box<dyn RasterLevel>>,
    pub channels: Vec<ChannelMeta>,
    pub metadata: Value,
    pub default_t: usize,
    pub default_z: usize,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("levels", &self.levels.len())
            .field("channels", &self.channels)
            .field("metadata", &self.metadata)
            .field("default_t", &self.default_t)
            .field("default_z", &self.default_z)
            .finish()
    }
}

impl LoadedImage {
    pub fn width(&self) -> usize {
        self.levels.first().map_or(0, |l| l.width())
    }

    pub fn height(&self) -> usize {
        self.levels.first().map_or(0, |l| l.height())
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Lowest-resolution level, used for cheap whole-image sampling.
    pub fn lowest_level(&self) -> Option<&dyn RasterLevel> {
        self.levels.last().map(AsRef::as_ref)
    }

    /// Default selection for a channel, honoring omero rdefs.
    pub fn selection(&self, channel: usize) -> Selection {
        Selection { t: self.default_t, c: channel, z: self.default_z }
    }

    /// Compute the view that frames the whole image within `canvas` (width,
    /// height in screen pixels): centered target, zoom fitting the larger
    /// image dimension.
    pub fn fit_view(&self, canvas: [f32; 2]) -> ViewState {
        let w = self.width().max(1) as f32;
        let h = self.height().max(1) as f32;
        let zoom = (canvas[0] / w).min(canvas[1] / h).max(f32::MIN_POSITIVE).log2();
        ViewState::new(zoom, [w / 2.0, h / 2.0, 0.0])
    }

    /// Per-channel appearance defaults for the appearance state manager.
    pub fn channel_defaults(&self) -> ChannelDefaults {
        ChannelDefaults {
            visible: self.channels.iter().map(|c| c.visible).collect(),
            colors: self.channels.iter().map(|c| c.color).collect(),
            contrast_limits: self.channels.iter().map(|c| c.window).collect(),
        }
    }
}

/// Loader capability: resolve a source identifier into a loaded image.
/// Failures surface as a textual reason via [`AtlasError`].
pub trait ImageLoader: Send {
    fn load(&self, source: &str) -> Result<LoadedImage>;
}

/// Loader that dispatches on the source scheme: `demo://` goes to the
/// synthetic in-memory source, everything else is treated as a filesystem
/// OME-Zarr store path.
#[derive(Default)]
pub struct DefaultLoader;

impl ImageLoader for DefaultLoader {
    fn load(&self, source: &str) -> Result<LoadedImage> {
        if source.is_empty() {
            return Err(AtlasError::UnknownSource(String::new()));
        }
        if let Some(name) = source.strip_prefix("demo://") {
            return memory::synthetic_image(name);
        }
        zarr::open_store(std::path::Path::new(source))
    }
}

/// Derive per-channel metadata from an omero-style metadata document,
/// falling back per field when entries are absent or malformed.
pub fn channels_from_metadata(metadata: &Value, num_channels: usize) -> Vec<ChannelMeta> {
    let omero_channels = metadata
        .get("omero")
        .and_then(|o| o.get("channels"))
        .and_then(Value::as_array);

    (0..num_channels)
        .map(|i| {
            let ch = omero_channels.and_then(|c| c.get(i));
            ChannelMeta {
                label: ch
                    .and_then(|c| c.get("label"))
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("Channel {i}"), str::to_string),
                color: ch
                    .and_then(|c| c.get("color"))
                    .and_then(Value::as_str)
                    .and_then(hex_to_rgb)
                    .unwrap_or(FALLBACK_COLORS[i % FALLBACK_COLORS.len()]),
                visible: ch
                    .and_then(|c| c.get("channelsVisible").or_else(|| c.get("active")))
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
                window: ch
                    .and_then(|c| c.get("window"))
                    .and_then(parse_window)
                    .unwrap_or(DEFAULT_CONTRAST_WINDOW),
            }
        })
        .collect()
}

/// Default t/z plane indices from omero rdefs; 0 when absent.
pub fn default_planes(metadata: &Value) -> (usize, usize) {
    let rdefs = metadata.get("omero").and_then(|o| o.get("rdefs"));
    let get = |key: &str| {
        rdefs
            .and_then(|r| r.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize
    };
    (get("defaultT"), get("defaultZ"))
}

fn parse_window(window: &Value) -> Option<[f32; 2]> {
    let start = window.get("start")?.as_f64()?;
    let end = window.get("end")?.as_f64()?;
    Some([start as f32, end as f32])
}

/// Parse a `#rrggbb` / `rrggbb` hex color.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let n = u32::from_str_radix(hex, 16).ok()?;
    Some([(n >> 16) as u8, (n >> 8) as u8, n as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_rgb("#ff8000"), Some([255, 128, 0]));
        assert_eq!(hex_to_rgb("00FF00"), Some([0, 255, 0]));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("zzzzzz"), None);
    }

    #[test]
    fn channels_fall_back_without_omero() {
        let channels = channels_from_metadata(&serde_json::json!({}), 2);
        assert_eq!(channels[0].label, "Channel 0");
        assert_eq!(channels[0].color, FALLBACK_COLORS[0]);
        assert!(channels[1].visible);
        assert_eq!(channels[1].window, DEFAULT_CONTRAST_WINDOW);
    }
}
