//! Filesystem OME-Zarr store reader.
//!
//! Reads multiscale metadata from `.zattrs` and raw little-endian chunk files
//! per level. Only uncompressed stores (`compressor: null`, C order) are
//! handled here; compressed stores need an external codec-capable loader and
//! fail with a clear error.

use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array2;
use serde_json::Value;

use crate::error::{AtlasError, Result};
use crate::loader::{channels_from_metadata, default_planes, LoadedImage, RasterLevel, Selection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dtype {
    U8,
    U16,
    F32,
}

impl Dtype {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "|u1" | "u1" => Ok(Dtype::U8),
            "<u2" | "u2" => Ok(Dtype::U16),
            "<f4" | "f4" => Ok(Dtype::F32),
            other => Err(AtlasError::UnsupportedDtype(other.to_string())),
        }
    }

    fn size(self) -> usize {
        match self {
            Dtype::U8 => 1,
            Dtype::U16 => 2,
            Dtype::F32 => 4,
        }
    }

    fn read(self, bytes: &[u8], index: usize) -> f32 {
        match self {
            Dtype::U8 => f32::from(bytes[index]),
            Dtype::U16 => f32::from(LittleEndian::read_u16(&bytes[index * 2..])),
            Dtype::F32 => LittleEndian::read_f32(&bytes[index * 4..]),
        }
    }
}

/// Parsed `.zarray` plus the directory holding the chunk files.
struct ZarrArray {
    dir: PathBuf,
    shape: Vec<usize>,
    chunks: Vec<usize>,
    dtype: Dtype,
    fill_value: f32,
    separator: String,
}

impl ZarrArray {
    fn open(dir: &Path) -> Result<Self> {
        let meta_path = dir.join(".zarray");
        let raw = fs::read_to_string(&meta_path).map_err(|e| {
            AtlasError::InvalidStore(format!("{}: {e}", meta_path.display()))
        })?;
        let meta: Value = serde_json::from_str(&raw)?;

        let shape = usize_list(&meta, "shape")?;
        let chunks = usize_list(&meta, "chunks")?;
        if shape.len() != chunks.len() || shape.is_empty() {
            return Err(AtlasError::InvalidStore(format!(
                "inconsistent shape/chunks in {}",
                meta_path.display()
            )));
        }
        if shape.contains(&0) || chunks.contains(&0) {
            return Err(AtlasError::InvalidStore(format!(
                "zero-sized shape/chunks dimension in {}",
                meta_path.display()
            )));
        }

        match meta.get("compressor") {
            None | Some(Value::Null) => {}
            Some(c) => {
                let id = c
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                return Err(AtlasError::UnsupportedCodec(id));
            }
        }
        if let Some(order) = meta.get("order").and_then(Value::as_str) {
            if order != "C" {
                return Err(AtlasError::InvalidStore(format!("unsupported order {order:?}")));
            }
        }

        let dtype = Dtype::parse(
            meta.get("dtype")
                .and_then(Value::as_str)
                .ok_or_else(|| AtlasError::InvalidStore("missing dtype".into()))?,
        )?;

        Ok(Self {
            dir: dir.to_path_buf(),
            shape,
            chunks,
            dtype,
            fill_value: meta
                .get("fill_value")
                .and_then(Value::as_f64)
                .unwrap_or(0.0) as f32,
            separator: meta
                .get("dimension_separator")
                .and_then(Value::as_str)
                .unwrap_or(".")
                .to_string(),
        })
    }

    fn chunk_path(&self, indices: &[usize]) -> PathBuf {
        let name = indices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&self.separator);
        self.dir.join(name)
    }

    /// C-order element strides within one chunk.
    fn chunk_strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.chunks.len()];
        for i in (0..self.chunks.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.chunks[i + 1];
        }
        strides
    }
}

/// Positions of the t/c/z/y/x dimensions within the array shape.
#[derive(Clone, Debug)]
struct AxisMap {
    t: Option<usize>,
    c: Option<usize>,
    z: Option<usize>,
    y: usize,
    x: usize,
}

impl AxisMap {
    fn from_names(names: &[String]) -> Result<Self> {
        let find = |n: &str| names.iter().position(|name| name == n);
        let (y, x) = match (find("y"), find("x")) {
            (Some(y), Some(x)) => (y, x),
            _ => {
                return Err(AtlasError::InvalidStore(
                    "axes must include y and x".into(),
                ))
            }
        };
        Ok(Self { t: find("t"), c: find("c"), z: find("z"), y, x })
    }
}

struct ZarrLevel {
    array: ZarrArray,
    axes: AxisMap,
}

impl RasterLevel for ZarrLevel {
    fn width(&self) -> usize {
        self.array.shape[self.axes.x]
    }

    fn height(&self) -> usize {
        self.array.shape[self.axes.y]
    }

    fn raster(&self, selection: Selection) -> Result<Array2<f32>> {
        let ndim = self.array.shape.len();
        let mut fixed = vec![0usize; ndim];
        if let Some(t) = self.axes.t {
            fixed[t] = selection.t;
        }
        if let Some(z) = self.axes.z {
            fixed[z] = selection.z;
        }
        if let Some(c) = self.axes.c {
            let total = self.array.shape[c];
            if selection.c >= total {
                return Err(AtlasError::ChannelOutOfRange { index: selection.c, total });
            }
            fixed[c] = selection.c;
        } else if selection.c > 0 {
            return Err(AtlasError::ChannelOutOfRange { index: selection.c, total: 1 });
        }
        for (dim, &idx) in fixed.iter().enumerate() {
            if idx >= self.array.shape[dim] {
                return Err(AtlasError::InvalidStore(format!(
                    "selection index {idx} out of bounds for dim {dim}"
                )));
            }
        }

        let (ay, ax) = (self.axes.y, self.axes.x);
        let (h, w) = (self.array.shape[ay], self.array.shape[ax]);
        let (cy, cx) = (self.array.chunks[ay], self.array.chunks[ax]);
        let strides = self.array.chunk_strides();
        let chunk_len: usize = self.array.chunks.iter().product();
        let mut out = Array2::from_elem((h, w), self.array.fill_value);

        let mut chunk_idx: Vec<usize> = fixed
            .iter()
            .enumerate()
            .map(|(dim, &idx)| idx / self.array.chunks[dim])
            .collect();

        // Element offset inside each chunk contributed by the fixed dims.
        let fixed_offset: usize = fixed
            .iter()
            .enumerate()
            .filter(|&(dim, _)| dim != ay && dim != ax)
            .map(|(dim, &idx)| (idx % self.array.chunks[dim]) * strides[dim])
            .sum();

        for gy in 0..h.div_ceil(cy) {
            for gx in 0..w.div_ceil(cx) {
                chunk_idx[ay] = gy;
                chunk_idx[ax] = gx;
                let path = self.array.chunk_path(&chunk_idx);
                let bytes = match fs::read(&path) {
                    Ok(b) => b,
                    // Missing chunk files read as fill_value.
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                };
                if bytes.len() < chunk_len * self.array.dtype.size() {
                    return Err(AtlasError::InvalidStore(format!(
                        "short chunk file {}",
                        path.display()
                    )));
                }

                let y0 = gy * cy;
                let x0 = gx * cx;
                for ly in 0..cy.min(h - y0) {
                    let row = fixed_offset + ly * strides[ay];
                    for lx in 0..cx.min(w - x0) {
                        out[[y0 + ly, x0 + lx]] =
                            self.array.dtype.read(&bytes, row + lx * strides[ax]);
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Open an OME-Zarr store rooted at `root`.
pub fn open_store(root: &Path) -> Result<LoadedImage> {
    let attrs_path = root.join(".zattrs");
    let raw = fs::read_to_string(&attrs_path).map_err(|e| {
        AtlasError::InvalidStore(format!("{}: {e}", attrs_path.display()))
    })?;
    let metadata: Value = serde_json::from_str(&raw)?;

    let ms = metadata
        .get("multiscales")
        .and_then(|m| m.get(0))
        .ok_or_else(|| AtlasError::InvalidStore("missing multiscales".into()))?;

    let level_paths: Vec<String> = ms
        .get("datasets")
        .and_then(Value::as_array)
        .map(|datasets| {
            datasets
                .iter()
                .filter_map(|d| d.get("path").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if level_paths.is_empty() {
        return Err(AtlasError::InvalidStore("multiscales has no datasets".into()));
    }

    let mut levels: Vec<Box<dyn RasterLevel>> = Vec::with_capacity(level_paths.len());
    let mut num_channels = 1;
    for path in &level_paths {
        let array = ZarrArray::open(&root.join(path))?;
        let names = axis_names(ms, array.shape.len());
        let axes = AxisMap::from_names(&names)?;
        if let Some(c) = axes.c {
            num_channels = array.shape[c];
        }
        levels.push(Box::new(ZarrLevel { array, axes }));
    }

    let channels = channels_from_metadata(&metadata, num_channels);
    let (default_t, default_z) = default_planes(&metadata);
    tracing::info!(
        store = %root.display(),
        levels = levels.len(),
        channels = num_channels,
        "opened zarr store"
    );

    Ok(LoadedImage { levels, channels, metadata, default_t, default_z })
}

/// Axis names from multiscale metadata; v0.4 object axes or v0.3 string axes.
/// Without axes the trailing dimensions are assumed to be (t, c, z, y, x).
fn axis_names(ms: &Value, ndim: usize) -> Vec<String> {
    let from_meta: Vec<String> = ms
        .get("axes")
        .and_then(Value::as_array)
        .map(|axes| {
            axes.iter()
                .filter_map(|a| match a {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(o) => {
                        o.get("name").and_then(Value::as_str).map(str::to_string)
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if from_meta.len() == ndim {
        from_meta
    } else {
        ["t", "c", "z", "y", "x"][5 - ndim.min(5)..]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}

fn usize_list(meta: &Value, key: &str) -> Result<Vec<usize>> {
    meta.get(key)
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_u64)
                .map(|v| v as usize)
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AtlasError::InvalidStore(format!("missing {key}")))
}
