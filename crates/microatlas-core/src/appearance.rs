//! Per-channel appearance state: visibility, color, and contrast overrides
//! layered over metadata-derived defaults, plus the global blend mode and
//! colormap.
//!
//! Overrides live in separate per-field vectors so a partial update never
//! reconstructs the whole channel array. Every mutator reports whether it
//! changed anything so the owner can emit at most one notification per logical
//! change.

use crate::config::{BlendMode, SavedViewAppearance};

/// Defaults derived from the image's embedded channel metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelDefaults {
    pub visible: Vec<bool>,
    pub colors: Vec<[u8; 3]>,
    pub contrast_limits: Vec<[f32; 2]>,
}

impl ChannelDefaults {
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[derive(Default)]
pub struct AppearanceState {
    defaults: ChannelDefaults,
    visible: Option<Vec<bool>>,
    colors: Option<Vec<[u8; 3]>>,
    contrast_limits: Option<Vec<[f32; 2]>>,
    blend_mode: BlendMode,
    colormap: String,
}

impl AppearanceState {
    pub fn new() -> Self {
        Self {
            defaults: ChannelDefaults::default(),
            visible: None,
            colors: None,
            contrast_limits: None,
            blend_mode: BlendMode::Single,
            colormap: "viridis".to_string(),
        }
    }

    /// Install metadata-derived defaults for a freshly loaded image and drop
    /// all prior overrides.
    pub fn reset(&mut self, defaults: ChannelDefaults) {
        self.defaults = defaults;
        self.visible = None;
        self.colors = None;
        self.contrast_limits = None;
    }

    /// Number of channels; 0 until image metadata has loaded.
    pub fn channel_count(&self) -> usize {
        self.defaults.len()
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn colormap(&self) -> &str {
        &self.colormap
    }

    /// Effective visibility per channel (overrides over defaults).
    pub fn channels_visible(&self) -> Vec<bool> {
        self.effective(&self.visible, &self.defaults.visible)
    }

    pub fn channel_colors(&self) -> Vec<[u8; 3]> {
        self.effective(&self.colors, &self.defaults.colors)
    }

    pub fn contrast_limits(&self) -> Vec<[f32; 2]> {
        self.effective(&self.contrast_limits, &self.defaults.contrast_limits)
    }

    fn effective<T: Clone>(&self, overrides: &Option<Vec<T>>, defaults: &[T]) -> Vec<T> {
        match overrides {
            Some(v) if v.len() == defaults.len() => v.clone(),
            _ => defaults.to_vec(),
        }
    }

    /// Flip a channel's visibility. Out-of-range indices are a no-op.
    pub fn toggle_channel(&mut self, index: usize) -> bool {
        if index >= self.channel_count() {
            return false;
        }
        let mut visible = self.channels_visible();
        visible[index] = !visible[index];
        self.visible = Some(visible);
        true
    }

    pub fn set_channel_color(&mut self, index: usize, color: [u8; 3]) -> bool {
        if index >= self.channel_count() {
            return false;
        }
        let mut colors = self.channel_colors();
        if colors[index] == color {
            return false;
        }
        colors[index] = color;
        self.colors = Some(colors);
        true
    }

    /// Set a channel's contrast window. The low bound is clamped to stay at
    /// least one unit below the high bound; inverted input is repaired rather
    /// than rejected.
    pub fn set_contrast_limits(&mut self, index: usize, limits: [f32; 2]) -> bool {
        if index >= self.channel_count() {
            return false;
        }
        let limits = clamp_limits(limits);
        let mut all = self.contrast_limits();
        if all[index] == limits {
            return false;
        }
        all[index] = limits;
        self.contrast_limits = Some(all);
        true
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) -> bool {
        if self.blend_mode == mode {
            return false;
        }
        self.blend_mode = mode;
        true
    }

    pub fn set_colormap(&mut self, colormap: &str) -> bool {
        if self.colormap == colormap {
            return false;
        }
        self.colormap = colormap.to_string();
        true
    }

    /// Merge the present fields of a saved-view appearance patch into state.
    /// Absent fields are left untouched. This is the only path through which a
    /// saved view's appearance reaches live state.
    pub fn apply(&mut self, patch: &SavedViewAppearance) -> bool {
        let mut changed = false;
        if let Some(visible) = &patch.channels_visible {
            changed |= self.visible.as_ref() != Some(visible);
            self.visible = Some(visible.clone());
        }
        if let Some(colors) = &patch.channel_colors {
            changed |= self.colors.as_ref() != Some(colors);
            self.colors = Some(colors.clone());
        }
        if let Some(limits) = &patch.contrast_limits {
            let clamped: Vec<[f32; 2]> = limits.iter().map(|&l| clamp_limits(l)).collect();
            changed |= self.contrast_limits.as_ref() != Some(&clamped);
            self.contrast_limits = Some(clamped);
        }
        if let Some(mode) = patch.blend_mode {
            changed |= self.set_blend_mode(mode);
        }
        if let Some(colormap) = &patch.colormap {
            changed |= self.set_colormap(colormap);
        }
        changed
    }

    /// Full appearance snapshot for outward notification: every field
    /// populated, with fallbacks where overrides are absent.
    pub fn snapshot(&self) -> SavedViewAppearance {
        SavedViewAppearance {
            channels_visible: Some(self.channels_visible()),
            channel_colors: Some(self.channel_colors()),
            contrast_limits: Some(self.contrast_limits()),
            blend_mode: Some(self.blend_mode),
            colormap: Some(self.colormap.clone()),
        }
    }
}

fn clamp_limits(limits: [f32; 2]) -> [f32; 2] {
    let [lo, hi] = limits;
    [lo.min(hi - 1.0), hi]
}
