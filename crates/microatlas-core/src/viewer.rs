//! The viewer orchestrator: single owner of load phase, view-state, and
//! per-channel appearance state.
//!
//! Load-phase machine: `Unloaded -> Loading -> Loaded | Failed`, with the
//! initial view resolved once the canvas reports a non-zero size. Asynchronous
//! results (load completion, histograms) are tagged with the generation they
//! were requested under; a source change bumps the generation so stale results
//! can never overwrite newer state.
//!
//! Outward notification goes through at most one subscriber per concern
//! (view-state, appearance), fires at most once per logical change, and never
//! fires from teardown: `Drop` runs no callbacks.

use std::time::Instant;

use crate::appearance::AppearanceState;
use crate::config::{BlendMode, SavedView, SavedViewAppearance, ViewerConfig};
use crate::histogram::ChannelHistogram;
use crate::hover;
use crate::loader::{LoadedImage, Selection};
use crate::navigation::NavigationController;
use crate::scale::{extract_physical_scale, PhysicalScale};
use crate::view::{NavDestination, ViewState};

/// Where the orchestrator is in the load lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Unloaded,
    Loading,
    Loaded,
    Failed(String),
}

/// Read-only per-channel projection for the appearance panel: metadata
/// defaults combined with user overrides. Never the source of truth.
#[derive(Clone, Debug)]
pub struct ChannelInfo {
    pub label: String,
    pub color: [u8; 3],
    pub visible: bool,
    pub histogram: Option<ChannelHistogram>,
    pub contrast_limits: [f32; 2],
}

/// Declarative description handed to the compositing layer each rebuild.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerParams {
    /// Pyramid level to composite, chosen from the current zoom.
    pub level: usize,
    pub selections: Vec<Selection>,
    pub channels_visible: Vec<bool>,
    pub colors: Vec<[u8; 3]>,
    pub contrast_limits: Vec<[f32; 2]>,
    pub blend_mode: BlendMode,
    pub colormap: String,
}

/// Pick the pyramid level whose resolution best matches the current zoom:
/// at zoom 0 one image pixel is one screen pixel, so each halving of scale
/// steps one level down.
pub fn select_level(zoom: f32, num_levels: usize) -> usize {
    if num_levels == 0 {
        return 0;
    }
    let level = (-zoom).floor().max(0.0) as usize;
    level.min(num_levels - 1)
}

type ViewStateListener = Box<dyn FnMut(&ViewState)>;
type AppearanceListener = Box<dyn FnMut(&SavedViewAppearance)>;

pub struct Viewer {
    config: ViewerConfig,
    phase: LoadPhase,
    generation: u64,
    image: Option<LoadedImage>,
    view_state: Option<ViewState>,
    fit_view: Option<SavedView>,
    appearance: AppearanceState,
    histograms: Vec<Option<ChannelHistogram>>,
    physical_scale: Option<PhysicalScale>,
    navigation: NavigationController,
    annotations_visible: bool,
    scale_bar_visible: bool,
    title_visible: bool,
    /// Bumped on anything the compositor must react to; part of its cache key.
    layer_revision: u64,
    on_view_state: Option<ViewStateListener>,
    on_appearance: Option<AppearanceListener>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            annotations_visible: config.default_annotations_visible,
            scale_bar_visible: config.default_scale_bar_visible,
            title_visible: config.default_title_visible,
            config,
            phase: LoadPhase::Unloaded,
            generation: 0,
            image: None,
            view_state: None,
            fit_view: None,
            appearance: AppearanceState::new(),
            histograms: Vec::new(),
            physical_scale: None,
            navigation: NavigationController::new(),
            layer_revision: 0,
            on_view_state: None,
            on_appearance: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_view_state_listener(&mut self, listener: impl FnMut(&ViewState) + 'static) {
        self.on_view_state = Some(Box::new(listener));
    }

    pub fn set_appearance_listener(
        &mut self,
        listener: impl FnMut(&SavedViewAppearance) + 'static,
    ) {
        self.on_appearance = Some(Box::new(listener));
    }

    // ---- load lifecycle -------------------------------------------------

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Enter `Loading`, discarding all state tied to the previous source.
    /// Returns the generation to tag asynchronous work with.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        self.image = None;
        self.view_state = None;
        self.fit_view = None;
        self.histograms = Vec::new();
        self.physical_scale = None;
        self.navigation.cancel();
        self.layer_revision += 1;
        tracing::debug!(source = %self.config.source, generation = self.generation, "load started");
        self.generation
    }

    /// Change the source and restart the load machine.
    pub fn set_source(&mut self, source: impl Into<String>) -> u64 {
        self.config.source = source.into();
        self.begin_load()
    }

    /// Apply a load result. Results from a superseded generation are dropped.
    pub fn finish_load(&mut self, generation: u64, result: Result<LoadedImage, String>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale load result dropped");
            return;
        }
        match result {
            Ok(image) => {
                self.appearance.reset(image.channel_defaults());
                self.physical_scale = extract_physical_scale(&image.metadata);
                self.image = Some(image);
                self.phase = LoadPhase::Loaded;
                self.layer_revision += 1;
                self.notify_appearance();
            }
            Err(message) => {
                tracing::warn!(source = %self.config.source, %message, "load failed");
                self.image = None;
                self.phase = LoadPhase::Failed(message);
            }
        }
    }

    /// Install histograms computed for `generation`; stale results are dropped.
    pub fn set_histograms(&mut self, generation: u64, histograms: Vec<Option<ChannelHistogram>>) {
        if generation != self.generation {
            return;
        }
        self.histograms = histograms;
    }

    // ---- initial view resolution ----------------------------------------

    /// Resolve the initial view once the canvas has a real size. Called every
    /// frame; a no-op unless loaded, unresolved, and `canvas` is non-zero.
    ///
    /// The first saved view marked `default: true` (in list order) supplies
    /// zoom/target over the fit view and has its appearance patch applied;
    /// otherwise the fit view is used unmodified.
    pub fn ensure_initial_view(&mut self, canvas: [f32; 2]) -> bool {
        if self.phase != LoadPhase::Loaded
            || self.view_state.is_some()
            || canvas[0] <= 0.0
            || canvas[1] <= 0.0
        {
            return false;
        }
        let Some(image) = &self.image else { return false };

        let fit = image.fit_view(canvas);
        self.fit_view = Some(SavedView {
            name: "Fit to viewer".to_string(),
            description: Some("Reset zoom and center".to_string()),
            zoom: fit.zoom,
            target: fit.target,
            appearance: None,
            default: false,
        });

        let initial = self.config.default_view().cloned();
        let view_state = match &initial {
            Some(view) => ViewState::new(view.zoom, view.target),
            None => fit,
        };
        self.write_view_state(view_state);
        if let Some(patch) = initial.and_then(|v| v.appearance) {
            self.apply_appearance(&patch);
        }
        true
    }

    /// The synthetic fit entry, available once the initial view resolved.
    pub fn fit_view(&self) -> Option<&SavedView> {
        self.fit_view.as_ref()
    }

    pub fn fit_destination(&self) -> Option<NavDestination> {
        self.fit_view.as_ref().map(NavDestination::from)
    }

    /// Menu view list: the synthetic fit entry first, then all supplied views.
    pub fn menu_views(&self) -> Vec<SavedView> {
        let mut views = Vec::with_capacity(1 + self.config.views.len());
        views.extend(self.fit_view.iter().cloned());
        views.extend(self.config.views.iter().cloned());
        views
    }

    // ---- camera ---------------------------------------------------------

    pub fn view_state(&self) -> Option<&ViewState> {
        self.view_state.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.navigation.is_animating()
    }

    /// Begin an animated transition (or apply immediately when no view-state
    /// exists yet). Supersedes any transition already in flight.
    pub fn navigate_to(&mut self, dest: NavDestination, now: Instant) {
        if let Some(applied) = self.navigation.navigate_to(self.view_state, dest, now) {
            self.write_view_state(applied);
        }
    }

    /// Select a saved view: fly to it and apply its appearance patch, if any.
    pub fn select_view(&mut self, view: &SavedView, now: Instant) {
        self.navigate_to(NavDestination::from(view), now);
        if let Some(patch) = &view.appearance {
            let patch = patch.clone();
            self.apply_appearance(&patch);
        }
    }

    /// Advance any in-flight camera animation. Returns true when the view
    /// changed this tick (the caller should request another frame).
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.navigation.tick(now) {
            Some(next) => {
                self.write_view_state(next);
                true
            }
            None => false,
        }
    }

    /// Direct user interaction (drag/scroll) takes the camera over and cancels
    /// any programmatic animation.
    pub fn set_user_view_state(&mut self, view_state: ViewState) {
        self.navigation.cancel();
        self.write_view_state(view_state);
    }

    fn write_view_state(&mut self, view_state: ViewState) {
        if self.view_state == Some(view_state) {
            return;
        }
        self.view_state = Some(view_state);
        if let Some(listener) = &mut self.on_view_state {
            listener(&view_state);
        }
    }

    // ---- appearance -----------------------------------------------------

    pub fn blend_mode(&self) -> BlendMode {
        self.appearance.blend_mode()
    }

    pub fn colormap(&self) -> &str {
        self.appearance.colormap()
    }

    pub fn toggle_channel(&mut self, index: usize) {
        let changed = self.appearance.toggle_channel(index);
        self.after_appearance_change(changed);
    }

    pub fn set_channel_color(&mut self, index: usize, color: [u8; 3]) {
        let changed = self.appearance.set_channel_color(index, color);
        self.after_appearance_change(changed);
    }

    pub fn set_contrast_limits(&mut self, index: usize, limits: [f32; 2]) {
        let changed = self.appearance.set_contrast_limits(index, limits);
        self.after_appearance_change(changed);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        let changed = self.appearance.set_blend_mode(mode);
        self.after_appearance_change(changed);
    }

    pub fn set_colormap(&mut self, colormap: &str) {
        let changed = self.appearance.set_colormap(colormap);
        self.after_appearance_change(changed);
    }

    pub fn apply_appearance(&mut self, patch: &SavedViewAppearance) {
        let changed = self.appearance.apply(patch);
        self.after_appearance_change(changed);
    }

    pub fn appearance_snapshot(&self) -> SavedViewAppearance {
        self.appearance.snapshot()
    }

    fn after_appearance_change(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.layer_revision += 1;
        self.notify_appearance();
    }

    fn notify_appearance(&mut self) {
        // Not before a channel count has been established.
        if self.appearance.channel_count() == 0 {
            return;
        }
        if let Some(listener) = &mut self.on_appearance {
            let snapshot = self.appearance.snapshot();
            listener(&snapshot);
        }
    }

    // ---- overlay state --------------------------------------------------

    pub fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
    }

    pub fn physical_scale(&self) -> Option<&PhysicalScale> {
        self.physical_scale.as_ref()
    }

    /// Scale bar requires both a derived physical scale and a supplied config.
    pub fn has_scale_bar(&self) -> bool {
        self.physical_scale.is_some() && self.config.scale_bar.is_some()
    }

    pub fn scale_bar_visible(&self) -> bool {
        self.scale_bar_visible && self.has_scale_bar()
    }

    pub fn set_scale_bar_visible(&mut self, visible: bool) {
        self.scale_bar_visible = visible;
    }

    pub fn title_visible(&self) -> bool {
        self.title_visible && self.config.title.is_some()
    }

    pub fn set_title_visible(&mut self, visible: bool) {
        self.title_visible = visible;
    }

    /// Hovered annotation under `pointer`, or `None` while the layer is hidden.
    pub fn hovered_annotation(&self, pointer: [f32; 2], container: [f32; 2]) -> Option<usize> {
        if !self.annotations_visible {
            return None;
        }
        let view = self.view_state.as_ref()?;
        hover::hover_annotation(&self.config.annotations, view, pointer, container)
    }

    // ---- render projections ---------------------------------------------

    /// Cache key for the compositor: changes whenever the layer must rebuild.
    pub fn layer_revision(&self) -> u64 {
        self.layer_revision
    }

    pub fn channel_infos(&self) -> Vec<ChannelInfo> {
        let Some(image) = &self.image else { return Vec::new() };
        let visible = self.appearance.channels_visible();
        let colors = self.appearance.channel_colors();
        let limits = self.appearance.contrast_limits();

        (0..image.num_channels())
            .map(|i| ChannelInfo {
                label: image.channels[i].label.clone(),
                color: colors[i],
                visible: visible[i],
                histogram: self.histograms.get(i).cloned().flatten(),
                contrast_limits: limits[i],
            })
            .collect()
    }

    /// Layer description for the current frame, or `None` before load/view
    /// resolution.
    pub fn layer_params(&self) -> Option<LayerParams> {
        let image = self.image.as_ref()?;
        let view = self.view_state.as_ref()?;
        let level = select_level(view.zoom, image.levels.len());
        Some(LayerParams {
            level,
            selections: (0..image.num_channels()).map(|c| image.selection(c)).collect(),
            channels_visible: self.appearance.channels_visible(),
            colors: self.appearance.channel_colors(),
            contrast_limits: self.appearance.contrast_limits(),
            blend_mode: self.appearance.blend_mode(),
            colormap: self.appearance.colormap().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_selection_tracks_zoom() {
        assert_eq!(select_level(0.0, 3), 0);
        assert_eq!(select_level(1.5, 3), 0);
        assert_eq!(select_level(-0.5, 3), 0);
        assert_eq!(select_level(-1.0, 3), 1);
        assert_eq!(select_level(-2.7, 3), 2);
        assert_eq!(select_level(-9.0, 3), 2);
    }
}
