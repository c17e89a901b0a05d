/// Active tab of the overlay menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuTab {
    Views,
    Appearance,
    Info,
}

/// Overlay menu open/closed state plus the active tab.
pub struct OverlayMenuState {
    pub open: bool,
    pub tab: MenuTab,
}

impl Default for OverlayMenuState {
    fn default() -> Self {
        Self { open: false, tab: MenuTab::Views }
    }
}

/// Overall UI state not owned by the core orchestrator.
#[derive(Default)]
pub struct UIState {
    pub menu: OverlayMenuState,
    /// Annotation index currently under the pointer.
    pub hovered_annotation: Option<usize>,
    /// Channel whose color picker window is open.
    pub color_picker_channel: Option<usize>,
}

/// Viewport display state: the composited texture and its cache key.
#[derive(Default)]
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// (generation, layer revision, pyramid level) the texture was built for.
    pub texture_key: Option<(u64, u64, usize)>,
}
