//! Widget configuration model: the contract between the builder/embed side and
//! the viewer. Serializes to the camelCase JSON carried in embed blocks.

use serde::{Deserialize, Deserializer, Serialize};

/// How visible channels are combined on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Additive colormap combination across visible channels.
    Merged,
    /// Palette-colored, per-channel tint.
    Single,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Single
    }
}

/// Partial appearance snapshot attached to a saved view. Only present fields
/// are applied; absent fields leave current state untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedViewAppearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels_visible: Option<Vec<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_colors: Option<Vec<[u8; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast_limits: Option<Vec<[f32; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colormap: Option<String>,
}

/// A named, reusable camera position with an optional appearance snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub zoom: f32,
    pub target: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<SavedViewAppearance>,
    /// At most one view in a set should carry this; the first marked view wins.
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
}

/// Point marker in image pixel space.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    pub target: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl CornerPosition {
    pub fn is_bottom(self) -> bool {
        matches!(self, CornerPosition::BottomRight | CornerPosition::BottomLeft)
    }

    pub fn is_right(self) -> bool {
        matches!(self, CornerPosition::BottomRight | CornerPosition::TopRight)
    }
}

/// Scale-bar overlay configuration. The physical pixel size itself is derived
/// from image metadata, never from this config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBarConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<CornerPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

impl ScaleBarConfig {
    pub fn max_width(&self) -> f32 {
        self.max_width.unwrap_or(crate::consts::SCALE_BAR_DEFAULT_MAX_WIDTH)
    }

    pub fn position(&self) -> CornerPosition {
        self.position.unwrap_or(CornerPosition::BottomRight)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitlePosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleStyle {
    Text,
    Pill,
}

/// Title overlay configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleConfig {
    pub text: String,
    #[serde(default = "TitleConfig::default_position")]
    pub position: TitlePosition,
    #[serde(default = "TitleConfig::default_margin")]
    pub margin: f32,
    #[serde(default = "TitleConfig::default_font_size")]
    pub font_size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
    #[serde(default = "TitleConfig::default_style")]
    pub style: TitleStyle,
}

impl TitleConfig {
    fn default_position() -> TitlePosition {
        TitlePosition::TopCenter
    }

    fn default_margin() -> f32 {
        12.0
    }

    fn default_font_size() -> f32 {
        14.0
    }

    fn default_style() -> TitleStyle {
        TitleStyle::Text
    }
}

/// The full viewer props contract.
///
/// `scaleBar` and `title` accept `false` on the wire (builder shorthand for
/// "explicitly off"); both deserialize to `None`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<SavedView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(
        default,
        deserialize_with = "falsy_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale_bar: Option<ScaleBarConfig>,
    #[serde(
        default,
        deserialize_with = "falsy_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<TitleConfig>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub default_annotations_visible: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub default_scale_bar_visible: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub default_title_visible: bool,
}

impl ViewerConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            views: Vec::new(),
            annotations: Vec::new(),
            scale_bar: None,
            title: None,
            default_annotations_visible: true,
            default_scale_bar_visible: true,
            default_title_visible: true,
        }
    }

    /// First view marked `default: true`, in list order.
    pub fn default_view(&self) -> Option<&SavedView> {
        self.views.iter().find(|v| v.default)
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_true(v: &bool) -> bool {
    *v
}

fn default_true() -> bool {
    true
}

/// Accepts `T`, `false`, or `null`; `false` and `null` both become `None`.
fn falsy_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Falsy<T> {
        Off(bool),
        On(T),
    }

    match Option::<Falsy<T>>::deserialize(deserializer)? {
        None | Some(Falsy::Off(_)) => Ok(None),
        Some(Falsy::On(v)) => Ok(Some(v)),
    }
}
