//! Embed block generation: renders a widget config as the fenced directive
//! consumed by document pipelines.
//!
//! The block is the widget bundle URL on the fence line followed by the JSON
//! config. Field presence follows the wire contract in [`crate::config`]: a
//! view's `default` flag is emitted only when true, the `default*Visible`
//! flags only when false, and empty view/annotation lists not at all.

use serde::Serialize;

use crate::config::{Annotation, SavedView, ScaleBarConfig, TitleConfig, ViewerConfig};
use crate::error::Result;

/// Published widget bundle, referenced when no explicit URL is supplied.
pub const DEFAULT_WIDGET_URL: &str = "https://cdn.microatlas.dev/widget/latest/bundle.js";

/// Rendering options for one embed block.
#[derive(Clone, Debug)]
pub struct EmbedOptions {
    pub widget_url: String,
    /// Embedded viewport size in CSS pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            widget_url: DEFAULT_WIDGET_URL.to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Wire form of the embed JSON: the viewer config plus px-suffixed dimensions.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedBody<'a> {
    source: &'a str,
    width: String,
    height: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a TitleConfig>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    views: &'a [SavedView],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    annotations: &'a [Annotation],
    #[serde(skip_serializing_if = "Option::is_none")]
    scale_bar: Option<&'a ScaleBarConfig>,
    #[serde(skip_serializing_if = "is_true")]
    default_annotations_visible: bool,
    #[serde(skip_serializing_if = "is_true")]
    default_scale_bar_visible: bool,
    #[serde(skip_serializing_if = "is_true")]
    default_title_visible: bool,
}

fn is_true(v: &bool) -> bool {
    *v
}

/// Render the fenced embed block for `config`.
pub fn render_embed(config: &ViewerConfig, options: &EmbedOptions) -> Result<String> {
    let body = EmbedBody {
        source: &config.source,
        width: format!("{}px", options.width),
        height: format!("{}px", options.height),
        title: config.title.as_ref(),
        views: &config.views,
        annotations: &config.annotations,
        scale_bar: config.scale_bar.as_ref(),
        default_annotations_visible: config.default_annotations_visible,
        default_scale_bar_visible: config.default_scale_bar_visible,
        default_title_visible: config.default_title_visible,
    };
    let json = serde_json::to_string_pretty(&body)?;
    Ok(format!(":::{{any:bundle}} {}\n{json}\n:::\n", options.widget_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_block_has_only_required_fields() {
        let config = ViewerConfig::new("demo://cells");
        let block = render_embed(&config, &EmbedOptions::default()).unwrap();

        assert!(block.starts_with(":::{any:bundle} https://"));
        assert!(block.ends_with("\n:::\n"));
        assert!(block.contains("\"width\": \"800px\""));
        assert!(block.contains("\"height\": \"600px\""));
        assert!(!block.contains("views"));
        assert!(!block.contains("defaultAnnotationsVisible"));
    }

    #[test]
    fn falsy_visibility_flags_are_emitted() {
        let mut config = ViewerConfig::new("demo://cells");
        config.default_scale_bar_visible = false;
        let block = render_embed(&config, &EmbedOptions::default()).unwrap();

        assert!(block.contains("\"defaultScaleBarVisible\": false"));
        assert!(!block.contains("defaultTitleVisible"));
    }
}
