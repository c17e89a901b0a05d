use microatlas_core::config::{
    BlendMode, CornerPosition, TitlePosition, TitleStyle, ViewerConfig,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Wire-format parsing
// ---------------------------------------------------------------------------

#[test]
fn test_minimal_config_gets_defaults() {
    let config: ViewerConfig = serde_json::from_value(json!({ "source": "demo://cells" })).unwrap();
    assert_eq!(config.source, "demo://cells");
    assert!(config.views.is_empty());
    assert!(config.annotations.is_empty());
    assert!(config.scale_bar.is_none());
    assert!(config.title.is_none());
    assert!(config.default_annotations_visible);
    assert!(config.default_scale_bar_visible);
    assert!(config.default_title_visible);
}

#[test]
fn test_scale_bar_false_parses_as_none() {
    let config: ViewerConfig =
        serde_json::from_value(json!({ "source": "s", "scaleBar": false, "title": false })).unwrap();
    assert!(config.scale_bar.is_none());
    assert!(config.title.is_none());
}

#[test]
fn test_scale_bar_object_parses_with_defaults() {
    let config: ViewerConfig = serde_json::from_value(json!({
        "source": "s",
        "scaleBar": { "maxWidth": 120.0, "position": "top-left" },
    }))
    .unwrap();
    let bar = config.scale_bar.unwrap();
    assert_eq!(bar.max_width(), 120.0);
    assert_eq!(bar.position(), CornerPosition::TopLeft);

    let bare: ViewerConfig =
        serde_json::from_value(json!({ "source": "s", "scaleBar": {} })).unwrap();
    let bar = bare.scale_bar.unwrap();
    assert_eq!(bar.max_width(), 100.0);
    assert_eq!(bar.position(), CornerPosition::BottomRight);
}

#[test]
fn test_title_defaults() {
    let config: ViewerConfig = serde_json::from_value(json!({
        "source": "s",
        "title": { "text": "Hello" },
    }))
    .unwrap();
    let title = config.title.unwrap();
    assert_eq!(title.text, "Hello");
    assert_eq!(title.position, TitlePosition::TopCenter);
    assert_eq!(title.margin, 12.0);
    assert_eq!(title.font_size, 14.0);
    assert_eq!(title.style, TitleStyle::Text);
}

#[test]
fn test_saved_view_parses_camel_case_appearance() {
    let config: ViewerConfig = serde_json::from_value(json!({
        "source": "s",
        "views": [{
            "name": "overview",
            "zoom": -2.0,
            "target": [100.0, 200.0, 0.0],
            "default": true,
            "appearance": {
                "channelsVisible": [true, false],
                "blendMode": "merged",
                "contrastLimits": [[0.0, 100.0], [5.0, 50.0]],
            },
        }],
    }))
    .unwrap();

    let view = &config.views[0];
    assert!(view.default);
    let appearance = view.appearance.as_ref().unwrap();
    assert_eq!(appearance.channels_visible, Some(vec![true, false]));
    assert_eq!(appearance.blend_mode, Some(BlendMode::Merged));
    assert_eq!(appearance.channel_colors, None);
}

#[test]
fn test_default_view_is_first_marked() {
    let config: ViewerConfig = serde_json::from_value(json!({
        "source": "s",
        "views": [
            { "name": "a", "zoom": 0.0, "target": [0.0, 0.0, 0.0] },
            { "name": "b", "zoom": 1.0, "target": [0.0, 0.0, 0.0], "default": true },
            { "name": "c", "zoom": 2.0, "target": [0.0, 0.0, 0.0], "default": true },
        ],
    }))
    .unwrap();
    assert_eq!(config.default_view().unwrap().name, "b");
}

// ---------------------------------------------------------------------------
// TOML authoring form
// ---------------------------------------------------------------------------

#[test]
fn test_config_parses_from_toml() {
    let config: ViewerConfig = toml::from_str(
        r#"
        source = "demo://cells"
        defaultScaleBarVisible = false

        [[views]]
        name = "overview"
        zoom = -1.5
        target = [256.0, 256.0, 0.0]
        default = true

        [[annotations]]
        name = "nucleus"
        target = [120.0, 80.0]

        [scaleBar]
        maxWidth = 80.0
        position = "bottom-left"
        "#,
    )
    .unwrap();

    assert_eq!(config.source, "demo://cells");
    assert!(!config.default_scale_bar_visible);
    assert_eq!(config.views[0].name, "overview");
    assert_eq!(config.annotations[0].target, [120.0, 80.0]);
    assert_eq!(config.scale_bar.unwrap().position(), CornerPosition::BottomLeft);
}
