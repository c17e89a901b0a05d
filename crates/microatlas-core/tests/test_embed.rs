use microatlas_core::config::{
    Annotation, SavedView, ScaleBarConfig, TitleConfig, TitlePosition, TitleStyle, ViewerConfig,
};
use microatlas_core::embed::{render_embed, EmbedOptions, DEFAULT_WIDGET_URL};
use serde_json::Value;

fn options(width: u32, height: u32) -> EmbedOptions {
    EmbedOptions { widget_url: DEFAULT_WIDGET_URL.to_string(), width, height }
}

/// Extract the JSON body between the fence lines.
fn embed_json(block: &str) -> Value {
    let body: Vec<&str> = block.lines().collect();
    assert!(body[0].starts_with(":::{any:bundle} "));
    assert_eq!(*body.last().unwrap(), ":::");
    serde_json::from_str(&body[1..body.len() - 1].join("\n")).unwrap()
}

// ---------------------------------------------------------------------------
// Block structure
// ---------------------------------------------------------------------------

#[test]
fn test_fence_carries_widget_url() {
    let block = render_embed(&ViewerConfig::new("demo://cells"), &options(640, 480)).unwrap();
    let fence = block.lines().next().unwrap();
    assert_eq!(fence, format!(":::{{any:bundle}} {DEFAULT_WIDGET_URL}"));
}

#[test]
fn test_dimensions_are_px_suffixed_strings() {
    let block = render_embed(&ViewerConfig::new("demo://cells"), &options(640, 480)).unwrap();
    let json = embed_json(&block);
    assert_eq!(json["width"], "640px");
    assert_eq!(json["height"], "480px");
    assert_eq!(json["source"], "demo://cells");
}

// ---------------------------------------------------------------------------
// Field presence
// ---------------------------------------------------------------------------

#[test]
fn test_minimal_config_omits_optional_fields() {
    let block = render_embed(&ViewerConfig::new("s"), &options(100, 100)).unwrap();
    let json = embed_json(&block);
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("views"));
    assert!(!obj.contains_key("annotations"));
    assert!(!obj.contains_key("scaleBar"));
    assert!(!obj.contains_key("title"));
    assert!(!obj.contains_key("defaultAnnotationsVisible"));
    assert!(!obj.contains_key("defaultScaleBarVisible"));
    assert!(!obj.contains_key("defaultTitleVisible"));
}

#[test]
fn test_view_default_flag_emitted_only_when_true() {
    let mut config = ViewerConfig::new("s");
    config.views = vec![
        SavedView {
            name: "a".into(),
            description: None,
            zoom: 1.0,
            target: [0.0, 0.0, 0.0],
            appearance: None,
            default: false,
        },
        SavedView {
            name: "b".into(),
            description: Some("landing".into()),
            zoom: 2.0,
            target: [5.0, 5.0, 0.0],
            appearance: None,
            default: true,
        },
    ];
    let json = embed_json(&render_embed(&config, &options(100, 100)).unwrap());

    let views = json["views"].as_array().unwrap();
    assert!(views[0].get("default").is_none());
    assert_eq!(views[1]["default"], true);
    assert_eq!(views[1]["description"], "landing");
}

#[test]
fn test_visibility_flags_emitted_only_when_false() {
    let mut config = ViewerConfig::new("s");
    config.default_annotations_visible = false;
    config.default_title_visible = false;
    let json = embed_json(&render_embed(&config, &options(100, 100)).unwrap());

    assert_eq!(json["defaultAnnotationsVisible"], false);
    assert_eq!(json["defaultTitleVisible"], false);
    assert!(json.get("defaultScaleBarVisible").is_none());
}

#[test]
fn test_full_config_round_trips_through_embed_json() {
    let mut config = ViewerConfig::new("demo://cells");
    config.annotations = vec![Annotation {
        name: "nucleus".into(),
        target: [120.0, 80.0],
        color: Some([255, 0, 0]),
    }];
    config.scale_bar = Some(ScaleBarConfig { max_width: Some(80.0), ..Default::default() });
    config.title = Some(TitleConfig {
        text: "Sample 42".into(),
        position: TitlePosition::TopCenter,
        margin: 12.0,
        font_size: 14.0,
        font: None,
        color: None,
        style: TitleStyle::Pill,
    });

    let json = embed_json(&render_embed(&config, &options(800, 600)).unwrap());
    assert_eq!(json["annotations"][0]["name"], "nucleus");
    assert_eq!(json["scaleBar"]["maxWidth"], 80.0);
    assert_eq!(json["title"]["text"], "Sample 42");
    assert_eq!(json["title"]["style"], "pill");

    // The body parses back into the viewer config type.
    let parsed: ViewerConfig = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.source, "demo://cells");
    assert_eq!(parsed.annotations.len(), 1);
}
