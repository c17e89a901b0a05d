mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use microatlas_core::config::{
    SavedView, SavedViewAppearance, ScaleBarConfig, ViewerConfig,
};
use microatlas_core::consts::FLY_DURATION_MS;
use microatlas_core::view::NavDestination;
use microatlas_core::viewer::{LoadPhase, Viewer};

fn saved_view(name: &str, zoom: f32, default: bool) -> SavedView {
    SavedView {
        name: name.to_string(),
        description: None,
        zoom,
        target: [50.0, 50.0, 0.0],
        appearance: None,
        default,
    }
}

fn loaded_viewer(config: ViewerConfig) -> Viewer {
    let mut viewer = Viewer::new(config);
    let generation = viewer.begin_load();
    viewer.finish_load(generation, Ok(common::build_test_image(common::metadata_with_unit())));
    viewer
}

const CANVAS: [f32; 2] = [800.0, 600.0];

// ---------------------------------------------------------------------------
// Load lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_load_phases() {
    let mut viewer = Viewer::new(ViewerConfig::new("demo://cells"));
    assert_eq!(*viewer.phase(), LoadPhase::Unloaded);

    let generation = viewer.begin_load();
    assert_eq!(*viewer.phase(), LoadPhase::Loading);

    viewer.finish_load(generation, Ok(common::build_test_image(common::metadata_with_unit())));
    assert_eq!(*viewer.phase(), LoadPhase::Loaded);
    assert_eq!(viewer.image().unwrap().num_channels(), 2);
}

#[test]
fn test_load_failure_surfaces_message_and_clears_image() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    let generation = viewer.set_source("/no/such/store");
    viewer.finish_load(generation, Err("store not found".to_string()));

    assert_eq!(*viewer.phase(), LoadPhase::Failed("store not found".to_string()));
    assert!(viewer.image().is_none());
    assert!(viewer.view_state().is_none());
}

#[test]
fn test_stale_load_result_is_dropped() {
    let mut viewer = Viewer::new(ViewerConfig::new("demo://cells"));
    let old = viewer.begin_load();
    let new = viewer.set_source("demo://");

    viewer.finish_load(old, Ok(common::build_test_image(common::metadata_without_unit())));
    assert_eq!(*viewer.phase(), LoadPhase::Loading, "stale result must not apply");

    viewer.finish_load(new, Ok(common::build_test_image(common::metadata_with_unit())));
    assert_eq!(*viewer.phase(), LoadPhase::Loaded);
}

#[test]
fn test_stale_histograms_are_dropped() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view(CANVAS);
    let old = viewer.generation();

    let generation = viewer.begin_load();
    viewer.finish_load(generation, Ok(common::build_test_image(common::metadata_with_unit())));
    viewer.set_histograms(old, vec![]);
    viewer.ensure_initial_view(CANVAS);

    // Stale empty set dropped; infos still report no histogram rather than
    // panicking on a mismatched vector.
    let infos = viewer.channel_infos();
    assert_eq!(infos.len(), 2);
    assert!(infos[0].histogram.is_none());
}

// ---------------------------------------------------------------------------
// Initial view resolution
// ---------------------------------------------------------------------------

#[test]
fn test_initial_view_waits_for_nonzero_canvas() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    assert!(!viewer.ensure_initial_view([0.0, 600.0]));
    assert!(viewer.view_state().is_none());

    assert!(viewer.ensure_initial_view(CANVAS));
    assert!(viewer.view_state().is_some());
    // Resolution happens exactly once.
    assert!(!viewer.ensure_initial_view(CANVAS));
}

#[test]
fn test_initial_view_defaults_to_fit() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view([160.0, 160.0]);

    // 16x16 image in a 160x160 canvas: 10x magnification, centered.
    let vs = viewer.view_state().unwrap();
    assert!((vs.zoom - 10f32.log2()).abs() < 1e-4);
    assert_eq!(vs.target, [8.0, 8.0, 0.0]);
}

#[test]
fn test_first_default_view_wins() {
    let mut config = ViewerConfig::new("demo://cells");
    config.views = vec![
        saved_view("plain", 1.0, false),
        saved_view("first default", 2.0, true),
        saved_view("second default", 3.0, true),
    ];
    let mut viewer = loaded_viewer(config);
    viewer.ensure_initial_view(CANVAS);

    assert_eq!(viewer.view_state().unwrap().zoom, 2.0);
}

#[test]
fn test_default_view_appearance_patch_is_applied() {
    let mut config = ViewerConfig::new("demo://cells");
    let mut view = saved_view("start", 1.0, true);
    view.appearance = Some(SavedViewAppearance {
        channels_visible: Some(vec![false, true]),
        ..Default::default()
    });
    config.views = vec![view];

    let mut viewer = loaded_viewer(config);
    viewer.ensure_initial_view(CANVAS);

    let snap = viewer.appearance_snapshot();
    assert_eq!(snap.channels_visible, Some(vec![false, true]));
}

#[test]
fn test_menu_lists_fit_entry_first() {
    let mut config = ViewerConfig::new("demo://cells");
    config.views = vec![saved_view("nucleus", 4.0, false)];
    let mut viewer = loaded_viewer(config);
    viewer.ensure_initial_view(CANVAS);

    let views = viewer.menu_views();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].name, "Fit to viewer");
    assert_eq!(views[1].name, "nucleus");
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[test]
fn test_view_state_listener_fires_once_per_change() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    viewer.set_view_state_listener(move |vs| sink.borrow_mut().push(*vs));

    viewer.ensure_initial_view(CANVAS);
    assert_eq!(seen.borrow().len(), 1);

    // Writing an identical state is not a logical change.
    let current = *viewer.view_state().unwrap();
    viewer.set_user_view_state(current);
    assert_eq!(seen.borrow().len(), 1);

    viewer.set_user_view_state(microatlas_core::view::ViewState::new(3.0, [1.0, 2.0, 0.0]));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_appearance_listener_sees_full_snapshots() {
    let mut viewer = Viewer::new(ViewerConfig::new("demo://cells"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    viewer.set_appearance_listener(move |snap| sink.borrow_mut().push(snap.clone()));

    // No channel count yet: nothing may fire.
    viewer.set_blend_mode(microatlas_core::config::BlendMode::Merged);
    assert!(seen.borrow().is_empty());

    let generation = viewer.begin_load();
    viewer.finish_load(generation, Ok(common::build_test_image(common::metadata_with_unit())));
    assert_eq!(seen.borrow().len(), 1);

    viewer.toggle_channel(0);
    assert_eq!(seen.borrow().len(), 2);
    let last = seen.borrow().last().cloned().unwrap();
    assert!(last.channels_visible.is_some());
    assert!(last.channel_colors.is_some());
    assert!(last.contrast_limits.is_some());

    // Out-of-range toggle is a no-op, so no notification.
    viewer.toggle_channel(9);
    assert_eq!(seen.borrow().len(), 2);
}

// ---------------------------------------------------------------------------
// Navigation through the orchestrator
// ---------------------------------------------------------------------------

#[test]
fn test_navigate_and_tick_converge_on_destination() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view(CANVAS);

    let start = Instant::now();
    viewer.navigate_to(NavDestination::from_xy(5.0, 3.0, 4.0), start);
    assert!(viewer.is_animating());

    assert!(viewer.tick(start + Duration::from_millis(FLY_DURATION_MS)));
    let vs = viewer.view_state().unwrap();
    assert_eq!(vs.zoom, 5.0);
    assert_eq!(vs.target, [3.0, 4.0, 0.0]);
    assert!(!viewer.is_animating());
}

#[test]
fn test_user_input_cancels_animation() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view(CANVAS);

    viewer.navigate_to(NavDestination::from_xy(5.0, 3.0, 4.0), Instant::now());
    viewer.set_user_view_state(microatlas_core::view::ViewState::new(1.0, [0.0, 0.0, 0.0]));
    assert!(!viewer.is_animating());
    assert_eq!(viewer.view_state().unwrap().zoom, 1.0);
}

#[test]
fn test_select_view_applies_appearance_and_keeps_custom_colors() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view(CANVAS);
    viewer.set_channel_color(0, [12, 34, 56]);

    let mut view = saved_view("half", 1.0, false);
    view.appearance = Some(SavedViewAppearance {
        channels_visible: Some(vec![true, false]),
        ..Default::default()
    });
    viewer.select_view(&view, Instant::now());

    let snap = viewer.appearance_snapshot();
    assert_eq!(snap.channels_visible, Some(vec![true, false]));
    assert_eq!(snap.channel_colors.unwrap()[0], [12, 34, 56]);
}

// ---------------------------------------------------------------------------
// Overlays and layer projection
// ---------------------------------------------------------------------------

#[test]
fn test_no_unit_metadata_means_no_scale_bar_even_when_configured() {
    let mut config = ViewerConfig::new("demo://cells");
    config.scale_bar = Some(ScaleBarConfig::default());
    let mut viewer = Viewer::new(config);
    let generation = viewer.begin_load();
    viewer.finish_load(
        generation,
        Ok(common::build_test_image(common::metadata_without_unit())),
    );

    assert!(viewer.physical_scale().is_none());
    assert!(!viewer.has_scale_bar());
    assert!(!viewer.scale_bar_visible());
}

#[test]
fn test_scale_bar_renders_with_unit_and_config() {
    let mut config = ViewerConfig::new("demo://cells");
    config.scale_bar = Some(ScaleBarConfig::default());
    let viewer = loaded_viewer(config);
    assert!(viewer.has_scale_bar());
    assert!(viewer.scale_bar_visible());
}

#[test]
fn test_layer_params_reflect_appearance_and_level() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    assert!(viewer.layer_params().is_none(), "no view-state yet");

    viewer.ensure_initial_view(CANVAS);
    viewer.toggle_channel(1);
    let params = viewer.layer_params().unwrap();
    assert_eq!(params.level, 0, "zoomed in uses the base level");
    assert_eq!(params.channels_visible, vec![true, true]);
    assert_eq!(params.selections.len(), 2);
    assert_eq!(params.selections[1].c, 1);

    // Zoom far out: the lowest-resolution level is selected.
    viewer.set_user_view_state(microatlas_core::view::ViewState::new(-6.0, [8.0, 8.0, 0.0]));
    assert_eq!(viewer.layer_params().unwrap().level, 1);
}

#[test]
fn test_channel_infos_come_from_metadata() {
    let mut viewer = loaded_viewer(ViewerConfig::new("demo://cells"));
    viewer.ensure_initial_view(CANVAS);

    let infos = viewer.channel_infos();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].label, "DNA");
    assert_eq!(infos[0].color, [0, 0, 255]);
    assert!(infos[0].visible);
    assert!(!infos[1].visible);
    assert_eq!(infos[1].contrast_limits, [10.0, 200.0]);
}
