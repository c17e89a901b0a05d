use microatlas_core::consts::DEFAULT_ANNOTATION_COLOR;
use microatlas_core::hover::annotation_screen_pos;
use microatlas_core::view::ViewState;

use crate::app::AtlasApp;

const MARKER_RADIUS: f32 = 5.0;

/// Draw annotation pin markers over the viewport, with the hovered one
/// enlarged and labeled.
pub fn draw(
    ui: &egui::Ui,
    app: &AtlasApp,
    rect: egui::Rect,
    view: &ViewState,
    canvas: [f32; 2],
) {
    if !app.viewer.annotations_visible() {
        return;
    }
    let painter = ui.painter();

    for (i, annotation) in app.viewer.config().annotations.iter().enumerate() {
        let [x, y] = annotation_screen_pos(annotation, view, canvas);
        let pos = rect.min + egui::vec2(x, y);
        if !rect.contains(pos) {
            continue;
        }

        let rgb = annotation.color.unwrap_or(DEFAULT_ANNOTATION_COLOR);
        let color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
        let hovered = app.ui_state.hovered_annotation == Some(i);
        let radius = if hovered { MARKER_RADIUS + 2.0 } else { MARKER_RADIUS };

        painter.circle_filled(pos, radius, color);
        painter.circle_stroke(pos, radius, egui::Stroke::new(1.5, egui::Color32::WHITE));

        if hovered {
            painter.text(
                pos + egui::vec2(0.0, -radius - 4.0),
                egui::Align2::CENTER_BOTTOM,
                &annotation.name,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }
    }
}
