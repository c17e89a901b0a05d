use microatlas_core::scale::scale_bar_layout;
use microatlas_core::view::ViewState;

use crate::app::AtlasApp;

const MARGIN: f32 = 12.0;
const BAR_THICKNESS: f32 = 3.0;

/// Draw the physical scale bar in its configured corner. Recomputed from the
/// live zoom every frame.
pub fn draw(ui: &egui::Ui, app: &AtlasApp, rect: egui::Rect, view: &ViewState) {
    if !app.viewer.scale_bar_visible() {
        return;
    }
    let Some(scale) = app.viewer.physical_scale() else { return };
    let Some(config) = &app.viewer.config().scale_bar else { return };

    let layout = scale_bar_layout(scale, view.zoom, config.max_width());
    let position = config.position();

    let x = if position.is_right() {
        rect.max.x - MARGIN - layout.width_px
    } else {
        rect.min.x + MARGIN
    };
    let y = if position.is_bottom() {
        rect.max.y - MARGIN
    } else {
        rect.min.y + MARGIN + BAR_THICKNESS
    };

    let rgb = config.color.unwrap_or([255, 255, 255]);
    let color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
    let painter = ui.painter();

    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(x, y - BAR_THICKNESS),
            egui::pos2(x + layout.width_px, y),
        ),
        0.0,
        color,
    );
    painter.text(
        egui::pos2(x + layout.width_px / 2.0, y - BAR_THICKNESS - 3.0),
        egui::Align2::CENTER_BOTTOM,
        &layout.label,
        egui::FontId::proportional(config.font_size.unwrap_or(12.0)),
        color,
    );
}
