use microatlas_core::config::{TitlePosition, TitleStyle};

use crate::app::AtlasApp;

/// Draw the title overlay at its configured edge position.
pub fn draw(ui: &egui::Ui, app: &AtlasApp, rect: egui::Rect) {
    if !app.viewer.title_visible() {
        return;
    }
    let Some(config) = &app.viewer.config().title else { return };

    let rgb = config.color.unwrap_or([255, 255, 255]);
    let color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
    let font = egui::FontId::proportional(config.font_size);
    let painter = ui.painter();

    let galley = painter.layout_no_wrap(config.text.clone(), font.clone(), color);
    let size = galley.size();
    let margin = config.margin;

    let x = match config.position {
        TitlePosition::TopLeft | TitlePosition::BottomLeft => rect.min.x + margin,
        TitlePosition::TopCenter | TitlePosition::BottomCenter => {
            rect.center().x - size.x / 2.0
        }
        TitlePosition::TopRight | TitlePosition::BottomRight => rect.max.x - margin - size.x,
    };
    let y = match config.position {
        TitlePosition::TopLeft | TitlePosition::TopCenter | TitlePosition::TopRight => {
            rect.min.y + margin
        }
        _ => rect.max.y - margin - size.y,
    };
    let pos = egui::pos2(x, y);

    if config.style == TitleStyle::Pill {
        let pad = egui::vec2(10.0, 4.0);
        painter.rect_filled(
            egui::Rect::from_min_size(pos - pad, size + pad * 2.0),
            (size.y + pad.y * 2.0) / 2.0,
            egui::Color32::from_black_alpha(160),
        );
    }
    painter.galley(pos, galley, color);
}
