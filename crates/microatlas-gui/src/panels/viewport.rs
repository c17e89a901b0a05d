use std::time::Instant;

use microatlas_core::consts::{MAX_ZOOM, MIN_ZOOM};
use microatlas_core::view::ViewState;
use microatlas_core::viewer::LoadPhase;

use crate::app::AtlasApp;
use crate::panels::{annotations, scale_bar, title};

pub fn show(ctx: &egui::Context, app: &mut AtlasApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let canvas = [rect.width(), rect.height()];
        if app.viewer.ensure_initial_view(canvas) {
            ctx.request_repaint();
        }
        app.refresh_texture(ctx);

        let texture_info = app.viewport.texture.as_ref().map(|t| t.id());
        let Some(texture_id) = texture_info else {
            show_placeholder(ui, app);
            return;
        };
        let Some(view) = app.viewer.view_state().copied() else {
            show_placeholder(ui, app);
            return;
        };

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        handle_zoom(ui, &response, app, rect, view, canvas);
        handle_pan(&response, app, view);

        if response.double_clicked() {
            if let Some(fit) = app.viewer.fit_destination() {
                app.viewer.navigate_to(fit, Instant::now());
                ctx.request_repaint();
            }
        }

        // Interaction may have replaced the view-state; redraw from the latest.
        let view = app.viewer.view_state().copied().unwrap_or(view);
        draw_image(ui, app, texture_id, rect, &view, canvas);

        update_hover(&response, app, rect, canvas);
        annotations::draw(ui, app, rect, &view, canvas);
        scale_bar::draw(ui, app, rect, &view);
        title::draw(ui, app, rect);
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_zoom(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut AtlasApp,
    rect: egui::Rect,
    view: ViewState,
    canvas: [f32; 2],
) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let new_zoom =
        (view.zoom + scroll_delta * 0.005 * std::f32::consts::LOG2_E).clamp(MIN_ZOOM, MAX_ZOOM);
    if new_zoom == view.zoom {
        return;
    }

    // Keep the image point under the cursor fixed while zooming.
    let mut target = view.target;
    if let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) {
        let pointer = [pointer.x - rect.min.x, pointer.y - rect.min.y];
        let anchor = view.screen_to_image(pointer, canvas);
        let new_scale = new_zoom.exp2();
        target = [
            anchor[0] - (pointer[0] - canvas[0] / 2.0) / new_scale,
            anchor[1] - (pointer[1] - canvas[1] / 2.0) / new_scale,
            view.target[2],
        ];
    }

    app.viewer.set_user_view_state(ViewState::new(new_zoom, target));
}

fn handle_pan(response: &egui::Response, app: &mut AtlasApp, view: ViewState) {
    if !response.dragged_by(egui::PointerButton::Primary) {
        return;
    }
    let delta = response.drag_delta();
    if delta == egui::Vec2::ZERO {
        return;
    }
    let scale = view.scale();
    app.viewer.set_user_view_state(ViewState::new(
        view.zoom,
        [
            view.target[0] - delta.x / scale,
            view.target[1] - delta.y / scale,
            view.target[2],
        ],
    ));
}

/// Rectangle the full-resolution image occupies on screen, derived from the
/// live view-state. The texture may be a lower pyramid level; it is stretched
/// over the same rectangle.
fn draw_image(
    ui: &egui::Ui,
    app: &AtlasApp,
    texture_id: egui::TextureId,
    rect: egui::Rect,
    view: &ViewState,
    canvas: [f32; 2],
) {
    let Some(image) = app.viewer.image() else { return };
    let (w, h) = (image.width() as f32, image.height() as f32);
    let top_left = view.image_to_screen([0.0, 0.0], canvas);
    let scale = view.scale();

    let img_rect = egui::Rect::from_min_size(
        rect.min + egui::vec2(top_left[0], top_left[1]),
        egui::vec2(w * scale, h * scale),
    );
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn update_hover(response: &egui::Response, app: &mut AtlasApp, rect: egui::Rect, canvas: [f32; 2]) {
    app.ui_state.hovered_annotation = response.hover_pos().and_then(|pos| {
        app.viewer
            .hovered_annotation([pos.x - rect.min.x, pos.y - rect.min.y], canvas)
    });
}

fn show_placeholder(ui: &mut egui::Ui, app: &AtlasApp) {
    let text = match app.viewer.phase() {
        LoadPhase::Loading => "Loading...",
        LoadPhase::Failed(_) => "",
        _ => "Open an image store to begin",
    };
    if text.is_empty() {
        return;
    }
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
