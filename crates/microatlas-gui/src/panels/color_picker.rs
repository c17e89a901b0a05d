use microatlas_core::consts::FALLBACK_COLORS;

use crate::app::AtlasApp;

pub fn show(ctx: &egui::Context, app: &mut AtlasApp) {
    let Some(index) = app.ui_state.color_picker_channel else {
        return;
    };
    let infos = app.viewer.channel_infos();
    let Some(info) = infos.get(index) else {
        app.ui_state.color_picker_channel = None;
        return;
    };

    let mut open = true;
    egui::Window::new(format!("Color: {}", info.label))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            let mut color = info.color;
            if ui.color_edit_button_srgb(&mut color).changed() {
                app.viewer.set_channel_color(index, color);
            }

            ui.add_space(4.0);
            ui.small("Presets");
            ui.horizontal(|ui| {
                for preset in FALLBACK_COLORS {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::click());
                    ui.painter().rect_filled(
                        rect,
                        3.0,
                        egui::Color32::from_rgb(preset[0], preset[1], preset[2]),
                    );
                    if response.clicked() {
                        app.viewer.set_channel_color(index, preset);
                    }
                }
            });
        });
    if !open {
        app.ui_state.color_picker_channel = None;
    }
}
