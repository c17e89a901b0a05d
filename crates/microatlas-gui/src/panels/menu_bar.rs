use std::time::Instant;

use crate::app::{load_config_file, AtlasApp};
use crate::messages::WorkerResult;

pub fn show(ctx: &egui::Context, app: &mut AtlasApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add(
                        egui::Button::new("Open Store...")
                            .shortcut_text(ctx.format_shortcut(&open_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    open_store(app, ctx);
                }

                if ui.button("Open Config...").clicked() {
                    ui.close();
                    open_config(app, ctx);
                }

                if ui.button("Open Demo Image").clicked() {
                    ui.close();
                    app.open_source("demo://cells".to_string());
                }

                ui.separator();

                let quit_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(
                        egui::Button::new("Quit")
                            .shortcut_text(ctx.format_shortcut(&quit_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let views = app.viewer.menu_views();
                if views.is_empty() {
                    ui.weak("(no image loaded)");
                }
                for view in &views {
                    if ui.button(&view.name).clicked() {
                        ui.close();
                        app.viewer.select_view(view, Instant::now());
                    }
                }

                ui.separator();

                let mut open = app.ui_state.menu.open;
                if ui.checkbox(&mut open, "Overlay menu").changed() {
                    app.ui_state.menu.open = open;
                }

                let mut annotations = app.viewer.annotations_visible();
                if ui
                    .add_enabled(
                        !app.viewer.config().annotations.is_empty(),
                        egui::Checkbox::new(&mut annotations, "Annotations"),
                    )
                    .changed()
                {
                    app.viewer.set_annotations_visible(annotations);
                }

                let mut scale_bar = app.viewer.scale_bar_visible();
                if ui
                    .add_enabled(
                        app.viewer.has_scale_bar(),
                        egui::Checkbox::new(&mut scale_bar, "Scale bar"),
                    )
                    .changed()
                {
                    app.viewer.set_scale_bar_visible(scale_bar);
                }

                let mut title = app.viewer.title_visible();
                if ui
                    .add_enabled(
                        app.viewer.config().title.is_some(),
                        egui::Checkbox::new(&mut title, "Title"),
                    )
                    .changed()
                {
                    app.viewer.set_title_visible(title);
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(
                egui::Modifiers::COMMAND,
                egui::Key::O,
            ))
        }) {
            open_store(app, ctx);
        }
        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(
                egui::Modifiers::COMMAND,
                egui::Key::Q,
            ))
        }) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_store(app: &AtlasApp, ctx: &egui::Context) {
    let result_tx = app.result_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            let _ = result_tx.send(WorkerResult::SourcePicked {
                source: path.display().to_string(),
            });
            ctx.request_repaint();
        }
    });
}

fn open_config(app: &AtlasApp, ctx: &egui::Context) {
    let result_tx = app.result_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let config = rfd::FileDialog::new()
            .add_filter("Widget config", &["toml", "json"])
            .pick_file()
            .and_then(|path| load_config_file(&path).ok());
        if let Some(config) = config {
            let _ = result_tx.send(WorkerResult::ConfigLoaded { config });
            ctx.request_repaint();
        }
    });
}
