use std::time::Instant;

use microatlas_core::config::BlendMode;
use microatlas_core::consts::COLORMAP_OPTIONS;
use microatlas_core::viewer::ChannelInfo;

use crate::app::AtlasApp;
use crate::state::MenuTab;

const MENU_WIDTH: f32 = 260.0;
const HISTOGRAM_HEIGHT: f32 = 36.0;

pub fn show(ctx: &egui::Context, app: &mut AtlasApp) {
    if !app.ui_state.menu.open {
        // Collapsed state: a small toggle button in the viewport corner.
        egui::Area::new(egui::Id::new("overlay_toggle"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 40.0])
            .show(ctx, |ui| {
                if ui.button("\u{2630}").clicked() {
                    app.ui_state.menu.open = true;
                }
            });
        return;
    }

    let mut open = true;
    egui::Window::new("Overlay")
        .open(&mut open)
        .default_width(MENU_WIDTH)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 40.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                tab_button(ui, app, MenuTab::Views, "Views");
                tab_button(ui, app, MenuTab::Appearance, "Appearance");
                tab_button(ui, app, MenuTab::Info, "Info");
            });
            ui.separator();

            match app.ui_state.menu.tab {
                MenuTab::Views => views_tab(ui, app),
                MenuTab::Appearance => appearance_tab(ui, app),
                MenuTab::Info => info_tab(ui, app),
            }
        });
    app.ui_state.menu.open = open;
}

fn tab_button(ui: &mut egui::Ui, app: &mut AtlasApp, tab: MenuTab, label: &str) {
    if ui
        .selectable_label(app.ui_state.menu.tab == tab, label)
        .clicked()
    {
        app.ui_state.menu.tab = tab;
    }
}

// ---- views tab ----------------------------------------------------------

fn views_tab(ui: &mut egui::Ui, app: &mut AtlasApp) {
    let views = app.viewer.menu_views();
    if views.is_empty() {
        ui.weak("No image loaded.");
        return;
    }
    for view in &views {
        if ui.button(&view.name).clicked() {
            app.viewer.select_view(view, Instant::now());
        }
        if let Some(description) = &view.description {
            ui.small(description);
        }
        ui.add_space(2.0);
    }
}

// ---- appearance tab -----------------------------------------------------

fn appearance_tab(ui: &mut egui::Ui, app: &mut AtlasApp) {
    let infos = app.viewer.channel_infos();
    if infos.is_empty() {
        ui.weak("No image loaded.");
        return;
    }

    for (index, info) in infos.iter().enumerate() {
        channel_row(ui, app, index, info);
        ui.add_space(4.0);
    }

    ui.separator();
    blend_controls(ui, app);
}

fn channel_row(ui: &mut egui::Ui, app: &mut AtlasApp, index: usize, info: &ChannelInfo) {
    ui.horizontal(|ui| {
        let mut visible = info.visible;
        if ui.checkbox(&mut visible, "").changed() {
            app.viewer.toggle_channel(index);
        }

        let color = egui::Color32::from_rgb(info.color[0], info.color[1], info.color[2]);
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::click());
        ui.painter().rect_filled(rect, 3.0, color);
        if response.clicked() {
            app.ui_state.color_picker_channel = Some(index);
        }

        ui.strong(&info.label);
    });

    if let Some(histogram) = &info.histogram {
        draw_histogram(ui, &histogram.bins, info.color);
    }

    contrast_controls(ui, app, index, info);
}

/// Paint normalized histogram bins as a bar strip.
fn draw_histogram(ui: &mut egui::Ui, bins: &[f32], color: [u8; 3]) {
    let width = ui.available_width().min(MENU_WIDTH - 20.0);
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(width, HISTOGRAM_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(25));

    if bins.is_empty() {
        return;
    }
    let bar_width = rect.width() / bins.len() as f32;
    let fill = egui::Color32::from_rgb(color[0], color[1], color[2]);
    for (i, &value) in bins.iter().enumerate() {
        let h = value.clamp(0.0, 1.0) * rect.height();
        if h <= 0.0 {
            continue;
        }
        let x = rect.min.x + i as f32 * bar_width;
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(x, rect.max.y - h),
                egui::pos2(x + bar_width, rect.max.y),
            ),
            0.0,
            fill,
        );
    }
}

fn contrast_controls(ui: &mut egui::Ui, app: &mut AtlasApp, index: usize, info: &ChannelInfo) {
    let [mut lo, mut hi] = info.contrast_limits;
    ui.horizontal(|ui| {
        ui.small("Window");
        let changed = ui
            .add(egui::DragValue::new(&mut lo).speed(1.0))
            .changed()
            | ui.add(egui::DragValue::new(&mut hi).speed(1.0)).changed();
        if changed {
            app.viewer.set_contrast_limits(index, [lo, hi]);
        }
    });
}

fn blend_controls(ui: &mut egui::Ui, app: &mut AtlasApp) {
    let mut mode = app.viewer.blend_mode();
    ui.horizontal(|ui| {
        ui.small("Blend");
        let changed = ui
            .selectable_value(&mut mode, BlendMode::Single, "Single")
            .changed()
            | ui.selectable_value(&mut mode, BlendMode::Merged, "Merged")
                .changed();
        if changed {
            app.viewer.set_blend_mode(mode);
        }
    });

    if mode == BlendMode::Merged {
        let current = app.viewer.colormap().to_string();
        let mut selection = current.clone();
        egui::ComboBox::from_label("Colormap")
            .selected_text(&current)
            .show_ui(ui, |ui| {
                for name in COLORMAP_OPTIONS {
                    ui.selectable_value(&mut selection, name.to_string(), name);
                }
            });
        if selection != current {
            app.viewer.set_colormap(&selection);
        }
    }
}

// ---- info tab -----------------------------------------------------------

fn info_tab(ui: &mut egui::Ui, app: &mut AtlasApp) {
    let Some(image) = app.viewer.image() else {
        ui.weak("No image loaded.");
        return;
    };

    ui.small(format!("Source: {}", app.viewer.config().source));
    ui.small(format!("Size: {} x {} px", image.width(), image.height()));
    ui.small(format!("Channels: {}", image.num_channels()));
    ui.small(format!("Pyramid levels: {}", image.levels.len()));
    if let Some(scale) = app.viewer.physical_scale() {
        ui.small(format!(
            "Pixel size: {} {}",
            scale.pixel_size,
            microatlas_core::scale::unit_label(&scale.unit)
        ));
    }

    ui.separator();
    overlay_toggles(ui, app);
}

fn overlay_toggles(ui: &mut egui::Ui, app: &mut AtlasApp) {
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
}
