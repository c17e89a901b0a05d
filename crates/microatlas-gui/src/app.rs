use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use microatlas_core::config::ViewerConfig;
use microatlas_core::viewer::{LoadPhase, Viewer};

use crate::convert::compose_layer;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{UIState, ViewportState};
use crate::worker;

pub struct AtlasApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub viewer: Viewer,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub show_about: bool,
}

impl AtlasApp {
    pub fn new(ctx: &egui::Context, arg: Option<String>) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone());

        let config = match arg {
            Some(arg) if is_config_path(&arg) => match load_config_file(Path::new(&arg)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("could not read config {arg}: {e}");
                    ViewerConfig::new("demo://cells")
                }
            },
            Some(source) => ViewerConfig::new(source),
            None => ViewerConfig::new("demo://cells"),
        };

        let mut app = Self {
            cmd_tx,
            result_tx,
            result_rx,
            viewer: Viewer::new(config),
            ui_state: UIState::default(),
            viewport: ViewportState::default(),
            show_about: false,
        };
        app.start_load();
        app
    }

    /// Kick off loading of the viewer's current source.
    pub fn start_load(&mut self) {
        let generation = self.viewer.begin_load();
        let _ = self.cmd_tx.send(WorkerCommand::LoadSource {
            source: self.viewer.config().source.clone(),
            generation,
        });
    }

    /// Switch to a new source and reload.
    pub fn open_source(&mut self, source: String) {
        let generation = self.viewer.set_source(source.clone());
        let _ = self.cmd_tx.send(WorkerCommand::LoadSource { source, generation });
    }

    /// Replace the whole widget config (views, annotations, overlays) and
    /// load its source.
    pub fn open_config(&mut self, config: ViewerConfig) {
        self.viewer = Viewer::new(config);
        self.ui_state = UIState::default();
        self.viewport = ViewportState::default();
        self.start_load();
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::Loaded { generation, result } => {
                    self.viewer.finish_load(generation, result);
                }
                WorkerResult::Histograms { generation, histograms } => {
                    self.viewer.set_histograms(generation, histograms);
                }
                WorkerResult::SourcePicked { source } => {
                    self.open_source(source);
                }
                WorkerResult::ConfigLoaded { config } => {
                    self.open_config(config);
                }
            }
        }
    }

    /// Rebuild the composited viewport texture when anything it depends on
    /// changed: image identity, appearance, or the selected pyramid level.
    pub fn refresh_texture(&mut self, ctx: &egui::Context) {
        let Some(params) = self.viewer.layer_params() else {
            self.viewport.texture = None;
            self.viewport.texture_key = None;
            return;
        };
        let key = (self.viewer.generation(), self.viewer.layer_revision(), params.level);
        if self.viewport.texture_key == Some(key) {
            return;
        }

        let Some(image) = self.viewer.image() else { return };
        match compose_layer(image, &params) {
            Ok(composed) => {
                self.viewport.texture =
                    Some(ctx.load_texture("viewport", composed, egui::TextureOptions::NEAREST));
                self.viewport.texture_key = Some(key);
            }
            Err(e) => tracing::warn!("compositing failed: {e}"),
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        if self.viewer.tick(Instant::now()) || self.viewer.is_animating() {
            ctx.request_repaint();
        }

        panels::menu_bar::show(ctx, self);
        panels::viewport::show(ctx, self);
        panels::overlay_menu::show(ctx, self);
        panels::color_picker::show(ctx, self);

        if let LoadPhase::Failed(message) = self.viewer.phase() {
            let message = message.clone();
            egui::Window::new("Load error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                });
        }

        if self.show_about {
            egui::Window::new("About Microatlas")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Interactive multi-channel microscopy image viewer");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    if ui.button("Close").clicked() {
                        self.show_about = false;
                    }
                });
        }
    }
}

fn is_config_path(arg: &str) -> bool {
    arg.ends_with(".toml") || arg.ends_with(".json")
}

/// Load a widget config from TOML or JSON, decided by file extension.
pub fn load_config_file(path: &Path) -> anyhow::Result<ViewerConfig> {
    let raw = std::fs::read_to_string(path)?;
    let config = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&raw)?
    } else {
        toml::from_str(&raw)?
    };
    Ok(config)
}
