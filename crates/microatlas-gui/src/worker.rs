use std::sync::mpsc;

use microatlas_core::histogram::compute_image_histograms;
use microatlas_core::loader::{DefaultLoader, ImageLoader};

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("microatlas-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let loader: Box<dyn ImageLoader> = Box::new(DefaultLoader);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadSource { source, generation } => {
                handle_load(&*loader, &source, generation, &tx, &ctx);
            }
        }
    }
}

fn handle_load(
    loader: &dyn ImageLoader,
    source: &str,
    generation: u64,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match loader.load(source) {
        Ok(image) => {
            // Histograms come from the lowest-resolution level, so computing
            // them before handing the image off costs little.
            let histograms = compute_image_histograms(&image);
            send(tx, ctx, WorkerResult::Loaded { generation, result: Ok(image) });
            send(tx, ctx, WorkerResult::Histograms { generation, histograms });
        }
        Err(e) => {
            tracing::warn!(source, "load failed: {e}");
            send(tx, ctx, WorkerResult::Loaded { generation, result: Err(e.to_string()) });
        }
    }
}
