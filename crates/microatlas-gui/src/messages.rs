use microatlas_core::histogram::ChannelHistogram;
use microatlas_core::loader::LoadedImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Load a source and compute its channel histograms. `generation` tags the
    /// results so the orchestrator can drop superseded ones.
    LoadSource { source: String, generation: u64 },
}

/// Results sent from worker thread (or file-dialog threads) back to the UI.
pub enum WorkerResult {
    Loaded {
        generation: u64,
        result: Result<LoadedImage, String>,
    },
    Histograms {
        generation: u64,
        histograms: Vec<Option<ChannelHistogram>>,
    },
    /// A source was picked from a file dialog.
    SourcePicked { source: String },
    /// A widget config was picked and parsed from a file dialog.
    ConfigLoaded { config: microatlas_core::config::ViewerConfig },
}
