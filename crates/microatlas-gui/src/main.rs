mod app;
mod colormap;
mod convert;
mod messages;
mod panels;
mod state;
mod worker;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Optional source or config path argument; the demo image otherwise.
    let arg = std::env::args().nth(1);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Microatlas"),
        ..Default::default()
    };

    eframe::run_native(
        "Microatlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::AtlasApp::new(&cc.egui_ctx, arg)))),
    )
}
