use anyhow::Result;
use clap::Args;
use console::Style;
use microatlas_core::loader::{DefaultLoader, ImageLoader};
use microatlas_core::scale::{extract_physical_scale, unit_label};

#[derive(Args)]
pub struct InfoArgs {
    /// Image source: an OME-Zarr store path or demo://
    pub source: String,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let image = DefaultLoader.load(&args.source)?;

    println!("Source:      {}", args.source);
    println!("Dimensions:  {}x{}", image.width(), image.height());
    println!("Levels:      {}", image.levels.len());
    for (i, level) in image.levels.iter().enumerate() {
        println!("  level {i}:   {}x{}", level.width(), level.height());
    }

    match extract_physical_scale(&image.metadata) {
        Some(scale) => println!(
            "Pixel size:  {} {}",
            scale.pixel_size,
            unit_label(&scale.unit)
        ),
        None => println!("Pixel size:  (no calibration metadata)"),
    }

    println!("Channels:    {}", image.num_channels());
    let swatch = Style::new().bold();
    for channel in &image.channels {
        let [r, g, b] = channel.color;
        println!(
            "  {}  color #{r:02x}{g:02x}{b:02x}  window [{}, {}]  {}",
            swatch.apply_to(&channel.label),
            channel.window[0],
            channel.window[1],
            if channel.visible { "visible" } else { "hidden" },
        );
    }

    Ok(())
}
