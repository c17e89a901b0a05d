use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use microatlas_core::embed::{render_embed, EmbedOptions, DEFAULT_WIDGET_URL};

#[derive(Args)]
pub struct EmbedArgs {
    /// Widget config file (TOML or JSON)
    pub config: PathBuf,

    /// Embedded viewport width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Embedded viewport height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Widget bundle URL to reference from the block
    #[arg(long, default_value = DEFAULT_WIDGET_URL)]
    pub url: String,

    /// Write the block to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &EmbedArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let block = render_embed(
        &config,
        &EmbedOptions {
            widget_url: args.url.clone(),
            width: args.width,
            height: args.height,
        },
    )?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &block)
            .with_context(|| format!("Failed to write embed block to {}", path.display()))?;
        println!("Embed block saved to {}", path.display());
    } else {
        print!("{block}");
    }
    Ok(())
}
