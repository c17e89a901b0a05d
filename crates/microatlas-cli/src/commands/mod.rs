pub mod check;
pub mod embed;
pub mod info;

use std::path::Path;

use anyhow::{Context, Result};
use microatlas_core::config::ViewerConfig;

/// Load a widget config from TOML or JSON, decided by file extension
/// (anything that is not `.json` is treated as TOML).
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?
    } else {
        toml::from_str(&raw)
            .with_context(|| format!("Invalid TOML config {}", path.display()))?
    };
    Ok(config)
}
