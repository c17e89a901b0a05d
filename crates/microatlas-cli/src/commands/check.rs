use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::Style;
use microatlas_core::config::ViewerConfig;
use microatlas_core::consts::COLORMAP_OPTIONS;

#[derive(Args)]
pub struct CheckArgs {
    /// Widget config file (TOML or JSON)
    pub config: PathBuf,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let findings = validate(&config);

    let warn = Style::new().yellow().bold();
    let fail = Style::new().red().bold();
    let ok = Style::new().green().bold();

    let mut errors = 0;
    for finding in &findings {
        match finding {
            Finding::Warning(msg) => println!("{} {msg}", warn.apply_to("warning:")),
            Finding::Error(msg) => {
                errors += 1;
                println!("{} {msg}", fail.apply_to("error:"));
            }
        }
    }

    if errors > 0 {
        bail!("{errors} error(s) in {}", args.config.display());
    }
    println!(
        "{} {} ({} view(s), {} annotation(s))",
        ok.apply_to("ok:"),
        args.config.display(),
        config.views.len(),
        config.annotations.len(),
    );
    Ok(())
}

pub enum Finding {
    Warning(String),
    Error(String),
}

/// Structural checks beyond what deserialization already enforces.
pub fn validate(config: &ViewerConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    if config.source.trim().is_empty() {
        findings.push(Finding::Error("source must not be empty".to_string()));
    }

    let defaults: Vec<&str> = config
        .views
        .iter()
        .filter(|v| v.default)
        .map(|v| v.name.as_str())
        .collect();
    if defaults.len() > 1 {
        findings.push(Finding::Warning(format!(
            "{} views marked default; the first one ({:?}) wins",
            defaults.len(),
            defaults[0],
        )));
    }

    for view in &config.views {
        if view.name.trim().is_empty() {
            findings.push(Finding::Error("view with empty name".to_string()));
        }
        let Some(appearance) = &view.appearance else { continue };
        if let Some(limits) = &appearance.contrast_limits {
            for (i, [lo, hi]) in limits.iter().enumerate() {
                if lo >= hi {
                    findings.push(Finding::Warning(format!(
                        "view {:?}: inverted contrast limits [{lo}, {hi}] for channel {i} \
                         will be clamped",
                        view.name,
                    )));
                }
            }
        }
        if let Some(colormap) = &appearance.colormap {
            if !COLORMAP_OPTIONS.contains(&colormap.as_str()) {
                findings.push(Finding::Error(format!(
                    "view {:?}: unknown colormap {colormap:?}",
                    view.name,
                )));
            }
        }
    }

    for annotation in &config.annotations {
        if annotation.name.trim().is_empty() {
            findings.push(Finding::Error("annotation with empty name".to_string()));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use microatlas_core::config::{SavedView, SavedViewAppearance};

    fn view_with_appearance(appearance: SavedViewAppearance, default: bool) -> SavedView {
        SavedView {
            name: "v".to_string(),
            description: None,
            zoom: 0.0,
            target: [0.0, 0.0, 0.0],
            appearance: Some(appearance),
            default,
        }
    }

    #[test]
    fn test_clean_config_has_no_findings() {
        let config = ViewerConfig::new("demo://cells");
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let config = ViewerConfig::new("  ");
        assert!(matches!(validate(&config)[0], Finding::Error(_)));
    }

    #[test]
    fn test_multiple_defaults_warn() {
        let mut config = ViewerConfig::new("s");
        config.views = vec![
            view_with_appearance(SavedViewAppearance::default(), true),
            view_with_appearance(SavedViewAppearance::default(), true),
        ];
        assert!(matches!(validate(&config)[0], Finding::Warning(_)));
    }

    #[test]
    fn test_unknown_colormap_is_an_error() {
        let mut config = ViewerConfig::new("s");
        config.views = vec![view_with_appearance(
            SavedViewAppearance {
                colormap: Some("sparkles".to_string()),
                ..Default::default()
            },
            false,
        )];
        assert!(matches!(validate(&config)[0], Finding::Error(_)));
    }

    #[test]
    fn test_inverted_limits_warn() {
        let mut config = ViewerConfig::new("s");
        config.views = vec![view_with_appearance(
            SavedViewAppearance {
                contrast_limits: Some(vec![[200.0, 100.0]]),
                ..Default::default()
            },
            false,
        )];
        assert!(matches!(validate(&config)[0], Finding::Warning(_)));
    }
}
