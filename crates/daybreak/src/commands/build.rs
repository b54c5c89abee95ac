//! Site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use daybreak_site::{SiteBuilder, SiteConfig};

/// Load `site.toml` and apply command-line overrides.
pub fn load_config(path: &Path, output: Option<PathBuf>, minify: bool) -> Result<SiteConfig> {
    let mut config = SiteConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if let Some(output) = output {
        config.dirs.output = output.display().to_string();
    }
    if minify {
        config.build.minify = true;
    }

    Ok(config)
}

/// Build once and log the summary.
pub fn build_once(config: &SiteConfig) -> Result<()> {
    let builder = SiteBuilder::new(config.clone()).context("Invalid passthrough pattern")?;
    let result = builder.build().context("Build failed")?;

    tracing::info!(
        "Processed {} stylesheets and copied {} files in {}ms",
        result.stylesheets,
        result.copied,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>, minify: bool) -> Result<()> {
    tracing::info!("Building site...");

    let config = load_config(config_path, output, minify)?;
    build_once(&config)
}
