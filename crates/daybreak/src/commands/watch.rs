//! Build and rebuild on change.

use std::path::Path;

use anyhow::{Context, Result};
use daybreak_site::{FileWatcher, PatternSet, SiteBuilder, WatchEvent, WatchFilter};

use super::build::{build_once, load_config};

/// Run the watch command until Ctrl-C.
pub async fn run(config_path: &Path, minify: bool) -> Result<()> {
    let config = load_config(config_path, None, minify)?;

    if let Err(e) = build_once(&config) {
        tracing::error!("{:#}", e);
    }

    let targets = PatternSet::new(&config.watch.targets).context("Invalid watch target")?;
    if targets.is_empty() {
        tracing::warn!("No watch targets configured; only stylesheet inputs trigger rebuilds");
    }
    let stylesheets = SiteBuilder::new(config.clone())
        .context("Invalid passthrough pattern")?
        .stylesheet_steps()
        .into_iter()
        .map(|step| step.input)
        .collect();

    let filter = WatchFilter::new(&config.root, targets, stylesheets);
    let (_watcher, mut events) = FileWatcher::new(&config.input_dir(), filter)
        .with_context(|| format!("Failed to watch {}", config.input_dir().display()))?;

    tracing::info!("Watching {} for changes", config.input_dir().display());

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                log_event(&event);
                // One rebuild per burst.
                while let Ok(more) = events.try_recv() {
                    log_event(&more);
                }
                if let Err(e) = build_once(&config) {
                    tracing::error!("{:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }

    Ok(())
}

fn log_event(event: &WatchEvent) {
    match event {
        WatchEvent::StylesheetModified(path) => {
            tracing::info!("Stylesheet changed: {}", path.display())
        }
        WatchEvent::Created(path) => tracing::info!("Created: {}", path.display()),
        WatchEvent::Deleted(path) => tracing::info!("Deleted: {}", path.display()),
        WatchEvent::Modified(path) => tracing::debug!("Modified: {}", path.display()),
    }
}
