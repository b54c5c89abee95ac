//! Show or flip the theme preference outside the browser.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use daybreak_site::SiteConfig;
use daybreak_toggle::{
    ColorScheme, DetachedSurface, FileStore, PreferenceSource, RootClassList, SystemScheme,
    ThemeMode, ThemeToggle,
};

/// Default preference file, relative to the project root.
pub const PREFERENCES_FILE: &str = ".daybreak/preferences.json";

/// Run the theme command.
pub fn run(config_path: &Path, store: Option<PathBuf>, toggle: bool) -> Result<()> {
    let config = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let store = store.unwrap_or_else(|| config.root.join(PREFERENCES_FILE));

    let (mode, source) = resolve(&config, FileStore::new(&store), SystemScheme, toggle)?;

    let origin = match source {
        PreferenceSource::Explicit => "saved preference",
        PreferenceSource::Ambient => "system setting",
    };
    tracing::info!("Theme: {} ({})", mode, origin);
    tracing::debug!("Preferences: {}", store.display());

    Ok(())
}

/// Attach a toggle over `store` and `scheme`, optionally activating it once.
pub fn resolve<C: ColorScheme>(
    config: &SiteConfig,
    store: FileStore,
    scheme: C,
    toggle: bool,
) -> Result<(ThemeMode, PreferenceSource)> {
    let mut control = ThemeToggle::new(
        config.toggle.clone(),
        store,
        scheme,
        RootClassList::new(),
        DetachedSurface::new(),
    );

    let mut mode = control.attach().context("Failed to render the toggle")?;
    if toggle {
        mode = control.activate();
    }

    Ok((mode, control.source()))
}
