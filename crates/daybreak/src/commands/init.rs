//! Create a starter site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use daybreak_toggle::{ControlTemplate, ToggleOptions};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing daybreak site...");

    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let layout = base_layout(&ToggleOptions::default())?;
    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG.to_string()),
        (root.join("src/styles/global.css"), DEFAULT_STYLES.to_string()),
        (root.join("src/_includes/layouts/base.njk"), layout),
        (root.join("src/index.njk"), DEFAULT_INDEX.to_string()),
    ];

    for (path, content) in &files {
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    let js_dir = root.join("src/js");
    if !js_dir.exists() {
        fs::create_dir_all(&js_dir).context("Failed to create src/js directory")?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Build the toggle with wasm-pack into src/js, then run 'daybreak build'.");

    Ok(())
}

/// The base layout, with the toggle element embedded in the header.
fn base_layout(options: &ToggleOptions) -> Result<String> {
    let toggle = ControlTemplate::new()
        .embed(&options.tag, Some(SUN_ICON), Some(MOON_ICON))
        .context("Failed to render toggle element")?;

    Ok(BASE_LAYOUT
        .replace("{toggle}", &toggle)
        .replace("{storage_key}", &options.storage_key)
        .replace("{root_class}", &options.root_class))
}

const DEFAULT_CONFIG: &str = r#"# Daybreak configuration

[dirs]
# Page sources
input = "src"

# Built site
output = "dist"

# Layouts and partials, relative to input
includes = "_includes"

[layouts]
base = "layouts/base.njk"

[watch]
targets = ["src/**/*.{css,js,svg,png,jpeg}"]

[passthrough]
paths = ["src/js/*"]

[[stylesheets]]
input = "src/styles/global.css"
output = "styles/global.css"

[build]
minify = false

[toggle]
tag = "theme-toggle"
storage_key = "theme"
root_class = "dark"
"#;

const DEFAULT_STYLES: &str = r#":root {
  --page-bg: #fafafa;
  --page-fg: #171717;
}

.dark {
  --page-bg: #171717;
  --page-fg: #fafafa;
}

body {
  background: var(--page-bg);
  color: var(--page-fg);
  font-family: system-ui, sans-serif;
}
"#;

const DEFAULT_INDEX: &str = r#"---
layout: base
title: Home
---

<h1>Hello</h1>
"#;

// The inline script applies a stored dark choice before first paint.
const BASE_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <script>
    if (localStorage.getItem("{storage_key}") === "dark") {
      document.documentElement.classList.add("{root_class}");
    }
  </script>
  <link rel="stylesheet" href="/styles/global.css">
</head>
<body>
  <header>
    {toggle}
  </header>
  <main>
    {{ content | safe }}
  </main>
  <script type="module">
    import init, { mountThemeToggles } from "/js/daybreak_toggle.js";
    await init();
    mountThemeToggles();
  </script>
</body>
</html>
"#;

const SUN_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><circle cx="12" cy="12" r="5"/><path d="M12 1v2M12 21v2M4.22 4.22l1.42 1.42M18.36 18.36l1.42 1.42M1 12h2M21 12h2M4.22 19.78l1.42-1.42M18.36 5.64l1.42-1.42"/></svg>"#;

const MOON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/></svg>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use daybreak_site::SiteConfig;
    use tempfile::tempdir;

    #[test]
    fn default_config_parses_to_defaults() {
        let parsed = SiteConfig::parse(DEFAULT_CONFIG).unwrap();

        assert_eq!(parsed, SiteConfig::default());
    }

    #[test]
    fn layout_embeds_toggle_with_both_icons() {
        let layout = base_layout(&ToggleOptions::default()).unwrap();

        assert!(layout.contains("<theme-toggle>"));
        assert!(layout.contains(r#"<span slot="sun-icon"><svg"#));
        assert!(layout.contains(r#"<span slot="moon-icon"><svg"#));
        assert!(layout.contains(r#"localStorage.getItem("theme")"#));
        assert!(layout.contains("{{ content | safe }}"));
    }

    #[test]
    fn scaffolds_buildable_site() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("site.toml");

        run(&config_path, false).unwrap();

        assert!(config_path.exists());
        assert!(temp.path().join("src/_includes/layouts/base.njk").exists());
        assert!(temp.path().join("src/js").is_dir());

        let config = SiteConfig::load(&config_path).unwrap();
        assert!(daybreak_site::SiteBuilder::new(config)
            .unwrap()
            .check_layouts()
            .is_empty());
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("site.toml");
        fs::write(&config_path, "# mine\n").unwrap();

        run(&config_path, false).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine\n");

        run(&config_path, true).unwrap();
        assert!(fs::read_to_string(&config_path).unwrap().contains("[dirs]"));
    }
}
