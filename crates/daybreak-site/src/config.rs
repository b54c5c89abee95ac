//! Site configuration (`site.toml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use daybreak_toggle::ToggleOptions;
use serde::Deserialize;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "site.toml";

/// Parsed `site.toml`.
///
/// Every path in the file is relative to the project root, the directory
/// holding the file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(skip)]
    pub root: PathBuf,

    pub dirs: Dirs,

    /// Layout alias to path under the includes directory
    pub layouts: BTreeMap<String, String>,

    pub watch: WatchSettings,

    pub passthrough: PassthroughSettings,

    /// Before-build stylesheet steps
    pub stylesheets: Vec<StylesheetEntry>,

    pub build: BuildSettings,

    pub toggle: ToggleOptions,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dirs {
    pub input: String,
    pub output: String,
    /// Relative to `input`
    pub includes: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchSettings {
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PassthroughSettings {
    pub paths: Vec<String>,
}

/// One stylesheet processed before each build.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StylesheetEntry {
    /// Source file, relative to the project root
    pub input: String,
    /// Destination, relative to the output directory
    pub output: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub minify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut layouts = BTreeMap::new();
        layouts.insert("base".to_string(), "layouts/base.njk".to_string());

        Self {
            root: PathBuf::from("."),
            dirs: Dirs::default(),
            layouts,
            watch: WatchSettings::default(),
            passthrough: PassthroughSettings::default(),
            stylesheets: vec![StylesheetEntry {
                input: "src/styles/global.css".to_string(),
                output: "styles/global.css".to_string(),
            }],
            build: BuildSettings::default(),
            toggle: ToggleOptions::default(),
        }
    }
}

impl Default for Dirs {
    fn default() -> Self {
        Self {
            input: "src".to_string(),
            output: "dist".to_string(),
            includes: "_includes".to_string(),
        }
    }
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            targets: vec!["src/**/*.{css,js,svg,png,jpeg}".to_string()],
        }
    }
}

impl Default for PassthroughSettings {
    fn default() -> Self {
        Self {
            paths: vec!["src/js/*".to_string()],
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl SiteConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults rooted at the file's directory; a
    /// malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        config.root = root;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text, rooted at the current directory.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join(&self.dirs.input)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.dirs.output)
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.input_dir().join(&self.dirs.includes)
    }

    /// Path of the layout registered under `alias`.
    pub fn resolve_layout(&self, alias: &str) -> Option<PathBuf> {
        self.layouts
            .get(alias)
            .map(|target| self.includes_dir().join(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_stock_site_layout() {
        let config = SiteConfig::default();

        assert_eq!(config.dirs.input, "src");
        assert_eq!(config.dirs.output, "dist");
        assert_eq!(config.passthrough.paths, vec!["src/js/*"]);
        assert_eq!(config.watch.targets, vec!["src/**/*.{css,js,svg,png,jpeg}"]);
        assert_eq!(config.stylesheets.len(), 1);
        assert!(!config.build.minify);
        assert_eq!(
            config.resolve_layout("base"),
            Some(PathBuf::from("./src/_includes/layouts/base.njk"))
        );
    }

    #[test]
    fn parses_partial_config() {
        let config = SiteConfig::parse(
            r#"
[dirs]
output = "public"

[layouts]
post = "layouts/post.njk"

[[stylesheets]]
input = "assets/site.css"
output = "css/site.css"

[build]
minify = true

[toggle]
root_class = "theme-dark"
"#,
        )
        .unwrap();

        assert_eq!(config.dirs.input, "src");
        assert_eq!(config.dirs.output, "public");
        assert!(config.layouts.contains_key("post"));
        assert!(!config.layouts.contains_key("base"));
        assert_eq!(config.stylesheets[0].input, "assets/site.css");
        assert!(config.build.minify);
        assert_eq!(config.toggle.root_class, "theme-dark");
        assert_eq!(config.toggle.storage_key, "theme");
    }

    #[test]
    fn missing_file_uses_defaults_rooted_at_its_directory() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::load(&temp.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.root, temp.path());
        assert_eq!(config.output_dir(), temp.path().join("dist"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[dirs\ninput = ").unwrap();

        let result = SiteConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_layout_alias_resolves_to_none() {
        assert_eq!(SiteConfig::default().resolve_layout("missing"), None);
    }
}
