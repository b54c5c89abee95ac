//! Site build driver.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::SiteConfig;
use crate::passthrough::Passthrough;
use crate::patterns::{PatternError, PatternSet};
use crate::stylesheet::StylesheetStep;

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of stylesheets processed
    pub stylesheets: usize,

    /// Number of passthrough files copied
    pub copied: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to process stylesheet: {path}: {message}")]
    CssError { path: String, message: String },

    #[error(transparent)]
    PatternError(#[from] PatternError),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Runs the configured stylesheet steps and passthrough copies.
pub struct SiteBuilder {
    config: SiteConfig,
    passthrough: Passthrough,
}

impl SiteBuilder {
    /// Create a builder, compiling the passthrough patterns.
    pub fn new(config: SiteConfig) -> Result<Self, BuildError> {
        let patterns = PatternSet::new(&config.passthrough.paths)?;
        let passthrough = Passthrough::new(
            patterns,
            &config.root,
            Path::new(&config.dirs.input),
            Path::new(&config.dirs.output),
        );

        Ok(Self {
            config,
            passthrough,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The before-build steps for every configured stylesheet.
    pub fn stylesheet_steps(&self) -> Vec<StylesheetStep> {
        let output_dir = self.config.output_dir();

        self.config
            .stylesheets
            .iter()
            .map(|entry| StylesheetStep {
                input: self.config.root.join(&entry.input),
                output: output_dir.join(&entry.output),
                minify: self.config.build.minify,
            })
            .collect()
    }

    /// Build the site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = self.config.output_dir();

        fs::create_dir_all(&output_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let steps = self.stylesheet_steps();
        for step in &steps {
            step.run()?;
        }

        let copied = self.passthrough.copy()?;

        self.check_layouts();

        let duration = start.elapsed();

        Ok(BuildResult {
            stylesheets: steps.len(),
            copied: copied.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir,
        })
    }

    /// Warn about layout aliases whose target file does not exist.
    ///
    /// Returns the aliases that are missing.
    pub fn check_layouts(&self) -> Vec<String> {
        let mut missing = Vec::new();

        for alias in self.config.layouts.keys() {
            if let Some(path) = self.config.resolve_layout(alias) {
                if !path.exists() {
                    tracing::warn!("Layout '{}' not found at {}", alias, path.display());
                    missing.push(alias.clone());
                }
            }
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scaffold(root: &Path) {
        let src = root.join("src");
        fs::create_dir_all(src.join("styles")).unwrap();
        fs::create_dir_all(src.join("js")).unwrap();
        fs::create_dir_all(src.join("_includes").join("layouts")).unwrap();

        fs::write(src.join("styles").join("global.css"), ".dark { color: white; }").unwrap();
        fs::write(src.join("js").join("global.js"), "// toggle").unwrap();
        fs::write(src.join("_includes").join("layouts").join("base.njk"), "").unwrap();
    }

    fn config(root: &Path) -> SiteConfig {
        SiteConfig {
            root: root.to_path_buf(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn builds_default_site() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let result = SiteBuilder::new(config(temp.path())).unwrap().build().unwrap();

        assert_eq!(result.stylesheets, 1);
        assert_eq!(result.copied, 1);
        assert_eq!(result.output_dir, temp.path().join("dist"));
        assert!(temp.path().join("dist/styles/global.css").exists());
        assert!(temp.path().join("dist/js/global.js").exists());
    }

    #[test]
    fn minify_setting_reaches_stylesheet_steps() {
        let mut config = config(Path::new("/site"));
        config.build.minify = true;

        let steps = SiteBuilder::new(config).unwrap().stylesheet_steps();

        assert_eq!(steps.len(), 1);
        assert!(steps[0].minify);
        assert_eq!(steps[0].input, PathBuf::from("/site/src/styles/global.css"));
        assert_eq!(steps[0].output, PathBuf::from("/site/dist/styles/global.css"));
    }

    #[test]
    fn missing_stylesheet_fails_the_build() {
        let temp = tempdir().unwrap();

        let result = SiteBuilder::new(config(temp.path())).unwrap().build();

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[test]
    fn reports_missing_layouts() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config
            .layouts
            .insert("post".to_string(), "layouts/post.njk".to_string());
        scaffold(temp.path());

        let missing = SiteBuilder::new(config).unwrap().check_layouts();

        assert_eq!(missing, vec!["post".to_string()]);
    }

    #[test]
    fn invalid_passthrough_pattern_is_rejected() {
        let mut config = SiteConfig::default();
        config.passthrough.paths = vec!["src/{js".to_string()];

        assert!(matches!(
            SiteBuilder::new(config),
            Err(BuildError::PatternError(_))
        ));
    }
}
