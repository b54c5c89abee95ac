//! Before-build stylesheet step.

use std::fs;
use std::path::{Path, PathBuf};

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use crate::builder::BuildError;

/// One stylesheet to process into the output directory.
#[derive(Debug, Clone)]
pub struct StylesheetStep {
    pub input: PathBuf,
    pub output: PathBuf,
    pub minify: bool,
}

impl StylesheetStep {
    /// Read, process and write the stylesheet.
    ///
    /// Returns the number of bytes written.
    pub fn run(&self) -> Result<usize, BuildError> {
        let source = fs::read_to_string(&self.input).map_err(|e| {
            BuildError::ReadError(format!("{}: {}", self.input.display(), e))
        })?;

        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let css = process_css(&source, &self.input, self.minify)?;
        fs::write(&self.output, &css).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", self.output.display(), e))
        })?;

        tracing::info!(
            "Processed stylesheet {} -> {}",
            self.input.display(),
            self.output.display()
        );
        Ok(css.len())
    }
}

/// Parse and re-print a stylesheet with lightningcss.
pub fn process_css(source: &str, path: &Path, minify: bool) -> Result<String, BuildError> {
    let css_error = |message: String| BuildError::CssError {
        path: path.display().to_string(),
        message,
    };

    let options = ParserOptions {
        filename: path.display().to_string(),
        ..ParserOptions::default()
    };
    let stylesheet = StyleSheet::parse(source, options).map_err(|e| css_error(e.to_string()))?;

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify,
            ..PrinterOptions::default()
        })
        .map_err(|e| css_error(e.to_string()))?;

    Ok(printed.code)
}
