//! Passthrough copying of static assets.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::builder::BuildError;
use crate::patterns::PatternSet;

/// Copies files matched by the passthrough patterns into the output.
#[derive(Debug, Clone)]
pub struct Passthrough {
    patterns: PatternSet,
    root: PathBuf,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

/// A file copied by [`Passthrough::copy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Passthrough {
    /// `input_dir` and `output_dir` are relative to `root`.
    pub fn new(patterns: PatternSet, root: &Path, input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            patterns,
            root: root.to_path_buf(),
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Output location for a matched file, relative paths as seen from the root.
    ///
    /// Files under the input directory lose that prefix; anything else keeps
    /// its path relative to the root.
    pub fn destination_for(&self, relative: &Path) -> PathBuf {
        let input = self
            .input_dir
            .strip_prefix(".")
            .unwrap_or(self.input_dir.as_path())
            .to_path_buf();
        let within = relative.strip_prefix(&input).unwrap_or(relative);
        self.root.join(&self.output_dir).join(within)
    }

    /// Copy every matched file, returning what was copied.
    pub fn copy(&self) -> Result<Vec<CopiedFile>, BuildError> {
        let files = self.patterns.expand(&self.root);

        let copied: Vec<Result<CopiedFile, BuildError>> = files
            .par_iter()
            .map(|relative| self.copy_one(relative))
            .collect();

        let copied = copied.into_iter().collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Copied {} passthrough files", copied.len());
        Ok(copied)
    }

    fn copy_one(&self, relative: &Path) -> Result<CopiedFile, BuildError> {
        let source = self.root.join(relative);
        let destination = self.destination_for(relative);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::copy(&source, &destination).map_err(|e| {
            BuildError::WriteError(format!(
                "{} -> {}: {}",
                source.display(),
                destination.display(),
                e
            ))
        })?;

        Ok(CopiedFile {
            source,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn passthrough(root: &Path, patterns: &[&str]) -> Passthrough {
        Passthrough::new(
            PatternSet::new(patterns).unwrap(),
            root,
            Path::new("src"),
            Path::new("dist"),
        )
    }

    #[test]
    fn strips_input_dir_from_destination() {
        let p = passthrough(Path::new("/site"), &["src/js/*"]);

        assert_eq!(
            p.destination_for(Path::new("src/js/global.js")),
            PathBuf::from("/site/dist/js/global.js")
        );
        assert_eq!(
            p.destination_for(Path::new("assets/robots.txt")),
            PathBuf::from("/site/dist/assets/robots.txt")
        );
    }

    #[test]
    fn copies_matched_files() {
        let temp = tempdir().unwrap();
        let js = temp.path().join("src").join("js");
        fs::create_dir_all(&js).unwrap();
        fs::write(js.join("global.js"), "customElements;").unwrap();
        fs::write(temp.path().join("src").join("index.njk"), "").unwrap();

        let copied = passthrough(temp.path(), &["./src/js/*"]).copy().unwrap();

        assert_eq!(copied.len(), 1);
        let out = temp.path().join("dist").join("js").join("global.js");
        assert_eq!(copied[0].destination, out);
        assert_eq!(fs::read_to_string(out).unwrap(), "customElements;");
        assert!(!temp.path().join("dist").join("index.njk").exists());
    }

    #[test]
    fn nothing_to_copy_is_not_an_error() {
        let temp = tempdir().unwrap();

        let copied = passthrough(temp.path(), &["src/js/*"]).copy().unwrap();

        assert!(copied.is_empty());
    }
}
