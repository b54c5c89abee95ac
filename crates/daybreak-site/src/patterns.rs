//! Glob patterns for watch targets and passthrough paths.
//!
//! Patterns are relative to the project root and support `*`, `**`, `?`,
//! `[...]` and `{a,b}` alternation. A leading `./` is ignored.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

/// Error returned for a pattern that cannot be compiled.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern {pattern}: {message}")]
    Invalid { pattern: String, message: String },

    #[error("Unbalanced braces in pattern: {0}")]
    UnbalancedBraces(String),
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    compiled: Vec<Pattern>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let mut set = Self::default();

        for source in patterns {
            let source = source.as_ref();
            let normalized = source.trim_start_matches("./");

            for alternative in expand_braces(normalized)? {
                let pattern = Pattern::new(&alternative).map_err(|e| PatternError::Invalid {
                    pattern: source.to_string(),
                    message: e.to_string(),
                })?;
                set.compiled.push(pattern);
            }
        }

        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Test a path relative to the project root.
    pub fn matches(&self, relative: &Path) -> bool {
        let relative = strip_cur_dir(relative);
        self.compiled
            .iter()
            .any(|p| p.matches_path_with(&relative, MATCH_OPTIONS))
    }

    /// Test an absolute or root-prefixed path against the set.
    pub fn matches_under(&self, root: &Path, path: &Path) -> bool {
        match path.strip_prefix(root) {
            Ok(relative) => self.matches(relative),
            Err(_) => self.matches(path),
        }
    }

    /// Every file under `root` matched by the set, sorted, relative to `root`.
    pub fn expand(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for base in self.walk_bases() {
            let start = root.join(&base);
            if !start.exists() {
                continue;
            }

            for entry in WalkDir::new(&start)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                if self.matches(relative) {
                    found.push(strip_cur_dir(relative));
                }
            }
        }

        found.sort();
        found.dedup();
        found
    }

    /// Literal directory prefixes to start walking from, one per pattern.
    fn walk_bases(&self) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = self
            .compiled
            .iter()
            .map(|p| literal_prefix(p.as_str()))
            .collect();
        bases.sort();
        bases.dedup();

        // Drop bases nested inside another base.
        let mut result: Vec<PathBuf> = Vec::new();
        for base in bases {
            if !result.iter().any(|kept| base.starts_with(kept)) {
                result.push(base);
            }
        }
        result
    }
}

/// Directory part of `pattern` before the first component with a wildcard.
fn literal_prefix(pattern: &str) -> PathBuf {
    let components: Vec<&str> = pattern.split('/').collect();
    let mut prefix = PathBuf::new();

    // The last component is a file name even when it is literal.
    for component in &components[..components.len().saturating_sub(1)] {
        if component.contains(['*', '?', '[']) {
            break;
        }
        prefix.push(component);
    }
    prefix
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Expand `{a,b}` alternation into plain glob patterns.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err(PatternError::UnbalancedBraces(pattern.to_string()));
        }
        return Ok(vec![pattern.to_string()]);
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (offset, ch) in pattern[open..].char_indices() {
        let index = open + offset;
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(index);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(index),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| PatternError::UnbalancedBraces(pattern.to_string()))?;

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];

    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    let mut expanded = Vec::new();
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        let combined = format!("{}{}{}", head, alternative, tail);
        expanded.extend(expand_braces(&combined)?);
    }
    Ok(expanded)
}
