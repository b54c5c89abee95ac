//! Native hosts: a JSON file store and the OS color scheme.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::host::{ColorScheme, PreferenceStore, StoreError};

/// Preference store backed by a single JSON object on disk.
///
/// The file plays the role of domain-scoped storage: every toggle that
/// shares the path shares preferences. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// The desktop's light/dark setting, read through `dark-light`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemScheme;

impl ColorScheme for SystemScheme {
    fn prefers_dark(&self) -> Option<bool> {
        Some(matches!(dark_light::detect(), dark_light::Mode::Dark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path().join("prefs.json"));

        assert_eq!(store.load("theme").unwrap(), None);
    }

    #[test]
    fn saves_and_preserves_other_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("prefs.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"font": "serif"}"#).unwrap();

        let mut store = FileStore::new(&path);
        store.save("theme", "dark").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.load("font").unwrap().as_deref(), Some("serif"));
    }

    #[test]
    fn creates_parent_directories_on_save() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a").join("b").join("prefs.json");

        let mut store = FileStore::new(&path);
        store.save("theme", "light").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.load("theme"), Err(StoreError::Corrupt(_))));
    }
}
