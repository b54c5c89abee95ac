//! Host seams for the toggle and their in-memory implementations.

use std::collections::{BTreeSet, HashMap};

use crate::view::Affordance;

/// Errors from a preference store.
///
/// The toggle never surfaces these; a failing store downgrades it to
/// session-only behavior.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Preference storage is unavailable")]
    Unavailable,

    #[error("Preference storage rejected the write: {0}")]
    Rejected(String),

    #[error("Preference storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference storage is corrupt: {0}")]
    Corrupt(String),
}

/// A key-value slot that survives page loads.
pub trait PreferenceStore {
    /// Read the value under `key`; `Ok(None)` when the key is absent.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The operating system dark-preference signal.
pub trait ColorScheme {
    /// `None` when the host cannot report a preference.
    fn prefers_dark(&self) -> Option<bool>;
}

/// The page root element that carries the global theme flag.
pub trait ThemeRoot {
    fn set_flag(&mut self, class: &str, on: bool);

    fn has_flag(&self, class: &str) -> bool;
}

/// The control's encapsulated rendering scope.
pub trait Surface {
    /// Replace the scope's contents with `markup`.
    fn render(&mut self, markup: &str);

    /// Show the slot for `affordance` and hide the other one.
    fn show(&mut self, affordance: Affordance);
}

/// In-memory store, optionally simulating unavailable or full storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read and write fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// A store that reads normally but rejects every write, like a full quota.
    pub fn read_only(key: &str, value: &str) -> Self {
        Self {
            read_only: true,
            ..Self::with(key, value)
        }
    }

    /// A store pre-populated with one entry.
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    /// Raw access for assertions, bypassing availability.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        if self.read_only {
            return Err(StoreError::Rejected("quota exceeded".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A signal with a fixed value that tests and hosts can change by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedScheme(pub Option<bool>);

impl FixedScheme {
    pub fn dark() -> Self {
        Self(Some(true))
    }

    pub fn light() -> Self {
        Self(Some(false))
    }

    pub fn unsupported() -> Self {
        Self(None)
    }

    pub fn set(&mut self, prefers_dark: bool) {
        self.0 = Some(prefers_dark);
    }
}

impl ColorScheme for FixedScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

/// A detached root element modeled by its class list.
#[derive(Debug, Clone, Default)]
pub struct RootClassList {
    classes: BTreeSet<String>,
}

impl RootClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl ThemeRoot for RootClassList {
    fn set_flag(&mut self, class: &str, on: bool) {
        if on {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    fn has_flag(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A surface that records what was rendered and shown.
#[derive(Debug, Clone, Default)]
pub struct DetachedSurface {
    markup: Option<String>,
    shown: Option<Affordance>,
    renders: usize,
}

impl DetachedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// The affordance currently shown, if any.
    pub fn shown(&self) -> Option<Affordance> {
        self.shown
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl Surface for DetachedSurface {
    fn render(&mut self, markup: &str) {
        self.markup = Some(markup.to_string());
        self.renders += 1;
    }

    fn show(&mut self, affordance: Affordance) {
        self.shown = Some(affordance);
    }
}
