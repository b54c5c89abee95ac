//! Theme mode and toggle options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two presentation modes the toggle switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// The literal persisted for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// Maps a dark-preference flag onto a mode.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored value is not a known mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode: {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for ThemeMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Where the current mode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// The user chose it and the choice is persisted.
    Explicit,
    /// Inferred from the OS signal, or the light default.
    Ambient,
}

/// Names the toggle uses to talk to its host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleOptions {
    /// Custom element tag name
    pub tag: String,

    /// Key of the persisted preference slot
    pub storage_key: String,

    /// Class placed on the document root while dark mode is active
    pub root_class: String,

    /// Media query that reports the OS dark preference
    pub media_query: String,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self {
            tag: "theme-toggle".to_string(),
            storage_key: "theme".to_string(),
            root_class: "dark".to_string(),
            media_query: "(prefers-color-scheme: dark)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_persisted_literals() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert!("".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn toggled_is_an_involution() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }

    #[test]
    fn options_fill_missing_fields_with_defaults() {
        let options: ToggleOptions = serde_json::from_str(r#"{"root_class": "theme-dark"}"#).unwrap();

        assert_eq!(options.root_class, "theme-dark");
        assert_eq!(options.storage_key, "theme");
        assert_eq!(options.tag, "theme-toggle");
    }
}
