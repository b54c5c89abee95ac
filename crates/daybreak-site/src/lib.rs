//! Build wiring for daybreak sites.
//!
//! Reads `site.toml`, runs the before-build stylesheet steps, copies
//! passthrough assets and watches the input directory for rebuilds. Page
//! rendering belongs to the page generator and is not done here.

pub mod builder;
pub mod config;
pub mod passthrough;
pub mod patterns;
pub mod stylesheet;
pub mod watcher;

pub use builder::{BuildError, BuildResult, SiteBuilder};
pub use config::{ConfigError, SiteConfig, StylesheetEntry, CONFIG_FILE};
pub use passthrough::{CopiedFile, Passthrough};
pub use patterns::{PatternError, PatternSet};
pub use stylesheet::StylesheetStep;
pub use watcher::{FileWatcher, WatchError, WatchEvent, WatchFilter};
