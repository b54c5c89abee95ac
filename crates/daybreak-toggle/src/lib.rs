//! Light/dark theme toggle element with a persisted preference.
//!
//! The toggle is written against four host seams so the same state machine
//! drives the browser element and the in-memory hosts used in tests:
//!
//! - [`PreferenceStore`]: where an explicit choice is persisted
//! - [`ColorScheme`]: the operating system dark-preference signal
//! - [`ThemeRoot`]: the page root that carries the theme class
//! - [`Surface`]: the control's encapsulated rendering scope
//!
//! Enable the `web` feature for the `web-sys` bindings and
//! `mount_theme_toggles`.

pub mod host;
pub mod mode;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod toggle;
pub mod view;
#[cfg(feature = "web")]
pub mod web;

pub use host::{
    ColorScheme, DetachedSurface, FixedScheme, MemoryStore, PreferenceStore, RootClassList,
    StoreError, Surface, ThemeRoot,
};
pub use mode::{PreferenceSource, ThemeMode, ToggleOptions};
#[cfg(not(target_arch = "wasm32"))]
pub use native::{FileStore, SystemScheme};
pub use toggle::{ThemeToggle, ToggleError};
pub use view::{Affordance, ControlTemplate};
