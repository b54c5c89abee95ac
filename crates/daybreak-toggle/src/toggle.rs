//! The theme toggle state machine.

use crate::host::{ColorScheme, PreferenceStore, Surface, ThemeRoot};
use crate::mode::{PreferenceSource, ThemeMode, ToggleOptions};
use crate::view::{Affordance, ControlTemplate};

/// Errors that can occur while attaching the toggle.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("Failed to render toggle markup: {0}")]
    Render(#[from] minijinja::Error),
}

/// A light/dark toggle bound to its host parts.
///
/// Construction does no I/O. [`ThemeToggle::attach`] resolves the initial
/// mode and renders; afterwards only [`ThemeToggle::activate`] and
/// [`ThemeToggle::color_scheme_changed`] move the mode. Each of the three
/// leaves the root flag and the shown affordance matching [`ThemeToggle::mode`]
/// before it returns.
pub struct ThemeToggle<S, C, R, V> {
    options: ToggleOptions,
    store: S,
    scheme: C,
    root: R,
    surface: V,
    template: ControlTemplate,
    mode: ThemeMode,
    attached: bool,
    write_failed: bool,
}

impl<S, C, R, V> ThemeToggle<S, C, R, V>
where
    S: PreferenceStore,
    C: ColorScheme,
    R: ThemeRoot,
    V: Surface,
{
    pub fn new(options: ToggleOptions, store: S, scheme: C, root: R, surface: V) -> Self {
        Self {
            options,
            store,
            scheme,
            root,
            surface,
            template: ControlTemplate::new(),
            mode: ThemeMode::Light,
            attached: false,
            write_failed: false,
        }
    }

    /// Attach hook: run when the control becomes part of the page.
    ///
    /// The mode is resolved on the first call only. Nothing is persisted.
    pub fn attach(&mut self) -> Result<ThemeMode, ToggleError> {
        if !self.attached {
            self.mode = self.initial_mode();
            tracing::debug!(mode = %self.mode, source = ?self.source(), "resolved initial theme");
        }

        let markup = self.template.render(self.mode)?;
        self.surface.render(&markup);
        self.attached = true;
        self.sync();

        Ok(self.mode)
    }

    /// User activation: flip the mode and persist it as explicit.
    pub fn activate(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.root.set_flag(&self.options.root_class, self.mode.is_dark());

        match self.store.save(&self.options.storage_key, self.mode.as_str()) {
            Ok(()) => self.write_failed = false,
            Err(e) => {
                tracing::warn!("Theme preference not persisted, keeping it for this session: {}", e);
                self.write_failed = true;
            }
        }

        self.surface.show(Affordance::for_mode(self.mode));
        tracing::debug!(mode = %self.mode, "theme toggled");

        self.mode
    }

    /// OS preference change. Returns `true` when the new signal was adopted.
    ///
    /// Ignored while an explicit preference is persisted, and before the
    /// first attach.
    pub fn color_scheme_changed(&mut self, prefers_dark: bool) -> bool {
        if !self.attached {
            return false;
        }
        if let Some(explicit) = self.explicit_preference() {
            tracing::debug!(explicit = %explicit, "ignoring OS theme change");
            return false;
        }

        self.mode = ThemeMode::from_prefers_dark(prefers_dark);
        self.sync();
        tracing::debug!(mode = %self.mode, "followed OS theme change");

        true
    }

    /// Re-read the mode from the root flag, for when another control on the
    /// same page moved it. Returns the adopted mode.
    pub fn follow_root(&mut self) -> ThemeMode {
        if !self.attached {
            return self.mode;
        }

        let dark = self.root.has_flag(&self.options.root_class);
        self.mode = ThemeMode::from_prefers_dark(dark);
        self.surface.show(Affordance::for_mode(self.mode));

        self.mode
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn affordance(&self) -> Affordance {
        Affordance::for_mode(self.mode)
    }

    pub fn source(&self) -> PreferenceSource {
        if self.explicit_preference().is_some() {
            PreferenceSource::Explicit
        } else {
            PreferenceSource::Ambient
        }
    }

    /// The persisted choice, if storage is readable and holds a known mode.
    ///
    /// After a write failed this session the stored value is stale and
    /// `None` is returned until a later write succeeds.
    pub fn explicit_preference(&self) -> Option<ThemeMode> {
        if self.write_failed {
            return None;
        }

        let raw = match self.store.load(&self.options.storage_key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::debug!("Theme preference unreadable: {}", e);
                return None;
            }
        };

        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::debug!("Ignoring stored theme preference: {}", e);
                None
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheme(&self) -> &C {
        &self.scheme
    }

    pub fn scheme_mut(&mut self) -> &mut C {
        &mut self.scheme
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    fn initial_mode(&self) -> ThemeMode {
        if let Some(explicit) = self.explicit_preference() {
            return explicit;
        }
        match self.scheme.prefers_dark() {
            Some(prefers_dark) => ThemeMode::from_prefers_dark(prefers_dark),
            None => ThemeMode::Light,
        }
    }

    fn sync(&mut self) {
        self.root.set_flag(&self.options.root_class, self.mode.is_dark());
        self.surface.show(Affordance::for_mode(self.mode));
    }
}
