//! Markup for the toggle's encapsulated scope and its host-page snippet.

use minijinja::{context, Environment};

use crate::mode::ThemeMode;

/// Which switch the control currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Shown in dark mode (sun icon)
    SwitchToLight,
    /// Shown in light mode (moon icon)
    SwitchToDark,
}

impl Affordance {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Affordance::SwitchToLight,
            ThemeMode::Light => Affordance::SwitchToDark,
        }
    }

    /// Name of the slot that carries this affordance's icon.
    pub fn slot(self) -> &'static str {
        match self {
            Affordance::SwitchToLight => SUN_SLOT,
            Affordance::SwitchToDark => MOON_SLOT,
        }
    }

    /// Name of the slot hidden while this affordance is shown.
    pub fn hidden_slot(self) -> &'static str {
        match self {
            Affordance::SwitchToLight => MOON_SLOT,
            Affordance::SwitchToDark => SUN_SLOT,
        }
    }

    /// Accessible label of the button.
    pub fn label(self) -> &'static str {
        match self {
            Affordance::SwitchToLight => "Switch to light mode",
            Affordance::SwitchToDark => "Switch to dark mode",
        }
    }
}

pub const SUN_SLOT: &str = "sun-icon";
pub const MOON_SLOT: &str = "moon-icon";

/// Class of the button inside the shadow root.
pub const BUTTON_CLASS: &str = "theme-toggle-button";

/// Class that hides an inactive slot.
pub const HIDDEN_CLASS: &str = "hidden";

/// Renders the control markup with minijinja.
pub struct ControlTemplate {
    env: Environment<'static>,
}

impl ControlTemplate {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("control.html", CONTROL_TEMPLATE)
            .expect("Failed to add control template");

        env.add_template("embed.html", EMBED_TEMPLATE)
            .expect("Failed to add embed template");

        Self { env }
    }

    /// Render the shadow-root contents for `mode`.
    pub fn render(&self, mode: ThemeMode) -> Result<String, minijinja::Error> {
        let affordance = Affordance::for_mode(mode);
        let tmpl = self.env.get_template("control.html")?;

        tmpl.render(context! {
            styles => SHADOW_STYLES,
            button_class => BUTTON_CLASS,
            label => affordance.label(),
            sun_slot => SUN_SLOT,
            moon_slot => MOON_SLOT,
            sun_hidden => affordance != Affordance::SwitchToLight,
            moon_hidden => affordance != Affordance::SwitchToDark,
            hidden_class => HIDDEN_CLASS,
        })
    }

    /// Render the element a host page places, with optional slotted icons.
    ///
    /// Icon markup is inserted verbatim.
    pub fn embed(
        &self,
        tag: &str,
        sun_icon: Option<&str>,
        moon_icon: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("embed.html")?;

        tmpl.render(context! {
            tag => tag,
            sun_slot => SUN_SLOT,
            moon_slot => MOON_SLOT,
            sun_icon => sun_icon,
            moon_icon => moon_icon,
        })
    }
}

impl Default for ControlTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// Styles scoped to the shadow root.
pub const SHADOW_STYLES: &str = r#":host {
  display: inline-block;
}

.theme-toggle-button {
  background: none;
  border: none;
  cursor: pointer;
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 8px;
  border-radius: 50%;
  transition: background-color 0.2s ease;
}

.theme-toggle-button:hover {
  background-color: rgba(163, 163, 163, 0.1);
}

.theme-toggle-button:focus {
  outline: 2px solid #737373;
  outline-offset: 2px;
}

.hidden {
  display: none !important;
}

::slotted(*) {
  width: 24px;
  height: 24px;
  transition: transform 0.3s ease;
}

.theme-toggle-button:active ::slotted(*) {
  transform: scale(0.9);
}"#;

const CONTROL_TEMPLATE: &str = r#"<style>
{{ styles|safe }}
</style>
<button type="button" class="{{ button_class }}" aria-label="{{ label }}">
  <slot name="{{ sun_slot }}"{% if sun_hidden %} class="{{ hidden_class }}"{% endif %}></slot>
  <slot name="{{ moon_slot }}"{% if moon_hidden %} class="{{ hidden_class }}"{% endif %}></slot>
</button>"#;

const EMBED_TEMPLATE: &str = r#"<{{ tag }}>
{%- if sun_icon %}
  <span slot="{{ sun_slot }}">{{ sun_icon|safe }}</span>
{%- endif %}
{%- if moon_icon %}
  <span slot="{{ moon_slot }}">{{ moon_icon|safe }}</span>
{%- endif %}
</{{ tag }}>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dark_mode_offers_light_switch() {
        let markup = ControlTemplate::new().render(ThemeMode::Dark).unwrap();

        assert!(markup.contains(r#"aria-label="Switch to light mode""#));
        assert!(markup.contains(r#"<slot name="sun-icon"></slot>"#));
        assert!(markup.contains(r#"<slot name="moon-icon" class="hidden"></slot>"#));
    }

    #[test]
    fn light_mode_offers_dark_switch() {
        let markup = ControlTemplate::new().render(ThemeMode::Light).unwrap();

        assert!(markup.contains(r#"aria-label="Switch to dark mode""#));
        assert!(markup.contains(r#"<slot name="sun-icon" class="hidden"></slot>"#));
        assert!(markup.contains(r#"<slot name="moon-icon"></slot>"#));
    }

    #[test]
    fn control_markup_carries_scoped_styles() {
        let markup = ControlTemplate::new().render(ThemeMode::Light).unwrap();

        assert!(markup.starts_with("<style>"));
        assert!(markup.contains(":host {"));
        assert!(markup.contains("display: none !important;"));
        assert!(markup.contains(r#"class="theme-toggle-button""#));
    }

    #[test]
    fn embeds_element_with_icons() {
        let snippet = ControlTemplate::new()
            .embed("theme-toggle", Some("<svg id=\"sun\"></svg>"), None)
            .unwrap();

        assert_eq!(
            snippet,
            "<theme-toggle>\n  <span slot=\"sun-icon\"><svg id=\"sun\"></svg></span>\n</theme-toggle>"
        );
    }

    #[test]
    fn embeds_bare_element() {
        let snippet = ControlTemplate::new().embed("dark-switch", None, None).unwrap();

        assert_eq!(snippet, "<dark-switch>\n</dark-switch>");
    }

    #[test]
    fn affordance_slots_are_complementary() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let affordance = Affordance::for_mode(mode);
            assert_ne!(affordance.slot(), affordance.hidden_slot());
        }
        assert_eq!(Affordance::for_mode(ThemeMode::Dark).slot(), SUN_SLOT);
    }
}
