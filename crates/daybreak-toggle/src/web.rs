//! Browser bindings for the toggle.
//!
//! [`mount_theme_toggles`] is the attach hook: it upgrades every element
//! with the configured tag name, gives it an open shadow root, and wires the
//! click and `prefers-color-scheme` listeners for the page lifetime. All
//! mounted toggles track the one root flag.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MediaQueryList, ShadowRoot, ShadowRootInit, ShadowRootMode, Storage};

use crate::host::{ColorScheme, PreferenceStore, StoreError, Surface, ThemeRoot};
use crate::mode::ToggleOptions;
use crate::toggle::ThemeToggle;
use crate::view::{Affordance, BUTTON_CLASS, HIDDEN_CLASS};

/// Marks hosts that already carry a mounted toggle.
const MOUNTED_ATTR: &str = "data-theme-toggle-mounted";

type WebToggle = ThemeToggle<LocalStorage, MediaQuery, DocumentRoot, ShadowSurface>;

thread_local! {
    /// Every toggle mounted on this page. They share the root flag, so a click
    /// on one has to refresh the others.
    static MOUNTED: RefCell<Vec<Rc<RefCell<WebToggle>>>> = const { RefCell::new(Vec::new()) };
}

/// `window.localStorage`, or nothing when the browser denies it.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self {
            storage: web_sys::window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StoreError::Rejected(describe(&e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected(describe(&e)))
    }
}

/// A `matchMedia` query for the OS dark preference.
pub struct MediaQuery {
    list: Option<MediaQueryList>,
}

impl MediaQuery {
    pub fn new(query: &str) -> Self {
        Self {
            list: web_sys::window().and_then(|w| w.match_media(query).ok().flatten()),
        }
    }

    /// Call `on_change` with the new value every time the query flips.
    ///
    /// Returns `false` when the browser offers no query to listen to.
    pub fn subscribe(&self, mut on_change: impl FnMut(bool) + 'static) -> bool {
        let Some(list) = self.list.clone() else {
            return false;
        };

        let reader = list.clone();
        let listener = Closure::<dyn FnMut()>::new(move || on_change(reader.matches()));
        let added = list
            .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
            .is_ok();
        listener.forget();

        added
    }
}

impl ColorScheme for MediaQuery {
    fn prefers_dark(&self) -> Option<bool> {
        self.list.as_ref().map(MediaQueryList::matches)
    }
}

/// `document.documentElement`.
pub struct DocumentRoot {
    root: Option<Element>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self {
            root: web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element()),
        }
    }
}

impl Default for DocumentRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRoot for DocumentRoot {
    fn set_flag(&mut self, class: &str, on: bool) {
        if let Some(root) = &self.root {
            let _ = root.class_list().toggle_with_force(class, on);
        }
    }

    fn has_flag(&self, class: &str) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.class_list().contains(class))
    }
}

/// An open shadow root on the toggle's host element.
pub struct ShadowSurface {
    shadow: ShadowRoot,
}

impl ShadowSurface {
    /// Reuse the host's shadow root, or attach a new open one.
    pub fn attach(host: &Element) -> Result<Self, JsValue> {
        let shadow = match host.shadow_root() {
            Some(shadow) => shadow,
            None => host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?,
        };
        Ok(Self { shadow })
    }

    pub fn button(&self) -> Option<Element> {
        self.query(&format!(".{}", BUTTON_CLASS))
    }

    fn slot(&self, name: &str) -> Option<Element> {
        self.query(&format!("slot[name=\"{}\"]", name))
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.shadow.query_selector(selector).ok().flatten()
    }
}

impl Surface for ShadowSurface {
    fn render(&mut self, markup: &str) {
        self.shadow.set_inner_html(markup);
    }

    fn show(&mut self, affordance: Affordance) {
        if let Some(slot) = self.slot(affordance.slot()) {
            let _ = slot.class_list().toggle_with_force(HIDDEN_CLASS, false);
        }
        if let Some(slot) = self.slot(affordance.hidden_slot()) {
            let _ = slot.class_list().toggle_with_force(HIDDEN_CLASS, true);
        }
        if let Some(button) = self.button() {
            let _ = button.set_attribute("aria-label", affordance.label());
        }
    }
}

/// Mount every `<theme-toggle>` on the page with default options.
///
/// Returns how many elements were mounted by this call.
#[wasm_bindgen(js_name = mountThemeToggles)]
pub fn mount_theme_toggles() -> u32 {
    mount_with(&ToggleOptions::default())
}

/// Mount every element named `options.tag` that is not mounted yet.
pub fn mount_with(options: &ToggleOptions) -> u32 {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return 0;
    };

    let hosts = document.get_elements_by_tag_name(&options.tag);
    let mut mounted = 0;

    for index in 0..hosts.length() {
        let Some(host) = hosts.item(index) else {
            continue;
        };
        if host.has_attribute(MOUNTED_ATTR) {
            continue;
        }

        match mount(&host, options) {
            Ok(()) => {
                let _ = host.set_attribute(MOUNTED_ATTR, "");
                mounted += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to mount <{}>: {}", options.tag, describe(&e));
            }
        }
    }

    mounted
}

fn mount(host: &Element, options: &ToggleOptions) -> Result<(), JsValue> {
    let surface = ShadowSurface::attach(host)?;
    let toggle: Rc<RefCell<WebToggle>> = Rc::new(RefCell::new(ThemeToggle::new(
        options.clone(),
        LocalStorage::new(),
        MediaQuery::new(&options.media_query),
        DocumentRoot::new(),
        surface,
    )));

    toggle
        .borrow_mut()
        .attach()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let button = toggle
        .borrow()
        .surface()
        .button()
        .ok_or_else(|| JsValue::from_str("toggle button missing from shadow root"))?;

    let clicked = Rc::clone(&toggle);
    let on_click = Closure::<dyn FnMut()>::new(move || {
        clicked.borrow_mut().activate();
        refresh_others(&clicked);
    });
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let notified = Rc::clone(&toggle);
    let subscribed = toggle.borrow().scheme().subscribe(move |prefers_dark| {
        let adopted = notified.borrow_mut().color_scheme_changed(prefers_dark);
        if adopted {
            refresh_others(&notified);
        }
    });
    if !subscribed {
        tracing::debug!("No color scheme query available; OS changes will not be followed");
    }

    MOUNTED.with(|mounted| mounted.borrow_mut().push(toggle));

    Ok(())
}

fn refresh_others(changed: &Rc<RefCell<WebToggle>>) {
    MOUNTED.with(|mounted| {
        for other in mounted.borrow().iter() {
            if !Rc::ptr_eq(other, changed) {
                other.borrow_mut().follow_root();
            }
        }
    });
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::mode::ThemeMode;
    use crate::view::{ControlTemplate, MOON_SLOT, SUN_SLOT};
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    wasm_bindgen_test_configure!(run_in_browser);

    fn host(tag: &str) -> Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let element = document.create_element(tag).unwrap();
        document
            .document_element()
            .unwrap()
            .append_child(&element)
            .unwrap();
        element
    }

    fn options(tag: &str) -> ToggleOptions {
        let options = ToggleOptions {
            tag: tag.to_string(),
            storage_key: format!("{}-theme", tag),
            ..ToggleOptions::default()
        };
        if let Some(storage) = LocalStorage::new().storage {
            storage.remove_item(&options.storage_key).unwrap();
        }
        options
    }

    fn is_hidden(surface: &ShadowSurface, slot: &str) -> bool {
        surface
            .slot(slot)
            .unwrap()
            .class_list()
            .contains(HIDDEN_CLASS)
    }

    fn click(host: &Element) {
        let button = ShadowSurface::attach(host).unwrap().button().unwrap();
        button.dyn_into::<HtmlElement>().unwrap().click();
    }

    #[wasm_bindgen_test]
    fn show_swaps_hidden_slot_and_label() {
        let mut surface = ShadowSurface::attach(&host("show-toggle")).unwrap();
        surface.render(&ControlTemplate::new().render(ThemeMode::Light).unwrap());

        surface.show(Affordance::SwitchToLight);
        assert!(!is_hidden(&surface, SUN_SLOT));
        assert!(is_hidden(&surface, MOON_SLOT));
        assert_eq!(
            surface.button().unwrap().get_attribute("aria-label").as_deref(),
            Some("Switch to light mode")
        );

        surface.show(Affordance::SwitchToDark);
        assert!(is_hidden(&surface, SUN_SLOT));
        assert!(!is_hidden(&surface, MOON_SLOT));
    }

    #[wasm_bindgen_test]
    fn mounting_twice_is_a_no_op() {
        let options = options("mount-toggle");
        let element = host(&options.tag);

        assert_eq!(mount_with(&options), 1);
        assert!(element.has_attribute(MOUNTED_ATTR));
        assert_eq!(mount_with(&options), 0);
    }

    #[wasm_bindgen_test]
    fn click_keeps_every_mounted_toggle_in_agreement() {
        let options = options("pair-toggle");
        let first = host(&options.tag);
        let second = host(&options.tag);
        assert_eq!(mount_with(&options), 2);

        let root = DocumentRoot::new();
        let before = root.has_flag(&options.root_class);

        click(&first);

        let dark = root.has_flag(&options.root_class);
        assert_ne!(dark, before);
        let expected = Affordance::for_mode(ThemeMode::from_prefers_dark(dark));
        for element in [&first, &second] {
            let surface = ShadowSurface::attach(element).unwrap();
            assert!(!is_hidden(&surface, expected.slot()));
            assert!(is_hidden(&surface, expected.hidden_slot()));
        }
    }
}
