//! Theme and sidebar toggles for the dashboard chrome.
//!
//! The two flags are read from durable storage once at load, mirrored into
//! classes on `<body>` plus the icon and tooltip of each toggle button, and
//! written back on every click. On narrow viewports the sidebar button
//! shows/hides an overlay instead of collapsing, and a click anywhere
//! outside the sidebar and its button hides the overlay again.

#[cfg(test)]
#[path = "preferences_test.rs"]
mod preferences_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AdminUiConfig;
use crate::dom::{DomEvent, DomPort};
use crate::error::DomError;
use crate::platform::{Browser, PreferenceStore};
use crate::state::preference::Preference;
use crate::state::ui::UiState;

/// What a sidebar toggle click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidebarChange {
    /// Wide viewport: persisted collapse flag, now this value.
    Collapsed(bool),
    /// Narrow viewport: transient overlay, now this value.
    Overlay(bool),
}

pub struct PreferenceToggler<D: DomPort, B, P> {
    dom: Rc<D>,
    browser: Rc<B>,
    store: Rc<P>,
    state: Rc<RefCell<UiState>>,
    config: Rc<AdminUiConfig>,
    root: D::Node,
    sidebar_toggle: Option<D::Node>,
    theme_toggle: Option<D::Node>,
}

impl<D, B, P> PreferenceToggler<D, B, P>
where
    D: DomPort + 'static,
    B: Browser + 'static,
    P: PreferenceStore + 'static,
{
    /// Locate the body and both toggle buttons. A missing button disables
    /// only its own toggle.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::MissingElement`] when the document has no body.
    pub fn new(
        dom: Rc<D>,
        browser: Rc<B>,
        store: Rc<P>,
        state: Rc<RefCell<UiState>>,
        config: Rc<AdminUiConfig>,
    ) -> Result<Self, DomError> {
        let root = dom.body().ok_or_else(|| DomError::MissingElement("body".to_owned()))?;
        let prefs = &config.preferences;
        let sidebar_toggle = dom.by_id(&prefs.sidebar_toggle_id);
        if sidebar_toggle.is_none() {
            log::warn!("#{} not found; sidebar toggle disabled", prefs.sidebar_toggle_id);
        }
        let theme_toggle = dom.by_id(&prefs.theme_toggle_id);
        if theme_toggle.is_none() {
            log::warn!("#{} not found; theme toggle disabled", prefs.theme_toggle_id);
        }
        Ok(Self { dom, browser, store, state, config, root, sidebar_toggle, theme_toggle })
    }

    /// Restore stored flags and wire the click handlers.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if a restored body class cannot be applied or a
    /// listener cannot be registered.
    pub fn install(self) -> Result<Rc<Self>, DomError> {
        self.restore()?;
        let this = Rc::new(self);

        if let Some(button) = &this.sidebar_toggle {
            let toggler = Rc::clone(&this);
            this.dom.listen(
                Some(button),
                DomEvent::Click,
                Box::new(move |_: Option<D::Node>| {
                    if let Err(err) = toggler.toggle_sidebar() {
                        log::warn!("sidebar toggle failed: {err}");
                    }
                }),
            )?;
        }

        if let Some(button) = &this.theme_toggle {
            let toggler = Rc::clone(&this);
            this.dom.listen(
                Some(button),
                DomEvent::Click,
                Box::new(move |_: Option<D::Node>| {
                    if let Err(err) = toggler.toggle_theme() {
                        log::warn!("theme toggle failed: {err}");
                    }
                }),
            )?;
        }

        let toggler = Rc::clone(&this);
        this.dom.listen(
            None,
            DomEvent::Click,
            Box::new(move |target: Option<D::Node>| {
                if let Err(err) = toggler.handle_document_click(target.as_ref()) {
                    log::warn!("sidebar overlay dismiss failed: {err}");
                }
            }),
        )?;

        log::info!("preference toggles installed");
        Ok(this)
    }

    /// Read both flags from storage and mirror them into state and the DOM.
    ///
    /// Icon and tooltip failures are logged; only the body classes are required.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if a body class cannot be applied.
    pub fn restore(&self) -> Result<(), DomError> {
        let prefs = &self.config.preferences;
        let dark = self.stored(Preference::DarkTheme);
        let collapsed = self.stored(Preference::SidebarCollapsed);
        self.dom.set_class(&self.root, &prefs.dark_class, dark)?;
        self.dom.set_class(&self.root, &prefs.collapsed_class, collapsed)?;
        {
            let mut state = self.state.borrow_mut();
            state.dark_theme = dark;
            state.sidebar_collapsed = collapsed;
        }
        self.decorate_theme(dark);
        self.decorate_sidebar(collapsed);
        log::debug!("restored preferences: dark={dark} collapsed={collapsed}");
        Ok(())
    }

    /// Flip the dark theme. Returns the new value.
    ///
    /// The body class, state and storage change together; the button icon
    /// and tooltip follow, and their failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the body class cannot be changed. State and
    /// storage are left untouched in that case.
    pub fn toggle_theme(&self) -> Result<bool, DomError> {
        let dark = !self.state.borrow().dark_theme;
        self.dom.set_class(&self.root, &self.config.preferences.dark_class, dark)?;
        self.state.borrow_mut().dark_theme = dark;
        self.persist(Preference::DarkTheme, dark);
        self.decorate_theme(dark);
        Ok(dark)
    }

    /// Collapse/expand the sidebar, or on narrow viewports show/hide the overlay.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the body class cannot be changed. State and
    /// storage are left untouched in that case.
    pub fn toggle_sidebar(&self) -> Result<SidebarChange, DomError> {
        if self.is_narrow() {
            let visible = !self.state.borrow().sidebar_overlay;
            self.set_overlay(visible)?;
            return Ok(SidebarChange::Overlay(visible));
        }
        let collapsed = !self.state.borrow().sidebar_collapsed;
        self.dom
            .set_class(&self.root, &self.config.preferences.collapsed_class, collapsed)?;
        self.state.borrow_mut().sidebar_collapsed = collapsed;
        self.persist(Preference::SidebarCollapsed, collapsed);
        self.decorate_sidebar(collapsed);
        Ok(SidebarChange::Collapsed(collapsed))
    }

    /// Hide the overlay when a click lands outside the sidebar and its toggle.
    /// Returns whether the overlay was hidden.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the overlay class cannot be removed.
    pub fn handle_document_click(&self, target: Option<&D::Node>) -> Result<bool, DomError> {
        if !self.state.borrow().sidebar_overlay || !self.is_narrow() {
            return Ok(false);
        }
        let Some(target) = target else {
            return Ok(false);
        };
        let prefs = &self.config.preferences;
        let in_sidebar = self.dom.closest(target, &prefs.sidebar_selector).is_some();
        let on_toggle = self
            .dom
            .closest(target, &format!("#{}", prefs.sidebar_toggle_id))
            .is_some();
        if in_sidebar || on_toggle {
            return Ok(false);
        }
        self.set_overlay(false)?;
        Ok(true)
    }

    fn is_narrow(&self) -> bool {
        self.browser.viewport_width() <= self.config.preferences.narrow_breakpoint_px
    }

    fn stored(&self, pref: Preference) -> bool {
        let key = pref.key(&self.config.preferences);
        pref.decode(self.store.get(key).as_deref())
    }

    fn persist(&self, pref: Preference, on: bool) {
        let key = pref.key(&self.config.preferences);
        if let Err(err) = self.store.set(key, pref.encode(on)) {
            log::warn!("{err}");
        }
    }

    fn set_overlay(&self, visible: bool) -> Result<(), DomError> {
        self.dom
            .set_class(&self.root, &self.config.preferences.overlay_class, visible)?;
        self.state.borrow_mut().sidebar_overlay = visible;
        Ok(())
    }

    fn decorate_theme(&self, dark: bool) {
        let Some(button) = &self.theme_toggle else {
            return;
        };
        let prefs = &self.config.preferences;
        let labels = &self.config.labels;
        let (from, to) = if dark {
            (&prefs.icons.moon, &prefs.icons.sun)
        } else {
            (&prefs.icons.sun, &prefs.icons.moon)
        };
        let title = if dark { &labels.theme_to_light } else { &labels.theme_to_dark };
        if let Err(err) = self.decorate(button, from, to, title) {
            log::warn!("theme toggle icon not updated: {err}");
        }
    }

    fn decorate_sidebar(&self, collapsed: bool) {
        let Some(button) = &self.sidebar_toggle else {
            return;
        };
        let prefs = &self.config.preferences;
        let labels = &self.config.labels;
        let (from, to) = if collapsed {
            (&prefs.icons.close, &prefs.icons.bars)
        } else {
            (&prefs.icons.bars, &prefs.icons.close)
        };
        let title = if collapsed { &labels.sidebar_expand } else { &labels.sidebar_collapse };
        if let Err(err) = self.decorate(button, from, to, title) {
            log::warn!("sidebar toggle icon not updated: {err}");
        }
    }

    /// Swap the glyph class on the button's `<i>` and set its tooltip.
    fn decorate(&self, button: &D::Node, from: &str, to: &str, title: &str) -> Result<(), DomError> {
        self.dom.set_attr(button, "title", title)?;
        if let Some(icon) = self.dom.query(Some(button), "i").first() {
            self.dom.set_class(icon, from, false)?;
            self.dom.set_class(icon, to, true)?;
        }
        Ok(())
    }
}
