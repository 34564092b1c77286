//! Periodic page reload for the live data changelists.
//!
//! DESIGN
//! ======
//! [`RefreshTimer`] owns at most one scheduler handle. Every transition
//! drops the previous handle before a new one is created, and dropping the
//! handle cancels the timer, so two reload timers can never overlap.
//! [`AutoRefreshControl`] is the injected bar (status text, interval
//! selector, on/off button) that drives the timer and mirrors its state
//! into [`UiState`].
//!
//! TRADE-OFFS
//! ==========
//! Each tick reloads the whole page rather than fetching rows. The admin
//! already renders the list; a reload keeps filters, ordering and
//! pagination without duplicating any of it here.

#[cfg(test)]
#[path = "auto_refresh_test.rs"]
mod auto_refresh_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AdminUiConfig;
use crate::dom::{self, DomEvent, DomPort};
use crate::error::DomError;
use crate::platform::Scheduler;
use crate::state::ui::{RefreshInterval, RefreshState, UiState};

/// Styling of the injected bar, as rendered by the deployed dashboard.
const BAR_STYLE: &[(&str, &str)] = &[
    ("padding", "10px"),
    ("background-color", "#f8f9fa"),
    ("border", "1px solid #dee2e6"),
    ("border-radius", "4px"),
    ("margin-bottom", "15px"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "space-between"),
];

/// Repeating reload timer with a single active handle.
pub struct RefreshTimer<S: Scheduler> {
    scheduler: Rc<S>,
    tick: Rc<dyn Fn()>,
    state: RefreshState,
    active: Option<S::Handle>,
}

impl<S: Scheduler> RefreshTimer<S> {
    /// Create a stopped timer. Call [`Self::start`] to honour `state.enabled`.
    pub fn new(scheduler: Rc<S>, tick: Rc<dyn Fn()>, state: RefreshState) -> Self {
        Self { scheduler, tick, state: RefreshState { enabled: false, ..state }, active: None }
    }

    /// (Re)schedule at the current interval.
    pub fn start(&mut self) {
        self.active = None;
        let tick = Rc::clone(&self.tick);
        let handle = self.scheduler.every(self.state.interval.duration(), Box::new(move || tick()));
        self.active = Some(handle);
        self.state.enabled = true;
        log::debug!("auto-refresh every {}", self.state.interval);
    }

    pub fn stop(&mut self) {
        self.active = None;
        self.state.enabled = false;
        log::debug!("auto-refresh stopped");
    }

    /// Flip between running and stopped. Returns whether it now runs.
    pub fn toggle(&mut self) -> bool {
        if self.state.enabled {
            self.stop();
        } else {
            self.start();
        }
        self.state.enabled
    }

    /// Change the period; a running timer is rescheduled, a stopped one stays stopped.
    pub fn set_interval(&mut self, interval: RefreshInterval) {
        self.state.interval = interval;
        if self.state.enabled {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }
}

/// The injected auto-refresh bar.
pub struct AutoRefreshControl<D: DomPort, S: Scheduler> {
    dom: Rc<D>,
    config: Rc<AdminUiConfig>,
    state: Rc<RefCell<UiState>>,
    timer: RefreshTimer<S>,
    status: D::Node,
    select: D::Node,
    button: D::Node,
}

impl<D, S> AutoRefreshControl<D, S>
where
    D: DomPort + 'static,
    S: Scheduler + 'static,
{
    /// Insert the bar after the breadcrumbs and start reloading with `tick`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::MissingElement`] when the anchor is absent, in which
    /// case no timer is started, or any [`DomError`] raised while building the bar.
    pub fn install(
        dom: Rc<D>,
        scheduler: Rc<S>,
        tick: Rc<dyn Fn()>,
        state: Rc<RefCell<UiState>>,
        config: Rc<AdminUiConfig>,
    ) -> Result<Rc<RefCell<Self>>, DomError> {
        let settings = &config.auto_refresh;
        let anchor = dom
            .query(None, &settings.anchor_selector)
            .into_iter()
            .next()
            .ok_or_else(|| DomError::MissingElement(settings.anchor_selector.clone()))?;

        let interval = match settings.initial_interval() {
            Ok(interval) => interval,
            Err(err) => {
                log::warn!("{err}; using {}", RefreshInterval::default());
                RefreshInterval::default()
            }
        };
        let initial = RefreshState { enabled: settings.enabled_on_load, interval };

        let labels = &config.labels;
        let bar = dom::element(&*dom, "div", "auto-refresh-control", "")?;
        dom::style(&*dom, &bar, BAR_STYLE)?;
        let status = dom::element(&*dom, "span", "auto-refresh-status", "")?;
        let controls = dom.create("div")?;

        let select = dom.create("select")?;
        dom.set_attr(&select, "id", &settings.select_id)?;
        dom.set_style(&select, "margin-right", "10px")?;
        for option in RefreshInterval::ALL {
            let node = dom::element(&*dom, "option", "", &option.label(labels))?;
            dom.set_attr(&node, "value", &option.secs().to_string())?;
            if option == interval {
                dom.set_attr(&node, "selected", "")?;
            }
            dom.append(&select, &node)?;
        }

        let button = dom::element(&*dom, "button", "button", "")?;
        dom.set_attr(&button, "type", "button")?;

        dom.append(&controls, &select)?;
        dom.append(&controls, &button)?;
        dom.append(&bar, &status)?;
        dom.append(&bar, &controls)?;
        dom.insert_after(&anchor, &bar)?;

        let mut timer = RefreshTimer::new(scheduler, tick, initial);
        if initial.enabled {
            timer.start();
        }

        let control = Self {
            dom: Rc::clone(&dom),
            config: Rc::clone(&config),
            state,
            timer,
            status,
            select: select.clone(),
            button: button.clone(),
        };
        control.sync()?;
        let control = Rc::new(RefCell::new(control));

        let on_change = Rc::clone(&control);
        dom.listen(
            Some(&select),
            DomEvent::Change,
            Box::new(move |_: Option<D::Node>| {
                let mut control = on_change.borrow_mut();
                let raw = control.dom.value(&control.select).unwrap_or_default();
                control.select_interval(&raw);
            }),
        )?;

        let on_click = Rc::clone(&control);
        dom.listen(
            Some(&button),
            DomEvent::Click,
            Box::new(move |_: Option<D::Node>| {
                if let Err(err) = on_click.borrow_mut().toggle() {
                    log::warn!("auto-refresh toggle failed: {err}");
                }
            }),
        )?;

        log::info!("auto-refresh control installed ({}, every {interval})", if initial.enabled { "on" } else { "off" });
        Ok(control)
    }

    /// Start or stop reloading. Returns whether reloading is now on.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the controls cannot be relabelled.
    pub fn toggle(&mut self) -> Result<bool, DomError> {
        let running = self.timer.toggle();
        self.sync()?;
        log::info!("auto-refresh {}", if running { "enabled" } else { "disabled" });
        Ok(running)
    }

    /// Apply a raw selector value (seconds). Unsupported values are ignored.
    pub fn select_interval(&mut self, raw: &str) -> Option<RefreshInterval> {
        let Some(interval) = RefreshInterval::parse(raw) else {
            log::warn!("ignoring unsupported refresh interval {raw:?}");
            return None;
        };
        self.timer.set_interval(interval);
        self.state.borrow_mut().auto_refresh = self.timer.state();
        Some(interval)
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Mirror timer state into [`UiState`] and the status text, button label and class.
    fn sync(&self) -> Result<(), DomError> {
        let refresh = self.timer.state();
        self.state.borrow_mut().auto_refresh = refresh;
        let labels = &self.config.labels;
        let (status, label) = if refresh.enabled {
            (&labels.refresh_on, &labels.disable)
        } else {
            (&labels.refresh_off, &labels.enable)
        };
        self.dom.set_text(&self.status, status);
        self.dom.set_text(&self.button, label);
        self.dom.set_class(&self.button, "primary", refresh.enabled)?;
        self.dom.set_class(&self.button, "default", !refresh.enabled)
    }
}
