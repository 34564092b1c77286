//! Page boot: pick the controllers for the current admin page and install them.
//!
//! SYSTEM CONTEXT
//! ==============
//! The same bundle is loaded on every admin page. [`boot`] classifies the
//! path and installs the preference toggles everywhere, row actions on the
//! live task changelists, and the reload bar on the live data changelists.
//! It is generic over the ports so the whole wiring runs under `cargo test`;
//! [`run_in_browser`] supplies the `web-sys` implementations.
//!
//! ERROR HANDLING
//! ==============
//! Every controller failure is logged at `warn` and leaves that controller
//! out of [`Mounted`]. The page keeps working with whatever did install.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AdminUiConfig;
use crate::controllers::auto_refresh::AutoRefreshControl;
use crate::controllers::preferences::PreferenceToggler;
use crate::controllers::task_list::{AugmentReport, TaskListAugmenter};
use crate::dom::DomPort;
use crate::net::api::TaskApi;
use crate::platform::{Browser, PreferenceStore, Scheduler};
use crate::routing::{classify, PageRoute};
use crate::state::ui::UiState;

/// Port implementations handed to [`boot`].
pub struct Services<D, B, P, A, S> {
    pub dom: Rc<D>,
    pub browser: Rc<B>,
    pub store: Rc<P>,
    pub api: Rc<A>,
    pub scheduler: Rc<S>,
}

/// What [`boot`] installed on this page.
pub struct Mounted<D: DomPort, B, P, S: Scheduler> {
    pub route: PageRoute,
    pub state: Rc<RefCell<UiState>>,
    pub preferences: Option<Rc<PreferenceToggler<D, B, P>>>,
    pub rows: Option<AugmentReport>,
    pub auto_refresh: Option<Rc<RefCell<AutoRefreshControl<D, S>>>>,
}

/// Install every controller that applies to the current page.
pub fn boot<D, B, P, A, S>(services: Services<D, B, P, A, S>, config: Rc<AdminUiConfig>) -> Mounted<D, B, P, S>
where
    D: DomPort + 'static,
    B: Browser + 'static,
    P: PreferenceStore + 'static,
    A: TaskApi + 'static,
    S: Scheduler + 'static,
{
    let Services { dom, browser, store, api, scheduler } = services;
    let state = Rc::new(RefCell::new(UiState::default()));
    let route = classify(&browser.pathname(), &config.task_list);
    log::debug!("page route: {route:?}");

    let preferences = match PreferenceToggler::new(
        Rc::clone(&dom),
        Rc::clone(&browser),
        store,
        Rc::clone(&state),
        Rc::clone(&config),
    )
    .and_then(PreferenceToggler::install)
    {
        Ok(toggler) => Some(toggler),
        Err(err) => {
            log::warn!("preference toggles not installed: {err}");
            None
        }
    };

    let rows = route.augments_rows().and_then(|category| {
        let augmenter = TaskListAugmenter::new(Rc::clone(&dom), Rc::clone(&browser), api, Rc::clone(&config));
        match augmenter.augment(category) {
            Ok(report) => Some(report),
            Err(err) => {
                log::warn!("task list augmentation failed: {err}");
                None
            }
        }
    });

    let auto_refresh = if route.auto_refreshes() {
        let reload = Rc::clone(&browser);
        let tick: Rc<dyn Fn()> = Rc::new(move || reload.reload());
        match AutoRefreshControl::install(dom, scheduler, tick, Rc::clone(&state), config) {
            Ok(control) => Some(control),
            Err(err) => {
                log::warn!("auto-refresh not installed: {err}");
                None
            }
        }
    } else {
        None
    };

    Mounted { route, state, preferences, rows, auto_refresh }
}

/// Browser entry: boot once the DOM is parsed.
///
/// Config and logging are set up in [`mount`] too, since the config block
/// may sit after the script tag.
#[cfg(feature = "hydrate")]
pub fn run_in_browser() {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    use crate::dom::web::WebDom;

    let dom = match WebDom::new() {
        Ok(dom) => dom,
        Err(err) => {
            web_sys::console::error_1(&format!("admin ui: {err}").into());
            return;
        }
    };
    if dom.document().ready_state() != "loading" {
        mount();
        return;
    }
    let on_ready = Closure::once_into_js(mount);
    if let Err(err) = dom
        .document()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
    {
        web_sys::console::error_1(&format!("admin ui: could not wait for DOMContentLoaded: {err:?}").into());
    }
}

#[cfg(feature = "hydrate")]
fn init_logging(config: &AdminUiConfig) {
    let level = config.level().unwrap_or(log::Level::Info);
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("admin ui logger: {err}").into());
    }
}

#[cfg(feature = "hydrate")]
fn mount() {
    use crate::config::{CONFIG_ELEMENT_ID, load_config};
    use crate::dom::web::WebDom;
    use crate::net::api::GlooTaskApi;
    use crate::platform::web::{BrowserStore, IntervalScheduler, WebBrowser};

    let (dom, browser) = match (WebDom::new(), WebBrowser::new()) {
        (Ok(dom), Ok(browser)) => (dom, browser),
        (Err(err), _) | (_, Err(err)) => {
            web_sys::console::error_1(&format!("admin ui not started: {err}").into());
            return;
        }
    };

    let raw = dom.by_id(CONFIG_ELEMENT_ID).map(|node| dom.text(&node));
    let (config, config_err) = load_config(raw.as_deref());
    init_logging(&config);
    if let Some(err) = config_err {
        log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
    }
    let config = Rc::new(config);

    let services = Services {
        dom: Rc::new(dom),
        browser: Rc::new(browser),
        store: Rc::new(BrowserStore::open()),
        api: Rc::new(GlooTaskApi::new(config.task_list.csrf_header.clone())),
        scheduler: Rc::new(IntervalScheduler),
    };
    let mounted = boot(services, config);
    log::info!(
        "admin ui ready: {:?} (toggles: {}, rows: {:?}, auto-refresh: {})",
        mounted.route.kind,
        mounted.preferences.is_some(),
        mounted.rows.map(|r| r.augmented),
        mounted.auto_refresh.is_some()
    );
}
