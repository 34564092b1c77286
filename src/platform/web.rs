//! Browser bindings for the platform ports.
//!
//! TRADE-OFFS
//! ==========
//! `window` calls that throw are logged and treated as no-ops; a failed
//! reload or alert must not take down the rest of the controllers.

use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage, Window};

use super::{Browser, MemoryStore, PreferenceStore, Scheduler};
use crate::error::{DomError, StorageError};

/// The current browser window.
pub struct WebBrowser {
    window: Window,
}

impl WebBrowser {
    /// # Errors
    ///
    /// Returns [`DomError::NoWindow`] outside a page context.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        Ok(Self { window })
    }
}

impl Browser for WebBrowser {
    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn cookies(&self) -> String {
        self.window
            .document()
            .and_then(|doc| doc.dyn_ref::<HtmlDocument>().map(HtmlDocument::cookie))
            .map(Result::unwrap_or_default)
            .unwrap_or_default()
    }

    fn viewport_width(&self) -> f64 {
        match self.window.inner_width() {
            Ok(width) => width.as_f64().unwrap_or_default(),
            Err(err) => {
                log::warn!("innerWidth unavailable: {err:?}");
                0.0
            }
        }
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            log::warn!("reload failed: {err:?}");
        }
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {err:?}");
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when storage is disabled or absent.
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is null".to_owned())),
            Err(err) => Err(StorageError::Unavailable(format!("{err:?}"))),
        }
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("localStorage read of {key} failed: {err:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Write { key: key.to_owned(), reason: format!("{err:?}") })
    }
}

/// `localStorage` when the page may use it, otherwise a page-lifetime map.
pub enum BrowserStore {
    Local(LocalStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match LocalStore::new() {
            Ok(store) => Self::Local(store),
            Err(err) => {
                log::warn!("{err}; preferences will not survive a reload");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Local(store) => store.get(key),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(store) => store.set(key, value),
            Self::Memory(store) => store.set(key, value),
        }
    }
}

/// Repeating timers backed by `setInterval`; dropping the [`Interval`] clears it.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
    type Handle = Interval;

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> Interval {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Interval::new(millis, tick)
    }
}
