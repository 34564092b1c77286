//! Browser environment ports: location, cookies, storage, timers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything a controller needs from `window` besides the document goes
//! through these traits. The `web` submodule binds them to `web-sys` and
//! `gloo-timers`; tests substitute in-memory fakes.

#[cfg(feature = "hydrate")]
pub mod web;


use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::error::StorageError;

/// Page-level browser capabilities.
pub trait Browser {
    /// `location.pathname`.
    fn pathname(&self) -> String;

    /// Raw `document.cookie` string.
    fn cookies(&self) -> String;

    /// `window.innerWidth` in CSS pixels.
    fn viewport_width(&self) -> f64;

    fn reload(&self);

    /// Blocking user-visible message.
    fn alert(&self, message: &str);

    /// Run a future on the page's event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Durable string key-value store for UI preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store rejects the write
    /// (quota, private browsing).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Starts repeating timers. Dropping the returned handle cancels the timer.
pub trait Scheduler {
    type Handle;

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// In-memory [`PreferenceStore`], used when `localStorage` is unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing values.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self { values: RefCell::new(values) }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
