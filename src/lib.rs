//! Client-side behaviour for the Deep90 admin dashboard.
//!
//! This crate is compiled to WebAssembly and loaded on every admin page. It
//! restores the theme and sidebar preferences, adds enable/disable and
//! restart buttons to the live task changelists, and injects the periodic
//! reload bar on the live data changelists. The server keeps rendering the
//! pages and answering the task action endpoints; nothing here renders a
//! list of its own.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Page classification and controller boot |
//! | [`controllers`] | Preference toggles, row actions, auto-refresh bar |
//! | [`config`] | Element ids, classes, labels, overridable via JSON |
//! | [`dom`] | [`dom::DomPort`] and its `web-sys` binding |
//! | [`platform`] | Location, cookies, storage and timer ports |
//! | [`net`] | Task action endpoints and response decoding |
//! | [`routing`] | Admin URL to [`routing::PageKind`] |
//! | [`state`] | UI flags, refresh intervals, parsed task rows |
//! | [`error`] | Error types |

pub mod app;
pub mod config;
pub mod controllers;
pub mod dom;
pub mod error;
pub mod net;
pub mod platform;
pub mod routing;
pub mod state;

#[cfg(test)]
mod testing;

#[cfg(feature = "hydrate")]
use wasm_bindgen::prelude::wasm_bindgen;

/// WASM entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    app::run_in_browser();
}
