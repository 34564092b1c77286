//! Backend calls made by the task list controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds endpoint URLs, reads the CSRF token and performs the POST;
//! `types` defines the JSON body the admin views answer with.

pub mod api;
pub mod types;
