//! Page controllers.
//!
//! Each controller binds one piece of admin behaviour to the document through
//! the [`crate::dom::DomPort`] and [`crate::platform`] ports:
//!
//! - [`preferences`]: theme and sidebar toggles on every admin page.
//! - [`task_list`]: per-row enable/disable and restart buttons on the live
//!   task changelists.
//! - [`auto_refresh`]: the periodic reload bar on the live data changelists.
//!
//! Controllers are independent. [`crate::app::boot`] installs whichever apply
//! to the current page and a failure in one never prevents the others.

pub mod auto_refresh;
pub mod preferences;
pub mod task_list;
