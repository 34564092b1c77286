//! Client-side state models.
//!
//! DESIGN
//! ======
//! State is plain data so controllers can share one `Rc<RefCell<UiState>>`
//! and tests can assert on it without a document. Nothing here touches the
//! browser; the controllers mirror these values into the DOM.

pub mod preference;
pub mod task_row;
pub mod ui;
