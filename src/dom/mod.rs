//! Minimal DOM port used by the controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Controllers only ever select, create, append, toggle classes, set text and
//! listen for clicks. Putting exactly that surface behind [`DomPort`] keeps the
//! augmentation and toggle logic runnable under `cargo test` with an in-memory
//! document, while [`web::WebDom`] forwards to `web-sys` in the browser.

#[cfg(feature = "hydrate")]
pub mod web;

use crate::error::DomError;

/// Events the controllers subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomEvent {
    Click,
    Change,
}

impl DomEvent {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
        }
    }
}

/// Event callback. Receives the element the event was dispatched on, if any.
pub type Handler<N> = Box<dyn FnMut(Option<N>)>;

/// Document operations needed by the admin controllers.
///
/// `Node` is a cheap, cloneable handle to an element.
pub trait DomPort {
    type Node: Clone + 'static;

    fn by_id(&self, id: &str) -> Option<Self::Node>;

    /// All elements matching a CSS selector, in document order.
    /// With `scope`, only descendants of that element are searched.
    fn query(&self, scope: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// # Errors
    ///
    /// Returns a [`DomError`] if the document refuses to create the element.
    fn create(&self, tag: &str) -> Result<Self::Node, DomError>;

    /// # Errors
    ///
    /// Returns a [`DomError`] if the insertion is rejected.
    fn append(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Insert `node` as the next sibling of `anchor`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the insertion is rejected.
    fn insert_after(&self, anchor: &Self::Node, node: &Self::Node) -> Result<(), DomError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add (`on`) or remove a class.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] for an invalid class token.
    fn set_class(&self, node: &Self::Node, class: &str, on: bool) -> Result<(), DomError>;

    fn text(&self, node: &Self::Node) -> String;

    fn set_text(&self, node: &Self::Node, text: &str);

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`DomError`] for an invalid attribute name.
    fn set_attr(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    /// # Errors
    ///
    /// Returns a [`DomError`] if the attribute cannot be toggled.
    fn set_disabled(&self, node: &Self::Node, disabled: bool) -> Result<(), DomError>;

    fn is_disabled(&self, node: &Self::Node) -> bool;

    /// Current value of a form control (`<select>`, `<input>`).
    fn value(&self, node: &Self::Node) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`DomError`] if the element has no inline style or the
    /// property is rejected.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    /// Subscribe to `event` on `node`, or on the whole document when `node` is `None`.
    /// Listeners live as long as the page.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the listener cannot be registered.
    fn listen(
        &self,
        node: Option<&Self::Node>,
        event: DomEvent,
        handler: Handler<Self::Node>,
    ) -> Result<(), DomError>;
}

/// Create an element carrying the given class attribute and text.
///
/// # Errors
///
/// Propagates any [`DomError`] from element creation.
pub fn element<D: DomPort>(dom: &D, tag: &str, class: &str, text: &str) -> Result<D::Node, DomError> {
    let node = dom.create(tag)?;
    if !class.is_empty() {
        dom.set_attr(&node, "class", class)?;
    }
    if !text.is_empty() {
        dom.set_text(&node, text);
    }
    Ok(node)
}

/// Create a `type="button"` button so it never submits an enclosing form.
///
/// # Errors
///
/// Propagates any [`DomError`] from element creation.
pub fn button<D: DomPort>(dom: &D, class: &str, text: &str, title: &str) -> Result<D::Node, DomError> {
    let node = element(dom, "button", class, text)?;
    dom.set_attr(&node, "type", "button")?;
    dom.set_attr(&node, "title", title)?;
    Ok(node)
}

/// Apply several inline style properties.
///
/// # Errors
///
/// Stops at and returns the first failing property.
pub fn style<D: DomPort>(dom: &D, node: &D::Node, properties: &[(&str, &str)]) -> Result<(), DomError> {
    for (property, value) in properties {
        dom.set_style(node, property, value)?;
    }
    Ok(())
}
