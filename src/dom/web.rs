//! `web-sys` implementation of [`DomPort`].

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlSelectElement, NodeList};

use super::{DomEvent, DomPort, Handler};
use crate::error::DomError;

fn js_err(err: JsValue) -> DomError {
    DomError::Js(format!("{err:?}"))
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

/// The live browser document.
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Bind to `window.document`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NoWindow`] or [`DomError::NoDocument`] outside a page context.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let document = window.document().ok_or(DomError::NoDocument)?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DomPort for WebDom {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let result = match scope {
            Some(el) => el.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        match result {
            Ok(list) => elements(&list),
            Err(err) => {
                log::warn!("query {selector:?} failed: {err:?}");
                Vec::new()
            }
        }
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        match node.closest(selector) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("closest {selector:?} failed: {err:?}");
                None
            }
        }
    }

    fn create(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(js_err)
    }

    fn append(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn insert_after(&self, anchor: &Element, node: &Element) -> Result<(), DomError> {
        anchor.after_with_node_1(node).map_err(js_err)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) -> Result<(), DomError> {
        node.class_list().toggle_with_force(class, on).map(|_| ()).map_err(js_err)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value).map_err(js_err)
    }

    fn set_disabled(&self, node: &Element, disabled: bool) -> Result<(), DomError> {
        node.toggle_attribute_with_force("disabled", disabled)
            .map(|_| ())
            .map_err(js_err)
    }

    fn is_disabled(&self, node: &Element) -> bool {
        node.has_attribute("disabled")
    }

    fn value(&self, node: &Element) -> Option<String> {
        match node.dyn_ref::<HtmlSelectElement>() {
            Some(select) => Some(select.value()),
            None => node.get_attribute("value"),
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let html = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Js(format!("<{}> has no inline style", node.tag_name())))?;
        html.style().set_property(property, value).map_err(js_err)
    }

    fn listen(&self, node: Option<&Element>, event: DomEvent, mut handler: Handler<Element>) -> Result<(), DomError> {
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            let target = ev.target().and_then(|t| t.dyn_ref::<Element>().cloned());
            handler(target);
        });
        let target: &EventTarget = match node {
            Some(el) => el.as_ref(),
            None => self.document.as_ref(),
        };
        target
            .add_event_listener_with_callback(event.name(), closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        // Page-lifetime listener; the closure must outlive this call.
        closure.forget();
        Ok(())
    }
}
