//! Arena-backed document supporting the selector subset the controllers use:
//! `tag`, `#id`, `.class`, compounds like `button.primary`, and the
//! descendant combinator.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{DomEvent, DomPort, Handler};
use crate::error::DomError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

struct Listener {
    target: Option<NodeId>,
    event: DomEvent,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

fn flush(kind: char, value: &mut String, compound: &mut Compound) {
    if value.is_empty() {
        return;
    }
    let taken = std::mem::take(value);
    match kind {
        '#' => compound.id = Some(taken),
        '.' => compound.classes.push(taken),
        _ => compound.tag = Some(taken.to_lowercase()),
    }
}

fn parse_compound(raw: &str) -> Compound {
    let mut compound = Compound::default();
    let mut current = String::new();
    let mut kind = ' ';
    for ch in raw.chars() {
        if ch == '#' || ch == '.' {
            flush(kind, &mut current, &mut compound);
            kind = ch;
        } else {
            current.push(ch);
        }
    }
    flush(kind, &mut current, &mut compound);
    compound
}

pub struct FakeDom {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<Listener>>,
    root: NodeId,
    body: NodeId,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// A document with `<html><body></body></html>`.
    pub fn new() -> Self {
        let dom = Self {
            nodes: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            root: NodeId(0),
            body: NodeId(1),
        };
        let html = dom.alloc("html");
        let body = dom.alloc("body");
        dom.attach(html, body);
        dom
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_lowercase(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        });
        NodeId(nodes.len() - 1)
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    /// Build helper: append a new element with attributes and text.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.alloc(tag);
        {
            let mut nodes = self.nodes.borrow_mut();
            for (name, value) in attrs {
                nodes[node.0].attrs.insert((*name).to_owned(), (*value).to_owned());
            }
            nodes[node.0].text = text.to_owned();
        }
        self.attach(parent, node);
        node
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    pub fn style_of(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    /// Classes in attribute order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0]
            .attrs
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = vec![node];
        let mut cursor = nodes[node.0].parent;
        while let Some(parent) = cursor {
            out.push(parent);
            cursor = nodes[parent.0].parent;
        }
        out
    }

    fn descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let nodes = self.nodes.borrow();
        let data = &nodes[node.0];
        if compound.tag.as_ref().is_some_and(|t| *t != data.tag) {
            return false;
        }
        if compound.id.as_ref().is_some_and(|id| data.attrs.get("id") != Some(id)) {
            return false;
        }
        let class_attr = data.attrs.get("class").cloned().unwrap_or_default();
        compound
            .classes
            .iter()
            .all(|c| class_attr.split_whitespace().any(|have| have == c))
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let parts: Vec<Compound> = selector.split_whitespace().map(parse_compound).collect();
        let Some((last, rest)) = parts.split_last() else {
            return false;
        };
        if !self.matches_compound(node, last) {
            return false;
        }
        let mut ancestors = self.ancestors_inclusive(node).into_iter().skip(1);
        rest.iter()
            .rev()
            .all(|compound| ancestors.any(|a| self.matches_compound(a, compound)))
    }

    fn dispatch(&self, node: NodeId, event: DomEvent) {
        let path = self.ancestors_inclusive(node);
        let mut handlers = Vec::new();
        {
            let listeners = self.listeners.borrow();
            for hop in &path {
                handlers.extend(
                    listeners
                        .iter()
                        .filter(|l| l.event == event && l.target == Some(*hop))
                        .map(|l| Rc::clone(&l.handler)),
                );
            }
            handlers.extend(
                listeners
                    .iter()
                    .filter(|l| l.event == event && l.target.is_none())
                    .map(|l| Rc::clone(&l.handler)),
            );
        }
        for handler in handlers {
            let mut handler = handler.borrow_mut();
            (*handler)(Some(node));
        }
    }

    /// Simulate a user click. Disabled elements swallow clicks like browsers do.
    pub fn click(&self, node: NodeId) {
        if self.is_disabled(&node) {
            return;
        }
        self.dispatch(node, DomEvent::Click);
    }

    /// Select the `<option>` with `value` inside `select` and fire `change`.
    pub fn choose(&self, select: NodeId, value: &str) {
        for option in self.query(Some(&select), "option") {
            let mut nodes = self.nodes.borrow_mut();
            let attrs = &mut nodes[option.0].attrs;
            if attrs.get("value").map(String::as_str) == Some(value) {
                attrs.insert("selected".to_owned(), String::new());
            } else {
                attrs.remove("selected");
            }
        }
        self.dispatch(select, DomEvent::Change);
    }
}

impl DomPort for FakeDom {
    type Node = NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.root, &mut all);
        let nodes = self.nodes.borrow();
        all.into_iter()
            .find(|n| nodes[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query(&self, scope: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        self.descendants(scope.copied().unwrap_or(self.root), &mut candidates);
        candidates.into_iter().filter(|n| self.matches(*n, selector)).collect()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        self.ancestors_inclusive(*node)
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    fn create(&self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.alloc(tag))
    }

    fn append(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.attach(*parent, *child);
        Ok(())
    }

    fn insert_after(&self, anchor: &NodeId, node: &NodeId) -> Result<(), DomError> {
        let parent = self
            .parent(*anchor)
            .ok_or_else(|| DomError::Js("anchor has no parent".to_owned()))?;
        self.detach(*node);
        let mut nodes = self.nodes.borrow_mut();
        let siblings = &mut nodes[parent.0].children;
        let at = siblings.iter().position(|c| c == anchor).map_or(siblings.len(), |i| i + 1);
        siblings.insert(at, *node);
        nodes[node.0].parent = Some(parent);
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    /// Rejects empty or whitespace-bearing tokens, as `DOMTokenList.toggle` does.
    fn set_class(&self, node: &NodeId, class: &str, on: bool) -> Result<(), DomError> {
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(DomError::Js(format!("invalid class token {class:?}")));
        }
        let mut classes = self.classes(*node);
        classes.retain(|c| c != class);
        if on {
            classes.push(class.to_owned());
        }
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert("class".to_owned(), classes.join(" "));
        Ok(())
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = self.nodes.borrow()[node.0].text.clone();
        for child in self.children(*node) {
            out.push_str(&self.text(&child));
        }
        out
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        if disabled {
            nodes[node.0].attrs.insert("disabled".to_owned(), String::new());
        } else {
            nodes[node.0].attrs.remove("disabled");
        }
        Ok(())
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.nodes.borrow()[node.0].attrs.contains_key("disabled")
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        if self.tag(*node) != "select" {
            return self.attr(node, "value");
        }
        let options = self.query(Some(node), "option");
        let chosen = options
            .iter()
            .find(|o| self.attr(o, "selected").is_some())
            .or_else(|| options.first())?;
        self.attr(chosen, "value")
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.nodes.borrow_mut()[node.0]
            .style
            .insert(property.to_owned(), value.to_owned());
        Ok(())
    }

    fn listen(&self, node: Option<&NodeId>, event: DomEvent, handler: Handler<NodeId>) -> Result<(), DomError> {
        self.listeners.borrow_mut().push(Listener {
            target: node.copied(),
            event,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }
}
