//! In-memory document tree for views to render into.
//!
//! A [`Document`] is a small element tree: every element has a tag,
//! attributes, an optional form value and an ordered content list mixing
//! raw markup (produced by templates) and child elements. Views own one
//! element each, fill it with markup, and listen for events on it.
//!
//! Events are dispatched at an element and bubble up through its ancestors,
//! so a listener on a row sees clicks on the controls inside that row.
//!
//! Removing an element drops it together with its subtree and every
//! listener registered on them. Listeners are the only thing keeping a
//! mounted view alive, so removal releases the view too.
//!
//! # Example
//!
//! ```rust,ignore
//! let document = Document::new();
//! let list = document.create_element("ul");
//! document.append_child(document.body(), list)?;
//!
//! let row = document.create_element("li");
//! document.set_inner_html(row, "<span>Water plants</span>")?;
//! document.append_child(list, row)?;
//!
//! assert_eq!(document.outer_html(list)?, "<ul><li><span>Water plants</span></li></ul>");
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Elements that never have content or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Errors returned by [`Document`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The element was never created or has been removed
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    /// The element exists but is not connected to the document body
    #[error("Element {0} is not attached to the document")]
    Detached(ElementId),

    /// No element matched the selector
    #[error("No element matches selector '{0}'")]
    NoMatch(String),

    /// The selector could not be parsed
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    /// Appending would make an element its own ancestor
    #[error("Cannot append {child} into {parent}: child is an ancestor of parent")]
    HierarchyRequest {
        /// The would-be parent
        parent: ElementId,
        /// The would-be child
        child: ElementId,
    },
}

/// Handle to an element of a [`Document`].
///
/// Slots of removed elements are reused; the generation tells a stale
/// handle apart from the element now living in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    slot: usize,
    generation: u32,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}.{}", self.slot, self.generation)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A click on the control matching `control` (e.g. `.delete`)
    Click {
        /// Selector of the clicked control inside the target element
        control: String,
    },
    /// A form submission
    Submit,
}

/// An event travelling up the tree.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Creates an event of the given kind
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// A click on `control`
    #[must_use]
    pub fn click(control: impl Into<String>) -> Self {
        Self::new(EventKind::Click {
            control: control.into(),
        })
    }

    /// A form submission
    #[must_use]
    pub const fn submit() -> Self {
        Self::new(EventKind::Submit)
    }

    /// What happened
    #[must_use]
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns `true` for a click on exactly `control`
    #[must_use]
    pub fn is_click_on(&self, control: &str) -> bool {
        matches!(&self.kind, EventKind::Click { control: c } if c == control)
    }

    /// Suppress the host's default handling (e.g. form navigation)
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener called [`Event::prevent_default`]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop bubbling after the current element's listeners
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

/// Something that handles events dispatched at (or bubbling through) an element.
pub trait EventListener {
    /// Handle `event`; `current` is the element the listener is registered on.
    fn handle_event(&self, event: &Event, current: ElementId);
}

#[derive(Debug, Clone)]
enum Content {
    Markup(String),
    Element(ElementId),
}

#[derive(Debug)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    content: Vec<Content>,
    parent: Option<ElementId>,
    value: String,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            content: Vec::new(),
            parent: None,
            value: String::new(),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn children(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.content.iter().filter_map(|content| match content {
            Content::Element(id) => Some(*id),
            Content::Markup(_) => None,
        })
    }
}

/// Parsed selector. Only the handful of forms views actually need.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Tag(String),
    Id(String),
    Class(String),
    TagAttribute {
        tag: String,
        name: String,
        value: String,
    },
}

impl Selector {
    fn parse(selector: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidSelector(selector.to_string());
        let trimmed = selector.trim();
        let is_name = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if let Some(id) = trimmed.strip_prefix('#') {
            return if is_name(id) { Ok(Self::Id(id.to_string())) } else { Err(invalid()) };
        }
        if let Some(class) = trimmed.strip_prefix('.') {
            return if is_name(class) {
                Ok(Self::Class(class.to_string()))
            } else {
                Err(invalid())
            };
        }
        if let Some((tag, rest)) = trimmed.split_once('[') {
            let inner = rest.strip_suffix(']').ok_or_else(invalid)?;
            let (name, value) = inner.split_once('=').ok_or_else(invalid)?;
            let value = value.trim_matches(|c| c == '"' || c == '\'');
            if !is_name(tag) || !is_name(name) {
                return Err(invalid());
            }
            return Ok(Self::TagAttribute {
                tag: tag.to_ascii_lowercase(),
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        if is_name(trimmed) {
            return Ok(Self::Tag(trimmed.to_ascii_lowercase()));
        }
        Err(invalid())
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Tag(tag) => node.tag == *tag,
            Self::Id(id) => node.attributes.get("id") == Some(id),
            Self::Class(class) => node.has_class(class),
            Self::TagAttribute { tag, name, value } => {
                node.tag == *tag && node.attributes.get(name) == Some(value)
            },
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Element arena with a free list
#[derive(Debug, Default)]
struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl Tree {
    fn insert(&mut self, node: Node) -> ElementId {
        if let Some(slot) = self.free.pop() {
            if let Some(entry) = self.slots.get_mut(slot) {
                entry.node = Some(node);
                return ElementId {
                    slot,
                    generation: entry.generation,
                };
            }
        }
        let slot = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ElementId { slot, generation: 0 }
    }

    fn node(&self, id: ElementId) -> Result<&Node, DomError> {
        self.slots
            .get(id.slot)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
            .ok_or(DomError::UnknownElement(id))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node, DomError> {
        self.slots
            .get_mut(id.slot)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
            .ok_or(DomError::UnknownElement(id))
    }

    fn is_ancestor(&self, ancestor: ElementId, of: ElementId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).ok().and_then(|node| node.parent);
        }
        false
    }

    fn detach(&mut self, id: ElementId) -> Result<(), DomError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            let parent = self.node_mut(parent)?;
            parent
                .content
                .retain(|content| !matches!(content, Content::Element(child) if *child == id));
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Delete `id` and everything below it; returns the deleted ids
    fn delete_subtree(&mut self, id: ElementId) -> Vec<ElementId> {
        let mut deleted = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(entry) = self
                .slots
                .get_mut(current.slot)
                .filter(|entry| entry.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = entry.node.take() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(current.slot);
                stack.extend(node.children());
                deleted.push(current);
            }
        }
        deleted
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self
            .node(root)
            .map(|node| node.children().collect())
            .unwrap_or_default();
        stack.reverse();
        while let Some(id) = stack.pop() {
            found.push(id);
            if let Ok(node) = self.node(id) {
                let mut children: Vec<ElementId> = node.children().collect();
                children.reverse();
                stack.extend(children);
            }
        }
        found
    }

    fn write_html(&self, id: ElementId, out: &mut String, outer: bool) -> Result<(), DomError> {
        let node = self.node(id)?;
        if outer {
            out.push('<');
            out.push_str(&node.tag);
            for (name, value) in &node.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&node.tag.as_str()) {
                return Ok(());
            }
        }
        for content in &node.content {
            match content {
                Content::Markup(markup) => out.push_str(markup),
                Content::Element(child) => self.write_html(*child, out, true)?,
            }
        }
        if outer {
            out.push_str("</");
            out.push_str(&node.tag);
            out.push('>');
        }
        Ok(())
    }
}

/// The element tree views render into.
///
/// Created once per page with [`Document::new`]; it contains a `body`
/// element that everything visible hangs off.
pub struct Document {
    tree: RefCell<Tree>,
    body: ElementId,
    listeners: RefCell<HashMap<ElementId, Vec<Rc<dyn EventListener>>>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("body", &self.body)
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Creates an empty document with a `body`
    #[must_use]
    pub fn new() -> Rc<Self> {
        let mut tree = Tree::default();
        let body = tree.insert(Node::new("body"));
        Rc::new(Self {
            tree: RefCell::new(tree),
            body,
            listeners: RefCell::new(HashMap::new()),
        })
    }

    /// The root element
    #[must_use]
    pub const fn body(&self) -> ElementId {
        self.body
    }

    /// Creates a detached element
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.tree.borrow_mut().insert(Node::new(tag))
    }

    /// Whether `id` still exists (it may be detached)
    #[must_use]
    pub fn exists(&self, id: ElementId) -> bool {
        self.tree.borrow().node(id).is_ok()
    }

    /// Whether `id` exists and is connected to the body
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        let tree = self.tree.borrow();
        tree.node(id).is_ok() && tree.is_ancestor(self.body, id)
    }

    /// Lower-case tag name of `id`
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn tag(&self, id: ElementId) -> Result<String, DomError> {
        Ok(self.tree.borrow().node(id)?.tag.clone())
    }

    /// Set an attribute
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn set_attribute(
        &self,
        id: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.tree
            .borrow_mut()
            .node_mut(id)?
            .attributes
            .insert(name.to_string(), value.into());
        Ok(())
    }

    /// Read an attribute
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn attribute(&self, id: ElementId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.tree.borrow().node(id)?.attributes.get(name).cloned())
    }

    /// Current value of a form control
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn value(&self, id: ElementId) -> Result<String, DomError> {
        Ok(self.tree.borrow().node(id)?.value.clone())
    }

    /// Set the value of a form control (what typing into it does)
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn set_value(&self, id: ElementId, value: impl Into<String>) -> Result<(), DomError> {
        self.tree.borrow_mut().node_mut(id)?.value = value.into();
        Ok(())
    }

    /// Append `child` as the last content of `parent`, moving it if it
    /// already had a parent.
    ///
    /// # Errors
    ///
    /// - [`DomError::UnknownElement`] if either element does not exist
    /// - [`DomError::HierarchyRequest`] if `child` is `parent` or one of its ancestors
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.node(parent)?;
        tree.node(child)?;
        if tree.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        tree.detach(child)?;
        tree.node_mut(parent)?.content.push(Content::Element(child));
        tree.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Replace the content of `id` with raw markup
    ///
    /// Child elements previously inside `id` are removed along with their
    /// listeners.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn set_inner_html(&self, id: ElementId, markup: impl Into<String>) -> Result<(), DomError> {
        let children: Vec<ElementId> = {
            let mut tree = self.tree.borrow_mut();
            let node = tree.node_mut(id)?;
            let children = node.children().collect();
            node.content = vec![Content::Markup(markup.into())];
            children
        };
        for child in children {
            self.delete(child);
        }
        Ok(())
    }

    /// Replace the content of `container` with the single element `child`
    ///
    /// # Errors
    ///
    /// Same as [`Document::set_inner_html`] and [`Document::append_child`].
    pub fn mount(&self, container: ElementId, child: ElementId) -> Result<(), DomError> {
        self.set_inner_html(container, String::new())?;
        {
            let mut tree = self.tree.borrow_mut();
            tree.node_mut(container)?.content.clear();
        }
        self.append_child(container, child)
    }

    /// Detach `id` from its parent and delete it with its subtree and listeners
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn remove(&self, id: ElementId) -> Result<(), DomError> {
        self.tree.borrow_mut().detach(id)?;
        self.delete(id);
        Ok(())
    }

    fn delete(&self, id: ElementId) {
        let deleted = self.tree.borrow_mut().delete_subtree(id);
        // Dropped outside the tree borrow: a listener's Drop may touch the document
        let dropped: Vec<Vec<Rc<dyn EventListener>>> = {
            let mut listeners = self.listeners.borrow_mut();
            deleted.iter().filter_map(|id| listeners.remove(id)).collect()
        };
        drop(dropped);
    }

    /// Element children of `id`, in order
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn children(&self, id: ElementId) -> Result<Vec<ElementId>, DomError> {
        Ok(self.tree.borrow().node(id)?.children().collect())
    }

    /// First element under the body matching `selector`, in document order
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidSelector`] or [`DomError::NoMatch`].
    pub fn query(&self, selector: &str) -> Result<ElementId, DomError> {
        self.query_within(self.body, selector)
    }

    /// First descendant of `root` matching `selector` (`root` itself excluded)
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidSelector`], [`DomError::UnknownElement`] or [`DomError::NoMatch`].
    pub fn query_within(&self, root: ElementId, selector: &str) -> Result<ElementId, DomError> {
        self.query_all_within(root, selector)?
            .into_iter()
            .next()
            .ok_or_else(|| DomError::NoMatch(selector.to_string()))
    }

    /// Every descendant of `root` matching `selector`, in document order
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidSelector`] or [`DomError::UnknownElement`].
    pub fn query_all_within(
        &self,
        root: ElementId,
        selector: &str,
    ) -> Result<Vec<ElementId>, DomError> {
        let selector = Selector::parse(selector)?;
        let tree = self.tree.borrow();
        tree.node(root)?;
        Ok(tree
            .descendants(root)
            .into_iter()
            .filter(|id| tree.node(*id).is_ok_and(|node| selector.matches(node)))
            .collect())
    }

    /// Serialized content of `id`
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn inner_html(&self, id: ElementId) -> Result<String, DomError> {
        let mut out = String::new();
        self.tree.borrow().write_html(id, &mut out, false)?;
        Ok(out)
    }

    /// Serialized element, tag included
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn outer_html(&self, id: ElementId) -> Result<String, DomError> {
        let mut out = String::new();
        self.tree.borrow().write_html(id, &mut out, true)?;
        Ok(out)
    }

    /// Text of `id` with tags stripped and entities decoded
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn text_content(&self, id: ElementId) -> Result<String, DomError> {
        let html = self.inner_html(id)?;
        let mut text = String::with_capacity(html.len());
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {},
            }
        }
        Ok(unescape(&text))
    }

    /// Register `listener` for events reaching `id`
    ///
    /// The document keeps the listener alive until `id` is removed.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownElement`] if `id` does not exist.
    pub fn listen(&self, id: ElementId, listener: Rc<dyn EventListener>) -> Result<(), DomError> {
        self.tree.borrow().node(id)?;
        self.listeners
            .borrow_mut()
            .entry(id)
            .or_default()
            .push(listener);
        Ok(())
    }

    /// Dispatch `event` at `target`, bubbling up to the body
    ///
    /// Returns whether a listener prevented the default action.
    ///
    /// # Errors
    ///
    /// - [`DomError::UnknownElement`] if `target` does not exist
    /// - [`DomError::Detached`] if `target` is not connected to the body
    pub fn dispatch(&self, target: ElementId, event: &Event) -> Result<bool, DomError> {
        let path = {
            let tree = self.tree.borrow();
            tree.node(target)?;
            if !tree.is_ancestor(self.body, target) {
                return Err(DomError::Detached(target));
            }
            let mut path = Vec::new();
            let mut current = Some(target);
            while let Some(id) = current {
                path.push(id);
                current = tree.node(id).ok().and_then(|node| node.parent);
            }
            path
        };

        tracing::debug!(%target, kind = ?event.kind(), "Dispatching event");

        for current in path {
            let listeners: Vec<Rc<dyn EventListener>> = self
                .listeners
                .borrow()
                .get(&current)
                .cloned()
                .unwrap_or_default();
            for listener in listeners {
                listener.handle_event(event, current);
            }
            if event.propagation_stopped.get() {
                break;
            }
        }

        Ok(event.default_prevented())
    }
}

/// Escape text for use inside markup
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: Cell<usize>,
        prevent: bool,
        stop: bool,
    }

    impl Counter {
        fn new(prevent: bool, stop: bool) -> Rc<Self> {
            Rc::new(Self {
                hits: Cell::new(0),
                prevent,
                stop,
            })
        }
    }

    impl EventListener for Counter {
        fn handle_event(&self, event: &Event, _current: ElementId) {
            self.hits.set(self.hits.get() + 1);
            if self.prevent {
                event.prevent_default();
            }
            if self.stop {
                event.stop_propagation();
            }
        }
    }

    #[test]
    fn builds_and_serializes_tree() {
        let document = Document::new();
        let list = document.create_element("ul");
        document.set_attribute(list, "class", "tasks").unwrap();
        document.append_child(document.body(), list).unwrap();

        let row = document.create_element("li");
        document.set_inner_html(row, "<b>A &amp; B</b>").unwrap();
        document.append_child(list, row).unwrap();

        assert_eq!(
            document.outer_html(list).unwrap(),
            "<ul class=\"tasks\"><li><b>A &amp; B</b></li></ul>"
        );
        assert_eq!(document.text_content(list).unwrap(), "A & B");
        assert_eq!(document.children(list).unwrap(), vec![row]);
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let document = Document::new();
        let input = document.create_element("input");
        document.set_attribute(input, "type", "text").unwrap();
        assert_eq!(document.outer_html(input).unwrap(), "<input type=\"text\">");
    }

    #[test]
    fn query_selectors() {
        let document = Document::new();
        let form = document.create_element("form");
        document.set_attribute(form, "id", "addTask").unwrap();
        document.append_child(document.body(), form).unwrap();
        let input = document.create_element("input");
        document.set_attribute(input, "type", "text").unwrap();
        document.set_attribute(input, "class", "field wide").unwrap();
        document.append_child(form, input).unwrap();

        assert_eq!(document.query("#addTask").unwrap(), form);
        assert_eq!(document.query(".wide").unwrap(), input);
        assert_eq!(document.query("input").unwrap(), input);
        assert_eq!(document.query_within(form, "input[type=text]").unwrap(), input);
        assert_eq!(document.query_within(form, "input[type='text']").unwrap(), input);
        assert_eq!(
            document.query("#missing"),
            Err(DomError::NoMatch("#missing".to_string()))
        );
        assert!(matches!(
            document.query("ul > li"),
            Err(DomError::InvalidSelector(_))
        ));
    }

    #[test]
    fn remove_detaches_and_drops_listeners() {
        let document = Document::new();
        let list = document.create_element("ul");
        document.append_child(document.body(), list).unwrap();
        let first = document.create_element("li");
        let second = document.create_element("li");
        document.append_child(list, first).unwrap();
        document.append_child(list, second).unwrap();

        let counter = Counter::new(false, false);
        document.listen(first, counter.clone()).unwrap();
        assert_eq!(Rc::strong_count(&counter), 2);

        document.remove(first).unwrap();
        assert_eq!(Rc::strong_count(&counter), 1);
        assert!(!document.exists(first));
        assert_eq!(document.children(list).unwrap(), vec![second]);
        assert_eq!(
            document.dispatch(first, &Event::click(".edit")),
            Err(DomError::UnknownElement(first))
        );
    }

    #[test]
    fn removed_slots_are_reused_without_reviving_stale_ids() {
        let document = Document::new();
        let list = document.create_element("ul");
        document.append_child(document.body(), list).unwrap();

        for round in 0..50 {
            let row = document.create_element("li");
            document.append_child(list, row).unwrap();
            let counter = Counter::new(false, false);
            document.listen(row, counter.clone()).unwrap();
            document.remove(row).unwrap();

            let replacement = document.create_element("li");
            assert_eq!(replacement.slot, row.slot, "round {round}");
            assert_ne!(replacement, row);
            assert!(!document.exists(row));
            assert!(document.exists(replacement));
            assert_eq!(
                document.dispatch(row, &Event::click(".edit")),
                Err(DomError::UnknownElement(row))
            );
            assert_eq!(Rc::strong_count(&counter), 1);
            document.remove(replacement).unwrap();
        }

        // body, list and one recycled row slot
        assert_eq!(document.tree.borrow().slots.len(), 3);
    }

    #[test]
    fn dispatch_bubbles_to_ancestors() {
        let document = Document::new();
        let list = document.create_element("ul");
        let row = document.create_element("li");
        document.append_child(document.body(), list).unwrap();
        document.append_child(list, row).unwrap();

        let on_row = Counter::new(true, false);
        let on_list = Counter::new(false, false);
        document.listen(row, on_row.clone()).unwrap();
        document.listen(list, on_list.clone()).unwrap();

        let prevented = document.dispatch(row, &Event::click(".delete")).unwrap();
        assert!(prevented);
        assert_eq!(on_row.hits.get(), 1);
        assert_eq!(on_list.hits.get(), 1);
    }

    #[test]
    fn stop_propagation_halts_bubbling() {
        let document = Document::new();
        let list = document.create_element("ul");
        let row = document.create_element("li");
        document.append_child(document.body(), list).unwrap();
        document.append_child(list, row).unwrap();

        let on_row = Counter::new(false, true);
        let on_list = Counter::new(false, false);
        document.listen(row, on_row.clone()).unwrap();
        document.listen(list, on_list.clone()).unwrap();

        assert!(!document.dispatch(row, &Event::submit()).unwrap());
        assert_eq!(on_row.hits.get(), 1);
        assert_eq!(on_list.hits.get(), 0);
    }

    #[test]
    fn detached_elements_do_not_receive_events() {
        let document = Document::new();
        let row = document.create_element("li");
        assert_eq!(
            document.dispatch(row, &Event::submit()),
            Err(DomError::Detached(row))
        );
    }

    #[test]
    fn append_rejects_cycles_and_moves_children() {
        let document = Document::new();
        let outer = document.create_element("div");
        let inner = document.create_element("div");
        let other = document.create_element("div");
        document.append_child(outer, inner).unwrap();
        assert_eq!(
            document.append_child(inner, outer),
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );

        document.append_child(other, inner).unwrap();
        assert!(document.children(outer).unwrap().is_empty());
        assert_eq!(document.children(other).unwrap(), vec![inner]);
    }

    #[test]
    fn mount_replaces_container_content() {
        let document = Document::new();
        let container = document.create_element("div");
        document.append_child(document.body(), container).unwrap();
        document.set_inner_html(container, "Loading…").unwrap();

        let list = document.create_element("ul");
        document.mount(container, list).unwrap();
        assert_eq!(document.inner_html(container).unwrap(), "<ul></ul>");
        assert!(document.is_connected(list));
    }

    #[test]
    fn escape_round_trips_through_text_content() {
        let document = Document::new();
        let span = document.create_element("span");
        document
            .set_inner_html(span, escape("<script>\"x\" & 'y'</script>"))
            .unwrap();
        assert_eq!(
            document.text_content(span).unwrap(),
            "<script>\"x\" & 'y'</script>"
        );
    }
}
