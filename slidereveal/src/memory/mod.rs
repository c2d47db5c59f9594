//! In-memory document implementing [`Scene`].
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Events dispatched
//! through [`MemoryDocument::click`], [`MemoryDocument::key_down`] and
//! [`MemoryDocument::transition_end`] bubble from the target up to the
//! document, honouring `stop_propagation`, the same way the browser does.
//! Handlers run with no internal borrow held, so they may freely mutate the
//! document or register and drop listeners.

mod selector;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::scene::{EventKind, Handler, ListenTarget, Scene, SceneEvent};
use selector::{Selector, SelectorElement};

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        styles: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Document,
    Node(NodeId),
}

struct ListenerEntry {
    id: u64,
    target: Registration,
    kind: EventKind,
    handler: Rc<RefCell<Handler<MemoryEvent>>>,
}

struct DocState {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    listeners: Vec<ListenerEntry>,
    next_listener: u64,
}

impl DocState {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind {
            match attributes.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn classes(&self, id: NodeId) -> Vec<String> {
        self.attribute(id, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Elements under `root` in document order, `root` excluded.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if matches!(node.kind, NodeKind::Element { .. }) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(parsed) = Selector::parse(selector) else {
            warn!(selector, "unsupported selector");
            return Vec::new();
        };
        self.descendants(root)
            .into_iter()
            .filter(|id| parsed.matches(&ElementRef { state: self, id: *id }))
            .collect()
    }
}

struct ElementRef<'a> {
    state: &'a DocState,
    id: NodeId,
}

impl SelectorElement for ElementRef<'_> {
    fn tag(&self) -> &str {
        match &self.state.node(self.id).kind {
            NodeKind::Element { tag, .. } => tag,
            NodeKind::Text(_) => "",
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.state.attribute(self.id, name)
    }

    fn parent_element(&self) -> Option<Self> {
        self.state.node(self.id).parent.map(|id| ElementRef {
            state: self.state,
            id,
        })
    }
}

/// An event dispatched in a [`MemoryDocument`].
#[derive(Debug)]
pub struct MemoryEvent {
    kind: EventKind,
    target: NodeId,
    key: Option<String>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl MemoryEvent {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl SceneEvent for MemoryEvent {
    type Node = NodeId;

    fn target(&self) -> Option<NodeId> {
        Some(self.target)
    }

    fn key(&self) -> Option<String> {
        self.key.clone()
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

/// Listener registration in a [`MemoryDocument`]; unregisters on drop.
pub struct MemoryListener {
    state: Weak<RefCell<DocState>>,
    id: u64,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let removed = {
                let mut state = state.borrow_mut();
                let index = state.listeners.iter().position(|l| l.id == self.id);
                index.map(|i| state.listeners.remove(i))
            };
            // The handler may own other registrations; drop it unborrowed
            drop(removed);
        }
    }
}

/// A headless document: `<html><body></body></html>` plus whatever is built on it.
#[derive(Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocState>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut state = DocState {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            listeners: Vec::new(),
            next_listener: 0,
        };
        let root = state.push(NodeKind::Element {
            tag: "html".to_string(),
            attributes: Vec::new(),
            styles: Vec::new(),
        });
        let body = state.push(NodeKind::Element {
            tag: "body".to_string(),
            attributes: Vec::new(),
            styles: Vec::new(),
        });
        state.node_mut(body).parent = Some(root);
        state.node_mut(root).children.push(body);
        state.root = root;
        state.body = body;
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Create an element with the given attributes and append it to `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let el = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(&el, name, value);
        }
        self.append_child(&parent, &el);
        el
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&self, parent: NodeId, text: &str) -> NodeId {
        let mut state = self.state.borrow_mut();
        let id = state.push(NodeKind::Text(text.to_string()));
        state.node_mut(id).parent = Some(parent);
        state.node_mut(parent).children.push(id);
        id
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.borrow().node(node).parent
    }

    /// Text content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.state.borrow().node(node).kind {
            NodeKind::Text(text) => Some(text.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    /// Whether `node` is attached under the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let state = self.state.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == state.root {
                return true;
            }
            current = state.node(id).parent;
        }
        false
    }

    /// Space-separated `class` attribute split into names.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.state.borrow().classes(node)
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn click(&self, target: NodeId) -> MemoryEvent {
        self.dispatch(EventKind::Click, target, None)
    }

    /// Dispatch a `keydown` at the body, as a key press with nothing focused.
    pub fn key_down(&self, key: &str) -> MemoryEvent {
        let body = self.body();
        self.dispatch(EventKind::KeyDown, body, Some(key.to_string()))
    }

    pub fn transition_end(&self, target: NodeId) -> MemoryEvent {
        self.dispatch(EventKind::TransitionEnd, target, None)
    }

    /// Dispatch an event at `target`, bubbling through its ancestors to the document.
    pub fn dispatch(&self, kind: EventKind, target: NodeId, key: Option<String>) -> MemoryEvent {
        let event = MemoryEvent {
            kind,
            target,
            key,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        };

        let mut path = Vec::new();
        {
            let state = self.state.borrow();
            let mut current = Some(target);
            while let Some(id) = current {
                path.push(Registration::Node(id));
                current = state.node(id).parent;
            }
        }
        path.push(Registration::Document);

        for hop in path {
            // Listeners registered during this hop do not see the event
            let handlers: Vec<(u64, Rc<RefCell<Handler<MemoryEvent>>>)> = self
                .state
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.target == hop && l.kind == kind)
                .map(|l| (l.id, l.handler.clone()))
                .collect();

            for (id, handler) in handlers {
                // Skip listeners removed by an earlier handler on this hop
                let live = self.state.borrow().listeners.iter().any(|l| l.id == id);
                if !live {
                    continue;
                }
                if let Ok(mut handler) = handler.try_borrow_mut() {
                    (*handler)(&event);
                }
            }

            if event.propagation_stopped() {
                break;
            }
        }

        event
    }
}

impl Scene for MemoryDocument {
    type Node = NodeId;
    type Event = MemoryEvent;
    type Listener = MemoryListener;

    fn body(&self) -> NodeId {
        self.state.borrow().body
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        let state = self.state.borrow();
        state.select(state.root, selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let state = self.state.borrow();
        state.select(state.root, selector)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        self.state.borrow().select(*root, selector).into_iter().next()
    }

    fn create_element(&self, tag: &str) -> NodeId {
        self.state.borrow_mut().push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            styles: Vec::new(),
        })
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.state.borrow().node(*node).children.clone()
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        // Appending an ancestor would create a cycle; the DOM rejects it too
        if self.contains(child, parent) {
            warn!(?parent, ?child, "refusing to append a node into its own subtree");
            return;
        }
        let mut state = self.state.borrow_mut();
        state.detach(*child);
        state.node_mut(*child).parent = Some(*parent);
        state.node_mut(*parent).children.push(*child);
    }

    fn remove(&self, node: &NodeId) {
        self.state.borrow_mut().detach(*node);
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let state = self.state.borrow();
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = state.node(id).parent;
        }
        false
    }

    fn is_element(&self, node: &NodeId) -> bool {
        matches!(self.state.borrow().node(*node).kind, NodeKind::Element { .. })
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.state.borrow().classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let mut classes = state.classes(*node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            state.set_attribute(*node, "class", &classes.join(" "));
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let mut classes = state.classes(*node);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            state.set_attribute(*node, "class", &classes.join(" "));
        }
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        if let NodeKind::Element { styles, .. } = &mut state.node_mut(*node).kind {
            if value.is_empty() {
                styles.retain(|(k, _)| k != property);
            } else if let Some(entry) = styles.iter_mut().find(|(k, _)| k == property) {
                entry.1 = value.to_string();
            } else {
                styles.push((property.to_string(), value.to_string()));
            }
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        match &self.state.borrow().node(*node).kind {
            NodeKind::Element { styles, .. } => styles
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.clone())
                .unwrap_or_default(),
            NodeKind::Text(_) => String::new(),
        }
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.state.borrow_mut().set_attribute(*node, name, value);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.state.borrow().attribute(*node, name).map(str::to_string)
    }

    fn listen(
        &self,
        target: ListenTarget<'_, NodeId>,
        kind: EventKind,
        handler: Handler<MemoryEvent>,
    ) -> MemoryListener {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push(ListenerEntry {
            id,
            target: match target {
                ListenTarget::Document => Registration::Document,
                ListenTarget::Node(node) => Registration::Node(*node),
            },
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        MemoryListener {
            state: Rc::downgrade(&self.state),
            id,
        }
    }
}
