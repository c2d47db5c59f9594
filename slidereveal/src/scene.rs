//! Scene-graph abstraction the drawer controller drives.
//!
//! A [`Scene`] is a handle to one document: it resolves selectors, moves
//! nodes, edits classes, inline styles and attributes, and registers event
//! listeners. The browser backend maps each call to the native DOM operation;
//! [`MemoryDocument`](crate::memory::MemoryDocument) keeps a node tree in memory.
//!
//! Style properties are CSS names (`"overflow-x"`, `"z-index"`). Setting a
//! property to the empty string removes it, and reading an absent property
//! yields the empty string, as `CSSStyleDeclaration` does.

use std::fmt;

/// Events the drawer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    TransitionEnd,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::TransitionEnd => "transitionend",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone)]
pub enum ListenTarget<'a, N> {
    /// The document itself, which sees every bubbling event last.
    Document,
    Node(&'a N),
}

/// An event delivered to a listener.
pub trait SceneEvent {
    type Node;

    /// The node the event was dispatched at, if it is a node.
    fn target(&self) -> Option<Self::Node>;

    /// `KeyboardEvent.key` for key events.
    fn key(&self) -> Option<String>;

    fn prevent_default(&self);

    fn stop_propagation(&self);
}

/// Listener callback.
pub type Handler<E> = Box<dyn FnMut(&E)>;

/// Document operations used by the drawer.
///
/// Implementations are cheap handles (`Clone`) onto shared document state.
/// The `Listener` returned by [`Scene::listen`] owns the registration and
/// removes it when dropped.
pub trait Scene: Clone + 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;
    type Event: SceneEvent<Node = Self::Node>;
    type Listener: 'static;

    /// The document body element.
    fn body(&self) -> Self::Node;

    /// First element in document order matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// All elements in document order matching `selector`.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn create_element(&self, tag: &str) -> Self::Node;

    /// Child nodes of `node`, text nodes included.
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Append `child` to `parent`, detaching it from its current parent first.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Detach `node` from its parent. Detached nodes are left alone.
    fn remove(&self, node: &Self::Node);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn is_element(&self, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn style(&self, node: &Self::Node, property: &str) -> String;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn listen(
        &self,
        target: ListenTarget<'_, Self::Node>,
        kind: EventKind,
        handler: Handler<Self::Event>,
    ) -> Self::Listener;

    /// Set several inline style properties in order.
    fn set_styles(&self, node: &Self::Node, styles: &[(&str, &str)]) {
        for (property, value) in styles {
            self.set_style(node, property, value);
        }
    }
}
