//! `Scene` over the live browser document.

use slidereveal::scene::Handler;
use slidereveal::{EventKind, ListenTarget, Result, Scene, SceneEvent, SlideRevealError};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Node, NodeList};

/// Handle to the page's document and body.
#[derive(Clone)]
pub struct WebScene {
    document: Document,
    body: HtmlElement,
}

impl WebScene {
    /// The global `window.document`.
    pub fn global() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(SlideRevealError::NoDocument)?;
        Self::new(document)
    }

    pub fn new(document: Document) -> Result<Self> {
        let body = document.body().ok_or(SlideRevealError::NoDocument)?;
        Ok(Self { document, body })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn nodes(list: NodeList) -> Vec<Node> {
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

fn as_element(node: &Node) -> Option<&Element> {
    node.dyn_ref::<Element>()
}

/// A DOM event as seen by drawer listeners.
pub struct WebEvent(Event);

impl SceneEvent for WebEvent {
    type Node = Node;

    fn target(&self) -> Option<Node> {
        self.0.target().and_then(|t| t.dyn_into::<Node>().ok())
    }

    fn key(&self) -> Option<String> {
        self.0.dyn_ref::<KeyboardEvent>().map(|k| k.key())
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

/// A registered DOM listener. Removing it on drop also frees the closure.
pub struct WebListener {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for WebListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind.as_str(), self.closure.as_ref().unchecked_ref());
    }
}

impl Scene for WebScene {
    type Node = Node;
    type Event = WebEvent;
    type Listener = WebListener;

    fn body(&self) -> Node {
        self.body.clone().into()
    }

    fn query(&self, selector: &str) -> Option<Node> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(Into::into),
            Err(e) => {
                warn!(selector, error = ?e, "invalid selector");
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<Node> {
        match self.document.query_selector_all(selector) {
            Ok(list) => nodes(list),
            Err(e) => {
                warn!(selector, error = ?e, "invalid selector");
                Vec::new()
            }
        }
    }

    fn query_within(&self, root: &Node, selector: &str) -> Option<Node> {
        as_element(root)?
            .query_selector(selector)
            .ok()
            .flatten()
            .map(Into::into)
    }

    fn create_element(&self, tag: &str) -> Node {
        self.document
            .create_element(tag)
            .expect("drawer elements use valid tag names")
            .into()
    }

    fn child_nodes(&self, node: &Node) -> Vec<Node> {
        nodes(node.child_nodes())
    }

    fn append_child(&self, parent: &Node, child: &Node) {
        if let Err(e) = parent.append_child(child) {
            warn!(error = ?e, "append_child failed");
        }
    }

    fn remove(&self, node: &Node) {
        if let Some(parent) = node.parent_node() {
            let _ = parent.remove_child(node);
        }
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }

    fn is_element(&self, node: &Node) -> bool {
        node.node_type() == Node::ELEMENT_NODE
    }

    fn has_class(&self, node: &Node, class: &str) -> bool {
        as_element(node)
            .map(|el| el.class_list().contains(class))
            .unwrap_or(false)
    }

    fn add_class(&self, node: &Node, class: &str) {
        if let Some(el) = as_element(node) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&self, node: &Node, class: &str) {
        if let Some(el) = as_element(node) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn set_style(&self, node: &Node, property: &str, value: &str) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
    }

    fn style(&self, node: &Node, property: &str) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) {
        if let Some(el) = as_element(node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        as_element(node)?.get_attribute(name)
    }

    fn listen(
        &self,
        target: ListenTarget<'_, Node>,
        kind: EventKind,
        handler: Handler<WebEvent>,
    ) -> WebListener {
        let target: EventTarget = match target {
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Node(node) => node.clone().into(),
        };

        let mut handler = handler;
        let closure = Closure::wrap(Box::new(move |event: Event| {
            handler(&WebEvent(event));
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref()) {
            warn!(event = %kind, error = ?e, "add_event_listener failed");
        }

        WebListener {
            target,
            kind,
            closure,
        }
    }
}
