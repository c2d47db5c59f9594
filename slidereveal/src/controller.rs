//! The drawer controller: owns one panel's visual lifecycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::config::{ClassNames, Hook, Options, Trigger};
use crate::error::{Result, SlideRevealError};
use crate::scene::{EventKind, ListenTarget, Scene, SceneEvent};
use crate::width::resolve_width;

/// Listener registrations owned by a controller. Dropping one unregisters it.
struct Registrations<L> {
    overlay_click: Option<L>,
    outside_click: Option<L>,
    escape: Option<L>,
    triggers: Vec<L>,
    /// One-shot `transitionend` pending after a push-body close.
    overflow_reset: Option<L>,
}

impl<L> Default for Registrations<L> {
    fn default() -> Self {
        Self {
            overlay_click: None,
            outside_click: None,
            escape: None,
            triggers: Vec::new(),
            overflow_reset: None,
        }
    }
}

struct Inner<S: Scene> {
    scene: S,
    options: Options<S::Node>,
    panel: S::Node,
    panel_content: S::Node,
    body_content: S::Node,
    overlay: Option<S::Node>,
    is_open: bool,
    registrations: Registrations<S::Listener>,
}

type Shared<S> = Rc<RefCell<Inner<S>>>;

/// Sliding side panel bound to one panel element.
///
/// Construction restructures the panel and content container, applies the
/// closed-state styles and ARIA attributes, and registers the configured
/// listeners. The controller is a cheap handle: clones drive the same drawer.
/// Listeners hold only weak references, so dropping the last handle
/// unregisters everything, as [`destroy`](Self::destroy) does.
pub struct DrawerController<S: Scene> {
    inner: Shared<S>,
}

impl<S: Scene> Clone for DrawerController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Scene> DrawerController<S> {
    /// Build a drawer for the element matching `panel_selector`.
    ///
    /// Fails with [`SlideRevealError::ContentNotFound`] when `options.selector`
    /// matches nothing, then with [`SlideRevealError::PanelNotFound`] when the
    /// panel selector matches nothing.
    pub fn new(scene: S, panel_selector: &str, options: Options<S::Node>) -> Result<Self> {
        let container = scene
            .query(&options.selector)
            .ok_or_else(|| SlideRevealError::ContentNotFound(options.selector.clone()))?;
        let panel = scene
            .query(panel_selector)
            .ok_or_else(|| SlideRevealError::PanelNotFound(panel_selector.to_string()))?;
        info!(panel = panel_selector, selector = %options.selector, "creating drawer");
        Ok(Self::build(scene, panel, container, options))
    }

    /// Build a drawer around an element reference.
    pub fn with_panel(scene: S, panel: S::Node, options: Options<S::Node>) -> Result<Self> {
        let container = scene
            .query(&options.selector)
            .ok_or_else(|| SlideRevealError::ContentNotFound(options.selector.clone()))?;
        info!(?panel, selector = %options.selector, "creating drawer");
        Ok(Self::build(scene, panel, container, options))
    }

    fn build(scene: S, panel: S::Node, container: S::Node, options: Options<S::Node>) -> Self {
        let panel_content = prepare_panel_content(&scene, &panel, &options.class_names);
        let body_content = prepare_body_container(&scene, &container, &panel, &options.class_names);

        let inner = Rc::new(RefCell::new(Inner {
            scene,
            options,
            panel,
            panel_content,
            body_content,
            overlay: None,
            is_open: false,
            registrations: Registrations::default(),
        }));
        init(&inner);
        Self { inner }
    }

    /// Slide the panel into view. No-op when already open.
    pub fn open(&self) {
        open(&self.inner);
    }

    /// Slide the panel out of view. No-op when already closed.
    pub fn close(&self) {
        close(&self.inner);
    }

    pub fn toggle(&self) {
        toggle(&self.inner);
    }

    /// Undo styling and unregister every listener.
    ///
    /// Removes the overlay, clears push-body and filter styles, resets the
    /// panel transform and `aria-hidden`, and drops the body-open class. The
    /// wrappers created at construction stay in place. Safe to call repeatedly.
    pub fn destroy(&self) {
        let registrations = {
            let mut this = self.inner.borrow_mut();
            this.teardown();
            std::mem::take(&mut this.registrations)
        };
        drop(registrations);
        debug!("drawer destroyed");
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().is_open
    }

    pub fn panel(&self) -> S::Node {
        self.inner.borrow().panel.clone()
    }

    /// Wrapper holding the panel's original children.
    pub fn panel_content(&self) -> S::Node {
        self.inner.borrow().panel_content.clone()
    }

    /// Element that is pushed and filtered.
    pub fn body_content(&self) -> S::Node {
        self.inner.borrow().body_content.clone()
    }

    /// The overlay element, while it exists.
    pub fn overlay(&self) -> Option<S::Node> {
        self.inner.borrow().overlay.clone()
    }

    /// The merged options.
    pub fn options(&self) -> Options<S::Node> {
        self.inner.borrow().options.clone()
    }
}

/// Move the panel's children into a new content wrapper and make it the sole child.
fn prepare_panel_content<S: Scene>(scene: &S, panel: &S::Node, class_names: &ClassNames) -> S::Node {
    let wrapper = scene.create_element("div");
    scene.add_class(&wrapper, &class_names.panel_content);
    for child in scene.child_nodes(panel) {
        scene.append_child(&wrapper, &child);
    }
    scene.add_class(panel, &class_names.panel);
    scene.append_child(panel, &wrapper);
    wrapper
}

/// Resolve the element that gets pushed and filtered.
///
/// When the panel sits inside the container, the container's other content is
/// gathered into a body wrapper (reused if one already exists, so several
/// drawers can share a container). Otherwise the container itself is tagged.
fn prepare_body_container<S: Scene>(
    scene: &S,
    container: &S::Node,
    panel: &S::Node,
    class_names: &ClassNames,
) -> S::Node {
    if !scene.contains(container, panel) {
        scene.add_class(container, &class_names.body_wrapper);
        return container.clone();
    }

    if let Some(existing) = scene.query_within(container, &format!(".{}", class_names.body_wrapper)) {
        debug!("reusing existing body wrapper");
        return existing;
    }

    let wrapper = scene.create_element("div");
    scene.add_class(&wrapper, &class_names.body_wrapper);
    for node in scene.child_nodes(container) {
        let keep_out = scene.is_element(&node)
            && (node == *panel || scene.has_class(&node, &class_names.overlay));
        if !keep_out {
            scene.append_child(&wrapper, &node);
        }
    }
    scene.append_child(container, &wrapper);
    wrapper
}

fn init<S: Scene>(inner: &Shared<S>) {
    let on_init = {
        let mut this = inner.borrow_mut();
        this.apply_layout();

        if this.options.overlay {
            let overlay = this.create_overlay();
            let weak = Rc::downgrade(inner);
            let listener = this.scene.listen(
                ListenTarget::Node(&overlay),
                EventKind::Click,
                Box::new(move |_: &S::Event| {
                    if let Some(inner) = weak.upgrade() {
                        close(&inner);
                    }
                }),
            );
            this.overlay = Some(overlay);
            this.registrations.overlay_click = Some(listener);
        } else if this.options.close_on_outside_click {
            let listener = this.listen_outside_click(Rc::downgrade(inner));
            this.registrations.outside_click = Some(listener);
        }

        if this.options.push_body {
            let transition = format!("transform {}ms", this.options.speed);
            this.scene.set_style(&this.body_content, "transition", &transition);
        }

        if this.options.auto_escape {
            let listener = this.listen_escape(Rc::downgrade(inner));
            this.registrations.escape = Some(listener);
        }

        let triggers = this.bind_triggers(inner);
        this.registrations.triggers = triggers;

        this.options.on_init.clone()
    };
    call(on_init);
}

fn open<S: Scene>(inner: &Shared<S>) {
    let (on_open, stale_reset) = {
        let mut this = inner.borrow_mut();
        if this.is_open {
            return;
        }
        // A slide-out that never finished must not reset overflow during the slide-in
        let stale_reset = this.registrations.overflow_reset.take();
        this.show();
        this.is_open = true;
        debug!("drawer opened");
        (this.options.on_open.clone(), stale_reset)
    };
    drop(stale_reset);
    call(on_open);
}

fn close<S: Scene>(inner: &Shared<S>) {
    let on_close = {
        let mut this = inner.borrow_mut();
        if !this.is_open {
            return;
        }
        this.hide(Rc::downgrade(inner));
        this.is_open = false;
        debug!("drawer closed");
        this.options.on_close.clone()
    };
    call(on_close);
}

fn toggle<S: Scene>(inner: &Shared<S>) {
    let is_open = inner.borrow().is_open;
    if is_open {
        close(inner);
    } else {
        open(inner);
    }
}

fn call(hook: Option<Hook>) {
    if let Some(hook) = hook {
        hook.call();
    }
}

impl<S: Scene> Inner<S> {
    fn width(&self) -> String {
        resolve_width(&self.options.width)
    }

    fn translate(&self) -> String {
        format!(
            "translateX({}{})",
            self.options.position.translate_sign(),
            self.width()
        )
    }

    fn transition(&self, property: &str) -> String {
        format!("{} {}ms", property, self.options.speed)
    }

    fn wrapper_selector(&self) -> String {
        format!(".{}", self.options.class_names.body_wrapper)
    }

    /// Element carrying the body wrapper class, looked up fresh.
    fn filter_target(&self) -> S::Node {
        self.scene
            .query(&self.wrapper_selector())
            .unwrap_or_else(|| self.body_content.clone())
    }

    fn apply_layout(&self) {
        let scene = &self.scene;
        let width = self.width();
        let offset = format!("-{}", width);
        let z_index = self.options.z_index.to_string();

        scene.set_styles(
            &self.panel,
            &[
                ("position", "fixed"),
                ("top", "0"),
                (self.options.position.as_str(), offset.as_str()),
                ("width", width.as_str()),
                ("height", "100vh"),
                ("z-index", z_index.as_str()),
                ("background", "white"),
            ],
        );

        scene.set_styles(
            &self.panel_content,
            &[
                ("position", "relative"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("overflow-y", "auto"),
                ("padding", "0"),
                ("box-sizing", "border-box"),
                ("word-break", "break-word"),
            ],
        );

        scene.set_attribute(&self.panel, "role", "dialog");
        scene.set_attribute(&self.panel, "aria-modal", "true");
        scene.set_attribute(&self.panel, "aria-label", &self.options.aria_label);
        scene.set_attribute(&self.panel, "aria-hidden", "true");
    }

    fn create_overlay(&self) -> S::Node {
        let scene = &self.scene;
        let overlay = scene.create_element("div");
        scene.add_class(&overlay, &self.options.class_names.overlay);
        let z_index = self.options.z_index.saturating_sub(1).to_string();
        scene.set_styles(
            &overlay,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100vw"),
                ("height", "100vh"),
                ("background", self.options.overlay_color.as_str()),
                ("z-index", z_index.as_str()),
                ("opacity", "0"),
                ("pointer-events", "none"),
                ("transition", "opacity 0.3s"),
            ],
        );
        scene.append_child(&scene.body(), &overlay);
        overlay
    }

    fn listen_outside_click(&self, weak: Weak<RefCell<Inner<S>>>) -> S::Listener {
        self.scene.listen(
            ListenTarget::Node(&self.body_content),
            EventKind::Click,
            Box::new(move |event: &S::Event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let target = event.target();
                let outside = {
                    let this = inner.borrow();
                    let inside = target
                        .as_ref()
                        .is_some_and(|target| this.scene.contains(&this.panel, target));
                    this.is_open && !inside
                };
                if outside {
                    close(&inner);
                }
            }),
        )
    }

    fn listen_escape(&self, weak: Weak<RefCell<Inner<S>>>) -> S::Listener {
        self.scene.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            Box::new(move |event: &S::Event| {
                if event.key().as_deref() != Some("Escape") {
                    return;
                }
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.borrow().is_open {
                    return;
                }
                close(&inner);
                let on_escape = inner.borrow().options.on_escape.clone();
                call(on_escape);
            }),
        )
    }

    fn bind_triggers(&self, inner: &Shared<S>) -> Vec<S::Listener> {
        let targets = match &self.options.trigger {
            None => return Vec::new(),
            Some(Trigger::Element(node)) => vec![node.clone()],
            Some(Trigger::Selector(selector)) => {
                let found = self.scene.query_all(selector);
                if found.is_empty() {
                    warn!(selector = %selector, "trigger selector matched no elements");
                }
                found
            }
        };

        targets
            .iter()
            .map(|target| {
                let weak = Rc::downgrade(inner);
                self.scene.listen(
                    ListenTarget::Node(target),
                    EventKind::Click,
                    Box::new(move |event: &S::Event| {
                        event.prevent_default();
                        event.stop_propagation();
                        if let Some(inner) = weak.upgrade() {
                            toggle(&inner);
                        }
                    }),
                )
            })
            .collect()
    }

    fn show(&self) {
        let scene = &self.scene;
        let body = scene.body();
        scene.add_class(&body, &self.options.class_names.body_open);
        scene.set_attribute(&self.panel, "aria-hidden", "false");

        if let Some(overlay) = &self.overlay {
            scene.set_style(overlay, "opacity", "1");
            scene.set_style(overlay, "pointer-events", "auto");
        }

        let translate = self.translate();
        scene.set_style(&self.panel, "transition", &self.transition("transform"));
        scene.set_style(&self.panel, "transform", &translate);

        if self.options.push_body {
            scene.set_style(&self.body_content, "transform", &translate);
            scene.set_style(&body, "overflow-x", "hidden");
        }

        if self.options.filter {
            scene.set_style(&self.filter_target(), "filter", &self.options.filter_style);
        }
    }

    fn hide(&mut self, weak: Weak<RefCell<Inner<S>>>) {
        let scene = self.scene.clone();
        let body = scene.body();
        scene.remove_class(&body, &self.options.class_names.body_open);

        scene.set_style(&self.panel, "transform", "");
        scene.set_attribute(&self.panel, "aria-hidden", "true");

        if let Some(overlay) = &self.overlay {
            scene.set_style(overlay, "transition", &self.transition("opacity"));
            scene.set_style(overlay, "opacity", "0");
            scene.set_style(overlay, "pointer-events", "none");
        }

        if self.options.filter {
            scene.set_style(&self.filter_target(), "filter", "");
        }

        if self.options.push_body {
            scene.set_style(&self.body_content, "transform", "");
            scene.set_style(&self.body_content, "transition", &self.transition("transform"));
            scene.set_style(&self.body_content, "will-change", "");

            // Keep horizontal overflow suppressed until the slide-out finishes
            let container = self.body_content.clone();
            let listener = scene.listen(
                ListenTarget::Node(&self.body_content),
                EventKind::TransitionEnd,
                Box::new(move |event: &S::Event| {
                    if event.target().as_ref() != Some(&container) {
                        return;
                    }
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let finished = {
                        let mut this = inner.borrow_mut();
                        let body = this.scene.body();
                        this.scene.set_style(&body, "overflow-x", "");
                        this.registrations.overflow_reset.take()
                    };
                    drop(finished);
                }),
            );
            self.registrations.overflow_reset = Some(listener);
        }
    }

    fn teardown(&mut self) {
        let scene = self.scene.clone();
        let body = scene.body();

        if let Some(overlay) = self.overlay.take() {
            scene.remove(&overlay);
        }

        if self.options.push_body {
            scene.set_style(&self.body_content, "transform", "");
            scene.set_style(&self.body_content, "transition", "");
            scene.set_style(&self.body_content, "overflow-x", "");
            scene.set_style(&body, "overflow-x", "");
        }

        if self.options.filter {
            scene.set_style(&self.body_content, "filter", "");
        }

        scene.set_attribute(&self.panel, "aria-hidden", "true");
        scene.set_style(&self.panel, "transform", "");
        scene.remove_class(&body, &self.options.class_names.body_open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Position, Width};
    use crate::memory::{MemoryDocument, NodeId};
    use std::cell::Cell;

    struct Page {
        doc: MemoryDocument,
        header: NodeId,
        main: NodeId,
        panel: NodeId,
        link: NodeId,
    }

    /// `<body><header/>text<main id=main/><aside id=drawer><nav><a/></nav>menu</aside></body>`
    fn page() -> Page {
        let doc = MemoryDocument::new();
        let body = doc.body();
        let header = doc.append_element(body, "header", &[]);
        doc.append_text(body, "\n");
        let main = doc.append_element(body, "main", &[("id", "main")]);
        let panel = doc.append_element(body, "aside", &[("id", "drawer")]);
        let nav = doc.append_element(panel, "nav", &[("class", "links")]);
        let link = doc.append_element(nav, "a", &[("href", "#")]);
        doc.append_text(panel, "menu");
        Page {
            doc,
            header,
            main,
            panel,
            link,
        }
    }

    fn counter() -> (Rc<Cell<u32>>, Hook) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Hook::new(move || c.set(c.get() + 1)))
    }

    fn drawer(page: &Page, options: Options<NodeId>) -> DrawerController<MemoryDocument> {
        DrawerController::new(page.doc.clone(), "#drawer", options).unwrap()
    }

    #[test]
    fn test_construction_wraps_panel_and_body() {
        let p = page();
        let d = drawer(&p, Options::default());

        let content = d.panel_content();
        assert_eq!(p.doc.child_nodes(&p.panel), vec![content]);
        assert!(p.doc.has_class(&p.panel, "slidereveal-panel"));
        assert!(p.doc.has_class(&content, "slidereveal-panel-content"));
        assert_eq!(p.doc.child_nodes(&content).len(), 2);
        assert_eq!(p.doc.query(".links").and_then(|n| p.doc.parent(n)), Some(content));

        let wrapper = d.body_content();
        assert_eq!(p.doc.query_all(".slidereveal-panel-content").len(), 1);
        assert_eq!(p.doc.query_all(".slidereveal-body"), vec![wrapper]);
        assert_eq!(p.doc.parent(p.header), Some(wrapper));
        assert_eq!(p.doc.parent(p.main), Some(wrapper));
        assert_eq!(p.doc.parent(p.panel), Some(p.doc.body()));
        assert_eq!(p.doc.child_nodes(&wrapper).len(), 3);
        assert!(!d.is_open());
    }

    #[test]
    fn test_missing_elements() {
        let p = page();
        let err = DrawerController::new(p.doc.clone(), "#nope", Options::default())
            .err()
            .unwrap();
        assert_eq!(err, SlideRevealError::PanelNotFound("#nope".to_string()));
        assert_eq!(err.to_string(), "panel element not found for selector #nope");

        let options = Options::builder().selector("#missing").build();
        let err = DrawerController::new(p.doc.clone(), "#drawer", options)
            .err()
            .unwrap();
        assert_eq!(err, SlideRevealError::ContentNotFound("#missing".to_string()));
    }

    #[test]
    fn test_initial_styles_and_aria() {
        let p = page();
        let d = drawer(&p, Options::default());
        let doc = &p.doc;

        assert_eq!(doc.style(&p.panel, "position"), "fixed");
        assert_eq!(doc.style(&p.panel, "right"), "-300px");
        assert_eq!(doc.style(&p.panel, "width"), "300px");
        assert_eq!(doc.style(&p.panel, "height"), "100vh");
        assert_eq!(doc.style(&p.panel, "z-index"), "1050");
        assert_eq!(doc.style(&d.panel_content(), "overflow-y"), "auto");
        assert_eq!(doc.attribute(&p.panel, "role").as_deref(), Some("dialog"));
        assert_eq!(doc.attribute(&p.panel, "aria-modal").as_deref(), Some("true"));
        assert_eq!(doc.attribute(&p.panel, "aria-label").as_deref(), Some("Menu"));
        assert_eq!(doc.attribute(&p.panel, "aria-hidden").as_deref(), Some("true"));

        let overlay = d.overlay().unwrap();
        assert_eq!(doc.parent(overlay), Some(doc.body()));
        assert!(doc.has_class(&overlay, "slidereveal-overlay"));
        assert_eq!(doc.style(&overlay, "z-index"), "1049");
        assert_eq!(doc.style(&overlay, "opacity"), "0");
        assert_eq!(doc.style(&overlay, "pointer-events"), "none");
        assert_eq!(doc.style(&overlay, "background"), "rgba(0,0,0,0.3)");
    }

    #[test]
    fn test_open_and_close_are_idempotent() {
        let p = page();
        let (opens, on_open) = counter();
        let (closes, on_close) = counter();
        let d = drawer(
            &p,
            Options::builder().on_open(on_open).on_close(on_close).build(),
        );

        d.close();
        assert_eq!(closes.get(), 0);

        d.open();
        let transform = p.doc.style(&p.panel, "transform");
        d.open();
        assert_eq!(opens.get(), 1);
        assert_eq!(p.doc.style(&p.panel, "transform"), transform);
        assert!(d.is_open());

        d.close();
        d.close();
        assert_eq!(closes.get(), 1);
        assert!(!d.is_open());
    }

    #[test]
    fn test_toggle_twice_returns_to_closed() {
        let p = page();
        let d = drawer(&p, Options::default());
        d.toggle();
        assert!(d.is_open());
        assert!(p.doc.has_class(&p.doc.body(), "slidereveal-open"));
        d.toggle();
        assert!(!d.is_open());
        assert!(!p.doc.has_class(&p.doc.body(), "slidereveal-open"));
    }

    #[test]
    fn test_aria_hidden_follows_state() {
        let p = page();
        let d = drawer(&p, Options::default());
        d.open();
        assert_eq!(p.doc.attribute(&p.panel, "aria-hidden").as_deref(), Some("false"));
        d.close();
        assert_eq!(p.doc.attribute(&p.panel, "aria-hidden").as_deref(), Some("true"));
    }

    #[test]
    fn test_push_body_scenario() {
        let p = page();
        let doc = &p.doc;
        let body = doc.body();
        let d = drawer(&p, Options::builder().overlay(true).push_body(true).speed(400).build());
        let wrapper = d.body_content();
        assert_eq!(doc.style(&wrapper, "transition"), "transform 400ms");

        d.open();
        assert_eq!(doc.style(&p.panel, "transform"), "translateX(-300px)");
        assert_eq!(doc.style(&p.panel, "transition"), "transform 400ms");
        assert_eq!(doc.style(&wrapper, "transform"), "translateX(-300px)");
        assert_eq!(doc.style(&body, "overflow-x"), "hidden");

        d.close();
        assert_eq!(doc.style(&p.panel, "transform"), "");
        assert_eq!(doc.style(&wrapper, "transform"), "");
        assert_eq!(doc.style(&wrapper, "transition"), "transform 400ms");
        assert_eq!(doc.style(&body, "overflow-x"), "hidden");

        // Transitions of nested content bubble up but do not count
        doc.transition_end(p.main);
        assert_eq!(doc.style(&body, "overflow-x"), "hidden");

        doc.transition_end(wrapper);
        assert_eq!(doc.style(&body, "overflow-x"), "");

        // The one-shot listener is gone; overlay click and Escape remain
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn test_left_position_and_custom_width() {
        let p = page();
        let d = drawer(
            &p,
            Options::builder()
                .position(Position::Left)
                .width("40%")
                .push_body(true)
                .build(),
        );
        assert_eq!(p.doc.style(&p.panel, "left"), "-40vw");
        assert_eq!(p.doc.style(&p.panel, "width"), "40vw");
        assert_eq!(p.doc.style(&p.panel, "right"), "");

        d.open();
        assert_eq!(p.doc.style(&p.panel, "transform"), "translateX(40vw)");
        assert_eq!(p.doc.style(&d.body_content(), "transform"), "translateX(40vw)");
    }

    #[test]
    fn test_unspecified_width_falls_back() {
        let p = page();
        let mut options = Options::default();
        options.width = Width::Unspecified;
        drawer(&p, options);
        assert_eq!(p.doc.style(&p.panel, "width"), "300px");
    }

    #[test]
    fn test_overlay_click_closes() {
        let p = page();
        let d = drawer(&p, Options::builder().speed(250).build());
        let overlay = d.overlay().unwrap();

        d.open();
        assert_eq!(p.doc.style(&overlay, "opacity"), "1");
        assert_eq!(p.doc.style(&overlay, "pointer-events"), "auto");

        p.doc.click(overlay);
        assert!(!d.is_open());
        assert_eq!(p.doc.style(&overlay, "opacity"), "0");
        assert_eq!(p.doc.style(&overlay, "pointer-events"), "none");
        assert_eq!(p.doc.style(&overlay, "transition"), "opacity 250ms");
    }

    #[test]
    fn test_escape_closes_and_notifies() {
        let p = page();
        let (escapes, on_escape) = counter();
        let (closes, on_close) = counter();
        let d = drawer(
            &p,
            Options::builder().on_escape(on_escape).on_close(on_close).build(),
        );

        p.doc.key_down("Escape");
        assert_eq!(escapes.get(), 0);

        d.open();
        p.doc.key_down("Enter");
        assert!(d.is_open());

        p.doc.key_down("Escape");
        assert!(!d.is_open());
        assert_eq!(escapes.get(), 1);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_escape_disabled() {
        let p = page();
        let d = drawer(&p, Options::builder().auto_escape(false).build());
        d.open();
        p.doc.key_down("Escape");
        assert!(d.is_open());
    }

    #[test]
    fn test_outside_click() {
        let p = page();
        let d = drawer(
            &p,
            Options::builder().overlay(false).close_on_outside_click(true).build(),
        );
        assert!(d.overlay().is_none());

        p.doc.click(p.main);
        assert!(!d.is_open());

        d.open();
        p.doc.click(p.link);
        assert!(d.is_open());

        p.doc.click(p.main);
        assert!(!d.is_open());
    }

    #[test]
    fn test_outside_click_ignored_with_overlay() {
        let p = page();
        let d = drawer(&p, Options::builder().close_on_outside_click(true).build());
        d.open();
        p.doc.click(p.main);
        assert!(d.is_open());
    }

    #[test]
    fn test_selector_triggers_toggle() {
        let p = page();
        let first = p.doc.append_element(p.header, "button", &[("class", "menu-toggle")]);
        let second = p.doc.append_element(p.main, "a", &[("class", "menu-toggle")]);
        let d = drawer(
            &p,
            Options::builder()
                .trigger(Trigger::Selector(".menu-toggle".to_string()))
                .overlay(false)
                .close_on_outside_click(true)
                .build(),
        );

        let event = p.doc.click(first);
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
        // The outside-click listener never sees the trigger click
        assert!(d.is_open());

        p.doc.click(second);
        assert!(!d.is_open());
    }

    #[test]
    fn test_element_trigger() {
        let p = page();
        let button = p.doc.append_element(p.doc.body(), "button", &[]);
        let d = drawer(&p, Options::builder().trigger(Trigger::Element(button)).build());
        p.doc.click(button);
        assert!(d.is_open());
    }

    #[test]
    fn test_unmatched_trigger_binds_nothing() {
        let p = page();
        let d = drawer(
            &p,
            Options::builder()
                .trigger(Trigger::Selector(".absent".to_string()))
                .build(),
        );
        assert!(!d.is_open());
        // overlay click and Escape only
        assert_eq!(p.doc.listener_count(), 2);
    }

    #[test]
    fn test_filter_applies_to_body_wrapper() {
        let p = page();
        let d = drawer(&p, Options::builder().filter("blur(4px)").build());
        let wrapper = d.body_content();
        d.open();
        assert_eq!(p.doc.style(&wrapper, "filter"), "blur(4px)");
        assert_eq!(p.doc.style(&p.panel, "filter"), "");
        d.close();
        assert_eq!(p.doc.style(&wrapper, "filter"), "");
    }

    #[test]
    fn test_container_outside_panel_is_tagged() {
        let p = page();
        let d = drawer(&p, Options::builder().selector("#main").push_body(true).build());
        assert_eq!(d.body_content(), p.main);
        assert!(p.doc.has_class(&p.main, "slidereveal-body"));
        assert_eq!(p.doc.parent(p.main), Some(p.doc.body()));

        d.open();
        assert_eq!(p.doc.style(&p.main, "transform"), "translateX(-300px)");
    }

    #[test]
    fn test_drawers_share_body_wrapper() {
        let p = page();
        let second = p.doc.append_element(p.doc.body(), "aside", &[("id", "second")]);
        let a = drawer(&p, Options::default());
        let b = DrawerController::new(p.doc.clone(), "#second", Options::default()).unwrap();

        assert_eq!(a.body_content(), b.body_content());
        assert_eq!(p.doc.query_all(".slidereveal-body").len(), 1);
        assert_eq!(p.doc.query_all(".slidereveal-overlay").len(), 2);
        // The second panel was gathered into the first drawer's wrapper
        assert!(p.doc.contains(&a.body_content(), &second));
    }

    #[test]
    fn test_custom_class_names() {
        let p = page();
        let class_names = ClassNames {
            body_open: "drawer-open".to_string(),
            overlay: "drawer-shade".to_string(),
            ..ClassNames::default()
        };
        let d = drawer(&p, Options::builder().class_names(class_names).build());
        assert!(p.doc.has_class(&d.overlay().unwrap(), "drawer-shade"));
        d.open();
        assert!(p.doc.has_class(&p.doc.body(), "drawer-open"));
    }

    #[test]
    fn test_destroy_releases_everything() {
        let p = page();
        let button = p.doc.append_element(p.header, "button", &[("class", "menu-toggle")]);
        let (escapes, on_escape) = counter();
        let d = drawer(
            &p,
            Options::builder()
                .push_body(true)
                .filter("blur(2px)")
                .trigger(Trigger::Selector(".menu-toggle".to_string()))
                .on_escape(on_escape)
                .build(),
        );
        let wrapper = d.body_content();
        d.open();
        assert!(p.doc.listener_count() > 0);

        d.destroy();
        assert_eq!(p.doc.listener_count(), 0);
        assert!(d.overlay().is_none());
        assert!(p.doc.query(".slidereveal-overlay").is_none());
        assert!(d.is_open());
        assert!(!p.doc.has_class(&p.doc.body(), "slidereveal-open"));
        assert_eq!(p.doc.attribute(&p.panel, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(p.doc.style(&p.panel, "transform"), "");
        assert_eq!(p.doc.style(&wrapper, "transform"), "");
        assert_eq!(p.doc.style(&wrapper, "transition"), "");
        assert_eq!(p.doc.style(&wrapper, "filter"), "");
        assert_eq!(p.doc.style(&p.doc.body(), "overflow-x"), "");

        p.doc.key_down("Escape");
        p.doc.click(button);
        assert_eq!(escapes.get(), 0);
        assert!(d.is_open());

        d.destroy();
    }

    #[test]
    fn test_destroy_silences_outside_click() {
        let p = page();
        let (closes, on_close) = counter();
        let d = drawer(
            &p,
            Options::builder()
                .overlay(false)
                .close_on_outside_click(true)
                .on_close(on_close)
                .build(),
        );
        d.open();
        d.destroy();
        d.open();

        p.doc.click(p.main);
        assert!(d.is_open());
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn test_reopen_drops_pending_overflow_reset() {
        let p = page();
        let d = drawer(&p, Options::builder().push_body(true).overlay(false).auto_escape(false).build());
        d.open();
        d.close();
        assert_eq!(p.doc.listener_count(), 1);

        d.open();
        assert_eq!(p.doc.listener_count(), 0);
        p.doc.transition_end(d.body_content());
        assert!(d.is_open());
        assert_eq!(p.doc.style(&p.doc.body(), "overflow-x"), "hidden");
    }

    #[test]
    fn test_minimum_z_index_does_not_overflow() {
        let p = page();
        let d = drawer(&p, Options::builder().z_index(i32::MIN).build());
        let overlay = d.overlay().unwrap();
        assert_eq!(p.doc.style(&overlay, "z-index"), i32::MIN.to_string());
        assert_eq!(p.doc.style(&p.panel, "z-index"), i32::MIN.to_string());
    }

    #[test]
    fn test_destroy_cancels_pending_transition() {
        let p = page();
        let d = drawer(&p, Options::builder().push_body(true).build());
        d.open();
        d.close();
        d.destroy();
        assert_eq!(p.doc.listener_count(), 0);
        p.doc.transition_end(d.body_content());
        assert_eq!(p.doc.style(&p.doc.body(), "overflow-x"), "");
    }

    #[test]
    fn test_repeated_close_keeps_one_pending_transition() {
        let p = page();
        let d = drawer(&p, Options::builder().push_body(true).auto_escape(false).overlay(false).build());
        d.open();
        d.close();
        d.open();
        d.close();
        assert_eq!(p.doc.listener_count(), 1);
    }

    #[test]
    fn test_dropping_controller_unregisters_listeners() {
        let p = page();
        let d = drawer(&p, Options::builder().overlay(false).close_on_outside_click(true).build());
        assert_eq!(p.doc.listener_count(), 2);
        drop(d);
        assert_eq!(p.doc.listener_count(), 0);
    }

    #[test]
    fn test_hooks_may_drive_the_controller() {
        let p = page();
        let slot: Rc<RefCell<Option<DrawerController<MemoryDocument>>>> = Rc::new(RefCell::new(None));
        let (inits, on_init) = counter();
        let s = slot.clone();
        let d = drawer(
            &p,
            Options::builder()
                .on_init(on_init)
                .on_open(move || {
                    if let Some(d) = s.borrow().as_ref() {
                        d.close();
                    }
                })
                .build(),
        );
        assert_eq!(inits.get(), 1);
        *slot.borrow_mut() = Some(d.clone());

        d.open();
        assert!(!d.is_open());
        slot.borrow_mut().take();
    }

    #[test]
    fn test_with_panel_reference() {
        let p = page();
        let d = DrawerController::with_panel(p.doc.clone(), p.panel, Options::default()).unwrap();
        assert_eq!(d.panel(), p.panel);
        d.toggle();
        assert!(d.is_open());
    }
}
