//! Drawer component for leptos apps.

use leptos::html;
use leptos::prelude::*;
use slidereveal::{DrawerController, Options, Position};
use web_sys::Node;

use crate::scene::WebScene;

/// Side drawer around `children`, driven by `is_open`.
///
/// The drawer writes `is_open` back when it opens or closes itself (overlay
/// click, Escape, outside click), so the signal always reflects the panel.
#[component]
pub fn Drawer(
    is_open: RwSignal<bool>,
    #[prop(optional)] position: Position,
    /// Any CSS length; a percentage is read as viewport width.
    #[prop(optional, into)]
    width: Option<String>,
    #[prop(default = true)] overlay: bool,
    #[prop(optional)] push_body: bool,
    /// CSS filter applied to the page content while open.
    #[prop(optional, into)]
    filter: Option<String>,
    #[prop(into, default = "Menu".to_string())] aria_label: String,
    children: Children,
) -> impl IntoView {
    let panel_ref = NodeRef::<html::Aside>::new();
    // Controller holds Rc state, so it stays in thread-local storage
    let drawer = StoredValue::new_local(None::<DrawerController<WebScene>>);

    // Build once the panel is mounted
    Effect::new(move |_| {
        let Some(panel) = panel_ref.get() else {
            return;
        };
        if drawer.with_value(|d| d.is_some()) {
            return;
        }

        let mut builder = Options::builder()
            .position(position)
            .overlay(overlay)
            .push_body(push_body)
            .aria_label(aria_label.clone())
            .on_open(move || is_open.set(true))
            .on_close(move || is_open.set(false));
        if let Some(width) = &width {
            builder = builder.width(width.as_str());
        }
        if let Some(filter) = &filter {
            builder = builder.filter(filter.as_str());
        }

        let created = WebScene::global()
            .and_then(|scene| DrawerController::with_panel(scene, Node::from(panel), builder.build()));
        match created {
            Ok(d) => {
                if is_open.get_untracked() {
                    d.open();
                }
                drawer.set_value(Some(d));
            }
            Err(e) => tracing::error!(error = %e, "failed to create drawer"),
        }
    });

    Effect::new(move |_| {
        let open = is_open.get();
        drawer.with_value(|d| {
            if let Some(d) = d {
                if open {
                    d.open();
                } else {
                    d.close();
                }
            }
        });
    });

    on_cleanup(move || {
        drawer.try_with_value(|d| {
            if let Some(d) = d {
                d.destroy();
            }
        });
    });

    view! {
        <aside node_ref=panel_ref>
            {children()}
        </aside>
    }
}
