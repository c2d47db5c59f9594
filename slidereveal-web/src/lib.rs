//! Browser backend for slidereveal.
//!
//! - [`WebScene`] implements the drawer's scene trait over `web-sys`.
//! - [`SlideReveal`] is the wasm-bindgen class for use from JavaScript.
//! - [`Drawer`] is a leptos component wrapping its children in a drawer.

mod bindings;
mod component;
mod logging;
mod scene;

pub use bindings::{init_logging_js, SlideReveal};
pub use component::Drawer;
pub use logging::{init_logging, ConsoleWriter, MakeConsoleWriter};
pub use scene::{WebEvent, WebListener, WebScene};

/// Controller type driving the live document.
pub type WebDrawer = slidereveal::DrawerController<WebScene>;
