//! SlideReveal: a sliding side panel (drawer) with optional overlay, body push
//! and content filter.
//!
//! The [`DrawerController`] is written against the [`Scene`] trait, so the same
//! logic drives a browser document (see the `slidereveal-web` crate) or the
//! headless [`MemoryDocument`].
//!
//! # Quick Start
//!
//! ```
//! use slidereveal::{DrawerController, MemoryDocument, Options, Position, Scene};
//!
//! let doc = MemoryDocument::new();
//! let body = doc.body();
//! doc.append_element(body, "main", &[]);
//! doc.append_element(body, "aside", &[("id", "menu")]);
//!
//! let drawer = DrawerController::new(
//!     doc.clone(),
//!     "#menu",
//!     Options::builder()
//!         .position(Position::Left)
//!         .width("20rem")
//!         .push_body(true)
//!         .build(),
//! )?;
//!
//! drawer.open();
//! assert!(drawer.is_open());
//! drawer.destroy();
//! # Ok::<(), slidereveal::SlideRevealError>(())
//! ```

mod config;
mod controller;
mod error;
mod width;

pub mod memory;
pub mod scene;

pub use config::{ClassNames, Hook, Options, OptionsBuilder, Position, Trigger, Width};
pub use controller::DrawerController;
pub use error::{Result, SlideRevealError};
pub use memory::{MemoryDocument, NodeId};
pub use scene::{EventKind, ListenTarget, Scene, SceneEvent};
pub use width::{resolve_width, DEFAULT_WIDTH};
