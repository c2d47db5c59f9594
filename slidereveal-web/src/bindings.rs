//! JavaScript-facing `SlideReveal` class.
//!
//! ```js
//! import init, { SlideReveal } from "./slidereveal_web.js";
//!
//! await init();
//! const drawer = new SlideReveal("#menu", {
//!     position: "left",
//!     width: "20rem",
//!     trigger: ".menu-toggle",
//!     onOpen: () => console.log("opened"),
//! });
//! ```

use js_sys::{Function, Reflect, JSON};
use slidereveal::{DrawerController, Hook, Options, SlideRevealError, Trigger};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Node;

use crate::scene::WebScene;

#[wasm_bindgen]
pub struct SlideReveal {
    drawer: DrawerController<WebScene>,
}

#[wasm_bindgen]
impl SlideReveal {
    /// Create a drawer for the element matching `panel_selector`.
    ///
    /// Throws when the panel or the content container cannot be found.
    #[wasm_bindgen(constructor)]
    pub fn new(panel_selector: &str, options: JsValue) -> Result<SlideReveal, JsError> {
        let scene = WebScene::global()?;
        let options = options_from_js(&options)?;
        let drawer = DrawerController::new(scene, panel_selector, options)?;
        Ok(Self { drawer })
    }

    pub fn open(&self) {
        self.drawer.open();
    }

    pub fn close(&self) {
        self.drawer.close();
    }

    pub fn toggle(&self) {
        self.drawer.toggle();
    }

    pub fn destroy(&self) {
        self.drawer.destroy();
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.drawer.is_open()
    }
}

/// Install console logging at debug (`verbose`) or info level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    crate::logging::init_logging(level);
}

/// Read drawer options from a plain JS object.
///
/// Serializable fields go through `JSON.stringify` and
/// [`Options::from_script_json`]. Functions are picked up as hooks, and
/// `trigger` may be a selector string or an element.
fn options_from_js(value: &JsValue) -> Result<Options<Node>, SlideRevealError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Options::default());
    }
    if !value.is_object() {
        return Err(SlideRevealError::InvalidOptions(
            "options must be an object".to_string(),
        ));
    }

    let json: String = JSON::stringify(value)
        .map_err(|_| SlideRevealError::InvalidOptions("options are not serializable".to_string()))?
        .into();
    let mut options: Options<Node> = Options::from_script_json(&json)?;

    let trigger = Reflect::get(value, &JsValue::from_str("trigger")).unwrap_or(JsValue::UNDEFINED);
    options.trigger = match trigger.as_string() {
        Some(selector) => Trigger::selector(selector),
        None => trigger.dyn_into::<Node>().ok().map(Trigger::Element),
    };

    options.on_init = hook(value, "onInit");
    options.on_open = hook(value, "onOpen");
    options.on_close = hook(value, "onClose");
    options.on_escape = hook(value, "onEscape");

    Ok(options)
}

fn hook(options: &JsValue, key: &str) -> Option<Hook> {
    let f = Reflect::get(options, &JsValue::from_str(key))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    let key = key.to_string();
    Some(Hook::new(move || {
        if let Err(e) = f.call0(&JsValue::NULL) {
            tracing::warn!(hook = %key, error = ?e, "drawer callback threw");
        }
    }))
}
