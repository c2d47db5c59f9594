//! Drawer options, resolved once at construction by merging caller values over defaults.

use std::fmt;
use std::rc::Rc;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::{Result, SlideRevealError};

/// Panel width as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Width {
    /// Pixels. The sign is ignored.
    Px(f64),
    /// Any CSS length (`"20rem"`, `"40vw"`, `"35%"`).
    Css(String),
    /// A value that was neither a number nor a string; resolves to the default width.
    Unspecified,
}

impl Default for Width {
    fn default() -> Self {
        Width::Px(300.0)
    }
}

impl From<f64> for Width {
    fn from(px: f64) -> Self {
        Width::Px(px)
    }
}

impl From<i32> for Width {
    fn from(px: i32) -> Self {
        Width::Px(px as f64)
    }
}

impl From<&str> for Width {
    fn from(css: &str) -> Self {
        Width::Css(css.to_string())
    }
}

impl From<String> for Width {
    fn from(css: String) -> Self {
        Width::Css(css)
    }
}

impl<'de> Deserialize<'de> for Width {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct WidthVisitor;

        impl<'de> Visitor<'de> for WidthVisitor {
            type Value = Width;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pixel number or a CSS length string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Width, E> {
                Ok(Width::Px(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Width, E> {
                Ok(Width::Px(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Width, E> {
                Ok(Width::Px(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Width, E> {
                Ok(Width::Css(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Width, E> {
                Ok(Width::Unspecified)
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Width, E> {
                Ok(Width::Unspecified)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Width, E> {
                Ok(Width::Unspecified)
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Width, A::Error> {
                while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                Ok(Width::Unspecified)
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> std::result::Result<Width, A::Error> {
                while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
                Ok(Width::Unspecified)
            }
        }

        deserializer.deserialize_any(WidthVisitor)
    }
}

/// Side of the viewport the panel slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    #[default]
    Right,
}

impl Position {
    /// CSS inset property for this side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }

    /// Sign prefix for the open-state `translateX`.
    pub fn translate_sign(&self) -> &'static str {
        match self {
            Position::Right => "-",
            Position::Left => "",
        }
    }
}

/// CSS class names for every element the drawer touches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    /// Wrapper around the page content that gets pushed or filtered.
    pub body_wrapper: String,
    /// Added to the document body while a panel is open.
    pub body_open: String,
    pub panel: String,
    pub panel_content: String,
    pub overlay: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            body_wrapper: "slidereveal-body".to_string(),
            body_open: "slidereveal-open".to_string(),
            panel: "slidereveal-panel".to_string(),
            panel_content: "slidereveal-panel-content".to_string(),
            overlay: "slidereveal-overlay".to_string(),
        }
    }
}

/// Elements that toggle the drawer when clicked.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger<N> {
    /// Every element matching the selector at construction time.
    Selector(String),
    /// A single element reference.
    Element(N),
}

impl<N> Trigger<N> {
    /// A selector trigger, or `None` when the selector is blank.
    pub fn selector(selector: impl Into<String>) -> Option<Self> {
        let selector = selector.into();
        (!selector.trim().is_empty()).then_some(Trigger::Selector(selector))
    }
}

/// A no-argument lifecycle callback.
#[derive(Clone)]
pub struct Hook(Rc<dyn Fn()>);

impl Hook {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Hook(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

impl<F: Fn() + 'static> From<F> for Hook {
    fn from(f: F) -> Self {
        Hook::new(f)
    }
}

/// Drawer configuration.
///
/// `N` is the node type of the scene the drawer runs in; it only appears in
/// [`Trigger::Element`]. Deserializing fills every missing field from
/// [`Options::default`], and a partial `classNames` object only overrides the
/// roles it names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", bound = "")]
pub struct Options<N> {
    pub width: Width,
    pub position: Position,
    /// Apply `filter_style` to the body wrapper while open.
    pub filter: bool,
    pub filter_style: String,
    pub overlay: bool,
    pub overlay_color: String,
    /// Close on clicks outside the panel. Only used when `overlay` is off.
    pub close_on_outside_click: bool,
    /// Transition duration in milliseconds.
    pub speed: u32,
    pub push_body: bool,
    /// Selector of the content container.
    pub selector: String,
    #[serde(deserialize_with = "trigger_selector")]
    pub trigger: Option<Trigger<N>>,
    pub auto_escape: bool,
    /// Stacking order of the panel; the overlay sits one below.
    pub z_index: i32,
    pub class_names: ClassNames,
    #[serde(skip)]
    pub on_init: Option<Hook>,
    #[serde(skip)]
    pub on_open: Option<Hook>,
    #[serde(skip)]
    pub on_close: Option<Hook>,
    #[serde(skip)]
    pub on_escape: Option<Hook>,
    pub aria_label: String,
}

impl<N> Default for Options<N> {
    fn default() -> Self {
        Self {
            width: Width::default(),
            position: Position::default(),
            filter: false,
            filter_style: "blur(2px)".to_string(),
            overlay: true,
            overlay_color: "rgba(0,0,0,0.3)".to_string(),
            close_on_outside_click: false,
            speed: 400,
            push_body: false,
            selector: "body".to_string(),
            trigger: None,
            auto_escape: true,
            z_index: 1050,
            class_names: ClassNames::default(),
            on_init: None,
            on_open: None,
            on_close: None,
            on_escape: None,
            aria_label: "Menu".to_string(),
        }
    }
}

fn trigger_selector<'de, D, N>(deserializer: D) -> std::result::Result<Option<Trigger<N>>, D::Error>
where
    D: Deserializer<'de>,
{
    let selector: Option<String> = Option::deserialize(deserializer)?;
    Ok(selector.and_then(Trigger::selector))
}

impl<N> Options<N> {
    /// Create a builder starting from the defaults.
    pub fn builder() -> OptionsBuilder<N> {
        OptionsBuilder::new()
    }

    /// Parse options from a JSON object. Callbacks and element triggers
    /// cannot be expressed in JSON and stay unset.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse options serialized from a script object.
    ///
    /// A `trigger` that is not a string (an element serializes as `{}`) is
    /// dropped so the caller can attach it as [`Trigger::Element`]. Callback
    /// keys never survive serialization and are ignored like any unknown key.
    pub fn from_script_json(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| SlideRevealError::InvalidOptions("options must be an object".to_string()))?;
        if object.get("trigger").is_some_and(|t| !t.is_string()) {
            object.remove("trigger");
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Builder for [`Options`].
#[derive(Debug, Clone)]
pub struct OptionsBuilder<N> {
    options: Options<N>,
}

impl<N> Default for OptionsBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> OptionsBuilder<N> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options: Options::default(),
        }
    }

    pub fn width(mut self, width: impl Into<Width>) -> Self {
        self.options.width = width.into();
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.options.position = position;
        self
    }

    /// Enable the content filter with the given CSS filter value.
    pub fn filter(mut self, style: impl Into<String>) -> Self {
        self.options.filter = true;
        self.options.filter_style = style.into();
        self
    }

    pub fn overlay(mut self, enabled: bool) -> Self {
        self.options.overlay = enabled;
        self
    }

    pub fn overlay_color(mut self, color: impl Into<String>) -> Self {
        self.options.overlay_color = color.into();
        self
    }

    pub fn close_on_outside_click(mut self, enabled: bool) -> Self {
        self.options.close_on_outside_click = enabled;
        self
    }

    /// Set the transition duration in milliseconds.
    pub fn speed(mut self, ms: u32) -> Self {
        self.options.speed = ms;
        self
    }

    pub fn push_body(mut self, enabled: bool) -> Self {
        self.options.push_body = enabled;
        self
    }

    /// Set the content container selector.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.options.selector = selector.into();
        self
    }

    pub fn trigger(mut self, trigger: Trigger<N>) -> Self {
        self.options.trigger = Some(trigger);
        self
    }

    pub fn auto_escape(mut self, enabled: bool) -> Self {
        self.options.auto_escape = enabled;
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.options.z_index = z_index;
        self
    }

    pub fn class_names(mut self, class_names: ClassNames) -> Self {
        self.options.class_names = class_names;
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.options.aria_label = label.into();
        self
    }

    pub fn on_init(mut self, hook: impl Into<Hook>) -> Self {
        self.options.on_init = Some(hook.into());
        self
    }

    pub fn on_open(mut self, hook: impl Into<Hook>) -> Self {
        self.options.on_open = Some(hook.into());
        self
    }

    pub fn on_close(mut self, hook: impl Into<Hook>) -> Self {
        self.options.on_close = Some(hook.into());
        self
    }

    pub fn on_escape(mut self, hook: impl Into<Hook>) -> Self {
        self.options.on_escape = Some(hook.into());
        self
    }

    pub fn build(self) -> Options<N> {
        self.options
    }
}
