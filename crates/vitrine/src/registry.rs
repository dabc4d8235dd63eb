//! The component registry.
//!
//! Cards are registered once at start-up under a content category. A page
//! then asks for the cards of a category that fit the current device:
//!
//! ```rust
//! use vitrine::registry::{CardType, CategoryRegistry, ComponentDescriptor, DeviceType};
//!
//! let mut registry = CategoryRegistry::new();
//! registry
//!     .register(ComponentDescriptor::builder("JobList", "jobs", CardType::List).build())
//!     .unwrap();
//! registry
//!     .register(
//!         ComponentDescriptor::builder("JobChart", "jobs", CardType::Chart)
//!             .device(DeviceType::Pc)
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let names = |device| {
//!     registry
//!         .query("jobs", device, None)
//!         .iter()
//!         .map(|d| d.name())
//!         .collect::<Vec<_>>()
//! };
//! assert_eq!(names(DeviceType::Mobile), ["JobList"]);
//! assert_eq!(names(DeviceType::Pc), ["JobList", "JobChart"]);
//! ```
//!
//! Results keep registration order, except that descriptors declaring a
//! priority come first, lowest priority value first.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use vitrine_theme::ThemeLayer;

use crate::context::CardContext;
use crate::error::{CardError, RegistryError};

/// Viewport widths below this are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }
    };
}

/// The visual form of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    List,
    Single,
    Navigation,
    Summary,
    Detail,
    Widget,
    Form,
    Chart,
}

keyword_enum!(CardType {
    List => "list",
    Single => "single",
    Navigation => "navigation",
    Summary => "summary",
    Detail => "detail",
    Widget => "widget",
    Form => "form",
    Chart => "chart",
});

/// Device class a card is designed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Universal,
    Mobile,
    Pc,
}

keyword_enum!(DeviceType {
    Universal => "universal",
    Mobile => "mobile",
    Pc => "pc",
});

impl DeviceType {
    /// Whether a card declared for `self` may be shown on `requested`.
    ///
    /// `Universal` cards fit every device; specific ones only their own.
    pub fn is_compatible(self, requested: DeviceType) -> bool {
        self == DeviceType::Universal || self == requested
    }

    /// Device class for a viewport width in CSS pixels.
    pub fn from_viewport_width(px: u32) -> Self {
        if px < MOBILE_BREAKPOINT_PX {
            DeviceType::Mobile
        } else {
            DeviceType::Pc
        }
    }
}

/// How much horizontal space a card asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthHint {
    Half,
    #[default]
    Full,
}

/// Static description of the business process a card belongs to.
///
/// Carried for documentation and tooling only; never executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFlow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
}

impl BusinessFlow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.steps.push(step.into());
        self
    }
}

/// A card's render callback.
pub type RenderFn = Rc<dyn Fn(&CardContext<'_>) -> Result<String, CardError>>;

/// An immutable registration record for one card.
#[derive(Clone)]
pub struct ComponentDescriptor {
    name: String,
    display_name: String,
    category: String,
    card_type: CardType,
    device_type: DeviceType,
    width_hint: WidthHint,
    render: RenderFn,
    business_flow: Option<BusinessFlow>,
    priority: Option<i32>,
    theme_override: Option<ThemeLayer>,
    instance_key: Option<String>,
}

impl ComponentDescriptor {
    /// Starts a descriptor for a universal, full-width card.
    pub fn builder(
        name: impl Into<String>,
        category: impl Into<String>,
        card_type: CardType,
    ) -> ComponentDescriptorBuilder {
        ComponentDescriptorBuilder::new(name.into(), category.into(), card_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn width_hint(&self) -> WidthHint {
        self.width_hint
    }

    pub fn business_flow(&self) -> Option<&BusinessFlow> {
        self.business_flow.as_ref()
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// The card-local theme layer.
    pub fn theme_override(&self) -> Option<&ThemeLayer> {
        self.theme_override.as_ref()
    }

    /// Key selecting a per-instance theme layer.
    pub fn instance_key(&self) -> Option<&str> {
        self.instance_key.as_deref()
    }

    /// Runs the render callback.
    pub fn render(&self, ctx: &CardContext<'_>) -> Result<String, CardError> {
        (self.render)(ctx)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("card_type", &self.card_type)
            .field("device_type", &self.device_type)
            .field("width_hint", &self.width_hint)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ComponentDescriptor`].
pub struct ComponentDescriptorBuilder {
    name: String,
    display_name: Option<String>,
    category: String,
    card_type: CardType,
    device_type: DeviceType,
    width_hint: WidthHint,
    render: Option<RenderFn>,
    business_flow: Option<BusinessFlow>,
    priority: Option<i32>,
    theme_override: Option<ThemeLayer>,
    instance_key: Option<String>,
}

impl ComponentDescriptorBuilder {
    fn new(name: String, category: String, card_type: CardType) -> Self {
        Self {
            name,
            display_name: None,
            category,
            card_type,
            device_type: DeviceType::default(),
            width_hint: WidthHint::default(),
            render: None,
            business_flow: None,
            priority: None,
            theme_override: None,
            instance_key: None,
        }
    }

    /// Human-readable name. Defaults to the name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn device(mut self, device: DeviceType) -> Self {
        self.device_type = device;
        self
    }

    pub fn width(mut self, width: WidthHint) -> Self {
        self.width_hint = width;
        self
    }

    /// Shorthand for `.width(WidthHint::Half)`.
    pub fn half(self) -> Self {
        self.width(WidthHint::Half)
    }

    /// Sets the render callback. Without one the card renders nothing.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&CardContext<'_>) -> Result<String, CardError> + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn business_flow(mut self, flow: BusinessFlow) -> Self {
        self.business_flow = Some(flow);
        self
    }

    /// Places the card ahead of unprioritised ones; lower values first.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn theme_override(mut self, layer: ThemeLayer) -> Self {
        self.theme_override = Some(layer);
        self
    }

    pub fn instance_key(mut self, key: impl Into<String>) -> Self {
        self.instance_key = Some(key.into());
        self
    }

    pub fn build(self) -> ComponentDescriptor {
        let render: RenderFn = match self.render {
            Some(render) => render,
            None => Rc::new(render_nothing),
        };
        ComponentDescriptor {
            display_name: self.display_name.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            category: self.category,
            card_type: self.card_type,
            device_type: self.device_type,
            width_hint: self.width_hint,
            render,
            business_flow: self.business_flow,
            priority: self.priority,
            theme_override: self.theme_override,
            instance_key: self.instance_key,
        }
    }
}

fn render_nothing(_: &CardContext<'_>) -> Result<String, CardError> {
    Ok(String::new())
}

/// Category → descriptors, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: IndexMap<String, Vec<ComponentDescriptor>>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a static list of descriptors.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Adds a descriptor under its category.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateRegistration`] if the category already holds
    /// a descriptor with the same name. The existing entry is kept.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), RegistryError> {
        let entries = self
            .categories
            .entry(descriptor.category.clone())
            .or_default();
        if entries.iter().any(|d| d.name == descriptor.name) {
            return Err(RegistryError::DuplicateRegistration {
                category: descriptor.category,
                name: descriptor.name,
            });
        }
        debug!(
            category = %descriptor.category,
            name = %descriptor.name,
            device = %descriptor.device_type,
            "component registered"
        );
        entries.push(descriptor);
        Ok(())
    }

    /// Descriptors in `category` compatible with `device` and, if given, of
    /// `card_type`. Unknown categories yield nothing.
    pub fn query(
        &self,
        category: &str,
        device: DeviceType,
        card_type: Option<CardType>,
    ) -> Vec<&ComponentDescriptor> {
        let Some(entries) = self.categories.get(category) else {
            trace!(category, "unknown category");
            return Vec::new();
        };
        let mut matches: Vec<&ComponentDescriptor> = entries
            .iter()
            .filter(|d| d.device_type.is_compatible(device))
            .filter(|d| card_type.map_or(true, |t| d.card_type == t))
            .collect();
        // Stable: equal keys keep registration order.
        matches.sort_by_key(|d| match d.priority {
            Some(p) => (0, p),
            None => (1, 0),
        });
        matches
    }

    /// Looks up one descriptor.
    pub fn get(&self, category: &str, name: &str) -> Option<&ComponentDescriptor> {
        self.categories
            .get(category)?
            .iter()
            .find(|d| d.name == name)
    }

    /// Category keys in first-registration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Total number of descriptors.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
