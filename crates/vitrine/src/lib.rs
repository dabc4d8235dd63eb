//! # Vitrine - Device-Adaptive Card Composition
//!
//! Vitrine composes pages out of interchangeable cards. Cards are registered
//! under a content category with the device class they are designed for; a
//! page asks for the cards of its category that fit the current device and
//! renders each with its own resolved theme.
//!
//! Theming lives in [`vitrine_theme`], re-exported here as [`theme`] with its
//! most used types at the crate root.
//!
//! ## Core Concepts
//!
//! - [`CategoryRegistry`]: category → [`ComponentDescriptor`]s, in registration order
//! - [`Page`]: renders the cards of one category for one [`DeviceType`]
//! - [`FaultBoundary`]: turns a failing or panicking render into a fallback view
//! - [`Vitrine`]: wires configuration, preference storage, stores and registry
//!
//! ## Quick Start
//!
//! ```rust
//! use vitrine::context::Dictionary;
//! use vitrine::{shared, CardType, ComponentDescriptor, DeviceType, EngineConfig, MemoryStorage, Page, PageStatus, Vitrine};
//!
//! let app = Vitrine::open(
//!     EngineConfig::default(),
//!     shared(MemoryStorage::new()),
//!     [
//!         ComponentDescriptor::builder("JobList", "jobs", CardType::List)
//!             .render(|ctx| Ok(format!("<ul style=\"font-size:{}px\"></ul>", ctx.font_size("base")?)))
//!             .build(),
//!         ComponentDescriptor::builder("JobMap", "jobs", CardType::Widget)
//!             .device(DeviceType::Pc)
//!             .build(),
//!     ],
//! )
//! .unwrap();
//!
//! let dictionaries = |locale: &str| Dictionary::new(locale);
//! let view = Page::new("jobs", DeviceType::from_viewport_width(390)).render(&app.env(&dictionaries));
//! assert_eq!(view.status, PageStatus::Ready);
//! assert_eq!(view.cards.len(), 1);
//! assert_eq!(view.cards[0].body, "<ul style=\"font-size:16px\"></ul>");
//! ```

pub mod app;
pub mod boundary;
pub mod context;
mod error;
pub mod page;
pub mod registry;

pub use vitrine_theme as theme;

// Error types
pub use error::{CardError, RegistryError, SetupError};

// Registry
pub use registry::{
    BusinessFlow, CardType, CategoryRegistry, ComponentDescriptor, ComponentDescriptorBuilder,
    DeviceType, RenderFn, WidthHint, MOBILE_BREAKPOINT_PX,
};

// Composition
pub use app::Vitrine;
pub use boundary::{BoundaryState, Fault, FaultBoundary, FaultKind};
pub use context::{CardContext, Dictionary, DictionarySource};
pub use page::{ComposedCard, Page, PageEnv, PageStatus, PageView};

// Theming
pub use vitrine_theme::{
    shared, ColorSpec, EngineConfig, FontScaleController, FontScalePreset, MemoryStorage,
    PreferenceKeys, ResolvedTheme, ThemeError, ThemeLayer, ThemeStore,
};
