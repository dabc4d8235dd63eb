//! # Vitrine Theme - Layered, Contrast-Aware Theming
//!
//! `vitrine-theme` resolves the visual configuration of independently rendered
//! cards: colors, background treatment, font family and scale, and corner
//! radius. It keeps already rendered elements in step when that configuration
//! changes at runtime.
//!
//! This crate is the theming foundation of the `vitrine` composition engine,
//! but can be used on its own by any host that renders themed components.
//!
//! ## Core Concepts
//!
//! - [`ThemeLayer`]: a partial theme fragment; absent fields inherit
//! - [`ThemeCascade`]: merges global, card and instance layers into a [`ResolvedTheme`]
//! - [`compute_foreground`]: picks black or white text for any literal background
//! - [`ThemeStore`]: the persisted global preset and custom override
//! - [`FontScaleController`]: the persisted font scale and semantic sizes
//! - [`RadiusStore`]: the current radius scale, watched by the
//!   [`reconcile::ReconciliationObserver`]
//!
//! ## Quick Start
//!
//! ```rust
//! use vitrine_theme::{shared, ColorSpec, MemoryStorage, PreferenceKeys, PresetRegistry, ThemeLayer, ThemeStore};
//!
//! let mut store = ThemeStore::open(
//!     PresetRegistry::builtin().unwrap(),
//!     shared(MemoryStorage::new()),
//!     PreferenceKeys::default(),
//!     "default",
//! );
//!
//! store.set_global_preset("dark").unwrap();
//! assert_eq!(store.current().computed_foreground_for_background(), &ColorSpec::WHITE);
//!
//! // A card that insists on a light surface.
//! let card = ThemeLayer::new().with_background(ColorSpec::WHITE);
//! let theme = store.resolve_for(Some(&card), None);
//! assert_eq!(theme.computed_foreground_for_background(), &ColorSpec::BLACK);
//! ```
//!
//! ## Presets
//!
//! Presets are YAML maps from preset name to layer. Built-in presets ship
//! with the crate; extra ones are merged in through [`EngineConfig`]:
//!
//! ```yaml
//! brand:
//!   background: "#0b1021"
//!   primaryColor: "hsl(262, 83%, 58%)"
//!   backgroundStyle: frosted
//!   radius: lg
//! ```
//!
//! The reserved preset name `auto` follows the host light/dark setting, read
//! from the installed [`ColorModeDetector`] (the OS by default). It is opt-in:
//! the default configuration starts on the `default` preset.
//!
//! ## Logging
//!
//! State transitions are reported through `tracing`. The crate never
//! installs a subscriber.

pub mod adaptive;
pub mod cascade;
pub mod color;
pub mod config;
pub mod contrast;
mod error;
pub mod font_scale;
pub mod layer;
pub mod notify;
pub mod presets;
pub mod radius;
pub mod reconcile;
pub mod storage;
pub mod store;

// Error type
pub use error::{Result, ThemeError};

// Colors and contrast
pub use color::{ColorSpec, Hsl, Rgb};
pub use contrast::{
    compute_foreground, foreground_for, perceived_luminance, ForegroundRole, LUMINANCE_THRESHOLD,
};

// Layers and resolution
pub use cascade::{ResolvedTheme, ThemeCascade, TokensChanged};
pub use layer::{BackgroundStyle, ThemeLayer};
pub use presets::{PresetRegistry, AUTO_PRESET, DARK_PRESET, LIGHT_PRESET};
pub use store::{ThemeChanged, ThemePreference, ThemeStore};

// OS color mode
pub use adaptive::{
    detect_color_mode, restore_color_mode_detector, set_color_mode_detector, ColorMode,
    ColorModeDetector, OsColorMode, SharedDetector,
};

// Radius tokens
pub use radius::{RadiusMarker, RadiusScale, RadiusStore, RadiusToken, RadiusUpdated};

// Font scale
pub use font_scale::{FontScale, FontScaleChanged, FontScaleController, FontScalePreset, SemanticSize};

// Persistence and configuration
pub use config::EngineConfig;
pub use storage::{shared, JsonFileStorage, MemoryStorage, PreferenceKeys, PreferenceStorage, SharedStorage};

// Change notification
pub use notify::{Subscribers, Subscription};
