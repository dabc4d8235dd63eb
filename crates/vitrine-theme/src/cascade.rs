//! Layered theme resolution.
//!
//! A resolved theme is built from up to three layers plus the system
//! defaults. For every field the most specific layer that sets it wins:
//!
//! 1. the per-instance layer
//! 2. the card-local override
//! 3. the global preset
//! 4. the system defaults ([`ThemeLayer::system_default`])
//!
//! After merging, the two derived foreground colors are computed by the
//! contrast engine from the resolved background and primary color. The result
//! is always fully populated and depends only on the inputs and the defaults.
//!
//! Every resolution broadcasts a [`TokensChanged`] event. Delivery is
//! synchronous, so listeners must only record or schedule work.
//!
//! ```rust
//! use vitrine_theme::{ColorSpec, ThemeCascade, ThemeLayer};
//!
//! let cascade = ThemeCascade::new();
//! let global = ThemeLayer::new().with_background(ColorSpec::WHITE);
//! let card = ThemeLayer::new().with_font_color(ColorSpec::hex(0x33, 0x33, 0x33));
//!
//! let theme = cascade.resolve(&global, Some(&card), None);
//! assert_eq!(theme.computed_foreground_for_background(), &ColorSpec::BLACK);
//! assert_eq!(theme.font_color(), &ColorSpec::hex(0x33, 0x33, 0x33));
//! ```

use std::cell::Cell;

use serde::Serialize;
use tracing::warn;

use crate::color::{ColorSpec, Rgb};
use crate::contrast::{compute_foreground, ForegroundRole};
use crate::error::{Result, ThemeError};
use crate::layer::{BackgroundStyle, ThemeLayer};
use crate::notify::{Subscribers, Subscription};
use crate::radius::{RadiusScale, RadiusToken};

/// A theme with every field populated.
///
/// Fields are read through accessors; the derived foregrounds can only be
/// produced by resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    background: ColorSpec,
    background_style: BackgroundStyle,
    font_color: ColorSpec,
    font_family: String,
    primary_color: ColorSpec,
    secondary_color: ColorSpec,
    radius: RadiusToken,
    computed_foreground_for_primary: ColorSpec,
    computed_foreground_for_background: ColorSpec,
}

impl ResolvedTheme {
    pub fn background(&self) -> &ColorSpec {
        &self.background
    }

    pub fn background_style(&self) -> BackgroundStyle {
        self.background_style
    }

    pub fn font_color(&self) -> &ColorSpec {
        &self.font_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn primary_color(&self) -> &ColorSpec {
        &self.primary_color
    }

    pub fn secondary_color(&self) -> &ColorSpec {
        &self.secondary_color
    }

    pub fn radius(&self) -> RadiusToken {
        self.radius
    }

    /// Text color for content placed on the primary color.
    pub fn computed_foreground_for_primary(&self) -> &ColorSpec {
        &self.computed_foreground_for_primary
    }

    /// Text color for content placed on the background.
    pub fn computed_foreground_for_background(&self) -> &ColorSpec {
        &self.computed_foreground_for_background
    }

    /// The radius scale implied by this theme's radius token.
    pub fn radius_scale(&self) -> RadiusScale {
        RadiusScale::for_token(self.radius)
    }

    /// Render-ready CSS custom properties, in a stable order.
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let scale = self.radius_scale();
        let mut vars = vec![
            ("--background", self.background.to_string()),
            ("--background-opacity", self.background_style.fill_opacity().to_string()),
            ("--foreground", self.font_color.to_string()),
            (
                "--background-foreground",
                self.computed_foreground_for_background.to_string(),
            ),
            ("--primary", self.primary_color.to_string()),
            (
                "--primary-foreground",
                self.computed_foreground_for_primary.to_string(),
            ),
            ("--secondary", self.secondary_color.to_string()),
            ("--font-family", self.font_family.clone()),
            ("--radius-sm", scale.css(RadiusToken::Sm)),
            ("--radius-md", scale.css(RadiusToken::Md)),
            ("--radius-lg", scale.css(RadiusToken::Lg)),
            ("--radius-full", scale.css(RadiusToken::Full)),
        ];
        if let Some(blur) = self.background_style.backdrop_blur_px() {
            vars.push(("--backdrop-blur", format!("{}px", blur)));
        }
        vars
    }
}

/// Broadcast after every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokensChanged {
    /// Number of resolutions performed by the cascade so far.
    pub generation: u64,
}

/// The complete system defaults, with literal colors pre-parsed.
#[derive(Debug, Clone)]
struct Defaults {
    layer: ThemeLayer,
    background: (ColorSpec, Rgb),
    primary: (ColorSpec, Rgb),
}

impl Defaults {
    fn from_layer(layer: ThemeLayer) -> Result<Self> {
        let layer = ThemeLayer::system_default().merge(layer);
        let background = literal(layer.background.clone(), "background")?;
        let primary = literal(layer.primary_color.clone(), "primaryColor")?;
        Ok(Self {
            layer,
            background,
            primary,
        })
    }
}

fn literal(color: Option<ColorSpec>, field: &str) -> Result<(ColorSpec, Rgb)> {
    let color = color.ok_or_else(|| ThemeError::invalid_color("", format!("{} is unset", field)))?;
    let rgb = color.to_rgb()?;
    Ok((color, rgb))
}

/// Resolves layered theme fragments into [`ResolvedTheme`]s.
#[derive(Debug, Clone)]
pub struct ThemeCascade {
    defaults: Defaults,
    events: Subscribers<TokensChanged>,
    generation: Cell<u64>,
}

impl ThemeCascade {
    /// Creates a cascade backed by [`ThemeLayer::system_default`].
    pub fn new() -> Self {
        let layer = ThemeLayer::system_default();
        let background = (ColorSpec::WHITE, Rgb(255, 255, 255));
        let primary = (ColorSpec::hex(0x16, 0x77, 0xff), Rgb(0x16, 0x77, 0xff));
        Self {
            defaults: Defaults {
                layer,
                background,
                primary,
            },
            events: Subscribers::new(),
            generation: Cell::new(0),
        }
    }

    /// Creates a cascade with custom defaults. Missing fields are filled from
    /// the system defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidColorSpec`] if the defaults' background or
    /// primary color is not a literal color; those are the fallbacks the
    /// cascade substitutes, so they must always be computable.
    pub fn with_defaults(defaults: ThemeLayer) -> Result<Self> {
        Ok(Self {
            defaults: Defaults::from_layer(defaults)?,
            ..Self::new()
        })
    }

    /// The complete default layer.
    pub fn defaults(&self) -> &ThemeLayer {
        &self.defaults.layer
    }

    /// Resolves a theme, substituting the default background or primary
    /// color when the resolved one cannot be fed to the contrast engine.
    pub fn resolve(
        &self,
        global: &ThemeLayer,
        card_override: Option<&ThemeLayer>,
        instance: Option<&ThemeLayer>,
    ) -> ResolvedTheme {
        let merged = self.merge_layers(global, card_override, instance);

        let (background, background_fg) = self.derive(
            merged.background,
            ForegroundRole::Surface,
            &self.defaults.background,
        );
        let (primary_color, primary_fg) = self.derive(
            merged.primary_color,
            ForegroundRole::Primary,
            &self.defaults.primary,
        );

        let theme = self.assemble(
            merged.font_color,
            merged.font_family,
            merged.background_style,
            merged.secondary_color,
            merged.radius,
            (background, background_fg),
            (primary_color, primary_fg),
        );
        self.announce();
        theme
    }

    /// Resolves a theme without substitution.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidColorSpec`] when the resolved background or
    /// primary color is not a literal color.
    pub fn try_resolve(
        &self,
        global: &ThemeLayer,
        card_override: Option<&ThemeLayer>,
        instance: Option<&ThemeLayer>,
    ) -> Result<ResolvedTheme> {
        let merged = self.merge_layers(global, card_override, instance);

        let background = merged
            .background
            .unwrap_or_else(|| self.defaults.background.0.clone());
        let background_fg = compute_foreground(&background, ForegroundRole::Surface)?;
        let primary_color = merged
            .primary_color
            .unwrap_or_else(|| self.defaults.primary.0.clone());
        let primary_fg = compute_foreground(&primary_color, ForegroundRole::Primary)?;

        let theme = self.assemble(
            merged.font_color,
            merged.font_family,
            merged.background_style,
            merged.secondary_color,
            merged.radius,
            (background, background_fg),
            (primary_color, primary_fg),
        );
        self.announce();
        Ok(theme)
    }

    /// Listens for [`TokensChanged`] broadcasts.
    pub fn subscribe(&self, listener: impl Fn(&TokensChanged) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    /// Another handle to the broadcast list, for components that subscribe
    /// later without holding the cascade.
    pub fn events(&self) -> Subscribers<TokensChanged> {
        self.events.clone()
    }

    /// Number of resolutions performed so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn merge_layers(
        &self,
        global: &ThemeLayer,
        card_override: Option<&ThemeLayer>,
        instance: Option<&ThemeLayer>,
    ) -> ThemeLayer {
        let mut merged = self.defaults.layer.clone().merge(global.clone());
        if let Some(card) = card_override {
            merged = merged.merge(card.clone());
        }
        if let Some(instance) = instance {
            merged = merged.merge(instance.clone());
        }
        merged
    }

    /// Returns the color and its foreground, falling back to `fallback` when
    /// the color is not literal.
    fn derive(
        &self,
        color: Option<ColorSpec>,
        role: ForegroundRole,
        fallback: &(ColorSpec, Rgb),
    ) -> (ColorSpec, ColorSpec) {
        let Some(color) = color else {
            return (fallback.0.clone(), crate::contrast::foreground_for(fallback.1));
        };
        match compute_foreground(&color, role) {
            Ok(foreground) => (color, foreground),
            Err(err) => {
                warn!(
                    ?role,
                    color = %color,
                    substitute = %fallback.0,
                    error = %err,
                    "color cannot be contrasted; substituting default"
                );
                (fallback.0.clone(), crate::contrast::foreground_for(fallback.1))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        font_color: Option<ColorSpec>,
        font_family: Option<String>,
        background_style: Option<BackgroundStyle>,
        secondary_color: Option<ColorSpec>,
        radius: Option<RadiusToken>,
        (background, background_fg): (ColorSpec, ColorSpec),
        (primary_color, primary_fg): (ColorSpec, ColorSpec),
    ) -> ResolvedTheme {
        let defaults = &self.defaults.layer;
        ResolvedTheme {
            background,
            background_style: background_style
                .or(defaults.background_style)
                .unwrap_or(BackgroundStyle::Solid),
            font_color: font_color
                .or_else(|| defaults.font_color.clone())
                .unwrap_or(ColorSpec::BLACK),
            font_family: font_family
                .or_else(|| defaults.font_family.clone())
                .unwrap_or_default(),
            primary_color,
            secondary_color: secondary_color
                .or_else(|| defaults.secondary_color.clone())
                .unwrap_or(ColorSpec::BLACK),
            radius: radius.or(defaults.radius).unwrap_or(RadiusToken::Md),
            computed_foreground_for_primary: primary_fg,
            computed_foreground_for_background: background_fg,
        }
    }

    fn announce(&self) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.events.notify(&TokensChanged { generation });
    }
}

impl Default for ThemeCascade {
    fn default() -> Self {
        Self::new()
    }
}
