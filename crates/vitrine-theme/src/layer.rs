//! Partial theme fragments.
//!
//! A [`ThemeLayer`] carries any subset of the themeable fields. Missing fields
//! inherit from the next, less specific layer. Layers are stacked with
//! [`ThemeLayer::merge`]: `Some` values in the upper layer replace, missing
//! values preserve the lower one.
//!
//! ```rust
//! use vitrine_theme::{ColorSpec, ThemeLayer};
//!
//! let preset = ThemeLayer::new()
//!     .with_background(ColorSpec::WHITE)
//!     .with_font_family("Inter");
//! let custom = ThemeLayer::new().with_background(ColorSpec::hex(0x10, 0x10, 0x10));
//!
//! let merged = preset.merge(custom);
//! assert_eq!(merged.background, Some(ColorSpec::hex(0x10, 0x10, 0x10)));
//! assert_eq!(merged.font_family.as_deref(), Some("Inter"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorSpec;
use crate::radius::RadiusToken;

/// How a card paints its background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    /// Opaque fill with the resolved background color.
    Solid,
    /// Translucent fill with a backdrop blur (frosted glass).
    Frosted,
    /// No fill; the card shows whatever is behind it.
    None,
}

impl BackgroundStyle {
    /// Backdrop blur radius in pixels, if the style blurs.
    pub fn backdrop_blur_px(self) -> Option<f32> {
        match self {
            BackgroundStyle::Frosted => Some(12.0),
            BackgroundStyle::Solid | BackgroundStyle::None => None,
        }
    }

    /// Opacity applied to the background fill.
    pub fn fill_opacity(self) -> f32 {
        match self {
            BackgroundStyle::Solid => 1.0,
            BackgroundStyle::Frosted => 0.7,
            BackgroundStyle::None => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundStyle::Solid => "solid",
            BackgroundStyle::Frosted => "frosted",
            BackgroundStyle::None => "none",
        }
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial theme configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeLayer {
    /// Layer name (preset name, card id). Not merged.
    #[serde(skip)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_style: Option<BackgroundStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<RadiusToken>,
}

impl ThemeLayer {
    /// Creates an empty, unnamed layer (inherits everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty layer with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The hard-coded system defaults, the least specific layer of every
    /// cascade. Every field is populated.
    pub fn system_default() -> Self {
        Self {
            name: Some("system".to_string()),
            background: Some(ColorSpec::WHITE),
            background_style: Some(BackgroundStyle::Solid),
            font_color: Some(ColorSpec::hex(0x1f, 0x1f, 0x1f)),
            font_family: Some("system-ui, -apple-system, sans-serif".to_string()),
            primary_color: Some(ColorSpec::hex(0x16, 0x77, 0xff)),
            secondary_color: Some(ColorSpec::hex(0x72, 0x2e, 0xd1)),
            radius: Some(RadiusToken::Md),
        }
    }

    /// Sets the name on this layer, returning `self` for chaining.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_background(mut self, color: ColorSpec) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_background_style(mut self, style: BackgroundStyle) -> Self {
        self.background_style = Some(style);
        self
    }

    pub fn with_font_color(mut self, color: ColorSpec) -> Self {
        self.font_color = Some(color);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_primary_color(mut self, color: ColorSpec) -> Self {
        self.primary_color = Some(color);
        self
    }

    pub fn with_secondary_color(mut self, color: ColorSpec) -> Self {
        self.secondary_color = Some(color);
        self
    }

    pub fn with_radius(mut self, radius: RadiusToken) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Stacks `upper` on top of this layer.
    ///
    /// Fields set in `upper` win; the name stays this layer's unless it has
    /// none.
    pub fn merge(self, upper: ThemeLayer) -> Self {
        Self {
            name: self.name.or(upper.name),
            background: upper.background.or(self.background),
            background_style: upper.background_style.or(self.background_style),
            font_color: upper.font_color.or(self.font_color),
            font_family: upper.font_family.or(self.font_family),
            primary_color: upper.primary_color.or(self.primary_color),
            secondary_color: upper.secondary_color.or(self.secondary_color),
            radius: upper.radius.or(self.radius),
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.background_style.is_none()
            && self.font_color.is_none()
            && self.font_family.is_none()
            && self.primary_color.is_none()
            && self.secondary_color.is_none()
            && self.radius.is_none()
    }

    /// Returns true if every field is set.
    pub fn is_complete(&self) -> bool {
        self.background.is_some()
            && self.background_style.is_some()
            && self.font_color.is_some()
            && self.font_family.is_some()
            && self.primary_color.is_some()
            && self.secondary_color.is_some()
            && self.radius.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        assert!(ThemeLayer::new().is_empty());
        assert!(!ThemeLayer::new().is_complete());
    }

    #[test]
    fn test_system_default_is_complete() {
        assert!(ThemeLayer::system_default().is_complete());
    }

    #[test]
    fn test_merge_upper_wins() {
        let lower = ThemeLayer::new()
            .with_font_color(ColorSpec::BLACK)
            .with_radius(RadiusToken::Sm);
        let upper = ThemeLayer::new().with_font_color(ColorSpec::WHITE);

        let merged = lower.merge(upper);
        assert_eq!(merged.font_color, Some(ColorSpec::WHITE));
        assert_eq!(merged.radius, Some(RadiusToken::Sm));
    }

    #[test]
    fn test_merge_keeps_lower_name() {
        let merged = ThemeLayer::named("ocean").merge(ThemeLayer::named("custom"));
        assert_eq!(merged.name.as_deref(), Some("ocean"));
        let merged = ThemeLayer::new().merge(ThemeLayer::named("custom"));
        assert_eq!(merged.name.as_deref(), Some("custom"));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let layer: ThemeLayer = serde_json::from_str(
            r##"{"background":"#000000","backgroundStyle":"frosted","primaryColor":"hsl(0, 100%, 50%)","radius":"lg"}"##,
        )
        .unwrap();
        assert_eq!(layer.background, Some(ColorSpec::BLACK));
        assert_eq!(layer.background_style, Some(BackgroundStyle::Frosted));
        assert_eq!(layer.radius, Some(RadiusToken::Lg));
        assert!(layer.font_family.is_none());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<ThemeLayer>(r#"{"shadow":"big"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let layer = ThemeLayer::named("x").with_radius(RadiusToken::Full);
        let json = serde_json::to_string(&layer).unwrap();
        assert_eq!(json, r#"{"radius":"full"}"#);
    }

    #[test]
    fn test_frosted_style() {
        assert_eq!(BackgroundStyle::Frosted.backdrop_blur_px(), Some(12.0));
        assert_eq!(BackgroundStyle::Solid.backdrop_blur_px(), None);
        assert_eq!(BackgroundStyle::None.fill_opacity(), 0.0);
    }
}
