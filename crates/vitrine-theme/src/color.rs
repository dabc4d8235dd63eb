//! Color value parsing for theme layers.
//!
//! Supports the color forms a theme layer may carry:
//!
//! - RGB hex: `"#ff6b35"` or `"#fff"` (3 or 6 digit)
//! - Functional RGB: `rgb(255, 107, 53)`
//! - Functional HSL: `hsl(18, 100%, 60%)`
//! - Indirection tokens: `var(--brand)`, resolved by the host before a color
//!   reaches the contrast engine
//!
//! Alpha forms (`rgba()`, `hsla()`, 4 and 8 digit hex) are rejected: the
//! contrast threshold assumes an opaque background, so translucent colors must
//! be flattened against their backdrop first.
//!
//! # Example
//!
//! ```rust
//! use vitrine_theme::{ColorSpec, Rgb};
//!
//! let hex = ColorSpec::parse("#ff6b35").unwrap();
//! assert_eq!(hex.to_rgb().unwrap(), Rgb(255, 107, 53));
//!
//! let hsl = ColorSpec::parse("hsl(0, 100%, 50%)").unwrap();
//! assert_eq!(hsl.to_rgb().unwrap(), Rgb(255, 0, 0));
//!
//! let token = ColorSpec::parse("var(--brand)").unwrap();
//! assert!(token.to_rgb().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// A simple 8-bit RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Formats the color as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A color expressed in HSL: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    /// Converts to 8-bit RGB.
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s.abs() < f32::EPSILON {
            let v = channel(l);
            return Rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parsed color specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorSpec {
    /// `#rgb` or `#rrggbb`.
    Hex(Rgb),
    /// `rgb(r, g, b)`.
    Rgb(Rgb),
    /// `hsl(h, s%, l%)`.
    Hsl(Hsl),
    /// Opaque symbolic reference such as `var(--brand)`.
    Token(String),
}

impl ColorSpec {
    /// Pure black, `#000000`.
    pub const BLACK: ColorSpec = ColorSpec::Hex(Rgb(0, 0, 0));
    /// Pure white, `#ffffff`.
    pub const WHITE: ColorSpec = ColorSpec::Hex(Rgb(255, 255, 255));

    /// Parses a color from its CSS text form.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidColorSpec`] for anything other than a
    /// supported literal color or a `var(...)` token.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map(ColorSpec::Hex);
        }

        if lower.starts_with("rgba(") || lower.starts_with("hsla(") {
            return Err(ThemeError::invalid_color(
                s,
                "alpha colors must be flattened against their backdrop first",
            ));
        }

        if let Some(inner) = function_args(&lower, "rgb") {
            return parse_rgb_args(s, inner).map(ColorSpec::Rgb);
        }

        if let Some(inner) = function_args(&lower, "hsl") {
            return parse_hsl_args(s, inner).map(ColorSpec::Hsl);
        }

        if let Some(inner) = function_args(&lower, "var") {
            if inner.trim().starts_with("--") {
                return Ok(ColorSpec::Token(s.to_string()));
            }
            return Err(ThemeError::invalid_color(s, "var() must reference a --custom property"));
        }

        Err(ThemeError::invalid_color(
            s,
            "expected #hex, rgb(), hsl() or var(--token)",
        ))
    }

    /// Builds a hex color spec from channels.
    pub fn hex(r: u8, g: u8, b: u8) -> Self {
        ColorSpec::Hex(Rgb(r, g, b))
    }

    /// Returns true for literal colors (anything but a token).
    pub fn is_literal(&self) -> bool {
        !matches!(self, ColorSpec::Token(_))
    }

    /// Converts the color to 8-bit RGB.
    ///
    /// # Errors
    ///
    /// Tokens cannot be resolved here and fail with
    /// [`ThemeError::InvalidColorSpec`].
    pub fn to_rgb(&self) -> Result<Rgb> {
        match self {
            ColorSpec::Hex(rgb) | ColorSpec::Rgb(rgb) => Ok(*rgb),
            ColorSpec::Hsl(hsl) => Ok(hsl.to_rgb()),
            ColorSpec::Token(token) => Err(ThemeError::invalid_color(
                token.clone(),
                "indirection tokens must be resolved by the host first",
            )),
        }
    }
}

/// Returns the argument list of `name(...)` if `s` has that shape.
fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Splits functional arguments on commas or whitespace.
fn split_args(inner: &str) -> Vec<&str> {
    inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Parses a hex color code (without the # prefix).
fn parse_hex(hex: &str) -> Result<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ThemeError::invalid_color(
            format!("#{}", hex),
            "non-hex digit",
        ));
    }

    let digit = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| ThemeError::invalid_color(format!("#{}", hex), "non-hex digit"))
    };

    match hex.len() {
        // #rgb -> #rrggbb
        3 => Ok(Rgb(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
        6 => Ok(Rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
        4 | 8 => Err(ThemeError::invalid_color(
            format!("#{}", hex),
            "alpha colors must be flattened against their backdrop first",
        )),
        _ => Err(ThemeError::invalid_color(
            format!("#{}", hex),
            "must be 3 or 6 digits",
        )),
    }
}

fn parse_rgb_args(original: &str, inner: &str) -> Result<Rgb> {
    let parts = split_args(inner);
    if parts.len() != 3 {
        return Err(ThemeError::invalid_color(
            original,
            format!("rgb() requires exactly 3 components, got {}", parts.len()),
        ));
    }

    let mut components = [0u8; 3];
    for (i, part) in parts.iter().enumerate() {
        components[i] = part.parse::<u8>().map_err(|_| {
            ThemeError::invalid_color(
                original,
                format!("rgb component '{}' must be an integer 0-255", part),
            )
        })?;
    }

    Ok(Rgb(components[0], components[1], components[2]))
}

fn parse_hsl_args(original: &str, inner: &str) -> Result<Hsl> {
    let parts = split_args(inner);
    if parts.len() != 3 {
        return Err(ThemeError::invalid_color(
            original,
            format!("hsl() requires exactly 3 components, got {}", parts.len()),
        ));
    }

    let number = |part: &str, suffix: &str| -> Result<f32> {
        let value = part
            .strip_suffix(suffix)
            .unwrap_or(part)
            .parse::<f32>()
            .map_err(|_| {
                ThemeError::invalid_color(original, format!("invalid hsl component '{}'", part))
            })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ThemeError::invalid_color(
                original,
                format!("invalid hsl component '{}'", part),
            ))
        }
    };

    let h = number(parts[0], "deg")?;
    let s = number(parts[1], "%")?;
    let l = number(parts[2], "%")?;

    if !(0.0..=100.0).contains(&s) || !(0.0..=100.0).contains(&l) {
        return Err(ThemeError::invalid_color(
            original,
            "saturation and lightness must be within 0%-100%",
        ));
    }

    Ok(Hsl { h, s, l })
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Hex(rgb) => f.write_str(&rgb.to_hex()),
            ColorSpec::Rgb(Rgb(r, g, b)) => write!(f, "rgb({}, {}, {})", r, g, b),
            ColorSpec::Hsl(Hsl { h, s, l }) => write!(f, "hsl({}, {}%, {}%)", h, s, l),
            ColorSpec::Token(token) => f.write_str(token),
        }
    }
}

impl FromStr for ColorSpec {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        ColorSpec::parse(s)
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = ThemeError;

    fn try_from(s: String) -> Result<Self> {
        ColorSpec::parse(&s)
    }
}

impl From<ColorSpec> for String {
    fn from(spec: ColorSpec) -> Self {
        spec.to_string()
    }
}

impl From<Rgb> for ColorSpec {
    fn from(rgb: Rgb) -> Self {
        ColorSpec::Hex(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Hex color tests
    // =========================================================================

    #[test]
    fn test_parse_hex_6_digit() {
        assert_eq!(
            ColorSpec::parse("#ff6b35").unwrap(),
            ColorSpec::Hex(Rgb(255, 107, 53))
        );
        assert_eq!(ColorSpec::parse("#000000").unwrap(), ColorSpec::BLACK);
        assert_eq!(ColorSpec::parse("#ffffff").unwrap(), ColorSpec::WHITE);
    }

    #[test]
    fn test_parse_hex_3_digit() {
        assert_eq!(ColorSpec::parse("#fff").unwrap(), ColorSpec::WHITE);
        assert_eq!(
            ColorSpec::parse("#f80").unwrap(),
            ColorSpec::Hex(Rgb(255, 136, 0))
        );
    }

    #[test]
    fn test_parse_hex_case_insensitive() {
        assert_eq!(
            ColorSpec::parse("#FF6B35").unwrap(),
            ColorSpec::Hex(Rgb(255, 107, 53))
        );
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(ColorSpec::parse("#ff").is_err());
        assert!(ColorSpec::parse("#gggggg").is_err());
        assert!(ColorSpec::parse("#+f+f+f").is_err());
    }

    #[test]
    fn test_parse_hex_with_alpha_rejected() {
        let err = ColorSpec::parse("#ffffff80").unwrap_err();
        assert!(err.to_string().contains("flattened"));
        assert!(ColorSpec::parse("#fff8").is_err());
    }

    // =========================================================================
    // Functional form tests
    // =========================================================================

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(
            ColorSpec::parse("rgb(255, 107, 53)").unwrap(),
            ColorSpec::Rgb(Rgb(255, 107, 53))
        );
        assert_eq!(
            ColorSpec::parse("RGB(0 0 0)").unwrap(),
            ColorSpec::Rgb(Rgb(0, 0, 0))
        );
    }

    #[test]
    fn test_parse_rgb_out_of_range() {
        assert!(ColorSpec::parse("rgb(256, 0, 0)").is_err());
        assert!(ColorSpec::parse("rgb(1, 2)").is_err());
    }

    #[test]
    fn test_parse_rgba_rejected() {
        assert!(ColorSpec::parse("rgba(0, 0, 0, 0.5)").is_err());
        assert!(ColorSpec::parse("hsla(0, 0%, 0%, 0.5)").is_err());
    }

    #[test]
    fn test_parse_hsl_function() {
        let spec = ColorSpec::parse("hsl(120deg, 100%, 25%)").unwrap();
        assert_eq!(spec.to_rgb().unwrap(), Rgb(0, 128, 0));
    }

    #[test]
    fn test_hsl_grayscale() {
        let spec = ColorSpec::parse("hsl(0, 0%, 100%)").unwrap();
        assert_eq!(spec.to_rgb().unwrap(), Rgb(255, 255, 255));
    }

    #[test]
    fn test_hsl_out_of_range() {
        assert!(ColorSpec::parse("hsl(0, 120%, 50%)").is_err());
    }

    // =========================================================================
    // Tokens and display
    // =========================================================================

    #[test]
    fn test_parse_token() {
        let spec = ColorSpec::parse("var(--brand-primary)").unwrap();
        assert_eq!(spec, ColorSpec::Token("var(--brand-primary)".into()));
        assert!(!spec.is_literal());
        assert!(matches!(
            spec.to_rgb(),
            Err(ThemeError::InvalidColorSpec { .. })
        ));
    }

    #[test]
    fn test_parse_named_color_rejected() {
        assert!(ColorSpec::parse("white").is_err());
        assert!(ColorSpec::parse("transparent").is_err());
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        for text in ["#ff6b35", "rgb(1, 2, 3)", "hsl(10, 20%, 30%)", "var(--x)"] {
            let spec = ColorSpec::parse(text).unwrap();
            assert_eq!(spec.to_string(), text);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let spec: ColorSpec = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(spec, ColorSpec::hex(0, 255, 0));
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"#00ff00\"");
        assert!(serde_json::from_str::<ColorSpec>("\"chartreuse\"").is_err());
    }
}
