//! Foreground color selection by perceived luminance.
//!
//! Given a background, the engine picks black or white text using the
//! perceived luminance `Y = (299·R + 587·G + 114·B) / 1000`. Backgrounds with
//! `Y >= 128` get black text, darker ones get white. The threshold is
//! inclusive.
//!
//! The engine only accepts opaque literal colors. Indirection tokens and
//! malformed input fail with [`ThemeError::InvalidColorSpec`]; callers
//! substitute a default background and retry.
//!
//! ```rust
//! use vitrine_theme::{compute_foreground, ColorSpec, ForegroundRole};
//!
//! let white = ColorSpec::parse("#ffffff").unwrap();
//! let fg = compute_foreground(&white, ForegroundRole::Surface).unwrap();
//! assert_eq!(fg, ColorSpec::BLACK);
//! ```

use tracing::trace;

use crate::color::{ColorSpec, Rgb};
use crate::error::Result;

/// Luminance at or above which text switches to black.
pub const LUMINANCE_THRESHOLD: u32 = 128;

/// What the background is used for.
///
/// Both roles share the same threshold. `Primary` is the saturated brand or
/// button color, `Surface` the card or page background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForegroundRole {
    Primary,
    Surface,
}

/// Perceived luminance of an opaque color, in the 0-255 range.
pub fn perceived_luminance(rgb: Rgb) -> f64 {
    weighted_luminance(rgb) as f64 / 1000.0
}

// Scaled by 1000 so the threshold comparison stays exact.
fn weighted_luminance(Rgb(r, g, b): Rgb) -> u32 {
    299 * r as u32 + 587 * g as u32 + 114 * b as u32
}

/// Picks the foreground for an already parsed opaque color.
pub fn foreground_for(rgb: Rgb) -> ColorSpec {
    if weighted_luminance(rgb) >= LUMINANCE_THRESHOLD * 1000 {
        ColorSpec::BLACK
    } else {
        ColorSpec::WHITE
    }
}

/// Computes the legible text color for `background`.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidColorSpec`](crate::ThemeError::InvalidColorSpec)
/// when `background` is not a literal color.
pub fn compute_foreground(background: &ColorSpec, role: ForegroundRole) -> Result<ColorSpec> {
    let rgb = background.to_rgb()?;
    let foreground = foreground_for(rgb);
    trace!(%background, ?role, %foreground, "computed foreground");
    Ok(foreground)
}
