//! Color mode for the `auto` preset.
//!
//! Selecting [`AUTO_PRESET`](crate::AUTO_PRESET) makes the theme store follow
//! the light/dark setting of the host. The setting comes from a process-wide
//! [`ColorModeDetector`], by default [`OsColorMode`]. Hosts with their own
//! signal (a browser media query, a settings toggle) install theirs:
//!
//! ```rust
//! use vitrine_theme::{
//!     detect_color_mode, restore_color_mode_detector, set_color_mode_detector, ColorMode, DARK_PRESET,
//! };
//!
//! let previous = set_color_mode_detector(|| ColorMode::Dark);
//! assert_eq!(detect_color_mode().preset(), DARK_PRESET);
//! restore_color_mode_detector(previous);
//! ```
//!
//! After the mode changes, call [`ThemeStore::refresh`](crate::ThemeStore::refresh)
//! so subscribers see the other preset.

use std::sync::{Arc, RwLock};

use dark_light::Mode;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::presets::{DARK_PRESET, LIGHT_PRESET};

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// The built-in preset `auto` resolves to in this mode.
    pub fn preset(self) -> &'static str {
        match self {
            ColorMode::Light => LIGHT_PRESET,
            ColorMode::Dark => DARK_PRESET,
        }
    }
}

/// Reports the current color mode.
pub trait ColorModeDetector: Send + Sync {
    fn color_mode(&self) -> ColorMode;
}

impl<F> ColorModeDetector for F
where
    F: Fn() -> ColorMode + Send + Sync,
{
    fn color_mode(&self) -> ColorMode {
        (self)()
    }
}

/// Asks the operating system through `dark-light`.
///
/// Unspecified or failed detection reads as [`ColorMode::Light`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsColorMode;

impl ColorModeDetector for OsColorMode {
    fn color_mode(&self) -> ColorMode {
        match dark_light::detect() {
            Ok(Mode::Dark) => ColorMode::Dark,
            Ok(Mode::Light | Mode::Unspecified) => ColorMode::Light,
            Err(err) => {
                debug!(?err, "color mode detection failed; using light");
                ColorMode::Light
            }
        }
    }
}

/// A shared detector handle.
pub type SharedDetector = Arc<dyn ColorModeDetector>;

static DETECTOR: Lazy<RwLock<SharedDetector>> = Lazy::new(|| {
    let os: SharedDetector = Arc::new(OsColorMode);
    RwLock::new(os)
});

/// Installs `detector` for the whole process and returns the previous one.
pub fn set_color_mode_detector(detector: impl ColorModeDetector + 'static) -> SharedDetector {
    restore_color_mode_detector(Arc::new(detector))
}

/// Reinstalls a handle returned by [`set_color_mode_detector`]; returns the
/// one it replaces.
pub fn restore_color_mode_detector(detector: SharedDetector) -> SharedDetector {
    let mut slot = DETECTOR.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    std::mem::replace(&mut *slot, detector)
}

/// The mode reported by the installed detector.
pub fn detect_color_mode() -> ColorMode {
    let detector = DETECTOR
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    detector.color_mode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_mode_maps_to_builtin_preset() {
        assert_eq!(ColorMode::Light.preset(), "default");
        assert_eq!(ColorMode::Dark.preset(), "dark");
    }

    #[test]
    #[serial]
    fn test_detector_swap_returns_previous() {
        let original = set_color_mode_detector(|| ColorMode::Dark);
        assert_eq!(detect_color_mode(), ColorMode::Dark);

        let dark = set_color_mode_detector(|| ColorMode::Light);
        assert_eq!(detect_color_mode(), ColorMode::Light);
        assert_eq!(dark.color_mode(), ColorMode::Dark);

        restore_color_mode_detector(original);
    }
}
