//! Corner-radius tokens and the current radius configuration.
//!
//! A theme picks one [`RadiusToken`] as its base rounding. The token expands
//! into a [`RadiusScale`], the concrete lengths behind the `rounded-small`,
//! `rounded-medium`, `rounded-large` and `rounded-full` marker classes. The process
//! keeps exactly one current scale in a [`RadiusStore`]; every change is
//! broadcast as a [`RadiusUpdated`] event.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ThemeError;
use crate::notify::{Subscribers, Subscription};

/// Length used for fully rounded (pill) corners.
pub const FULL_RADIUS_PX: f32 = 9999.0;

/// Named corner rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusToken {
    None,
    Sm,
    Md,
    Lg,
    Full,
}

impl RadiusToken {
    /// All tokens, from square to pill.
    pub const ALL: [RadiusToken; 5] = [
        RadiusToken::None,
        RadiusToken::Sm,
        RadiusToken::Md,
        RadiusToken::Lg,
        RadiusToken::Full,
    ];

    /// Base length in pixels when this token is the theme's rounding.
    pub fn base_px(self) -> f32 {
        match self {
            RadiusToken::None => 0.0,
            RadiusToken::Sm => 4.0,
            RadiusToken::Md => 8.0,
            RadiusToken::Lg => 12.0,
            RadiusToken::Full => FULL_RADIUS_PX,
        }
    }

    /// Lowercase token name.
    pub fn as_str(self) -> &'static str {
        match self {
            RadiusToken::None => "none",
            RadiusToken::Sm => "sm",
            RadiusToken::Md => "md",
            RadiusToken::Lg => "lg",
            RadiusToken::Full => "full",
        }
    }
}

impl fmt::Display for RadiusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RadiusToken {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RadiusToken::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ThemeError::Parse {
                format: "radius token",
                message: format!("unknown radius token '{}'", s),
            })
    }
}

/// Marker classes that declare a dependency on the radius configuration.
///
/// Each marker answers to its full class name (`rounded-medium`) and to the
/// short alias (`rounded-md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadiusMarker {
    RoundedSm,
    RoundedMd,
    RoundedLg,
    RoundedFull,
}

impl RadiusMarker {
    pub const ALL: [RadiusMarker; 4] = [
        RadiusMarker::RoundedSm,
        RadiusMarker::RoundedMd,
        RadiusMarker::RoundedLg,
        RadiusMarker::RoundedFull,
    ];

    /// The full class name.
    pub fn class_name(self) -> &'static str {
        match self {
            RadiusMarker::RoundedSm => "rounded-small",
            RadiusMarker::RoundedMd => "rounded-medium",
            RadiusMarker::RoundedLg => "rounded-large",
            RadiusMarker::RoundedFull => "rounded-full",
        }
    }

    /// The short class name.
    pub fn alias(self) -> &'static str {
        match self {
            RadiusMarker::RoundedSm => "rounded-sm",
            RadiusMarker::RoundedMd => "rounded-md",
            RadiusMarker::RoundedLg => "rounded-lg",
            RadiusMarker::RoundedFull => "rounded-full",
        }
    }

    /// Returns true if `class` names this marker.
    pub fn matches(self, class: &str) -> bool {
        class == self.class_name() || class == self.alias()
    }

    /// Looks a marker up by either class name.
    pub fn from_class(class: &str) -> Option<Self> {
        RadiusMarker::ALL.into_iter().find(|m| m.matches(class))
    }

    /// The scale entry this marker reads.
    pub fn token(self) -> RadiusToken {
        match self {
            RadiusMarker::RoundedSm => RadiusToken::Sm,
            RadiusMarker::RoundedMd => RadiusToken::Md,
            RadiusMarker::RoundedLg => RadiusToken::Lg,
            RadiusMarker::RoundedFull => RadiusToken::Full,
        }
    }
}

/// Concrete lengths (in pixels) for every radius token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusScale {
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub full: f32,
}

impl RadiusScale {
    /// Derives the scale from a theme's base token.
    ///
    /// `lg` is the base length, `md` and `sm` step down by 2px and 4px, and
    /// `full` is always a pill.
    pub fn for_token(token: RadiusToken) -> Self {
        let base = token.base_px();
        Self {
            sm: (base - 4.0).max(0.0),
            md: (base - 2.0).max(0.0),
            lg: base,
            full: FULL_RADIUS_PX,
        }
    }

    /// Length for `token`, in pixels.
    pub fn get(&self, token: RadiusToken) -> f32 {
        match token {
            RadiusToken::None => 0.0,
            RadiusToken::Sm => self.sm,
            RadiusToken::Md => self.md,
            RadiusToken::Lg => self.lg,
            RadiusToken::Full => self.full,
        }
    }

    /// CSS length for `token`, e.g. `"8px"`.
    pub fn css(&self, token: RadiusToken) -> String {
        format!("{}px", self.get(token))
    }
}

impl Default for RadiusScale {
    fn default() -> Self {
        Self::for_token(RadiusToken::Md)
    }
}

/// Broadcast whenever the current radius configuration is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusUpdated {
    pub scale: RadiusScale,
}

/// Holder of the process-wide current radius configuration.
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct RadiusStore {
    current: Rc<RefCell<RadiusScale>>,
    listeners: Subscribers<RadiusUpdated>,
}

impl RadiusStore {
    /// Creates a store holding `scale`.
    pub fn new(scale: RadiusScale) -> Self {
        Self {
            current: Rc::new(RefCell::new(scale)),
            listeners: Subscribers::new(),
        }
    }

    /// Returns the current scale.
    pub fn current(&self) -> RadiusScale {
        *self.current.borrow()
    }

    /// Replaces the current scale and broadcasts [`RadiusUpdated`].
    pub fn set(&self, scale: RadiusScale) {
        *self.current.borrow_mut() = scale;
        debug!(?scale, "radius configuration updated");
        self.listeners.notify(&RadiusUpdated { scale });
    }

    /// Listens for radius updates.
    pub fn subscribe(&self, listener: impl Fn(&RadiusUpdated) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }
}
