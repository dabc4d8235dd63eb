//! Font scale presets and semantic font sizes.
//!
//! Three presets scale a fixed base size table:
//!
//! | Preset   | Factor |
//! |----------|--------|
//! | `small`  | 0.8    |
//! | `normal` | 1.0    |
//! | `large`  | 1.2    |
//!
//! [`FontScaleController::cycle_next`] walks `normal → large → small → normal`.
//! That order is not monotonic; it is the toggle order users already know,
//! so it is kept as is.
//!
//! ```rust
//! use vitrine_theme::{shared, FontScaleController, FontScalePreset, MemoryStorage, PreferenceKeys};
//!
//! let mut fonts = FontScaleController::open(shared(MemoryStorage::new()), PreferenceKeys::default());
//! assert_eq!(fonts.font_size("base").unwrap(), 16.0);
//!
//! fonts.cycle_next().unwrap();
//! assert_eq!(fonts.scale().preset, FontScalePreset::Large);
//! assert_eq!(fonts.font_size("base").unwrap(), 16.0 * 1.2);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Result, ThemeError};
use crate::notify::{Subscribers, Subscription};
use crate::storage::{PreferenceKeys, SharedStorage};

/// A font scale preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontScalePreset {
    Small,
    #[default]
    Normal,
    Large,
}

impl FontScalePreset {
    pub const ALL: [FontScalePreset; 3] = [
        FontScalePreset::Small,
        FontScalePreset::Normal,
        FontScalePreset::Large,
    ];

    /// Multiplier applied to the base size table.
    pub fn factor(self) -> f32 {
        match self {
            FontScalePreset::Small => 0.8,
            FontScalePreset::Normal => 1.0,
            FontScalePreset::Large => 1.2,
        }
    }

    /// The preset id used in storage.
    pub fn id(self) -> &'static str {
        match self {
            FontScalePreset::Small => "small",
            FontScalePreset::Normal => "normal",
            FontScalePreset::Large => "large",
        }
    }

    /// Successor in the toggle cycle: `normal → large → small → normal`.
    pub fn next(self) -> Self {
        match self {
            FontScalePreset::Normal => FontScalePreset::Large,
            FontScalePreset::Large => FontScalePreset::Small,
            FontScalePreset::Small => FontScalePreset::Normal,
        }
    }
}

impl fmt::Display for FontScalePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FontScalePreset {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        FontScalePreset::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| ThemeError::InvalidPreset(s.to_string()))
    }
}

/// The current preset and its factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    pub preset: FontScalePreset,
    pub factor: f32,
}

impl From<FontScalePreset> for FontScale {
    fn from(preset: FontScalePreset) -> Self {
        Self {
            preset,
            factor: preset.factor(),
        }
    }
}

/// Semantic size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticSize {
    Xs,
    Sm,
    Base,
    Lg,
    Xl,
    Xl2,
    Xl3,
}

impl SemanticSize {
    pub const ALL: [SemanticSize; 7] = [
        SemanticSize::Xs,
        SemanticSize::Sm,
        SemanticSize::Base,
        SemanticSize::Lg,
        SemanticSize::Xl,
        SemanticSize::Xl2,
        SemanticSize::Xl3,
    ];

    /// Unscaled size in pixels.
    pub fn base_px(self) -> f32 {
        match self {
            SemanticSize::Xs => 12.0,
            SemanticSize::Sm => 14.0,
            SemanticSize::Base => 16.0,
            SemanticSize::Lg => 18.0,
            SemanticSize::Xl => 20.0,
            SemanticSize::Xl2 => 24.0,
            SemanticSize::Xl3 => 30.0,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SemanticSize::Xs => "xs",
            SemanticSize::Sm => "sm",
            SemanticSize::Base => "base",
            SemanticSize::Lg => "lg",
            SemanticSize::Xl => "xl",
            SemanticSize::Xl2 => "2xl",
            SemanticSize::Xl3 => "3xl",
        }
    }
}

impl FromStr for SemanticSize {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticSize::ALL
            .into_iter()
            .find(|size| size.key() == s)
            .ok_or_else(|| ThemeError::UnknownSizeKey(s.to_string()))
    }
}

/// Broadcast whenever the font scale preset changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScaleChanged {
    pub scale: FontScale,
}

/// Owner of the current font scale preference.
pub struct FontScaleController {
    preset: FontScalePreset,
    storage: SharedStorage,
    key: String,
    listeners: Subscribers<FontScaleChanged>,
}

impl FontScaleController {
    /// Creates a controller, restoring the persisted preset.
    ///
    /// Missing or unreadable values fall back to `normal`.
    pub fn open(storage: SharedStorage, keys: PreferenceKeys) -> Self {
        let key = keys.font_scale();
        let stored = storage.borrow().get(&key);
        let preset = match stored {
            Ok(Some(id)) => id.parse().unwrap_or_else(|err| {
                warn!(%err, "ignoring stored font scale");
                FontScalePreset::default()
            }),
            Ok(None) => FontScalePreset::default(),
            Err(err) => {
                warn!(%err, "could not read font scale preference");
                FontScalePreset::default()
            }
        };
        debug!(%preset, "font scale restored");
        Self {
            preset,
            storage,
            key,
            listeners: Subscribers::new(),
        }
    }

    /// The current preset and factor.
    pub fn scale(&self) -> FontScale {
        self.preset.into()
    }

    /// Selects a preset by id.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidPreset`] for ids other than `small`, `normal` and
    /// `large`; [`ThemeError::Storage`] if persisting fails. The current
    /// preset is retained on error.
    pub fn set_preset(&mut self, id: &str) -> Result<()> {
        let preset: FontScalePreset = id.parse()?;
        self.set(preset)
    }

    /// Selects a preset.
    pub fn set(&mut self, preset: FontScalePreset) -> Result<()> {
        self.storage.borrow_mut().set(&self.key, preset.id())?;
        let previous = std::mem::replace(&mut self.preset, preset);
        debug!(from = %previous, to = %preset, "font scale changed");
        self.listeners.notify(&FontScaleChanged {
            scale: self.scale(),
        });
        Ok(())
    }

    /// Advances to the next preset in the toggle cycle and returns it.
    pub fn cycle_next(&mut self) -> Result<FontScalePreset> {
        let next = self.preset.next();
        self.set(next)?;
        Ok(next)
    }

    /// Scaled size for a semantic key such as `"base"` or `"2xl"`.
    ///
    /// # Errors
    ///
    /// [`ThemeError::UnknownSizeKey`] for keys outside the size table.
    pub fn font_size(&self, key: &str) -> Result<f32> {
        let size: SemanticSize = key.parse()?;
        Ok(self.size(size))
    }

    /// Scaled size for a semantic size class.
    pub fn size(&self, size: SemanticSize) -> f32 {
        size.base_px() * self.preset.factor()
    }

    /// Listens for preset changes.
    pub fn subscribe(&self, listener: impl Fn(&FontScaleChanged) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

impl fmt::Debug for FontScaleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontScaleController")
            .field("preset", &self.preset)
            .field("key", &self.key)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
