//! What a card sees when it renders.
//!
//! A [`CardContext`] carries the card's resolved theme, the font scale, the
//! device class and the display strings for the active locale. Display
//! strings come from a [`DictionarySource`], usually a closure:
//!
//! ```rust
//! use vitrine::context::{Dictionary, DictionarySource};
//!
//! let source = |locale: &str| match locale {
//!     "fr" => Dictionary::new("fr").with("jobs.title", "Offres d'emploi"),
//!     _ => Dictionary::new("en").with("jobs.title", "Job openings"),
//! };
//! assert_eq!(source.dictionary("fr").text("jobs.title"), "Offres d'emploi");
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use vitrine_theme::{FontScaleController, ResolvedTheme};

use crate::error::CardError;
use crate::registry::{ComponentDescriptor, DeviceType};

/// Display strings for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    locale: String,
    entries: BTreeMap<String, String>,
}

impl Dictionary {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Parses a flat JSON object of key → text.
    pub fn from_json(locale: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            locale: locale.into(),
            entries: serde_json::from_str(json)?,
        })
    }

    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The text for `key`, or the key itself when missing.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }
}

/// Supplies the dictionary for a locale.
pub trait DictionarySource {
    fn dictionary(&self, locale: &str) -> Dictionary;
}

impl<F> DictionarySource for F
where
    F: Fn(&str) -> Dictionary,
{
    fn dictionary(&self, locale: &str) -> Dictionary {
        (self)(locale)
    }
}

/// Information available to a card's render callback.
#[derive(Debug, Clone)]
pub struct CardContext<'a> {
    /// The card being rendered.
    pub descriptor: &'a ComponentDescriptor,

    /// The card's theme: global preset, card override and instance layer
    /// already merged.
    pub theme: &'a ResolvedTheme,

    pub fonts: &'a FontScaleController,

    /// The device class the page is composed for.
    pub device: DeviceType,

    pub dictionary: &'a Dictionary,

    /// Additional string key-value pairs for extension.
    pub extras: HashMap<String, String>,
}

impl<'a> CardContext<'a> {
    pub fn new(
        descriptor: &'a ComponentDescriptor,
        theme: &'a ResolvedTheme,
        fonts: &'a FontScaleController,
        device: DeviceType,
        dictionary: &'a Dictionary,
    ) -> Self {
        Self {
            descriptor,
            theme,
            fonts,
            device,
            dictionary,
            extras: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(|s| s.as_str())
    }

    /// Scaled font size for a semantic key such as `"base"`.
    pub fn font_size(&self, key: &str) -> Result<f32, CardError> {
        Ok(self.fonts.font_size(key)?)
    }

    /// The text for `key`, or the key itself when missing.
    pub fn text<'k>(&'k self, key: &'k str) -> &'k str {
        self.dictionary.text(key)
    }

    /// The text for `key`.
    ///
    /// # Errors
    ///
    /// [`CardError::MissingText`] when the dictionary has no entry.
    pub fn require_text(&self, key: &str) -> Result<&str, CardError> {
        self.dictionary
            .get(key)
            .ok_or_else(|| CardError::MissingText {
                key: key.to_string(),
                locale: self.dictionary.locale().to_string(),
            })
    }
}
