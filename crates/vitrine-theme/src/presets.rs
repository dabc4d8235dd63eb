//! Named global theme presets.
//!
//! Presets are YAML documents mapping a preset name to a [`ThemeLayer`]:
//!
//! ```yaml
//! ocean:
//!   background: "#e6f4ff"
//!   primaryColor: "#0958d9"
//!   radius: lg
//! glass:
//!   background: "hsl(220, 30%, 96%)"
//!   backgroundStyle: frosted
//! ```
//!
//! A small set ships with the crate ([`PresetRegistry::builtin`]); user files
//! can add presets or replace built-in ones via [`PresetRegistry::merge`].
//!
//! The name [`AUTO_PRESET`] is reserved: it selects [`LIGHT_PRESET`] or
//! [`DARK_PRESET`] from the OS color mode.

use std::collections::BTreeMap;
use std::path::Path;

use crate::adaptive::detect_color_mode;
use crate::error::{Result, ThemeError};
use crate::layer::ThemeLayer;

/// Reserved preset name that follows the OS color mode.
pub const AUTO_PRESET: &str = "auto";
/// Preset used for light mode and as the last-resort fallback.
pub const LIGHT_PRESET: &str = "default";
/// Preset used for dark mode.
pub const DARK_PRESET: &str = "dark";

const BUILTIN_PRESETS: &str = include_str!("../presets/builtin.yaml");

/// A collection of named global presets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetRegistry {
    presets: BTreeMap<String, ThemeLayer>,
}

impl PresetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The presets shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_PRESETS)
    }

    /// Parses presets from YAML content.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Parse`] for malformed YAML, unknown fields or
    /// invalid colors.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: BTreeMap<String, ThemeLayer> = serde_yaml::from_str(yaml)?;
        let mut registry = Self::new();
        for (name, layer) in parsed {
            registry = registry.add(&name, layer);
        }
        Ok(registry)
    }

    /// Loads presets from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Parse {
            format: "preset file",
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content)
    }

    /// Adds (or replaces) a preset, returning `self` for chaining.
    pub fn add(mut self, name: &str, layer: ThemeLayer) -> Self {
        self.presets
            .insert(name.to_string(), layer.with_name(name));
        self
    }

    /// Merges another registry into this one. Presets from `other` win.
    pub fn merge(mut self, other: PresetRegistry) -> Self {
        self.presets.extend(other.presets);
        self
    }

    /// Looks up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownPreset`] if nothing is registered under
    /// `name`. [`AUTO_PRESET`] is not looked up here; see
    /// [`resolve_name`](Self::resolve_name).
    pub fn get(&self, name: &str) -> Result<&ThemeLayer> {
        self.presets
            .get(name)
            .ok_or_else(|| ThemeError::UnknownPreset(name.to_string()))
    }

    /// Returns true if `name` is selectable: a registered preset or `auto`.
    pub fn contains(&self, name: &str) -> bool {
        name == AUTO_PRESET || self.presets.contains_key(name)
    }

    /// Maps `auto` to the preset for the current OS color mode; other names
    /// are returned unchanged.
    pub fn resolve_name<'a>(&self, name: &'a str) -> &'a str {
        if name != AUTO_PRESET {
            return name;
        }
        detect_color_mode().preset()
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::{restore_color_mode_detector, set_color_mode_detector, ColorMode};
    use crate::{BackgroundStyle, ColorSpec, RadiusToken};
    use serial_test::serial;

    #[test]
    fn test_builtin_presets_parse() {
        let registry = PresetRegistry::builtin().unwrap();
        assert!(registry.contains(LIGHT_PRESET));
        assert!(registry.contains(DARK_PRESET));
        assert_eq!(registry.len(), 6);

        let glass = registry.get("glass").unwrap();
        assert_eq!(glass.background_style, Some(BackgroundStyle::Frosted));
        assert_eq!(glass.radius, Some(RadiusToken::Full));
        assert_eq!(glass.name.as_deref(), Some("glass"));
    }

    #[test]
    fn test_unknown_preset() {
        let registry = PresetRegistry::builtin().unwrap();
        assert!(matches!(
            registry.get("neon"),
            Err(ThemeError::UnknownPreset(name)) if name == "neon"
        ));
    }

    #[test]
    fn test_from_yaml_invalid_color() {
        let result = PresetRegistry::from_yaml("bad:\n  background: chartreuse\n");
        assert!(matches!(result, Err(ThemeError::Parse { format: "yaml", .. })));
    }

    #[test]
    fn test_merge_other_wins() {
        let base = PresetRegistry::builtin().unwrap();
        let user = PresetRegistry::from_yaml("default:\n  background: \"#000000\"\n").unwrap();

        let merged = base.merge(user);
        assert_eq!(
            merged.get("default").unwrap().background,
            Some(ColorSpec::BLACK)
        );
        assert!(merged.contains("ocean"));
    }

    #[test]
    fn test_from_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("presets.yaml");
        fs::write(&path, "mono:\n  primaryColor: \"#333333\"\n  radius: none\n").unwrap();

        let registry = PresetRegistry::from_file(&path).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mono"]);
    }

    #[test]
    fn test_from_file_not_found() {
        assert!(PresetRegistry::from_file("/nonexistent/presets.yaml").is_err());
    }

    #[test]
    #[serial]
    fn test_auto_follows_color_mode() {
        let registry = PresetRegistry::builtin().unwrap();
        let original = set_color_mode_detector(|| ColorMode::Dark);
        assert_eq!(registry.resolve_name(AUTO_PRESET), DARK_PRESET);
        set_color_mode_detector(|| ColorMode::Light);
        assert_eq!(registry.resolve_name(AUTO_PRESET), LIGHT_PRESET);
        assert_eq!(registry.resolve_name("ocean"), "ocean");
        restore_color_mode_detector(original);
    }
}
