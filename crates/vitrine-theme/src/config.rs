//! Engine configuration.
//!
//! Loaded from YAML, with every field optional:
//!
//! ```yaml
//! namespace: portal          # preference key prefix
//! default_preset: default    # preset used before the user picks one; `auto` follows the OS
//! debounce_ms: 100           # reconciliation debounce window
//! presets_file: ./themes.yaml
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::presets::{PresetRegistry, LIGHT_PRESET};
use crate::storage::PreferenceKeys;

/// Settings shared by the stores and the reconciliation observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Prefix of the persisted preference keys.
    pub namespace: String,
    /// Preset selected when nothing is stored. `auto` follows the OS.
    pub default_preset: String,
    /// Debounce window for reconciliation passes, in milliseconds.
    pub debounce_ms: u64,
    /// Extra presets merged over the built-in ones.
    pub presets_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: "vitrine".to_string(),
            default_preset: LIGHT_PRESET.to_string(),
            debounce_ms: 100,
            presets_file: None,
        }
    }
}

impl EngineConfig {
    /// Parses configuration from YAML content.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ThemeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(ThemeError::Config("namespace must not be empty".into()));
        }
        if self.default_preset.trim().is_empty() {
            return Err(ThemeError::Config("default_preset must not be empty".into()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn keys(&self) -> PreferenceKeys {
        PreferenceKeys::new(self.namespace.clone())
    }

    /// Built-in presets merged with `presets_file`, if configured.
    pub fn load_presets(&self) -> Result<PresetRegistry> {
        let builtin = PresetRegistry::builtin()?;
        match &self.presets_file {
            Some(path) => Ok(builtin.merge(PresetRegistry::from_file(path)?)),
            None => Ok(builtin),
        }
    }
}
