//! The persisted global theme selection.
//!
//! [`ThemeStore`] is the single writer of the global preset name and the
//! user's custom override. Every change is persisted first and only then
//! committed, so a storage failure leaves the previous selection in place.
//!
//! The store also owns the [`RadiusStore`]: whenever the resolved global
//! radius changes, the new scale is pushed there, which in turn wakes the
//! reconciliation observer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cascade::{ResolvedTheme, ThemeCascade};
use crate::error::{Result, ThemeError};
use crate::layer::ThemeLayer;
use crate::notify::{Subscribers, Subscription};
use crate::presets::{PresetRegistry, LIGHT_PRESET};
use crate::radius::{RadiusScale, RadiusStore};
use crate::storage::{PreferenceKeys, SharedStorage};

/// The persisted form of the global selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub preset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ThemeLayer>,
}

/// Broadcast after the global selection or an instance layer changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeChanged {
    /// The selected preset name, possibly `auto`.
    pub preset: String,
    /// The global theme after the change.
    pub theme: ResolvedTheme,
}

/// Owner of the global preset, the custom override and per-instance layers.
pub struct ThemeStore {
    presets: PresetRegistry,
    cascade: ThemeCascade,
    storage: SharedStorage,
    key: String,
    radius: RadiusStore,
    preset: String,
    custom: Option<ThemeLayer>,
    instances: HashMap<String, ThemeLayer>,
    listeners: Subscribers<ThemeChanged>,
}

impl ThemeStore {
    /// Creates a store, restoring the persisted selection.
    ///
    /// An unreadable or unknown stored preset falls back to
    /// `default_preset`, and an unknown `default_preset` to the light preset.
    pub fn open(
        presets: PresetRegistry,
        storage: SharedStorage,
        keys: PreferenceKeys,
        default_preset: &str,
    ) -> Self {
        let key = keys.theme();
        let fallback = if presets.contains(default_preset) {
            default_preset.to_string()
        } else {
            warn!(preset = default_preset, "unknown default preset");
            LIGHT_PRESET.to_string()
        };

        let stored = storage.borrow().get(&key);
        let (preset, custom) = match stored.and_then(|value| match value {
            Some(json) => Ok(Some(serde_json::from_str::<ThemePreference>(&json)?)),
            None => Ok(None),
        }) {
            Ok(Some(pref)) if presets.contains(&pref.preset) => (pref.preset, pref.custom),
            Ok(Some(pref)) => {
                warn!(preset = %pref.preset, "stored preset no longer exists");
                (fallback, pref.custom)
            }
            Ok(None) => (fallback, None),
            Err(err) => {
                warn!(%err, "could not read theme preference");
                (fallback, None)
            }
        };

        let mut store = Self {
            presets,
            cascade: ThemeCascade::new(),
            storage,
            key,
            radius: RadiusStore::default(),
            preset,
            custom,
            instances: HashMap::new(),
            listeners: Subscribers::new(),
        };
        store.radius = RadiusStore::new(store.current().radius_scale());
        debug!(preset = %store.preset, "theme restored");
        store
    }

    /// Replaces the cascade, e.g. one built with custom defaults.
    pub fn with_cascade(mut self, cascade: ThemeCascade) -> Self {
        self.cascade = cascade;
        self.radius.set(self.current().radius_scale());
        self
    }

    /// The selected preset name. May be `auto`.
    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn custom_override(&self) -> Option<&ThemeLayer> {
        self.custom.as_ref()
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    pub fn cascade(&self) -> &ThemeCascade {
        &self.cascade
    }

    /// Another handle to the radius slot this store writes to.
    pub fn radius_store(&self) -> RadiusStore {
        self.radius.clone()
    }

    /// The global layer: the selected preset with the custom override on top.
    pub fn global_layer(&self) -> ThemeLayer {
        let name = self.presets.resolve_name(&self.preset);
        let base = match self.presets.get(name) {
            Ok(layer) => layer.clone(),
            Err(err) => {
                warn!(%err, "selected preset missing; using defaults");
                ThemeLayer::named(name)
            }
        };
        match &self.custom {
            Some(custom) => base.merge(custom.clone()),
            None => base,
        }
    }

    /// The global theme with no card or instance layers.
    pub fn current(&self) -> ResolvedTheme {
        self.cascade.resolve(&self.global_layer(), None, None)
    }

    /// Resolves a theme for one card.
    ///
    /// `instance_key` selects a layer set with
    /// [`set_instance_layer`](Self::set_instance_layer); unknown keys add
    /// nothing.
    pub fn resolve_for(
        &self,
        card_override: Option<&ThemeLayer>,
        instance_key: Option<&str>,
    ) -> ResolvedTheme {
        let instance = instance_key.and_then(|key| self.instances.get(key));
        self.cascade
            .resolve(&self.global_layer(), card_override, instance)
    }

    /// Selects a global preset. The custom override is kept.
    ///
    /// # Errors
    ///
    /// [`ThemeError::UnknownPreset`] if `name` is neither registered nor
    /// `auto`; [`ThemeError::Storage`] if persisting fails. The previous
    /// selection is retained on error.
    pub fn set_global_preset(&mut self, name: &str) -> Result<()> {
        if !self.presets.contains(name) {
            return Err(ThemeError::UnknownPreset(name.to_string()));
        }
        self.persist(name, self.custom.as_ref())?;
        let previous = std::mem::replace(&mut self.preset, name.to_string());
        debug!(from = %previous, to = %name, "global preset changed");
        self.announce();
        Ok(())
    }

    /// Merges `layer` into the custom override; fields it sets win.
    pub fn set_custom_override(&mut self, layer: ThemeLayer) -> Result<()> {
        let merged = match &self.custom {
            Some(existing) => existing.clone().merge(layer),
            None => layer,
        };
        self.persist(&self.preset, Some(&merged))?;
        self.custom = Some(merged);
        debug!("custom override updated");
        self.announce();
        Ok(())
    }

    /// Drops the custom override, returning to the bare preset.
    pub fn clear_custom_override(&mut self) -> Result<()> {
        if self.custom.is_none() {
            return Ok(());
        }
        self.persist(&self.preset, None)?;
        self.custom = None;
        debug!("custom override cleared");
        self.announce();
        Ok(())
    }

    /// Sets the layer used for cards rendered with `key`. Not persisted.
    pub fn set_instance_layer(&mut self, key: impl Into<String>, layer: ThemeLayer) {
        self.instances.insert(key.into(), layer);
        self.announce();
    }

    pub fn remove_instance_layer(&mut self, key: &str) -> Option<ThemeLayer> {
        let removed = self.instances.remove(key);
        if removed.is_some() {
            self.announce();
        }
        removed
    }

    pub fn instance_layer(&self, key: &str) -> Option<&ThemeLayer> {
        self.instances.get(key)
    }

    /// Re-evaluates the global theme, e.g. after the OS color mode changed
    /// while `auto` is selected.
    pub fn refresh(&self) {
        self.announce();
    }

    /// Listens for [`ThemeChanged`] broadcasts.
    pub fn subscribe(&self, listener: impl Fn(&ThemeChanged) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn persist(&self, preset: &str, custom: Option<&ThemeLayer>) -> Result<()> {
        let pref = ThemePreference {
            preset: preset.to_string(),
            custom: custom.cloned(),
        };
        let json = serde_json::to_string(&pref)?;
        self.storage.borrow_mut().set(&self.key, &json)
    }

    fn announce(&self) {
        let theme = self.current();
        let scale: RadiusScale = theme.radius_scale();
        if scale != self.radius.current() {
            self.radius.set(scale);
        }
        self.listeners.notify(&ThemeChanged {
            preset: self.preset.clone(),
            theme,
        });
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("preset", &self.preset)
            .field("custom", &self.custom)
            .field("instances", &self.instances.len())
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
