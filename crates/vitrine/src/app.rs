//! One-stop wiring of configuration, preferences, stores and registry.

use std::rc::Rc;

use tracing::debug;
use vitrine_theme::reconcile::{ChangeSource, Clock, ReconciliationObserver, SharedTree, SystemClock};
use vitrine_theme::{EngineConfig, FontScaleController, JsonFileStorage, SharedStorage, ThemeStore};

use crate::context::DictionarySource;
use crate::error::SetupError;
use crate::page::PageEnv;
use crate::registry::{CategoryRegistry, ComponentDescriptor};

/// The registry plus the theme and font stores, built from one
/// [`EngineConfig`].
#[derive(Debug)]
pub struct Vitrine {
    config: EngineConfig,
    registry: CategoryRegistry,
    themes: ThemeStore,
    fonts: FontScaleController,
}

impl Vitrine {
    /// Builds the stores over `storage` and registers `descriptors`.
    ///
    /// # Errors
    ///
    /// [`SetupError::Theme`] if the configured presets cannot be loaded;
    /// [`SetupError::Registry`] on a duplicate descriptor.
    pub fn open<I>(
        config: EngineConfig,
        storage: SharedStorage,
        descriptors: I,
    ) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        let registry = CategoryRegistry::from_descriptors(descriptors)?;
        let keys = config.keys();
        let themes = ThemeStore::open(
            config.load_presets()?,
            storage.clone(),
            keys.clone(),
            &config.default_preset,
        );
        let fonts = FontScaleController::open(storage, keys);
        debug!(
            namespace = %config.namespace,
            cards = registry.len(),
            preset = themes.preset(),
            "vitrine ready"
        );
        Ok(Self {
            config,
            registry,
            themes,
            fonts,
        })
    }

    /// [`open`](Self::open) with preferences in the platform config
    /// directory.
    pub fn open_default<I>(config: EngineConfig, descriptors: I) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        let storage = vitrine_theme::shared(JsonFileStorage::open_default()?);
        Self::open(config, storage, descriptors)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn themes(&self) -> &ThemeStore {
        &self.themes
    }

    pub fn themes_mut(&mut self) -> &mut ThemeStore {
        &mut self.themes
    }

    pub fn fonts(&self) -> &FontScaleController {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontScaleController {
        &mut self.fonts
    }

    /// The environment for rendering pages.
    pub fn env<'a>(&'a self, dictionaries: &'a dyn DictionarySource) -> PageEnv<'a> {
        PageEnv {
            registry: &self.registry,
            themes: &self.themes,
            fonts: &self.fonts,
            dictionaries,
        }
    }

    /// A started observer keeping `tree` in step with the theme store.
    pub fn observe(&self, source: Rc<dyn ChangeSource>, tree: SharedTree) -> ReconciliationObserver {
        self.observe_with_clock(source, tree, SystemClock::new())
    }

    pub fn observe_with_clock(
        &self,
        source: Rc<dyn ChangeSource>,
        tree: SharedTree,
        clock: impl Clock + 'static,
    ) -> ReconciliationObserver {
        let mut observer = ReconciliationObserver::new(
            source,
            tree,
            self.themes.radius_store(),
            self.themes.cascade().events(),
        )
        .with_clock(clock)
        .with_debounce(self.config.debounce());
        observer.start();
        observer
    }
}
