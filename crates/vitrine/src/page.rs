//! Page composition.
//!
//! A [`Page`] shows the cards registered for one category on one device
//! class. Rendering asks the registry for the matching descriptors, resolves
//! each card's theme (global preset, the card's own override, then its
//! instance layer) and calls the card's render callback.
//!
//! The whole page sits behind a [`FaultBoundary`]: a failing or panicking
//! card turns the page into its faulted fallback until [`Page::reset`].
//! A category with no matching cards renders the defined empty state.

use serde::Serialize;
use tracing::debug;
use vitrine_theme::{FontScaleController, ResolvedTheme, ThemeStore};

use crate::boundary::{Fault, FaultBoundary};
use crate::context::{CardContext, DictionarySource};
use crate::error::CardError;
use crate::registry::{CardType, CategoryRegistry, DeviceType, WidthHint};

/// Everything a page needs to render.
#[derive(Clone, Copy)]
pub struct PageEnv<'a> {
    pub registry: &'a CategoryRegistry,
    pub themes: &'a ThemeStore,
    pub fonts: &'a FontScaleController,
    pub dictionaries: &'a dyn DictionarySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Ready,
    /// No card matched the category and device.
    Empty,
    /// A card failed; the page shows its fallback.
    Faulted,
}

/// One rendered card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedCard {
    pub name: String,
    pub display_name: String,
    pub card_type: CardType,
    pub width_hint: WidthHint,
    pub theme: ResolvedTheme,
    pub body: String,
}

/// The result of rendering a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub category: String,
    pub device: DeviceType,
    pub status: PageStatus,
    pub cards: Vec<ComposedCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl PageView {
    fn new(category: &str, device: DeviceType, status: PageStatus) -> Self {
        Self {
            category: category.to_string(),
            device,
            status,
            cards: Vec::new(),
            fault: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status == PageStatus::Empty
    }
}

/// A category page for one device class.
#[derive(Debug)]
pub struct Page {
    category: String,
    device: DeviceType,
    card_type: Option<CardType>,
    locale: String,
    boundary: FaultBoundary<PageView>,
}

impl Page {
    pub fn new(category: impl Into<String>, device: DeviceType) -> Self {
        let category = category.into();
        let fallback_category = category.clone();
        Self {
            boundary: FaultBoundary::new(move |fault: &Fault| {
                let mut view = PageView::new(&fallback_category, device, PageStatus::Faulted);
                view.fault = Some(fault.to_string());
                view
            }),
            category,
            device,
            card_type: None,
            locale: "en".to_string(),
        }
    }

    /// Restricts the page to one card type.
    pub fn with_card_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn device(&self) -> DeviceType {
        self.device
    }

    /// Renders the page. Card failures are contained by the page boundary.
    pub fn render(&mut self, env: &PageEnv<'_>) -> PageView {
        let Self {
            category,
            device,
            card_type,
            locale,
            boundary,
        } = self;
        boundary.render(|| compose(env, category, *device, *card_type, locale))
    }

    /// Leaves the faulted state so the next render runs the cards again.
    pub fn reset(&mut self) {
        self.boundary.reset();
    }

    pub fn is_faulted(&self) -> bool {
        self.boundary.is_faulted()
    }
}

fn compose(
    env: &PageEnv<'_>,
    category: &str,
    device: DeviceType,
    card_type: Option<CardType>,
    locale: &str,
) -> Result<PageView, CardError> {
    let descriptors = env.registry.query(category, device, card_type);
    if descriptors.is_empty() {
        debug!(category, %device, "no cards for page");
        return Ok(PageView::new(category, device, PageStatus::Empty));
    }

    let dictionary = env.dictionaries.dictionary(locale);
    let mut view = PageView::new(category, device, PageStatus::Ready);
    for descriptor in descriptors {
        let theme = env
            .themes
            .resolve_for(descriptor.theme_override(), descriptor.instance_key());
        let body = {
            let ctx = CardContext::new(descriptor, &theme, env.fonts, device, &dictionary);
            descriptor.render(&ctx)?
        };
        view.cards.push(ComposedCard {
            name: descriptor.name().to_string(),
            display_name: dictionary.text(descriptor.display_name()).to_string(),
            card_type: descriptor.card_type(),
            width_hint: descriptor.width_hint(),
            theme,
            body,
        });
    }
    debug!(category, %device, cards = view.cards.len(), "page composed");
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Dictionary;
    use crate::registry::ComponentDescriptor;
    use vitrine_theme::{
        shared, ColorSpec, MemoryStorage, PreferenceKeys, PresetRegistry, RadiusToken, ThemeLayer,
    };

    struct Fixture {
        registry: CategoryRegistry,
        themes: ThemeStore,
        fonts: FontScaleController,
    }

    impl Fixture {
        fn new(registry: CategoryRegistry) -> Self {
            let storage = shared(MemoryStorage::new());
            Self {
                registry,
                themes: ThemeStore::open(
                    PresetRegistry::builtin().unwrap(),
                    storage.clone(),
                    PreferenceKeys::default(),
                    "default",
                ),
                fonts: FontScaleController::open(storage, PreferenceKeys::default()),
            }
        }
    }

    fn english(_: &str) -> Dictionary {
        Dictionary::new("en").with("jobs.list", "Open positions")
    }

    fn env<'a>(f: &'a Fixture, dictionaries: &'a dyn DictionarySource) -> PageEnv<'a> {
        PageEnv {
            registry: &f.registry,
            themes: &f.themes,
            fonts: &f.fonts,
            dictionaries,
        }
    }

    #[test]
    fn test_unknown_category_renders_empty_state() {
        let f = Fixture::new(CategoryRegistry::new());
        let view = Page::new("nothing", DeviceType::Pc).render(&env(&f, &english));
        assert_eq!(view.status, PageStatus::Empty);
        assert!(view.cards.is_empty());
    }

    #[test]
    fn test_cards_get_their_own_theme() {
        let registry = CategoryRegistry::from_descriptors([
            ComponentDescriptor::builder("plain", "jobs", CardType::List)
                .display_name("jobs.list")
                .build(),
            ComponentDescriptor::builder("dark-card", "jobs", CardType::Summary)
                .theme_override(ThemeLayer::new().with_background(ColorSpec::hex(0x10, 0x10, 0x10)))
                .render(|ctx| Ok(format!("{}px", ctx.font_size("base")?)))
                .build(),
        ])
        .unwrap();
        let f = Fixture::new(registry);
        let view = Page::new("jobs", DeviceType::Mobile).render(&env(&f, &english));

        assert_eq!(view.status, PageStatus::Ready);
        assert_eq!(view.cards[0].display_name, "Open positions");
        assert_eq!(
            view.cards[0].theme.computed_foreground_for_background(),
            &ColorSpec::BLACK
        );
        assert_eq!(
            view.cards[1].theme.computed_foreground_for_background(),
            &ColorSpec::WHITE
        );
        assert_eq!(view.cards[1].body, "16px");
    }

    #[test]
    fn test_instance_layer_applies() {
        let registry = CategoryRegistry::from_descriptors([ComponentDescriptor::builder(
            "hero", "home", CardType::Single,
        )
        .instance_key("home-hero")
        .build()])
        .unwrap();
        let mut f = Fixture::new(registry);
        f.themes
            .set_instance_layer("home-hero", ThemeLayer::new().with_radius(RadiusToken::Full));

        let view = Page::new("home", DeviceType::Pc).render(&env(&f, &english));
        assert_eq!(view.cards[0].theme.radius(), RadiusToken::Full);
    }

    #[test]
    fn test_failing_card_faults_page_until_reset() {
        let registry = CategoryRegistry::from_descriptors([
            ComponentDescriptor::builder("ok", "jobs", CardType::List).build(),
            ComponentDescriptor::builder("broken", "jobs", CardType::Chart)
                .render(|_| Err(CardError::render("no data")))
                .build(),
        ])
        .unwrap();
        let f = Fixture::new(registry);
        let mut page = Page::new("jobs", DeviceType::Pc);

        let view = page.render(&env(&f, &english));
        assert_eq!(view.status, PageStatus::Faulted);
        assert!(view.fault.as_deref().unwrap().contains("no data"));
        assert!(page.is_faulted());

        page.reset();
        assert!(!page.is_faulted());
        // Still broken: faults again.
        assert_eq!(page.render(&env(&f, &english)).status, PageStatus::Faulted);
    }

    #[test]
    fn test_panicking_card_is_contained() {
        let registry = CategoryRegistry::from_descriptors([ComponentDescriptor::builder(
            "chart", "stats", CardType::Chart,
        )
        .render(|_| panic!("axis out of range"))
        .build()])
        .unwrap();
        let f = Fixture::new(registry);
        let view = Page::new("stats", DeviceType::Pc).render(&env(&f, &english));
        assert_eq!(view.status, PageStatus::Faulted);
        assert!(view.fault.unwrap().contains("axis out of range"));
    }
}
