//! End-to-end: configuration, preferences, pages and live restyling.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;
use vitrine::context::Dictionary;
use vitrine::theme::reconcile::{EventBus, ManualClock, MemoryTree};
use vitrine::theme::{JsonFileStorage, RadiusToken};
use vitrine::{
    shared, CardError, CardType, ColorSpec, ComponentDescriptor, DeviceType, EngineConfig,
    FontScalePreset, MemoryStorage, Page, PageStatus, ThemeLayer, Vitrine,
};

fn cards() -> Vec<ComponentDescriptor> {
    vec![
        ComponentDescriptor::builder("JobList", "jobs", CardType::List)
            .display_name("jobs.list.title")
            .render(|ctx| {
                Ok(format!(
                    "{}|{}|{}",
                    ctx.require_text("jobs.list.title")?,
                    ctx.font_size("lg")?,
                    ctx.theme.computed_foreground_for_background()
                ))
            })
            .build(),
        ComponentDescriptor::builder("JobMap", "jobs", CardType::Widget)
            .device(DeviceType::Pc)
            .half()
            .theme_override(ThemeLayer::new().with_background(ColorSpec::BLACK))
            .build(),
        ComponentDescriptor::builder("Broken", "stats", CardType::Chart)
            .render(|_| Err(CardError::render("upstream unavailable")))
            .build(),
    ]
}

fn dictionaries(locale: &str) -> Dictionary {
    match locale {
        "es" => Dictionary::new("es").with("jobs.list.title", "Empleos"),
        _ => Dictionary::new("en").with("jobs.list.title", "Jobs"),
    }
}

fn config() -> EngineConfig {
    EngineConfig::from_yaml("default_preset: default\ndebounce_ms: 50\n").unwrap()
}

#[test]
fn page_follows_device_locale_and_font_scale() {
    let mut app = Vitrine::open(config(), shared(MemoryStorage::new()), cards()).unwrap();

    let view = Page::new("jobs", DeviceType::Mobile)
        .with_locale("es")
        .render(&app.env(&dictionaries));
    assert_eq!(view.status, PageStatus::Ready);
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].display_name, "Empleos");
    assert_eq!(view.cards[0].body, "Empleos|18|#000000");

    app.fonts_mut().cycle_next().unwrap();
    assert_eq!(app.fonts().scale().preset, FontScalePreset::Large);
    let view = Page::new("jobs", DeviceType::Pc).render(&app.env(&dictionaries));
    assert_eq!(view.cards.len(), 2);
    assert_eq!(view.cards[0].body, format!("Jobs|{}|#000000", 18.0f32 * 1.2));
    assert_eq!(
        view.cards[1].theme.computed_foreground_for_background(),
        &ColorSpec::WHITE
    );
}

#[test]
fn dark_preset_flips_card_foregrounds() {
    let mut app = Vitrine::open(config(), shared(MemoryStorage::new()), cards()).unwrap();
    app.themes_mut().set_global_preset("dark").unwrap();

    let view = Page::new("jobs", DeviceType::Mobile).render(&app.env(&dictionaries));
    assert!(view.cards[0].body.ends_with("#ffffff"));
}

#[test]
fn empty_and_faulted_pages() {
    let app = Vitrine::open(config(), shared(MemoryStorage::new()), cards()).unwrap();

    let empty = Page::new("medical", DeviceType::Pc).render(&app.env(&dictionaries));
    assert!(empty.is_empty());

    let mut stats = Page::new("stats", DeviceType::Pc);
    let faulted = stats.render(&app.env(&dictionaries));
    assert_eq!(faulted.status, PageStatus::Faulted);
    assert!(faulted.fault.unwrap().contains("upstream unavailable"));

    // Other pages are unaffected.
    let jobs = Page::new("jobs", DeviceType::Pc).render(&app.env(&dictionaries));
    assert_eq!(jobs.status, PageStatus::Ready);
}

#[test]
fn preset_change_restyles_live_tree() {
    let mut app = Vitrine::open(config(), shared(MemoryStorage::new()), cards()).unwrap();
    let bus = EventBus::new();
    let tree = Rc::new(RefCell::new(MemoryTree::new().with_source(bus.clone())));
    let clock = ManualClock::new();
    let observer = app.observe_with_clock(Rc::new(bus), tree.clone(), clock.clone());

    let card = tree.borrow_mut().insert(&["card", "rounded-md"]);
    let pill = tree.borrow_mut().insert(&["badge", "rounded-full"]);
    clock.advance(Duration::from_millis(50));
    observer.run_pending().unwrap();
    assert_eq!(tree.borrow().radius_of(card), Some("6px"));
    assert_eq!(tree.borrow().radius_of(pill), Some("9999px"));

    app.themes_mut()
        .set_custom_override(ThemeLayer::new().with_radius(RadiusToken::None))
        .unwrap();
    assert_eq!(tree.borrow().radius_of(card), Some("0px"));
    assert_eq!(tree.borrow().radius_of(pill), Some("9999px"));
}

#[test]
fn preferences_persist_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let storage = shared(JsonFileStorage::open(&path).unwrap());
        let mut app = Vitrine::open(config(), storage, cards()).unwrap();
        app.themes_mut().set_global_preset("forest").unwrap();
        app.fonts_mut().set_preset("small").unwrap();
    }

    let storage = shared(JsonFileStorage::open(&path).unwrap());
    let app = Vitrine::open(config(), storage, cards()).unwrap();
    assert_eq!(app.themes().preset(), "forest");
    assert_eq!(app.fonts().scale().preset, FontScalePreset::Small);
}
