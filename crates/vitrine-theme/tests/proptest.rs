//! Property-based tests for contrast and theme resolution.

use proptest::prelude::*;
use vitrine_theme::{
    compute_foreground, perceived_luminance, BackgroundStyle, ColorSpec, ForegroundRole, Rgb,
    RadiusToken, ThemeCascade, ThemeLayer,
};

// ============================================================================
// Strategies
// ============================================================================

fn rgb_strategy() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb(r, g, b))
}

fn literal_color() -> impl Strategy<Value = ColorSpec> {
    prop_oneof![
        rgb_strategy().prop_map(ColorSpec::Hex),
        rgb_strategy().prop_map(ColorSpec::Rgb),
        (0u16..360, 0u8..=100, 0u8..=100)
            .prop_map(|(h, s, l)| ColorSpec::parse(&format!("hsl({}, {}%, {}%)", h, s, l)).unwrap()),
    ]
}

fn radius_strategy() -> impl Strategy<Value = RadiusToken> {
    prop::sample::select(RadiusToken::ALL.to_vec())
}

fn style_strategy() -> impl Strategy<Value = BackgroundStyle> {
    prop::sample::select(vec![
        BackgroundStyle::Solid,
        BackgroundStyle::Frosted,
        BackgroundStyle::None,
    ])
}

fn layer_strategy() -> impl Strategy<Value = ThemeLayer> {
    (
        prop::option::of(literal_color()),
        prop::option::of(style_strategy()),
        prop::option::of(literal_color()),
        prop::option::of("[A-Za-z ]{1,12}"),
        prop::option::of(literal_color()),
        prop::option::of(radius_strategy()),
    )
        .prop_map(|(background, style, font, family, primary, radius)| {
            let mut layer = ThemeLayer::new();
            layer.background = background;
            layer.background_style = style;
            layer.font_color = font;
            layer.font_family = family;
            layer.primary_color = primary;
            layer.radius = radius;
            layer
        })
}

// ============================================================================
// Contrast
// ============================================================================

proptest! {
    /// Foreground is black exactly when luminance reaches the threshold.
    #[test]
    fn foreground_follows_luminance_threshold(rgb in rgb_strategy()) {
        let fg = compute_foreground(&ColorSpec::Hex(rgb), ForegroundRole::Surface).unwrap();
        let y = (299 * rgb.0 as u32 + 587 * rgb.1 as u32 + 114 * rgb.2 as u32) as f64 / 1000.0;
        if y >= 128.0 {
            prop_assert_eq!(fg, ColorSpec::BLACK);
        } else {
            prop_assert_eq!(fg, ColorSpec::WHITE);
        }
        prop_assert!((perceived_luminance(rgb) - y).abs() < 1e-9);
    }

    /// Both roles agree for the same color.
    #[test]
    fn role_does_not_change_result(rgb in rgb_strategy()) {
        let color = ColorSpec::Rgb(rgb);
        prop_assert_eq!(
            compute_foreground(&color, ForegroundRole::Primary).unwrap(),
            compute_foreground(&color, ForegroundRole::Surface).unwrap()
        );
    }
}

// ============================================================================
// Cascade
// ============================================================================

proptest! {
    /// Identical inputs resolve to equal themes.
    #[test]
    fn resolve_is_deterministic(
        global in layer_strategy(),
        card in prop::option::of(layer_strategy()),
        instance in prop::option::of(layer_strategy()),
    ) {
        let cascade = ThemeCascade::new();
        let a = cascade.resolve(&global, card.as_ref(), instance.as_ref());
        let b = cascade.resolve(&global, card.as_ref(), instance.as_ref());
        prop_assert_eq!(a, b);
    }

    /// A field set on the instance layer always wins.
    #[test]
    fn instance_layer_is_most_specific(
        global in layer_strategy(),
        card in layer_strategy(),
        radius in radius_strategy(),
        font in literal_color(),
    ) {
        let cascade = ThemeCascade::new();
        let instance = ThemeLayer::new().with_radius(radius).with_font_color(font.clone());
        let theme = cascade.resolve(&global, Some(&card), Some(&instance));
        prop_assert_eq!(theme.radius(), radius);
        prop_assert_eq!(theme.font_color(), &font);
    }

    /// Derived foregrounds always match the resolved colors.
    #[test]
    fn derived_foregrounds_are_consistent(global in layer_strategy()) {
        let cascade = ThemeCascade::new();
        let theme = cascade.resolve(&global, None, None);
        prop_assert_eq!(
            theme.computed_foreground_for_background(),
            &compute_foreground(theme.background(), ForegroundRole::Surface).unwrap()
        );
        prop_assert_eq!(
            theme.computed_foreground_for_primary(),
            &compute_foreground(theme.primary_color(), ForegroundRole::Primary).unwrap()
        );
    }
}
