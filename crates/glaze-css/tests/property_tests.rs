//! Laws every value, cascade and geometry operation must obey, checked over
//! generated inputs.

use std::rc::Rc;

use glaze_common::Settings;
use glaze_css::geometry::{CornerRadius, RoundedBox};
use glaze_css::paint::shadow::{CORNER_MASK_CACHE_MAX_SIZE, CornerMaskKey};
use glaze_css::style::SpecifiedStyle;
use glaze_css::values::{Dimension, Unit, live_values};
use glaze_css::{
    ComputedStyle, CornerMaskCache, CssProvider, Format, PropertyId, Resolver, Rgba, StyleNode,
    StyleProvider, StyleValue, Surface, parse_text,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn parse(property: PropertyId, text: &str) -> Option<StyleValue> {
    parse_text(text, |p| property.parse_value(p)).ok()
}

fn round_trips(property: PropertyId, text: &str) -> bool {
    let Some(value) = parse(property, text) else {
        return false;
    };
    let printed = value.to_string();
    parse(property, &printed).is_some_and(|reparsed| reparsed == value)
}

fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    Rgba::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    )
}

#[quickcheck]
fn prop_clones_release_their_allocation(value: i16, clones: u8) -> bool {
    let before = live_values();
    {
        let original = StyleValue::px(f64::from(value) + 0.5);
        let copies: Vec<StyleValue> = (0..clones).map(|_| original.clone()).collect();
        if original.ref_count() != usize::from(clones) + 1 {
            return false;
        }
        drop(copies);
        if original.ref_count() != 1 {
            return false;
        }
    }
    live_values() == before
}

#[test]
fn test_dropping_a_style_releases_its_values() {
    let resolve = || {
        let mut resolver = Resolver::new(CssProvider::from_data(
            "box { margin-top: 3em; color: shade(#336699, 1.2); box-shadow: 0 1px 2px black; }",
        ));
        let _ = resolver.style_for(&StyleNode::new("box"));
    };
    // The first run creates the thread's shared constants.
    resolve();
    let before = live_values();
    resolve();
    assert_eq!(live_values(), before);
}

#[quickcheck]
fn prop_lengths_round_trip(quarter_pixels: i16) -> bool {
    let text = format!("{}px", f64::from(quarter_pixels) / 4.0);
    round_trips(PropertyId::MarginTop, &text)
}

#[quickcheck]
fn prop_font_relative_lengths_round_trip(tenths: u16, unit: u8) -> bool {
    // Zero prints without a unit, so start at a tenth.
    let unit = ["em", "ex", "rem", "pt", "pc", "in", "cm", "mm"][usize::from(unit) % 8];
    let text = format!("{}{unit}", (f64::from(tenths) + 1.0) / 10.0);
    round_trips(PropertyId::PaddingLeft, &text)
}

#[quickcheck]
fn prop_colors_round_trip(r: u8, g: u8, b: u8, a: u8) -> bool {
    round_trips(PropertyId::Color, &rgba8(r, g, b, a).to_string())
}

#[quickcheck]
fn prop_shadows_round_trip(x: i8, y: i8, blur: u8, spread: i8, inset: bool) -> bool {
    let inset = if inset { "inset " } else { "" };
    let text = format!("{inset}{x}px {y}px {blur}px {spread}px rgba(10,20,30,0.5)");
    round_trips(PropertyId::BoxShadow, &text)
}

#[quickcheck]
fn prop_times_round_trip(millis: u16) -> bool {
    round_trips(PropertyId::TransitionDuration, &format!("{}ms", u32::from(millis) + 1))
}

#[test]
fn test_fixed_values_round_trip() {
    for (property, text) in [
        (PropertyId::Color, "shade(@fg, 1.2)"),
        (PropertyId::Color, "mix(red, alpha(blue, 0.5), 0.25)"),
        (PropertyId::BorderTopLeftRadius, "4px 8px"),
        (
            PropertyId::BackgroundImage,
            "-glaze-gradient(linear, left top, right bottom, from(red), color-stop(0.25, @accent), to(blue))",
        ),
        (PropertyId::BackgroundSize, "cover"),
        (PropertyId::BackgroundPosition, "left 10px top"),
        (PropertyId::BorderImageSlice, "1 2 3 4 fill"),
        (PropertyId::TransitionTimingFunction, "cubic-bezier(0.1, 0.2, 0.3, 0.4)"),
        (PropertyId::IconPalette, "error red, warning #ff8000"),
        (PropertyId::Opacity, "0.75"),
    ] {
        assert!(round_trips(property, text), "{property:?}: {text}");
    }
}

#[quickcheck]
fn prop_compute_is_idempotent(font_pt: u8, margin_tenths: u16, hue: u8) -> bool {
    let css = format!(
        "box {{
            font-size: {}pt;
            margin-top: {}em;
            padding-left: {}ex;
            -glaze-icon-shadow: 1mm 0 2px shade(rgb({hue}, 0, 0), 1.1);
            background-image: -glaze-gradient(linear, left top, right top, from(currentColor), to(transparent));
            transition-duration: {}ms;
        }}",
        u16::from(font_pt) + 1,
        f64::from(margin_tenths) / 10.0,
        f64::from(margin_tenths) / 5.0,
        margin_tenths,
    );
    let provider = CssProvider::from_data(&css);
    let settings = Settings::default();
    let node = StyleNode::new("box");
    let once = ComputedStyle::compute(&provider.lookup(&node), &provider, &settings, None);
    let again: SpecifiedStyle = once.iter().map(|(p, v)| (p, v.clone())).collect();
    let twice = ComputedStyle::compute(&again, &provider, &settings, None);
    once == twice
}

#[quickcheck]
fn prop_color_transition_endpoints(start: (u8, u8, u8, u8), end: (u8, u8, u8, u8)) -> TestResult {
    // Fully transparent colors all collapse to the same value.
    if start.3 == 0 || end.3 == 0 {
        return TestResult::discard();
    }
    let a = StyleValue::rgba(rgba8(start.0, start.1, start.2, start.3));
    let b = StyleValue::rgba(rgba8(end.0, end.1, end.2, end.3));
    let at_start = a.transition(&b, PropertyId::Color, 0.0);
    let at_end = a.transition(&b, PropertyId::Color, 1.0);
    TestResult::from_bool(at_start.as_ref() == Some(&a) && at_end.as_ref() == Some(&b))
}

#[quickcheck]
fn prop_length_transition_endpoints(start: i16, end: i16, mixed_units: bool) -> bool {
    let a = StyleValue::px(f64::from(start));
    let b = if mixed_units {
        StyleValue::dimension(f64::from(end), Unit::Percent)
    } else {
        StyleValue::px(f64::from(end))
    };
    let property = PropertyId::BorderTopLeftRadius;
    let at_start = a.transition(&b, property, 0.0);
    let at_end = a.transition(&b, property, 1.0);
    let resolve = |v: &StyleValue| v.number_value(200.0);
    at_start.is_some_and(|v| resolve(&v) == resolve(&a)) && at_end.is_some_and(|v| resolve(&v) == resolve(&b))
}

#[quickcheck]
fn prop_shadow_transition_endpoints(x: i8, y: i8, blur: u8) -> bool {
    let Some(a) = parse(PropertyId::BoxShadow, "0 0 0 black") else {
        return false;
    };
    let Some(b) = parse(PropertyId::BoxShadow, &format!("{x}px {y}px {blur}px red")) else {
        return false;
    };
    a.transition(&b, PropertyId::BoxShadow, 0.0).as_ref() == Some(&a)
        && a.transition(&b, PropertyId::BoxShadow, 1.0).as_ref() == Some(&b)
}

#[test]
fn test_inch_to_centimeter_conversion_commutes() {
    let inch = Dimension::new(1.0, Unit::In);
    let via_px = inch
        .convert(Unit::Px, 96.0)
        .and_then(|px| px.convert(Unit::Cm, 96.0));
    let direct = inch.convert(Unit::Cm, 96.0);
    let (Some(via_px), Some(direct)) = (via_px, direct) else {
        panic!("absolute lengths convert");
    };
    assert!((via_px.value - direct.value).abs() <= f64::EPSILON * direct.value);
    assert!((direct.value - 2.54).abs() < 1e-12);
}

#[quickcheck]
fn prop_absolute_conversions_commute(tenths: u16, dpi: u8) -> TestResult {
    if dpi == 0 {
        return TestResult::discard();
    }
    let dpi = f64::from(dpi);
    let length = Dimension::new(f64::from(tenths) / 10.0, Unit::Mm);
    let via_pt = length
        .convert(Unit::Pt, dpi)
        .and_then(|pt| pt.convert(Unit::In, dpi));
    let direct = length.convert(Unit::In, dpi);
    match (via_pt, direct) {
        (Some(a), Some(b)) => TestResult::from_bool((a.value - b.value).abs() <= 1e-9 * b.value.max(1.0)),
        _ => TestResult::failed(),
    }
}

#[test]
fn test_relative_units_do_not_convert() {
    assert!(Dimension::new(1.0, Unit::Em).convert(Unit::Px, 96.0).is_none());
    assert!(Dimension::new(1.0, Unit::Px).convert(Unit::Deg, 96.0).is_none());
}

#[test]
fn test_color_cycle_falls_back_to_initial_value() {
    let mut resolver = Resolver::new(CssProvider::from_data(
        "@define-color a @b;
         @define-color b @a;
         box { color: @a; background-color: @b; border-top-color: shade(@a, 0.5); }",
    ));
    let style = resolver.style_for(&StyleNode::new("box"));
    assert_eq!(style.color(), Rgba::WHITE);
    assert_eq!(style.background_color(), Rgba::TRANSPARENT);
    // currentColor is the initial border color.
    assert_eq!(style.border_colors()[0], Rgba::WHITE);
}

#[quickcheck]
fn prop_color_cycles_of_any_length_terminate(length: u8) -> bool {
    let length = usize::from(length % 40) + 1;
    let mut css: String = (0..length)
        .map(|i| format!("@define-color c{i} @c{};\n", (i + 1) % length))
        .collect();
    css.push_str("box { background-color: @c0; }");
    let mut resolver = Resolver::new(CssProvider::from_data(&css));
    resolver.style_for(&StyleNode::new("box")).background_color() == Rgba::TRANSPARENT
}

#[quickcheck]
fn prop_corner_mask_cache_is_bounded(keys: Vec<(i16, i16, i16)>, extra: u16) -> bool {
    let mask = Rc::new(Surface::new(Format::A8, 1, 1));
    let mut cache = CornerMaskCache::new();
    let generated = keys.into_iter().map(|(r, h, v)| (i32::from(r), i32::from(h), i32::from(v)));
    let filler = (0..i32::from(extra) + 1900).map(|i| (i, 0, 0));
    for (radius, horizontal, vertical) in generated.chain(filler) {
        cache.insert(
            CornerMaskKey {
                radius,
                horizontal,
                vertical,
            },
            Rc::clone(&mask),
        );
        if cache.len() > CORNER_MASK_CACHE_MAX_SIZE {
            return false;
        }
    }
    true
}

#[quickcheck]
fn prop_shrink_then_grow_restores_the_box(
    size: (u8, u8),
    insets: (u8, u8, u8, u8),
    radii: (u8, u8, u8, u8),
) -> TestResult {
    let (width, height) = (f64::from(size.0) + 1.0, f64::from(size.1) + 1.0);
    let (t, r, b, l) = (
        f64::from(insets.0 % 16),
        f64::from(insets.1 % 16),
        f64::from(insets.2 % 16),
        f64::from(insets.3 % 16),
    );
    if l + r > width || t + b > height {
        return TestResult::discard();
    }

    let mut original = RoundedBox::init_rect(3.0, 5.0, width, height);
    let radius = |value: u8| {
        CornerRadius::new(f64::from(value).min(width / 2.0), f64::from(value).min(height / 2.0))
    };
    original.corner = [radius(radii.0), radius(radii.1), radius(radii.2), radius(radii.3)];

    let mut shrunk = original;
    shrunk.shrink(t, r, b, l);
    let within_half = shrunk.corner.iter().all(|c| {
        c.horizontal <= shrunk.rect.width / 2.0 + 1e-9 && c.vertical <= shrunk.rect.height / 2.0 + 1e-9
    });

    let mut result = shrunk;
    result.grow(t, r, b, l);

    let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
    let rect_kept = close(result.rect.x, original.rect.x)
        && close(result.rect.y, original.rect.y)
        && close(result.rect.width, original.rect.width)
        && close(result.rect.height, original.rect.height);

    // A radius loses at most half the insets across its axis. One that the
    // shrink used up entirely stays square, which only happens when its own
    // side's inset was at least as large as the radius.
    let kept = |before: f64, after: f64, own: f64, across: f64| {
        let bounded = after >= before - across / 2.0 - 1e-9 || (after == 0.0 && before <= own + 1e-9);
        bounded && after <= before + 1e-9
    };
    let own = [(l, t), (r, t), (r, b), (l, b)];
    let radii_kept = original
        .corner
        .iter()
        .zip(&result.corner)
        .zip(own)
        .all(|((before, after), (dx, dy))| {
            kept(before.horizontal, after.horizontal, dx, l + r) && kept(before.vertical, after.vertical, dy, t + b)
        });
    TestResult::from_bool(within_half && rect_kept && radii_kept)
}

#[test]
fn test_shrink_clamps_radii_to_half_the_side() {
    let mut rounded = RoundedBox::init_rect(0.0, 0.0, 100.0, 100.0);
    rounded.corner = [CornerRadius::new(40.0, 40.0); 4];
    rounded.shrink(0.0, 30.0, 0.0, 0.0);
    assert_eq!(rounded.rect.width, 70.0);
    // The left corners are untouched by the right inset but must still fit.
    assert_eq!(rounded.corner[0], CornerRadius::new(35.0, 40.0));
    assert_eq!(rounded.corner[1], CornerRadius::new(10.0, 40.0));
    assert_eq!(rounded.corner[3], CornerRadius::new(35.0, 40.0));

    rounded.shrink(30.0, 0.0, 30.0, 0.0);
    assert_eq!(rounded.rect.height, 40.0);
    assert!(rounded.corner.iter().all(|c| c.vertical <= 20.0));
}
