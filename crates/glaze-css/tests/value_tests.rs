//! Integration tests for color algebra, lengths and box geometry.

use glaze_css::geometry::{CornerRadius, RoundedBox};
use glaze_css::values::rgba::Hsla;
use glaze_css::values::dimension::parse_dimension;
use glaze_css::values::{Calc, Dimension, NumberFlags, Unit, ValueKind};
use glaze_css::{
    CssProvider, IntRect, JunctionSides, PropertyId, Resolver, Rgba, StyleNode, StyleValue, parse_text,
};

fn color(text: &str) -> Rgba {
    parse_text(text, Rgba::parse).unwrap()
}

fn length(text: &str) -> StyleValue {
    parse_text(text, |p| Calc::parse(p, NumberFlags::PARSE_LENGTH | NumberFlags::PARSE_PERCENT)).unwrap()
}

#[test]
fn test_hex_forms() {
    assert_eq!(color("#f00"), Rgba::from_rgb8(255, 0, 0));
    assert_eq!(color("#336699"), Rgba::from_rgb8(0x33, 0x66, 0x99));
    assert_eq!(color("#00000080").alpha, 128.0 / 255.0);
    assert_eq!(color("#fff8").to_rgba8(), [255, 255, 255, 136]);
    assert!(parse_text("#12345", Rgba::parse).is_err());
}

#[test]
fn test_functional_forms() {
    assert_eq!(color("rgb(10, 20, 30)"), Rgba::from_rgb8(10, 20, 30));
    assert_eq!(color("rgba(100%, 0%, 0%, 0.5)"), Rgba::new(1.0, 0.0, 0.0, 0.5));
    assert_eq!(color("hsl(120, 100%, 50%)"), Rgba::from_rgb8(0, 255, 0));
    assert_eq!(color("hsla(240, 100%, 50%, 0.25)"), Rgba::new(0.0, 0.0, 1.0, 0.25));
}

#[test]
fn test_keywords() {
    assert_eq!(color("white"), Rgba::WHITE);
    assert_eq!(color("RebeccaPurple"), Rgba::from_rgb8(0x66, 0x33, 0x99));
    assert!(parse_text("notacolor", Rgba::parse).is_err());
}

#[test]
fn test_hsla_round_trip() {
    for rgba in [
        Rgba::from_rgb8(0x33, 0x66, 0x99),
        Rgba::from_rgb8(255, 128, 0),
        Rgba::from_rgb8(12, 200, 77),
        Rgba::new(0.5, 0.5, 0.5, 0.3),
    ] {
        let back: Rgba = Hsla::from(rgba).into();
        assert_eq!(back, rgba);
    }
}

#[test]
fn test_shade_scales_lightness() {
    let gray = Rgba::from_rgb8(128, 128, 128);
    let lighter = gray.shade(1.3);
    let darker = gray.shade(0.7);
    assert!(lighter.red > gray.red);
    assert!(darker.red < gray.red);
    assert_eq!(Rgba::WHITE.shade(2.0), Rgba::WHITE);
    assert_eq!(Rgba::BLACK.shade(2.0), Rgba::BLACK);
}

#[test]
fn test_alpha_and_mix() {
    let red = Rgba::from_rgb8(255, 0, 0);
    assert_eq!(red.with_alpha_factor(0.5).alpha, 0.5);
    assert_eq!(red.with_alpha_factor(3.0).alpha, 1.0);
    assert_eq!(red.mix(&Rgba::from_rgb8(0, 0, 255), 0.5), Rgba::new(0.5, 0.0, 0.5, 1.0));
}

#[test]
fn test_fading_out_keeps_the_hue() {
    let red = Rgba::from_rgb8(255, 0, 0);
    let mid = red.transition(&Rgba::TRANSPARENT, 0.5);
    assert_eq!(mid, Rgba::new(1.0, 0.0, 0.0, 0.5));
}

#[test]
fn test_color_display() {
    assert_eq!(Rgba::from_rgb8(1, 2, 3).to_string(), "rgba(1,2,3,1)");
    assert_eq!(Rgba::new(1.0, 1.0, 1.0, 0.5).to_string(), "rgba(255,255,255,0.5)");
}

#[test]
fn test_calc_mixes_units() {
    let value = length("calc(100% - 10px)");
    assert_eq!(value.number_value(200.0), 190.0);
    assert_eq!(value.number_value(50.0), 40.0);
}

#[test]
fn test_calc_collapses_to_dimension() {
    let value = length("calc(4px + 6px)");
    assert_eq!(value.as_dimension(), Some(Dimension::new(10.0, Unit::Px)));
}

#[test]
fn test_calc_merges_terms_of_the_same_unit() {
    let value = length("calc(1px + 2px + 10%)");
    let ValueKind::Calc(calc) = value.kind() else {
        panic!("expected a sum, got {value}");
    };
    assert_eq!(calc.terms(), &[Dimension::new(3.0, Unit::Px), Dimension::new(10.0, Unit::Percent)]);
    assert_eq!(value.number_value(100.0), 13.0);
}

#[test]
fn test_infinite_numbers_print_and_parse_back() {
    let number = |text: &str| parse_text(text, |p| parse_dimension(p, NumberFlags::PARSE_NUMBER));

    for text in ["infinite", "-infinite"] {
        let parsed = number(text).unwrap();
        assert!(parsed.value.is_infinite());
        assert_eq!(parsed.to_string(), text);
        assert_eq!(number(&parsed.to_string()).unwrap(), parsed);
    }
    assert_eq!(number("-infinite").unwrap().value, f64::NEG_INFINITY);
    assert!(
        parse_text("-infinite", |p| parse_dimension(p, NumberFlags::PARSE_NUMBER | NumberFlags::POSITIVE_ONLY))
            .is_err()
    );
    assert!(parse_text("-infinite", |p| parse_dimension(p, NumberFlags::PARSE_LENGTH)).is_err());
}

#[test]
fn test_dimension_transition_across_units_is_calc() {
    let start = StyleValue::px(10.0);
    let end = StyleValue::dimension(50.0, Unit::Percent);
    let mid = start
        .transition(&end, PropertyId::BackgroundPosition, 0.5)
        .unwrap();
    // 5px + 25% of 100.
    assert_eq!(mid.number_value(100.0), 30.0);
}

#[test]
fn test_angle_and_time_conversions_compute() {
    let style = Resolver::new(CssProvider::from_data(
        "box { transition-duration: 250ms; transition-delay: 2s; }",
    ))
    .style_for(&StyleNode::new("box"));
    assert_eq!(
        style.get(PropertyId::TransitionDuration).as_dimension(),
        Some(Dimension::new(0.25, Unit::S))
    );
    assert_eq!(
        style.get(PropertyId::TransitionDelay).as_dimension(),
        Some(Dimension::new(2.0, Unit::S))
    );
}

#[test]
fn test_overlapping_radii_are_scaled_down() {
    let style = Resolver::new(CssProvider::from_data("box { border-radius: 15px; }"))
        .style_for(&StyleNode::new("box"));
    let mut clamped = RoundedBox::init_rect(0.0, 0.0, 20.0, 10.0);
    clamped.apply_border_radius_for_style(&style, JunctionSides::empty());
    // Two 15px radii along a 10px side scale by 1/3.
    for corner in clamped.corner {
        assert!((corner.horizontal - 5.0).abs() < 1e-9);
        assert!((corner.vertical - 5.0).abs() < 1e-9);
    }
}

#[test]
fn test_junctions_square_off_corners() {
    let style = Resolver::new(CssProvider::from_data("box { border-radius: 4px; }"))
        .style_for(&StyleNode::new("box"));
    let mut rounded = RoundedBox::init_rect(0.0, 0.0, 40.0, 20.0);
    rounded.apply_border_radius_for_style(
        &style,
        JunctionSides::CORNER_TOPLEFT | JunctionSides::CORNER_BOTTOMLEFT,
    );
    assert_eq!(rounded.corner[0], CornerRadius::default());
    assert_eq!(rounded.corner[1], CornerRadius::new(4.0, 4.0));
    assert_eq!(rounded.corner[2], CornerRadius::new(4.0, 4.0));
    assert_eq!(rounded.corner[3], CornerRadius::default());
}

#[test]
fn test_rounded_box_rectangle_tests() {
    let mut rounded = RoundedBox::init_rect(0.0, 0.0, 20.0, 20.0);
    rounded.corner = [CornerRadius::new(8.0, 8.0); 4];
    assert!(rounded.contains_rectangle(6.0, 6.0, 14.0, 14.0));
    assert!(!rounded.contains_rectangle(0.0, 0.0, 2.0, 2.0));
    assert!(rounded.intersects_rectangle(0.0, 0.0, 5.0, 5.0));
    assert!(!rounded.intersects_rectangle(25.0, 25.0, 30.0, 30.0));
}

#[test]
fn test_int_rect_covering_and_union() {
    let a = IntRect::covering(0.5, 0.5, 10.2, 3.0);
    assert_eq!(a, IntRect::new(0, 0, 11, 3));
    let b = IntRect::new(5, 2, 10, 10);
    assert_eq!(a.union(&b), IntRect::new(0, 0, 15, 12));
    assert_eq!(a.intersect(&b), IntRect::new(5, 2, 6, 1));
}
