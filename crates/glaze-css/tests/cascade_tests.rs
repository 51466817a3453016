//! Integration tests for the cascade: rule matching, inheritance, defaulting
//! and computed values.

use std::cell::Cell;
use std::rc::Rc;

use glaze_common::Settings;
use glaze_css::values::Image;
use glaze_css::values::enums::BorderStyle;
use glaze_css::{
    ComputedStyle, CssProvider, Format, ImageLoader, PropertyId, Resolver, Rgba, StateFlags,
    StyleNode, Surface,
};

fn resolve(css: &str, node: &Rc<StyleNode>) -> Rc<ComputedStyle> {
    Resolver::new(CssProvider::from_data(css)).style_for(node)
}

fn resolve_box(css: &str) -> Rc<ComputedStyle> {
    resolve(css, &StyleNode::new("box"))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_unstyled_node_gets_initial_values() {
    let style = resolve_box("");
    assert_eq!(style.color(), Rgba::WHITE);
    assert_eq!(style.background_color(), Rgba::TRANSPARENT);
    assert_eq!(style.opacity(), 1.0);
    assert_eq!(style.border_widths(), [0.0; 4]);
    assert_eq!(style.font_size(), 16.0);
}

#[test]
fn test_more_specific_rule_wins() {
    let node = StyleNode::with_id("button", "ok", None);
    let _ = node.add_class("flat");
    let style = resolve(
        "#ok { color: red; } button.flat { color: blue; } button { color: green; }",
        &node,
    );
    assert_eq!(style.color(), Rgba::from_rgb8(255, 0, 0));
}

#[test]
fn test_later_rule_wins_at_equal_specificity() {
    let style = resolve_box("box { color: red; } box { color: blue; }");
    assert_eq!(style.color(), Rgba::from_rgb8(0, 0, 255));
}

#[test]
fn test_state_pseudo_classes() {
    let css = "button { color: black; }
               button:disabled { color: gray; }
               button:checked:hover { color: red; }";
    let node = StyleNode::new("button");
    let mut resolver = Resolver::new(CssProvider::from_data(css));

    node.set_state(StateFlags::INSENSITIVE);
    assert_eq!(resolver.style_for(&node).color(), Rgba::from_rgb8(128, 128, 128));

    node.set_state(StateFlags::CHECKED);
    assert_eq!(resolver.style_for(&node).color(), Rgba::BLACK);

    node.set_state(StateFlags::CHECKED | StateFlags::PRELIGHT);
    assert_eq!(resolver.style_for(&node).color(), Rgba::from_rgb8(255, 0, 0));
}

#[test]
fn test_descendant_and_child_combinators() {
    let css = "window label { color: red; } box > label { background-color: blue; }";
    let window = StyleNode::new("window");
    let boxed = StyleNode::with_parent("box", &window);
    let nested = StyleNode::with_parent("label", &boxed);
    let direct = StyleNode::with_parent("label", &window);

    let mut resolver = Resolver::new(CssProvider::from_data(css));
    let style = resolver.style_for(&nested);
    assert_eq!(style.color(), Rgba::from_rgb8(255, 0, 0));
    assert_eq!(style.background_color(), Rgba::from_rgb8(0, 0, 255));

    let style = resolver.style_for(&direct);
    assert_eq!(style.color(), Rgba::from_rgb8(255, 0, 0));
    assert_eq!(style.background_color(), Rgba::TRANSPARENT);
}

#[test]
fn test_inherited_and_reset_properties() {
    let css = "window { color: red; background-color: blue; } label { }";
    let window = StyleNode::new("window");
    let label = StyleNode::with_parent("label", &window);
    let style = resolve(css, &label);
    assert_eq!(style.color(), Rgba::from_rgb8(255, 0, 0));
    assert_eq!(style.background_color(), Rgba::TRANSPARENT);
}

#[test]
fn test_explicit_defaulting_keywords() {
    let css = "window { color: red; background-color: blue; }
               label { background-color: inherit; color: initial; }";
    let window = StyleNode::new("window");
    let label = StyleNode::with_parent("label", &window);
    let style = resolve(css, &label);
    assert_eq!(style.background_color(), Rgba::from_rgb8(0, 0, 255));
    assert_eq!(style.color(), Rgba::WHITE);
}

#[test]
fn test_font_relative_lengths() {
    let css = "window { font-size: 10px; }
               label { font-size: 2em; margin-top: 1.5em; padding-left: 2ex; margin-left: 1rem; }";
    let window = StyleNode::new("window");
    let label = StyleNode::with_parent("label", &window);
    let style = resolve(css, &label);
    assert!(close(style.font_size(), 20.0));
    let margin = style.margin();
    assert!(close(margin[0], 30.0));
    assert!(close(margin[3], 16.0));
    assert!(close(style.padding()[3], 20.0));
}

#[test]
fn test_physical_lengths_follow_dpi() {
    let style = resolve_box("box { margin-top: 12pt; padding-top: 1in; }");
    assert!(close(style.margin()[0], 16.0));
    assert!(close(style.padding()[0], 96.0));

    let style = resolve_box("box { -glaze-dpi: 72; padding-top: 1in; }");
    assert!(close(style.padding()[0], 72.0));
}

#[test]
fn test_settings_change_restyles() {
    let node = StyleNode::new("box");
    let mut resolver = Resolver::new(CssProvider::from_data("box { padding-top: 1in; font-size: medium; }"));
    assert!(close(resolver.style_for(&node).padding()[0], 96.0));

    resolver.set_settings(Settings {
        dpi: 192.0,
        font_size: 20.0,
    });
    let style = resolver.style_for(&node);
    assert!(close(style.padding()[0], 192.0));
    assert!(close(style.font_size(), 20.0));
}

#[test]
fn test_border_shorthand_sets_every_side() {
    let style = resolve_box("box { border: 3px dashed red; border-left-style: none; }");
    assert_eq!(style.border_widths(), [3.0, 3.0, 3.0, 0.0]);
    assert_eq!(
        style.border_styles(),
        [
            BorderStyle::Dashed,
            BorderStyle::Dashed,
            BorderStyle::Dashed,
            BorderStyle::None,
        ]
    );
    assert_eq!(style.border_colors()[1], Rgba::from_rgb8(255, 0, 0));
}

#[test]
fn test_box_shorthands_expand_like_css() {
    let style = resolve_box("box { padding: 1px 2px 3px; margin: 4px 5px; }");
    assert_eq!(style.padding(), [1.0, 2.0, 3.0, 2.0]);
    assert_eq!(style.margin(), [4.0, 5.0, 4.0, 5.0]);
}

#[test]
fn test_border_color_defaults_to_current_color() {
    let style = resolve_box("box { color: #336699; border: 1px solid; }");
    assert_eq!(style.border_colors(), [Rgba::from_hex(0x0033_6699); 4]);
}

#[test]
fn test_named_color_expressions() {
    let style = resolve_box(
        "@define-color base #808080;
         @define-color accent shade(@base, 1.5);
         box { color: @accent; background-color: alpha(@base, 0.5); }",
    );
    assert_eq!(style.color(), Rgba::from_hex(0x0080_8080).shade(1.5));
    assert!(close(style.background_color().alpha, 0.5));
}

#[test]
fn test_undefined_named_color_falls_back() {
    let style = resolve_box("box { color: @missing; background-color: @missing; }");
    assert_eq!(style.color(), Rgba::WHITE);
    assert_eq!(style.background_color(), Rgba::TRANSPARENT);
}

#[test]
fn test_platform_colors() {
    let mut provider = CssProvider::from_data("box { color: -glaze-platform-color(accent, fg); }");
    provider.set_platform_color("accent", "fg", Rgba::from_rgb8(1, 2, 3));
    let style = Resolver::new(provider).style_for(&StyleNode::new("box"));
    assert_eq!(style.color(), Rgba::from_rgb8(1, 2, 3));
}

#[test]
fn test_invalid_declarations_are_ignored() {
    let style = resolve_box("box { color: red; color: nonsense(1); opacity: bogus; no-such-thing: 1; }");
    assert_eq!(style.color(), Rgba::from_rgb8(255, 0, 0));
    assert_eq!(style.opacity(), 1.0);
}

struct CountingLoader {
    loads: Rc<Cell<usize>>,
}

impl ImageLoader for CountingLoader {
    fn load(&self, url: &str) -> Option<Surface> {
        self.loads.set(self.loads.get() + 1);
        (url == "check.png").then(|| Surface::new(Format::Argb32, 4, 2))
    }
}

#[test]
fn test_url_images_load_once() {
    let loads = Rc::new(Cell::new(0));
    let mut provider = CssProvider::from_data(
        "box { background-image: url(check.png); } label { background-image: url(check.png); }
         image { background-image: url(missing.png); }",
    );
    provider.set_image_loader(Box::new(CountingLoader {
        loads: Rc::clone(&loads),
    }));
    let mut resolver = Resolver::new(provider);

    let style = resolver.style_for(&StyleNode::new("box"));
    let image = style.image(PropertyId::BackgroundImage);
    assert!(matches!(image, Some(Image::Url { surface: Some(_), .. })));
    assert_eq!(image.map(Image::width), Some(4.0));

    let _ = resolver.style_for(&StyleNode::new("label"));
    assert_eq!(loads.get(), 1);

    let style = resolver.style_for(&StyleNode::new("image"));
    assert!(style.image(PropertyId::BackgroundImage).is_some_and(Image::is_none));
    assert_eq!(loads.get(), 2);
}
