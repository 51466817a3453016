//! End-to-end paints of small styled boxes, checked on the recorded command stream.

use std::rc::Rc;

use glaze_css::paint::background::paint_background;
use glaze_css::paint::border::paint_border;
use glaze_css::paint::render::{background_clip, render_check};
use glaze_css::values::Palette;
use glaze_css::{
    CanvasCommand, CornerMaskCache, CssProvider, JunctionSides, ManualClock, Pattern,
    RecordingCanvas, Resolver, Rgba, SideFlags, StateFlags, StyleNode, StyleValue,
};
use glaze_css::{ComputedStyle, PropertyId};

fn style(css: &str) -> Rc<ComputedStyle> {
    let mut resolver = Resolver::new(CssProvider::from_data(css));
    resolver.style_for(&StyleNode::new("box"))
}

fn paint_box(style: &ComputedStyle, width: f64, height: f64, cache: &mut CornerMaskCache) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new(width + 20.0, height + 20.0);
    paint_background(style, &mut canvas, 0.0, 0.0, width, height, JunctionSides::empty(), cache);
    paint_border(
        style,
        &mut canvas,
        0.0,
        0.0,
        width,
        height,
        SideFlags::empty(),
        JunctionSides::empty(),
    );
    canvas
}

fn count(canvas: &RecordingCanvas, wanted: &CanvasCommand) -> usize {
    canvas.commands().iter().filter(|c| *c == wanted).count()
}

fn moves(canvas: &RecordingCanvas) -> Vec<(f64, f64)> {
    canvas
        .commands()
        .iter()
        .filter_map(|c| match c {
            CanvasCommand::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect()
}

fn position(canvas: &RecordingCanvas, wanted: &CanvasCommand) -> Option<usize> {
    canvas.commands().iter().position(|c| c == wanted)
}

#[test]
fn test_rounded_box_fills_then_frames() {
    let style = style(
        "box {
            border: 2px solid rgba(0, 0, 0, 1);
            background-color: rgba(255, 255, 255, 1);
            border-radius: 8px;
        }",
    );
    let mut cache = CornerMaskCache::new();
    let canvas = paint_box(&style, 100.0, 40.0, &mut cache);

    assert_eq!(canvas.draw_count(), 2);
    assert_eq!(count(&canvas, &CanvasCommand::Fill), 2);

    let white = position(&canvas, &CanvasCommand::SetSource(Pattern::solid(Rgba::WHITE)));
    let black = position(&canvas, &CanvasCommand::SetSource(Pattern::solid(Rgba::BLACK)));
    assert!(white.is_some());
    assert!(black.is_some());
    assert!(white < black);

    // Rounded corners become curves; a square box would have none.
    let curves = canvas
        .commands()
        .iter()
        .filter(|c| matches!(c, CanvasCommand::CurveTo(..)))
        .count();
    assert!(curves >= 8);
    assert!(cache.is_empty());
}

#[test]
fn test_drop_shadow_is_painted_first() {
    let style = style(
        "box {
            border: 2px solid rgba(0, 0, 0, 1);
            background-color: rgba(255, 255, 255, 1);
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.5);
        }",
    );
    let mut cache = CornerMaskCache::new();
    let canvas = paint_box(&style, 100.0, 40.0, &mut cache);

    let white = position(&canvas, &CanvasCommand::SetSource(Pattern::solid(Rgba::WHITE)));
    let first_draw = canvas.commands().iter().position(|c| {
        matches!(
            c,
            CanvasCommand::Fill | CanvasCommand::Mask(_) | CanvasCommand::Paint | CanvasCommand::Layer { .. }
        )
    });
    assert!(first_draw < white);
    assert!(canvas.draw_count() > 2);

    // Blurred corners go through the mask cache.
    assert!(!cache.is_empty());

    // The shadow reaches below the box further than above it.
    let clip = background_clip(&style, 0.0, 0.0, 100.0, 40.0);
    assert!(clip.y < 0);
    assert!(clip.y + clip.height > 42);
    assert!(clip.y + clip.height - 40 > -clip.y);
}

#[test]
fn test_repainting_reuses_cached_corner_masks() {
    let style = style("box { background-color: white; border-radius: 6px; box-shadow: 0 0 5px black; }");
    let mut cache = CornerMaskCache::new();
    let _ = paint_box(&style, 60.0, 30.0, &mut cache);
    let cached = cache.len();
    let _ = paint_box(&style, 60.0, 30.0, &mut cache);
    assert_eq!(cache.len(), cached);
}

#[test]
fn test_checked_check_mark() {
    let style = style("box { color: rgba(0, 0, 0, 1); }");
    let node = StyleNode::new("box");
    node.set_state(StateFlags::CHECKED);

    let mut canvas = RecordingCanvas::new(16.0, 16.0);
    render_check(&style, &node, &mut canvas, 0.0, 0.0, 16.0, 16.0);

    assert_eq!(canvas.draw_count(), 1);
    assert!(canvas.commands().contains(&CanvasCommand::Clip));
    assert!(canvas
        .commands()
        .contains(&CanvasCommand::SetSource(Pattern::solid(Rgba::BLACK))));
    // The glyph starts in the top right of the 11px interior, inside a
    // 2px pad of the 15px exterior.
    assert_eq!(moves(&canvas).last(), Some(&(13.0, 2.0)));
}

#[test]
fn test_unchecked_check_draws_nothing() {
    let style = style("box { color: black; }");
    let node = StyleNode::new("box");
    let mut canvas = RecordingCanvas::new(16.0, 16.0);
    render_check(&style, &node, &mut canvas, 0.0, 0.0, 16.0, 16.0);
    assert_eq!(canvas.draw_count(), 0);
}

#[test]
fn test_check_mark_is_reproducible() {
    let style = style("box { color: black; }");
    let node = StyleNode::new("box");
    node.set_state(StateFlags::CHECKED);
    let draw = || {
        let mut canvas = RecordingCanvas::new(16.0, 16.0);
        render_check(&style, &node, &mut canvas, 0.0, 0.0, 16.0, 16.0);
        canvas.take_commands()
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_color_transition_midpoint() {
    let clock = ManualClock::new();
    let mut resolver = Resolver::with_clock(
        CssProvider::from_data(
            "box { color: rgba(255, 0, 0, 1); transition: color 200ms linear; }
             box:hover { color: rgba(0, 0, 255, 1); }",
        ),
        Box::new(clock.clone()),
    );
    let node = StyleNode::new("box");
    assert_eq!(resolver.style_for(&node).color(), Rgba::from_rgb8(255, 0, 0));

    node.set_state(StateFlags::PRELIGHT);
    assert_eq!(resolver.style_for(&node).color(), Rgba::from_rgb8(255, 0, 0));

    clock.advance(0.1);
    assert!(resolver.tick());
    let color = resolver.style_for(&node).color();
    assert_eq!(color, Rgba::from_rgb8(127, 0, 127));
    assert_eq!(color.to_string(), "rgba(127,0,127,1)");

    clock.advance(0.1);
    assert!(!resolver.tick());
    assert_eq!(resolver.style_for(&node).color(), Rgba::from_rgb8(0, 0, 255));
}

#[test]
fn test_double_border_stripes() {
    let style = style("box { border: 4px double rgba(0, 0, 0, 1); }");
    let mut canvas = RecordingCanvas::new(20.0, 20.0);
    paint_border(
        &style,
        &mut canvas,
        0.0,
        0.0,
        20.0,
        20.0,
        SideFlags::empty(),
        JunctionSides::empty(),
    );

    // Two rings, each one pixel wide: 0..1 and 3..4 from every edge.
    assert_eq!(count(&canvas, &CanvasCommand::Fill), 2);
    assert_eq!(moves(&canvas), [(0.0, 0.0), (1.0, 1.0), (3.0, 3.0), (4.0, 4.0)]);
}

#[test]
fn test_hidden_border_side_is_skipped() {
    let style = style("box { border: 2px solid black; border-top-color: red; }");
    let mut canvas = RecordingCanvas::new(20.0, 20.0);
    paint_border(
        &style,
        &mut canvas,
        0.0,
        0.0,
        20.0,
        20.0,
        SideFlags::TOP,
        JunctionSides::empty(),
    );
    assert!(!canvas
        .commands()
        .contains(&CanvasCommand::SetSource(Pattern::solid(Rgba::from_rgb8(255, 0, 0)))));
    assert!(canvas.draw_count() >= 1);
}

#[test]
fn test_palette_transition_keeps_unmatched_entries() {
    let start = Palette::from_entries([
        ("error".to_owned(), StyleValue::rgba(Rgba::from_rgb8(255, 0, 0))),
        ("warning".to_owned(), StyleValue::rgba(Rgba::from_rgb8(255, 128, 0))),
    ]);
    let end = Palette::from_entries([("error".to_owned(), StyleValue::rgba(Rgba::from_rgb8(0, 255, 0)))]);

    let mid = start.transition(&end, PropertyId::IconPalette, 0.5).unwrap();
    assert_eq!(mid.get_color("error"), Some(Rgba::from_rgb8(127, 127, 0)));
    assert_eq!(mid.get_color("warning"), Some(Rgba::from_rgb8(255, 128, 0)));
    assert_eq!(mid.iter().count(), 2);
}
