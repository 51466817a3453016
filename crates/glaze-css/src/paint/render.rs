//! Widget-level entry points.
//!
//! These map a node's state and classes onto the primitives in the other
//! paint modules: a checked check box becomes the built-in check icon, a
//! focus ring becomes the outline, and so on. Every entry point draws
//! nothing for an empty rectangle.

use std::rc::Rc;

use crate::geometry::{IntRect, JunctionSides, SideFlags};
use crate::style::{ComputedStyle, PropertyId, StateFlags, StyleNode};
use crate::values::enums::IconEffect;
use crate::values::ShadowList;

use super::background::paint_background;
use super::border::{paint_border, paint_outline};
use super::builtin::{BuiltinIcon, paint_icon_builtin};
use super::shadow::{paint_shadow_icon, paint_shadow_layout};
use super::{Canvas2D, CornerMaskCache, Format, Surface, TextLayout};

pub use super::border::border_clip;

/// Class that turns a handle into a window resize grip.
pub const CLASS_GRIP: &str = "grip";
/// Class that turns a handle into a pane separator.
pub const CLASS_PANE_SEPARATOR: &str = "pane-separator";
/// Class that lays an expander out horizontally.
pub const CLASS_HORIZONTAL: &str = "horizontal";

const fn is_empty(width: f64, height: f64) -> bool {
    width <= 0.0 || height <= 0.0
}

/// The pixels [`paint_background`] may touch for a box at `x, y, width,
/// height`, outset box shadows included.
#[must_use]
pub fn background_clip(style: &ComputedStyle, x: f64, y: f64, width: f64, height: f64) -> IntRect {
    let shadow = style
        .shadows(PropertyId::BoxShadow)
        .map(ShadowList::extents)
        .unwrap_or_default();

    IntRect::new(
        x.floor() as i32 - shadow.left,
        y.floor() as i32 - shadow.top,
        width.ceil() as i32 + shadow.left + shadow.right,
        height.ceil() as i32 + shadow.top + shadow.bottom,
    )
}

/// Draw the `-glaze-icon-source` of `style` into `x, y, width, height`.
///
/// Built-in sources draw `builtin`; other images are scaled to the
/// rectangle. Icon shadows are painted under the icon.
pub fn paint_icon(
    style: &ComputedStyle,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    builtin: BuiltinIcon,
) {
    if is_empty(width, height) {
        return;
    }
    let Some(image) = style.image(PropertyId::IconSource) else {
        return;
    };
    if image.is_none() {
        return;
    }

    canvas.save();
    canvas.translate(x, y);

    match style.shadows(PropertyId::IconShadow).filter(|s| !s.is_empty()) {
        None => paint_icon_builtin(image, canvas, width, height, builtin),
        Some(shadows) => {
            let (scale_x, scale_y) = canvas.device_scale();
            let mut surface = Surface::new(
                Format::Argb32,
                (width * scale_x).ceil() as usize,
                (height * scale_y).ceil() as usize,
            );
            surface.device_scale = (scale_x, scale_y);
            let icon = Rc::new(canvas.render_layer(surface, &mut |c: &mut dyn Canvas2D| {
                paint_icon_builtin(image, c, width, height, builtin);
            }));

            canvas.set_source_surface(&icon, 0.0, 0.0);
            for shadow in shadows.iter().rev() {
                paint_shadow_icon(shadow, canvas);
            }
            canvas.set_source_surface(&icon, 0.0, 0.0);
            canvas.paint();
        }
    }

    canvas.restore();
}

/// Draw a raster icon at `x, y` after applying `-glaze-icon-effect`, with
/// its `-glaze-icon-shadow` underneath.
pub fn paint_icon_surface(style: &ComputedStyle, canvas: &mut dyn Canvas2D, surface: &Rc<Surface>, x: f64, y: f64) {
    let surface = match style
        .keyword::<IconEffect>(PropertyId::IconEffect)
        .unwrap_or(IconEffect::None)
    {
        IconEffect::None => Rc::clone(surface),
        IconEffect::Dim => Rc::new(surface.dim()),
        IconEffect::Highlight => Rc::new(surface.highlight()),
    };

    canvas.save();
    canvas.translate(x, y);
    canvas.set_source_surface(&surface, 0.0, 0.0);

    if let Some(shadows) = style.shadows(PropertyId::IconShadow) {
        for shadow in shadows.iter().rev() {
            paint_shadow_icon(shadow, canvas);
        }
        canvas.set_source_surface(&surface, 0.0, 0.0);
    }
    canvas.paint();

    canvas.restore();
}

/// Paint the `text-shadow` list of `style` for `layout` at the current
/// point, bottom shadow first.
pub fn paint_text_shadows(style: &ComputedStyle, canvas: &mut dyn Canvas2D, layout: &dyn TextLayout) {
    if let Some(shadows) = style.shadows(PropertyId::TextShadow) {
        for shadow in shadows.iter().rev() {
            paint_shadow_layout(shadow, canvas, layout);
        }
    }
}

/// Paint `layout` at `x, y` in the foreground color, over its text
/// shadows.
pub fn render_layout(style: &ComputedStyle, canvas: &mut dyn Canvas2D, x: f64, y: f64, layout: &dyn TextLayout) {
    canvas.save();
    canvas.new_path();
    canvas.move_to(x, y);
    paint_text_shadows(style, canvas, layout);
    canvas.set_source_rgba(style.color());
    layout.stamp_into(canvas);
    canvas.restore();
}

/// A check box mark: the check when checked, a bar when inconsistent.
pub fn render_check(
    style: &ComputedStyle,
    node: &StyleNode,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) {
    if is_empty(width, height) {
        return;
    }
    let state = node.state();
    let icon = if state.contains(StateFlags::INCONSISTENT) {
        BuiltinIcon::CheckInconsistent
    } else if state.contains(StateFlags::CHECKED) {
        BuiltinIcon::Check
    } else {
        BuiltinIcon::None
    };
    paint_icon(style, canvas, x, y, width, height, icon);
}

/// A radio button mark: a dot when checked, a bar when inconsistent.
pub fn render_option(
    style: &ComputedStyle,
    node: &StyleNode,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) {
    if is_empty(width, height) {
        return;
    }
    let state = node.state();
    let icon = if state.contains(StateFlags::INCONSISTENT) {
        BuiltinIcon::RadioInconsistent
    } else if state.contains(StateFlags::CHECKED) {
        BuiltinIcon::Radio
    } else {
        BuiltinIcon::None
    };
    paint_icon(style, canvas, x, y, width, height, icon);
}

/// An arrow in a `size` square pointing at `angle` radians, clockwise
/// from up and snapped to a quarter turn.
pub fn render_arrow(style: &ComputedStyle, canvas: &mut dyn Canvas2D, angle: f64, x: f64, y: f64, size: f64) {
    if size <= 0.0 {
        return;
    }
    paint_icon(style, canvas, x, y, size, size, BuiltinIcon::arrow_for_angle(angle));
}

/// A disclosure triangle; `:checked` means expanded.
pub fn render_expander(
    style: &ComputedStyle,
    node: &StyleNode,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) {
    if is_empty(width, height) {
        return;
    }
    let state = node.state();
    let icon = BuiltinIcon::Expander {
        horizontal: node.has_class(CLASS_HORIZONTAL),
        rtl: state.contains(StateFlags::DIR_RTL),
        expanded: state.contains(StateFlags::CHECKED),
    };
    paint_icon(style, canvas, x, y, width, height, icon);
}

/// The grip facing the corner or edge the handle is joined to.
fn grip_for_junction(junction: JunctionSides) -> BuiltinIcon {
    // Corners first, for when too many sides are set.
    if junction.contains(JunctionSides::CORNER_BOTTOMRIGHT) {
        BuiltinIcon::GripBottomRight
    } else if junction.contains(JunctionSides::CORNER_TOPRIGHT) {
        BuiltinIcon::GripTopRight
    } else if junction.contains(JunctionSides::CORNER_BOTTOMLEFT) {
        BuiltinIcon::GripBottomLeft
    } else if junction.contains(JunctionSides::CORNER_TOPLEFT) {
        BuiltinIcon::GripTopLeft
    } else if junction.intersects(JunctionSides::RIGHT) {
        BuiltinIcon::GripRight
    } else if junction.intersects(JunctionSides::BOTTOM) {
        BuiltinIcon::GripBottom
    } else if junction.intersects(JunctionSides::TOP) {
        BuiltinIcon::GripTop
    } else if junction.intersects(JunctionSides::LEFT) {
        BuiltinIcon::GripLeft
    } else {
        BuiltinIcon::GripBottomRight
    }
}

/// A drag handle: background, frame, then a grip, a pane separator or a
/// plain stipple depending on the node's classes.
#[allow(clippy::too_many_arguments)]
pub fn render_handle(
    style: &ComputedStyle,
    node: &StyleNode,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    junction: JunctionSides,
    cache: &mut CornerMaskCache,
) {
    if is_empty(width, height) {
        return;
    }

    paint_background(style, canvas, x, y, width, height, junction, cache);
    paint_border(style, canvas, x, y, width, height, SideFlags::empty(), junction);

    let icon = if node.has_class(CLASS_GRIP) {
        grip_for_junction(junction)
    } else if node.has_class(CLASS_PANE_SEPARATOR) {
        BuiltinIcon::PaneSeparator
    } else {
        BuiltinIcon::Handle
    };
    paint_icon(style, canvas, x, y, width, height, icon);
}

/// A busy spinner.
pub fn render_activity(style: &ComputedStyle, canvas: &mut dyn Canvas2D, x: f64, y: f64, width: f64, height: f64) {
    if is_empty(width, height) {
        return;
    }
    paint_icon(style, canvas, x, y, width, height, BuiltinIcon::Spinner);
}

/// A focus ring: the outline around `x, y, width, height`.
pub fn render_focus(style: &ComputedStyle, canvas: &mut dyn Canvas2D, x: f64, y: f64, width: f64, height: f64) {
    if is_empty(width, height) {
        return;
    }
    paint_outline(style, canvas, x, y, width, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasCommand, Pattern, RecordingCanvas};
    use crate::values::Rgba;

    fn record(draw: impl FnOnce(&mut RecordingCanvas)) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(64.0, 64.0);
        draw(&mut canvas);
        canvas
    }

    #[test]
    fn test_background_clip_includes_shadow() {
        let style = ComputedStyle::from_declarations("box-shadow: 0 2px 4px black");
        let clip = background_clip(&style, 10.5, 10.0, 20.2, 10.0);
        let extents = style.shadows(PropertyId::BoxShadow).unwrap().extents();
        assert_eq!(clip.x, 10 - extents.left);
        assert_eq!(clip.y, 10 - extents.top);
        assert_eq!(clip.width, 21 + extents.left + extents.right);
        assert_eq!(clip.height, 10 + extents.top + extents.bottom);
    }

    #[test]
    fn test_background_clip_without_shadow() {
        let style = ComputedStyle::from_declarations("");
        assert_eq!(background_clip(&style, 1.5, 2.0, 3.0, 4.5), IntRect::new(1, 2, 3, 5));
    }

    #[test]
    fn test_check_follows_state() {
        let style = ComputedStyle::from_declarations("color: black");
        let node = StyleNode::new("check");

        let unchecked = record(|c| render_check(&style, &node, c, 0.0, 0.0, 16.0, 16.0));
        assert_eq!(unchecked.draw_count(), 0);

        node.set_state(StateFlags::CHECKED);
        let checked = record(|c| render_check(&style, &node, c, 0.0, 0.0, 16.0, 16.0));
        assert_eq!(checked.draw_count(), 1);
        assert!(checked.commands().contains(&CanvasCommand::Clip));

        node.set_state(StateFlags::CHECKED | StateFlags::INCONSISTENT);
        let mixed = record(|c| render_check(&style, &node, c, 0.0, 0.0, 16.0, 16.0));
        assert!(!mixed.commands().contains(&CanvasCommand::Clip));
        assert_eq!(mixed.draw_count(), 1);
    }

    #[test]
    fn test_icon_uses_computed_color() {
        let style = ComputedStyle::from_declarations("color: rgb(0, 0, 255)");
        let node = StyleNode::new("radio");
        node.set_state(StateFlags::CHECKED);
        let canvas = record(|c| render_option(&style, &node, c, 4.0, 4.0, 16.0, 16.0));
        assert!(canvas
            .commands()
            .contains(&CanvasCommand::SetSource(Pattern::solid(Rgba::new(0.0, 0.0, 1.0, 1.0)))));
    }

    #[test]
    fn test_icon_source_none_draws_nothing() {
        let style = ComputedStyle::from_declarations("-glaze-icon-source: none");
        let canvas = record(|c| render_activity(&style, c, 0.0, 0.0, 16.0, 16.0));
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_icon_shadow_goes_through_a_layer() {
        let style = ComputedStyle::from_declarations("-glaze-icon-shadow: 1px 1px black");
        let canvas = record(|c| render_activity(&style, c, 0.0, 0.0, 16.0, 16.0));
        let layer = canvas
            .commands()
            .iter()
            .position(|c| matches!(c, CanvasCommand::Layer { .. }));
        let paint = canvas.commands().iter().rposition(|c| *c == CanvasCommand::Paint);
        assert!(layer.is_some());
        assert!(paint > layer);
    }

    #[test]
    fn test_empty_rectangles_are_ignored() {
        let style = ComputedStyle::from_declarations("outline: 2px solid red");
        let node = StyleNode::new("x");
        node.set_state(StateFlags::CHECKED);
        let canvas = record(|c| {
            render_focus(&style, c, 0.0, 0.0, 0.0, 10.0);
            render_check(&style, &node, c, 0.0, 0.0, 10.0, -1.0);
            render_arrow(&style, c, 0.0, 0.0, 0.0, 0.0);
        });
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_focus_is_the_outline() {
        let style = ComputedStyle::from_declarations("outline: 2px solid red");
        let canvas = record(|c| render_focus(&style, c, 10.0, 10.0, 20.0, 20.0));
        assert_eq!(canvas.draw_count(), 1);
    }

    #[test]
    fn test_grip_for_junction_prefers_corners() {
        assert_eq!(
            grip_for_junction(JunctionSides::CORNER_TOPLEFT | JunctionSides::CORNER_BOTTOMRIGHT),
            BuiltinIcon::GripBottomRight
        );
        assert_eq!(grip_for_junction(JunctionSides::LEFT), BuiltinIcon::GripLeft);
        assert_eq!(grip_for_junction(JunctionSides::empty()), BuiltinIcon::GripBottomRight);
    }

    #[test]
    fn test_handle_classes_pick_the_drawing() {
        let style = ComputedStyle::from_declarations("background-color: gray");
        let node = StyleNode::new("paned");
        let _ = node.add_class(CLASS_PANE_SEPARATOR);
        let mut cache = CornerMaskCache::new();
        let canvas = record(|c| {
            render_handle(&style, &node, c, 0.0, 0.0, 100.0, 6.0, JunctionSides::empty(), &mut cache);
        });
        // Background fill plus seven two-tone dots.
        assert_eq!(canvas.draw_count(), 1 + 14);
    }

    #[test]
    fn test_expander_uses_direction_and_class() {
        let style = ComputedStyle::from_declarations("");
        let node = StyleNode::new("expander");
        let _ = node.add_class(CLASS_HORIZONTAL);
        node.set_state(StateFlags::DIR_RTL | StateFlags::CHECKED);
        let canvas = record(|c| render_expander(&style, &node, c, 0.0, 0.0, 16.0, 16.0));
        assert_eq!(canvas.draw_count(), 1);
    }
}
