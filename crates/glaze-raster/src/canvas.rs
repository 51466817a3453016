//! A software [`Canvas2D`] backed by a tiny-skia pixmap.
//!
//! Paths are accumulated in device space, so a transform change between
//! two segments affects only the later one. Strokes map the path back
//! through the matrix in effect when they are drawn, which keeps line
//! widths and dashes in user units.
//!
//! The clip is an anti-aliased coverage mask plus its device-space bounds.

use glaze_css::geometry::Matrix;
use glaze_css::paint::{Canvas2D, Extend, FillRule, Format, LineCap, LineJoin, Pattern, PatternKind, Surface};
use glaze_css::values::Rgba;
use glaze_css::values::enums::BlendMode;
use tiny_skia::{
    Color, FilterQuality, IntSize, LinearGradient, Mask, MaskType, Paint, Path, PathBuilder, Pixmap, Point,
    RadialGradient, Shader, SpreadMode, Stroke, StrokeDash, Transform,
};

#[derive(Clone)]
struct State {
    matrix: Matrix,
    source: Pattern,
    /// Pattern space to device space, fixed when the source was set.
    source_transform: Option<Matrix>,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    dash: Vec<f64>,
    dash_offset: f64,
    fill_rule: FillRule,
    blend: BlendMode,
    clip: Option<Mask>,
    /// Device-space clip bounds.
    clip_bounds: (f64, f64, f64, f64),
}

/// A [`Canvas2D`] that rasterizes into a premultiplied RGBA pixmap.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    state: State,
    stack: Vec<State>,
    device_scale: (f64, f64),
    path: PathBuilder,
    current: Option<(f64, f64)>,
    path_start: Option<(f64, f64)>,
}

impl PixmapCanvas {
    /// A transparent canvas of `width` × `height` pixels. Returns `None` for
    /// an empty size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(Self::from_pixmap)
    }

    /// Draw onto an existing pixmap.
    #[must_use]
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        let clip_bounds = (0.0, 0.0, f64::from(pixmap.width()), f64::from(pixmap.height()));
        Self {
            pixmap,
            state: State {
                matrix: Matrix::IDENTITY,
                source: Pattern::solid(Rgba::BLACK),
                source_transform: Some(Matrix::IDENTITY),
                line_width: 2.0,
                line_cap: LineCap::default(),
                line_join: LineJoin::default(),
                dash: Vec::new(),
                dash_offset: 0.0,
                fill_rule: FillRule::default(),
                blend: BlendMode::Normal,
                clip: None,
                clip_bounds,
            },
            stack: Vec::new(),
            device_scale: (1.0, 1.0),
            path: PathBuilder::new(),
            current: None,
            path_start: None,
        }
    }

    /// Treat the pixmap as having `sx` × `sy` pixels per user unit. The
    /// pixmap keeps its pixel size.
    #[must_use]
    pub fn with_device_scale(mut self, sx: f64, sy: f64) -> Self {
        self.device_scale = (sx, sy);
        self.state.matrix = Matrix::scaling(sx, sy);
        self
    }

    /// Fill every pixel with `color`, ignoring the clip.
    pub fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(skia_color(color, 1.0));
    }

    /// The pixels drawn so far.
    #[must_use]
    pub const fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Give up the canvas and keep its pixels.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Premultiplied RGBA of one pixel; transparent outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixmap
            .pixel(x, y)
            .map_or([0; 4], |p| [p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Copy the pixels into an `Argb32` [`Surface`].
    #[must_use]
    pub fn to_surface(&self) -> Surface {
        let mut surface = Surface::new(Format::Argb32, self.pixmap.width() as usize, self.pixmap.height() as usize);
        surface.data_mut().copy_from_slice(self.pixmap.data());
        surface.device_scale = self.device_scale;
        surface
    }

    fn add_point(&self, x: f64, y: f64) -> (f64, f64) {
        self.state.matrix.transform_point(x, y)
    }

    fn take_path(&mut self) -> Option<Path> {
        self.current = None;
        self.path_start = None;
        core::mem::take(&mut self.path).finish()
    }

    /// Run `draw` with a paint for the current source, scaled by `alpha`.
    fn with_paint(&mut self, alpha: f64, draw: impl FnOnce(&mut Pixmap, &Paint<'_>, Option<&Mask>)) {
        let Some(transform) = self.state.source_transform else {
            return;
        };
        let pixels = source_pixmap(&self.state.source);
        let Some(shader) = shader(&self.state.source, pixels.as_ref(), &transform, alpha) else {
            return;
        };
        let paint = Paint {
            shader,
            blend_mode: skia_blend_mode(self.state.blend),
            anti_alias: true,
            ..Paint::default()
        };
        draw(&mut self.pixmap, &paint, self.state.clip.as_ref());
    }

    fn full_rect(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(0.0, 0.0, self.pixmap.width() as f32, self.pixmap.height() as f32)
    }
}

impl Canvas2D for PixmapCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn matrix(&self) -> Matrix {
        self.state.matrix
    }

    fn set_matrix(&mut self, matrix: Matrix) {
        self.state.matrix = matrix;
    }

    fn new_path(&mut self) {
        let _ = self.take_path();
    }

    fn new_sub_path(&mut self) {
        self.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.add_point(x, y);
        self.path.move_to(dx as f32, dy as f32);
        self.current = Some((dx, dy));
        self.path_start = Some((dx, dy));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let (dx, dy) = self.add_point(x, y);
        self.path.line_to(dx as f32, dy as f32);
        self.current = Some((dx, dy));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        let (ax, ay) = self.add_point(x1, y1);
        let (bx, by) = self.add_point(x2, y2);
        let (cx, cy) = self.add_point(x3, y3);
        self.path
            .cubic_to(ax as f32, ay as f32, bx as f32, by as f32, cx as f32, cy as f32);
        self.current = Some((cx, cy));
    }

    fn close_path(&mut self) {
        self.path.close();
        self.current = self.path_start;
    }

    fn current_point(&self) -> Option<(f64, f64)> {
        let (x, y) = self.current?;
        let inverse = self.state.matrix.invert()?;
        Some(inverse.transform_point(x, y))
    }

    fn set_source_rgba(&mut self, color: Rgba) {
        self.set_source(Pattern::solid(color));
    }

    fn set_source(&mut self, pattern: Pattern) {
        self.state.source_transform = pattern.matrix.invert().map(|inverse| self.state.matrix.after(&inverse));
        self.state.source = pattern;
    }

    fn source(&self) -> Pattern {
        self.state.source.clone()
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.state.dash = dashes.to_vec();
        self.state.dash_offset = offset;
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
    }

    fn fill(&mut self) {
        let Some(path) = self.take_path() else {
            return;
        };
        let rule = skia_fill_rule(self.state.fill_rule);
        self.with_paint(1.0, |pixmap, paint, mask| {
            pixmap.fill_path(&path, paint, rule, Transform::identity(), mask);
        });
    }

    fn stroke(&mut self) {
        let Some(path) = self.take_path() else {
            return;
        };
        if self.state.line_width <= 0.0 {
            return;
        }
        let matrix = self.state.matrix;
        let Some(user_path) = matrix.invert().and_then(|inverse| path.transform(skia_transform(&inverse))) else {
            return;
        };
        let stroke = Stroke {
            width: self.state.line_width as f32,
            line_cap: skia_line_cap(self.state.line_cap),
            line_join: skia_line_join(self.state.line_join),
            dash: stroke_dash(&self.state.dash, self.state.dash_offset),
            ..Stroke::default()
        };
        let transform = skia_transform(&matrix);
        self.with_paint(1.0, |pixmap, paint, mask| {
            pixmap.stroke_path(&user_path, paint, &stroke, transform, mask);
        });
    }

    fn clip(&mut self) {
        let path = self.take_path();
        let rule = skia_fill_rule(self.state.fill_rule);
        let (x1, y1, x2, y2) = self.state.clip_bounds;

        let Some(path) = path else {
            // An empty path clips everything away.
            self.state.clip = Mask::new(self.pixmap.width(), self.pixmap.height());
            self.state.clip_bounds = (x1, y1, x1, y1);
            return;
        };

        let bounds = path.bounds();
        let (nx1, ny1) = (x1.max(f64::from(bounds.left())), y1.max(f64::from(bounds.top())));
        let (nx2, ny2) = (x2.min(f64::from(bounds.right())), y2.min(f64::from(bounds.bottom())));
        self.state.clip_bounds = (nx1, ny1, nx2.max(nx1), ny2.max(ny1));

        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        if let Some(mask) = &mut self.state.clip {
            mask.intersect_path(&path, rule, true, Transform::identity());
        } else if let Some(mut mask) = Mask::new(width, height) {
            mask.fill_path(&path, rule, true, Transform::identity());
            self.state.clip = Some(mask);
        }
    }

    fn clip_extents(&self) -> (f64, f64, f64, f64) {
        let (x1, y1, x2, y2) = self.state.clip_bounds;
        let Some(inverse) = self.state.matrix.invert() else {
            return (0.0, 0.0, 0.0, 0.0);
        };
        let corners = [(x1, y1), (x2, y1), (x2, y2), (x1, y2)].map(|(x, y)| inverse.transform_point(x, y));
        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(ax, ay, bx, by), &(x, y)| (ax.min(x), ay.min(y), bx.max(x), by.max(y)),
        )
    }

    fn paint(&mut self) {
        self.paint_with_alpha(1.0);
    }

    fn paint_with_alpha(&mut self, alpha: f64) {
        let Some(rect) = self.full_rect() else {
            return;
        };
        self.with_paint(alpha, |pixmap, paint, mask| {
            pixmap.fill_rect(rect, paint, Transform::identity(), mask);
        });
    }

    fn mask(&mut self, mask: &Pattern) {
        let Some(rect) = self.full_rect() else {
            return;
        };
        let Some(coverage) = self.coverage(mask) else {
            return;
        };
        self.with_paint(1.0, |pixmap, paint, _| {
            pixmap.fill_rect(rect, paint, Transform::identity(), Some(&coverage));
        });
    }

    fn device_scale(&self) -> (f64, f64) {
        self.device_scale
    }

    fn render_layer(&mut self, mut surface: Surface, draw: &mut dyn FnMut(&mut dyn Canvas2D)) -> Surface {
        let Some(pixmap) = surface_pixmap(&surface) else {
            return surface;
        };
        let (sx, sy) = surface.device_scale;
        let (ox, oy) = surface.device_offset;
        let mut layer = Self::from_pixmap(pixmap);
        layer.device_scale = (sx, sy);
        layer.state.matrix = Matrix::new(sx, 0.0, 0.0, sy, ox, oy);
        if let Some((x, y)) = self.current_point() {
            layer.move_to(x, y);
        }
        draw(&mut layer);

        let data = layer.pixmap.data();
        match surface.format() {
            Format::Argb32 => surface.data_mut().copy_from_slice(data),
            Format::A8 => {
                for (dst, px) in surface.data_mut().iter_mut().zip(data.chunks_exact(4)) {
                    *dst = px[3];
                }
            }
        }
        surface
    }
}

impl PixmapCanvas {
    /// The alpha of `pattern` over the whole canvas, limited by the clip.
    fn coverage(&self, pattern: &Pattern) -> Option<Mask> {
        let transform = pattern.matrix.invert().map(|inverse| self.state.matrix.after(&inverse))?;
        let pixels = source_pixmap(pattern);
        let shader = shader(pattern, pixels.as_ref(), &transform, 1.0)?;
        let mut layer = Pixmap::new(self.pixmap.width(), self.pixmap.height())?;
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        layer.fill_rect(self.full_rect()?, &paint, Transform::identity(), None);

        let mut coverage = Mask::from_pixmap(layer.as_ref(), MaskType::Alpha);
        if let Some(clip) = &self.state.clip {
            for (c, &k) in coverage.data_mut().iter_mut().zip(clip.data()) {
                *c = ((u32::from(*c) * u32::from(k) + 127) / 255) as u8;
            }
        }
        Some(coverage)
    }
}

/// Convert a surface into a pixmap; A8 becomes black with that alpha.
fn surface_pixmap(surface: &Surface) -> Option<Pixmap> {
    let size = IntSize::from_wh(surface.width() as u32, surface.height() as u32)?;
    let data = match surface.format() {
        Format::Argb32 => surface.data().to_vec(),
        Format::A8 => surface.data().iter().flat_map(|&a| [0, 0, 0, a]).collect(),
    };
    Pixmap::from_vec(data, size)
}

/// The pixels behind a surface pattern. Patterns that show nothing outside
/// the surface get a one-pixel transparent border, so padding the edges
/// fades to transparent.
fn source_pixmap(pattern: &Pattern) -> Option<Pixmap> {
    let PatternKind::Surface(surface) = &pattern.kind else {
        return None;
    };
    let pixmap = surface_pixmap(surface)?;
    if pattern.extend != Extend::None {
        return Some(pixmap);
    }
    let width = pixmap.width() as usize;
    let mut padded = Pixmap::new(pixmap.width() + 2, pixmap.height() + 2)?;
    let stride = (width + 2) * 4;
    for (row, line) in pixmap.data().chunks_exact(width * 4).enumerate() {
        let start = (row + 1) * stride + 4;
        padded.data_mut()[start..start + width * 4].copy_from_slice(line);
    }
    Some(padded)
}

/// A shader painting `pattern`, whose pattern space maps to device space
/// through `transform`.
fn shader<'a>(pattern: &Pattern, pixels: Option<&'a Pixmap>, transform: &Matrix, alpha: f64) -> Option<Shader<'a>> {
    let spread = spread_mode(pattern.extend);
    match &pattern.kind {
        PatternKind::Solid(color) => Some(Shader::SolidColor(skia_color(*color, alpha))),
        PatternKind::Surface(surface) => {
            let pixels = pixels?;
            let (sx, sy) = surface.device_scale;
            let (ox, oy) = surface.device_offset;
            let to_pattern = Matrix::new(sx, 0.0, 0.0, sy, ox, oy).invert()?;
            let mut to_device = transform.after(&to_pattern);
            if pattern.extend == Extend::None {
                to_device = to_device.after(&Matrix::translation(-1.0, -1.0));
            }
            let quality = if is_pixel_aligned(&to_device) {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bilinear
            };
            Some(tiny_skia::Pattern::new(
                pixels.as_ref(),
                spread,
                quality,
                alpha.clamp(0.0, 1.0) as f32,
                skia_transform(&to_device),
            ))
        }
        PatternKind::Linear { x0, y0, x1, y1, stops } => LinearGradient::new(
            Point::from_xy(*x0 as f32, *y0 as f32),
            Point::from_xy(*x1 as f32, *y1 as f32),
            stops
                .iter()
                .map(|s| tiny_skia::GradientStop::new(s.offset as f32, skia_color(s.color, alpha)))
                .collect(),
            spread,
            skia_transform(transform),
        ),
        PatternKind::Radial {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            stops,
        } => {
            // tiny-skia's start circle is a point; stops are moved out to
            // where the start radius would place them.
            let inner = if *r1 > 0.0 { (r0 / r1).clamp(0.0, 1.0) } else { 0.0 };
            RadialGradient::new(
                Point::from_xy(*x0 as f32, *y0 as f32),
                Point::from_xy(*x1 as f32, *y1 as f32),
                *r1 as f32,
                stops
                    .iter()
                    .map(|s| {
                        let offset = inner + s.offset * (1.0 - inner);
                        tiny_skia::GradientStop::new(offset as f32, skia_color(s.color, alpha))
                    })
                    .collect(),
                spread,
                skia_transform(transform),
            )
        }
    }
}

fn is_pixel_aligned(m: &Matrix) -> bool {
    m.xx == 1.0 && m.yy == 1.0 && m.xy == 0.0 && m.yx == 0.0 && m.x0.fract() == 0.0 && m.y0.fract() == 0.0
}

fn skia_color(color: Rgba, alpha: f64) -> Color {
    let channel = |c: f64| c.clamp(0.0, 1.0) as f32;
    Color::from_rgba(
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        channel(color.alpha * alpha),
    )
    .unwrap_or(Color::TRANSPARENT)
}

fn skia_transform(m: &Matrix) -> Transform {
    Transform::from_row(
        m.xx as f32,
        m.yx as f32,
        m.xy as f32,
        m.yy as f32,
        m.x0 as f32,
        m.y0 as f32,
    )
}

/// Dash lengths in user units. An odd list repeats once to make the on/off
/// pairs tiny-skia needs.
fn stroke_dash(dashes: &[f64], offset: f64) -> Option<StrokeDash> {
    if dashes.is_empty() {
        return None;
    }
    let mut lengths: Vec<f32> = dashes.iter().map(|&d| d as f32).collect();
    if lengths.len() % 2 == 1 {
        lengths.extend_from_within(..);
    }
    StrokeDash::new(lengths, offset as f32)
}

const fn spread_mode(extend: Extend) -> SpreadMode {
    match extend {
        Extend::None | Extend::Pad => SpreadMode::Pad,
        Extend::Repeat => SpreadMode::Repeat,
        Extend::Reflect => SpreadMode::Reflect,
    }
}

const fn skia_fill_rule(rule: FillRule) -> tiny_skia::FillRule {
    match rule {
        FillRule::Winding => tiny_skia::FillRule::Winding,
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
    }
}

const fn skia_line_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

const fn skia_line_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}

/// [§ 10 Blending](https://www.w3.org/TR/compositing-1/#blending)
const fn skia_blend_mode(mode: BlendMode) -> tiny_skia::BlendMode {
    match mode {
        BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
        BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        BlendMode::Screen => tiny_skia::BlendMode::Screen,
        BlendMode::Overlay => tiny_skia::BlendMode::Overlay,
        BlendMode::Darken => tiny_skia::BlendMode::Darken,
        BlendMode::Lighten => tiny_skia::BlendMode::Lighten,
        BlendMode::ColorDodge => tiny_skia::BlendMode::ColorDodge,
        BlendMode::ColorBurn => tiny_skia::BlendMode::ColorBurn,
        BlendMode::HardLight => tiny_skia::BlendMode::HardLight,
        BlendMode::SoftLight => tiny_skia::BlendMode::SoftLight,
        BlendMode::Difference => tiny_skia::BlendMode::Difference,
        BlendMode::Exclusion => tiny_skia::BlendMode::Exclusion,
        BlendMode::Hue => tiny_skia::BlendMode::Hue,
        BlendMode::Saturate => tiny_skia::BlendMode::Saturation,
        BlendMode::Color => tiny_skia::BlendMode::Color,
        BlendMode::Luminosity => tiny_skia::BlendMode::Luminosity,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn canvas(width: u32, height: u32) -> PixmapCanvas {
        PixmapCanvas::new(width, height).unwrap()
    }

    #[test]
    fn test_fill_rectangle() {
        let mut canvas = canvas(10, 10);
        canvas.set_source_rgba(Rgba::from_rgb8(255, 0, 0));
        canvas.rectangle(2.0, 2.0, 4.0, 4.0);
        canvas.fill();
        assert_eq!(canvas.pixel(3, 3), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 1), [0; 4]);
        assert_eq!(canvas.pixel(6, 6), [0; 4]);
    }

    #[test]
    fn test_path_survives_transform_changes() {
        let mut canvas = canvas(10, 10);
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.move_to(0.0, 0.0);
        canvas.restore();
        canvas.line_to(10.0, 5.0);
        canvas.line_to(10.0, 10.0);
        canvas.line_to(5.0, 10.0);
        canvas.close_path();
        canvas.fill();
        assert_eq!(canvas.pixel(7, 7)[3], 255);
        assert_eq!(canvas.pixel(2, 2)[3], 0);
    }

    #[test]
    fn test_clip_limits_paint() {
        let mut canvas = canvas(10, 10);
        canvas.rectangle(0.0, 0.0, 5.0, 10.0);
        canvas.clip();
        canvas.paint();
        assert_eq!(canvas.pixel(2, 5), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(7, 5), [0; 4]);
        assert_eq!(canvas.clip_extents(), (0.0, 0.0, 5.0, 10.0));
    }

    #[test]
    fn test_restore_drops_clip() {
        let mut canvas = canvas(10, 10);
        canvas.save();
        canvas.rectangle(0.0, 0.0, 1.0, 1.0);
        canvas.clip();
        canvas.restore();
        canvas.paint();
        assert_eq!(canvas.pixel(9, 9), [0, 0, 0, 255]);
    }

    #[test]
    fn test_paint_with_alpha() {
        let mut canvas = canvas(2, 2);
        canvas.set_source_rgba(Rgba::WHITE);
        canvas.paint_with_alpha(0.5);
        let [r, _, _, a] = canvas.pixel(0, 0);
        assert!((127..=128).contains(&a));
        assert_eq!(r, a);
    }

    #[test]
    fn test_surface_source_is_transparent_outside() {
        let mut image = Surface::new(Format::Argb32, 2, 2);
        image.data_mut().fill(255);
        let image = Rc::new(image);

        let mut canvas = canvas(8, 8);
        canvas.set_source_surface(&image, 3.0, 3.0);
        canvas.paint();
        assert_eq!(canvas.pixel(3, 3), [255; 4]);
        assert_eq!(canvas.pixel(4, 4), [255; 4]);
        assert_eq!(canvas.pixel(0, 0), [0; 4]);
        assert_eq!(canvas.pixel(7, 7), [0; 4]);
    }

    #[test]
    fn test_mask_surface_uses_alpha() {
        let mut mask = Surface::new(Format::A8, 4, 4);
        mask.data_mut()[..4].fill(255);
        let mask = Rc::new(mask);

        let mut canvas = canvas(4, 4);
        canvas.set_source_rgba(Rgba::from_rgb8(0, 0, 255));
        canvas.mask_surface(&mask, 0.0, 0.0);
        assert_eq!(canvas.pixel(2, 0), [0, 0, 255, 255]);
        assert_eq!(canvas.pixel(2, 1), [0; 4]);
    }

    #[test]
    fn test_render_layer_into_a8() {
        let mut canvas = canvas(4, 4);
        let mut surface = Surface::new(Format::A8, 6, 6);
        surface.device_offset = (1.0, 1.0);
        let surface = canvas.render_layer(surface, &mut |c: &mut dyn Canvas2D| {
            c.rectangle(0.0, 0.0, 2.0, 2.0);
            c.fill();
        });
        assert_eq!(surface.alpha_at(1, 1), 255);
        assert_eq!(surface.alpha_at(2, 2), 255);
        assert_eq!(surface.alpha_at(0, 0), 0);
        assert_eq!(surface.alpha_at(3, 3), 0);
        // The canvas itself is untouched.
        assert_eq!(canvas.pixel(0, 0), [0; 4]);
    }

    #[test]
    fn test_stroke_width_is_in_user_units() {
        let mut canvas = canvas(20, 20);
        canvas.scale(2.0, 2.0);
        canvas.set_line_width(2.0);
        canvas.move_to(0.0, 5.0);
        canvas.line_to(10.0, 5.0);
        canvas.stroke();
        // Four device pixels wide, centered on y = 10.
        assert_eq!(canvas.pixel(5, 8)[3], 255);
        assert_eq!(canvas.pixel(5, 11)[3], 255);
        assert_eq!(canvas.pixel(5, 6)[3], 0);
    }

    #[test]
    fn test_blend_mode_is_saved_state() {
        let mut canvas = canvas(2, 2);
        canvas.set_source_rgba(Rgba::from_rgb8(128, 128, 128));
        canvas.paint();
        canvas.save();
        canvas.set_blend_mode(BlendMode::Multiply);
        canvas.set_source_rgba(Rgba::from_rgb8(128, 128, 128));
        canvas.paint();
        canvas.restore();
        let [r, ..] = canvas.pixel(0, 0);
        assert!((63..=65).contains(&r));
    }
}
