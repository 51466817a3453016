//! A canvas that records what it is asked to draw.
//!
//! Commands are kept in painting order, back to front, so tests and tools
//! can inspect a paint without rasterizing it. Path coordinates are stored
//! in device space, after the matrix in effect when they were added.

use super::{Canvas2D, FillRule, LineCap, LineJoin, Pattern, Surface};
use crate::geometry::Matrix;
use crate::values::enums::BlendMode;
use crate::values::Rgba;

/// A single recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    /// Push the graphics state.
    Save,
    /// Pop the graphics state.
    Restore,
    /// Begin a subpath at a device point.
    MoveTo(f64, f64),
    /// Straight segment to a device point.
    LineTo(f64, f64),
    /// Cubic segment through two device control points.
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Close the current subpath.
    ClosePath,
    /// Discard the current path.
    NewPath,
    /// New source pattern.
    SetSource(Pattern),
    /// New stroke width, in user units.
    SetLineWidth(f64),
    /// New line cap.
    SetLineCap(LineCap),
    /// New line join.
    SetLineJoin(LineJoin),
    /// New dash pattern and offset.
    SetDash(Vec<f64>, f64),
    /// New fill rule.
    SetFillRule(FillRule),
    /// New compositing mode.
    SetBlendMode(BlendMode),
    /// Fill the path.
    Fill,
    /// Stroke the path.
    Stroke,
    /// Clip to the path.
    Clip,
    /// Paint the source inside the clip.
    Paint,
    /// Paint the source with extra opacity.
    PaintWithAlpha(f64),
    /// Paint the source through a mask.
    Mask(Pattern),
    /// Commands drawn into an offscreen surface.
    Layer {
        /// Surface width in pixels.
        width: usize,
        /// Surface height in pixels.
        height: usize,
        /// What was drawn into it.
        commands: Vec<CanvasCommand>,
    },
}

#[derive(Debug, Clone)]
struct State {
    matrix: Matrix,
    source: Pattern,
    line_width: f64,
    /// Device-space clip bounds.
    clip: (f64, f64, f64, f64),
}

/// A [`Canvas2D`] that records commands instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    commands: Vec<CanvasCommand>,
    state: State,
    stack: Vec<State>,
    device_scale: (f64, f64),
    current: Option<(f64, f64)>,
    path_start: Option<(f64, f64)>,
    path_bounds: Option<(f64, f64, f64, f64)>,
}

impl RecordingCanvas {
    /// A canvas covering `width` × `height` device pixels.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            commands: Vec::new(),
            state: State {
                matrix: Matrix::IDENTITY,
                source: Pattern::solid(Rgba::BLACK),
                line_width: 2.0,
                clip: (0.0, 0.0, width, height),
            },
            stack: Vec::new(),
            device_scale: (1.0, 1.0),
            current: None,
            path_start: None,
            path_bounds: None,
        }
    }

    /// A canvas whose device has `scale` pixels per unit on both axes.
    #[must_use]
    pub fn with_device_scale(mut self, sx: f64, sy: f64) -> Self {
        self.device_scale = (sx, sy);
        self.state.matrix = Matrix::scaling(sx, sy);
        self
    }

    /// The recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[CanvasCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<CanvasCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Number of `Fill`, `Stroke`, `Paint`, `PaintWithAlpha` and `Mask`
    /// commands, counting into layers.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        fn count(commands: &[CanvasCommand]) -> usize {
            commands
                .iter()
                .map(|c| match c {
                    CanvasCommand::Fill
                    | CanvasCommand::Stroke
                    | CanvasCommand::Paint
                    | CanvasCommand::PaintWithAlpha(_)
                    | CanvasCommand::Mask(_) => 1,
                    CanvasCommand::Layer { commands, .. } => count(commands),
                    _ => 0,
                })
                .sum()
        }
        count(&self.commands)
    }

    fn add_point(&mut self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = self.state.matrix.transform_point(x, y);
        self.path_bounds = Some(match self.path_bounds {
            Some((x1, y1, x2, y2)) => (x1.min(dx), y1.min(dy), x2.max(dx), y2.max(dy)),
            None => (dx, dy, dx, dy),
        });
        (dx, dy)
    }

    fn clear_path(&mut self) {
        self.current = None;
        self.path_start = None;
        self.path_bounds = None;
    }
}

impl Canvas2D for RecordingCanvas {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.commands.push(CanvasCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
            self.commands.push(CanvasCommand::Restore);
        }
    }

    fn matrix(&self) -> Matrix {
        self.state.matrix
    }

    fn set_matrix(&mut self, matrix: Matrix) {
        self.state.matrix = matrix;
    }

    fn new_path(&mut self) {
        self.clear_path();
        self.commands.push(CanvasCommand::NewPath);
    }

    fn new_sub_path(&mut self) {
        self.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.add_point(x, y);
        self.current = Some((dx, dy));
        self.path_start = Some((dx, dy));
        self.commands.push(CanvasCommand::MoveTo(dx, dy));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let (dx, dy) = self.add_point(x, y);
        self.current = Some((dx, dy));
        self.commands.push(CanvasCommand::LineTo(dx, dy));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        let (ax, ay) = self.add_point(x1, y1);
        let (bx, by) = self.add_point(x2, y2);
        let (cx, cy) = self.add_point(x3, y3);
        self.current = Some((cx, cy));
        self.commands.push(CanvasCommand::CurveTo(ax, ay, bx, by, cx, cy));
    }

    fn close_path(&mut self) {
        self.current = self.path_start;
        self.commands.push(CanvasCommand::ClosePath);
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
        self.state.source = pattern.clone();
        self.commands.push(CanvasCommand::SetSource(pattern));
    }

    fn source(&self) -> Pattern {
        self.state.source.clone()
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.commands.push(CanvasCommand::SetLineWidth(width));
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(CanvasCommand::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(CanvasCommand::SetLineJoin(join));
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.commands.push(CanvasCommand::SetDash(dashes.to_vec(), offset));
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.commands.push(CanvasCommand::SetFillRule(rule));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(CanvasCommand::SetBlendMode(mode));
    }

    fn fill(&mut self) {
        self.commands.push(CanvasCommand::Fill);
        self.clear_path();
    }

    fn stroke(&mut self) {
        self.commands.push(CanvasCommand::Stroke);
        self.clear_path();
    }

    fn clip(&mut self) {
        if let Some((x1, y1, x2, y2)) = self.path_bounds {
            let (cx1, cy1, cx2, cy2) = self.state.clip;
            self.state.clip = (cx1.max(x1), cy1.max(y1), cx2.min(x2).max(cx1.max(x1)), cy2.min(y2).max(cy1.max(y1)));
        }
        self.commands.push(CanvasCommand::Clip);
        self.clear_path();
    }

    fn clip_extents(&self) -> (f64, f64, f64, f64) {
        let (x1, y1, x2, y2) = self.state.clip;
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
        self.commands.push(CanvasCommand::Paint);
    }

    fn paint_with_alpha(&mut self, alpha: f64) {
        self.commands.push(CanvasCommand::PaintWithAlpha(alpha));
    }

    fn mask(&mut self, mask: &Pattern) {
        self.commands.push(CanvasCommand::Mask(mask.clone()));
    }

    fn device_scale(&self) -> (f64, f64) {
        self.device_scale
    }

    fn render_layer(&mut self, surface: Surface, draw: &mut dyn FnMut(&mut dyn Canvas2D)) -> Surface {
        let (sx, sy) = surface.device_scale;
        let (ox, oy) = surface.device_offset;
        let mut layer = Self::new(surface.width() as f64, surface.height() as f64);
        layer.device_scale = (sx, sy);
        layer.state.matrix = Matrix::new(sx, 0.0, 0.0, sy, ox, oy);
        if let Some((x, y)) = self.current_point() {
            layer.move_to(x, y);
            let _ = layer.take_commands();
        }
        draw(&mut layer);
        self.commands.push(CanvasCommand::Layer {
            width: surface.width(),
            height: surface.height(),
            commands: layer.commands,
        });
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_recorded_in_device_space() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        canvas.translate(10.0, 5.0);
        canvas.rectangle(0.0, 0.0, 4.0, 4.0);
        canvas.fill();
        assert_eq!(canvas.commands()[0], CanvasCommand::MoveTo(10.0, 5.0));
        assert_eq!(canvas.commands()[2], CanvasCommand::LineTo(14.0, 9.0));
        assert_eq!(canvas.draw_count(), 1);
    }

    #[test]
    fn test_clip_extents_follow_clip_and_matrix() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        canvas.save();
        canvas.rectangle(10.0, 10.0, 20.0, 20.0);
        canvas.clip();
        canvas.translate(10.0, 10.0);
        assert_eq!(canvas.clip_extents(), (0.0, 0.0, 20.0, 20.0));
        canvas.restore();
        assert_eq!(canvas.clip_extents(), (0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.restore();
        assert!(canvas.commands().is_empty());
    }
}
