//! Painting widget chrome.
//!
//! [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)
//!
//! Every primitive draws through the [`Canvas2D`] trait, so any backend that
//! implements it can show the result:
//!
//! ```text
//! ComputedStyle + box → render primitives → Canvas2D → pixels / commands
//! ```
//!
//! [`RecordingCanvas`] keeps the command stream for inspection;
//! `glaze-raster` rasterizes it.

pub mod background;
pub mod blur;
pub mod border;
pub mod border_image;
pub mod builtin;
mod canvas;
mod recording;
pub mod region;
pub mod render;
pub mod shadow;
pub mod surface;
pub mod text;

pub use builtin::BuiltinIcon;
pub use canvas::{Canvas2D, Extend, FillRule, GradientStop, LineCap, LineJoin, Pattern, PatternKind};
pub use recording::{CanvasCommand, RecordingCanvas};
pub use shadow::CornerMaskCache;
pub use surface::{Format, Surface};
pub use text::{TextLayout, TextShadowCache};
