//! Software rendering backend for the Glaze theming engine.
//!
//! # Architecture
//!
//! ```text
//! glaze-css render primitives → Canvas2D → PixmapCanvas → tiny-skia pixels
//!                                   ↑
//!            FileImageLoader (url() images), FontLayout (text shadows)
//! ```
//!
//! - [`PixmapCanvas`] implements [`glaze_css::Canvas2D`] on a tiny-skia
//!   pixmap.
//! - [`FileImageLoader`] implements [`glaze_css::ImageLoader`], decoding
//!   raster images with `image` and SVG with `resvg`.
//! - [`FontLayout`] implements [`glaze_css::TextLayout`] with fontdue.

pub mod canvas;
pub mod loader;
pub mod text;

pub use canvas::PixmapCanvas;
pub use loader::{FileImageLoader, ImageFormat, LoadError};
pub use text::{FontLayout, load_font, system_font};
