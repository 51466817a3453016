//! Style values, cascade, transitions and widget chrome rendering for Glaze.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer and parser** ([CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/))
//!   - Stylesheets, style rules, `@define-color` and `@keyframes`
//!   - Property values for every [`PropertyId`], shorthands included
//!
//! - **Style values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - One immutable [`StyleValue`] per value, with compute, equality,
//!     transition and printing
//!   - Lengths in 17 units, `calc()`, colors and color expressions,
//!     palettes, images, shadows, timing functions
//!
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Selector matching against [`StyleNode`]s
//!   - Inheritance, `initial`, `inherit` and `unset`
//!   - A per-node style cache in the [`Resolver`]
//!
//! - **Transitions** ([CSS Transitions](https://drafts.csswg.org/css-transitions-1/))
//!   - Time driven by a [`Clock`]; a manual clock makes them deterministic
//!
//! - **Rendering** ([CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/))
//!   - Rounded boxes, backgrounds, borders, border images, outlines
//!   - Blurred box, text and icon shadows
//!   - Built-in icons
//!   - Everything draws through the [`Canvas2D`] trait
//!
//! # Not Yet Implemented
//!
//! - Running `@keyframes` animations (only their names are recorded)
//! - Layout and text shaping, which are left to the host

/// Clocks and transitions per [CSS Transitions](https://drafts.csswg.org/css-transitions-1/).
pub mod animation;
/// Style resolution per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Rectangles, matrices and rounded boxes.
pub mod geometry;
/// Painting per [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Properties, nodes, providers and computed styles.
pub mod style;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Style values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

// Re-exports for convenience
pub use animation::{Clock, ManualClock, SystemClock};
pub use cascade::Resolver;
pub use geometry::{IntRect, JunctionSides, Matrix, Rect, RoundedBox, Side, SideFlags};
pub use paint::{
    BuiltinIcon, Canvas2D, CanvasCommand, CornerMaskCache, Format, Pattern, RecordingCanvas, Surface, TextLayout,
};
pub use parser::{CSSParser, ParseError, Stylesheet, parse_text};
pub use selector::{ParsedSelector, Specificity, parse_selector};
pub use style::{ComputedStyle, CssProvider, ImageLoader, PropertyId, StateFlags, StyleNode, StyleProvider};
pub use tokenizer::{CSSToken, CSSTokenizer};
pub use values::{Image, Rgba, StyleValue};
