//! The text layout collaborator.
//!
//! Shaping and glyph rasterization live outside the engine. Text shadows
//! only need a layout's ink extents, a change counter and a way to fill the
//! glyphs onto a canvas.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::IntRect;

use super::{Canvas2D, Surface};

/// A laid out piece of text.
pub trait TextLayout {
    /// Ink rectangle in pixels, relative to the layout origin.
    fn pixel_extents(&self) -> IntRect;

    /// A number that changes whenever the layout's text or attributes
    /// change.
    fn serial(&self) -> u32;

    /// Fill the glyphs with the canvas source, the layout origin at the
    /// current point.
    fn stamp_into(&self, canvas: &mut dyn Canvas2D);

    /// Blurred shadow masks attached to this layout.
    fn shadow_cache(&self) -> &TextShadowCache;
}

/// Blurred text masks keyed by blur radius and layout serial. Masks built
/// for an older serial are dropped when a newer one is stored.
#[derive(Debug, Default)]
pub struct TextShadowCache {
    masks: RefCell<HashMap<(u32, u32), Rc<Surface>>>,
}

impl TextShadowCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mask for `(radius, serial)`.
    #[must_use]
    pub fn get(&self, radius: u32, serial: u32) -> Option<Rc<Surface>> {
        self.masks.borrow().get(&(radius, serial)).cloned()
    }

    /// Store a mask.
    pub fn insert(&self, radius: u32, serial: u32, mask: Rc<Surface>) {
        let mut masks = self.masks.borrow_mut();
        masks.retain(|&(_, s), _| s == serial);
        let _ = masks.insert((radius, serial), mask);
    }

    /// Number of cached masks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.borrow().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.borrow().is_empty()
    }
}
