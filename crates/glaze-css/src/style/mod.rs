//! Properties, specified and computed styles, style nodes and providers.

mod computed;
mod node;
mod property;
mod provider;
pub mod shorthand;

pub use computed::ComputedStyle;
pub use node::{StateFlags, StyleNode};
pub use property::{PropertyFlags, PropertyId};
pub use provider::{CssProvider, ImageLoader, SpecifiedStyle, StyleProvider};
