//! Common utilities for the Glaze theming engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored terminal output for rejected declarations,
//!   broken color references and missing resources
//! - **Settings** - display parameters (resolution, default font size) that
//!   feed unit conversion

pub mod settings;
pub mod warning;

pub use settings::{Settings, SettingsError};
