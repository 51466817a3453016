//! Display settings consumed by unit conversion.
//!
//! [CSS Values Level 4 § 6.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
//!
//! Physical units (`pt`, `pc`, `in`, `cm`, `mm`) convert through the
//! resolution, and `rem` plus the font-size keywords resolve against the
//! default font size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default resolution in dots per inch.
pub const DEFAULT_DPI: f64 = 96.0;

/// Default font size in pixels (the `medium` keyword).
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings document was not valid JSON for [`Settings`].
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric field was out of range.
    #[error("setting '{name}' must be positive, got {value}")]
    NotPositive {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Display parameters shared by every style resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Resolution in dots per inch.
    pub dpi: f64,
    /// Size of the `medium` font-size keyword, in pixels.
    pub font_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            font_size: DEFAULT_FONT_SIZE_PX,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] for malformed input and
    /// [`SettingsError::NotPositive`] for a zero or negative dpi or font size.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        if settings.dpi <= 0.0 {
            return Err(SettingsError::NotPositive {
                name: "dpi",
                value: settings.dpi,
            });
        }
        if settings.font_size <= 0.0 {
            return Err(SettingsError::NotPositive {
                name: "font_size",
                value: settings.font_size,
            });
        }
        Ok(settings)
    }
}
