//! Core type definitions shared by the macro table, the settings and the
//! configuration codec

use alloc::string::String;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Configuration error type - imported from config_error module
mod config_error;
pub use config_error::{ConfigError, ConfigErrorKind};

mod settings;
pub use settings::RenderSettings;

/// Which kind of math region a delimiter pair opens.
///
/// Inline math flows with the surrounding text; display math is set apart on
/// its own line and scaled by [`RenderSettings::display_scale_percent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MathBoundary {
    /// Math embedded in a line of text, e.g. `\( ... \)`.
    Inline,
    /// Math typeset as a separate block, e.g. `\[ ... \]`.
    Display,
}

/// A pair of marker strings that open and close a math region.
///
/// Serialized as a two element array `[open, close]`, the shape MathJax
/// expects for `inlineMath` and `displayMath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct DelimiterPair {
    /// Marker that starts the region.
    pub open: String,
    /// Marker that ends the region.
    pub close: String,
}

impl DelimiterPair {
    /// Build a pair from its opening and closing markers.
    #[must_use]
    pub fn new<O: Into<String>, C: Into<String>>(open: O, close: C) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// A pair is usable only when both markers are non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() || self.close.is_empty()
    }
}

impl From<(String, String)> for DelimiterPair {
    fn from((open, close): (String, String)) -> Self {
        Self { open, close }
    }
}

impl From<DelimiterPair> for (String, String) {
    fn from(pair: DelimiterPair) -> Self {
        (pair.open, pair.close)
    }
}
