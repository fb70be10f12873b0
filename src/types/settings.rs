use alloc::sync::Arc;
use alloc::vec::Vec;

use bon::bon;
use rapidhash::RapidHashSet;
use tracing::warn;

use crate::macro_table::MacroTable;
use crate::types::{ConfigError, ConfigErrorKind, DelimiterPair, MathBoundary};

/// Resolved render settings handed to the math-rendering engine.
///
/// Unlike the builder inputs, every field has a concrete value, and the whole
/// structure has been validated: delimiters are non-empty and unique, the
/// scale is positive, and the macro table passed its own checks.
///
/// Clones share the macro table.
///
/// # Cross-references
/// - See [`RenderSettings::builder`] for ergonomic construction.
/// - See [`crate::config`] for loading settings from JSON or YAML.
/// - See [`crate::emit`] for producing MathJax or KaTeX configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Delimiter pairs recognised as inline math boundaries.
    pub inline_math: Vec<DelimiterPair>,
    /// Delimiter pairs recognised as display math boundaries.
    pub display_math: Vec<DelimiterPair>,
    /// Whether escaped delimiter characters (`\$`) are kept out of math
    /// boundary detection.
    pub process_escapes: bool,
    /// Rendering scale factor for the output, in percent.
    pub display_scale_percent: u32,
    /// Custom macro definitions.
    pub macros: Arc<MacroTable>,
}

#[bon]
impl RenderSettings {
    /// Creates validated [`RenderSettings`] from optional configuration
    /// values.
    ///
    /// # Default Values
    /// - `inline_math`: `$...$` and `\(...\)`
    /// - `display_math`: `$$...$$` and `\[...\]`
    /// - `process_escapes`: `true`
    /// - `display_scale_percent`: `100`
    /// - `macros`: empty table
    ///
    /// # Errors
    /// - [`ConfigErrorKind::EmptyDelimiter`] for a pair with an empty marker.
    /// - [`ConfigErrorKind::DuplicateDelimiter`] when an opening marker is
    ///   declared twice, across inline and display pairs alike.
    /// - [`ConfigErrorKind::InvalidScale`] for a scale of 0%.
    #[builder]
    pub fn new(
        /// Inline math delimiter pairs.
        inline_math: Option<Vec<DelimiterPair>>,
        /// Display math delimiter pairs.
        display_math: Option<Vec<DelimiterPair>>,
        /// Treat escaped delimiters as literal text.
        process_escapes: Option<bool>,
        /// Output scale in percent.
        display_scale_percent: Option<u32>,
        /// Custom macro table, owned or already shared.
        #[builder(into)]
        macros: Option<Arc<MacroTable>>,
    ) -> Result<Self, ConfigError> {
        let settings = Self {
            inline_math: inline_math.unwrap_or_else(default_inline_math),
            display_math: display_math.unwrap_or_else(default_display_math),
            process_escapes: process_escapes.unwrap_or(true),
            display_scale_percent: display_scale_percent.unwrap_or(100),
            macros: macros.unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Scale as a factor, e.g. `1.3` for 130%.
    #[must_use]
    pub fn display_scale(&self) -> f64 {
        f64::from(self.display_scale_percent) / 100.0
    }

    /// All delimiter pairs tagged with the kind of region they open.
    pub fn delimiters(&self) -> impl Iterator<Item = (MathBoundary, &DelimiterPair)> {
        self.inline_math
            .iter()
            .map(|pair| (MathBoundary::Inline, pair))
            .chain(
                self.display_math
                    .iter()
                    .map(|pair| (MathBoundary::Display, pair)),
            )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.display_scale_percent == 0 {
            return Err(ConfigError::at(
                ConfigErrorKind::InvalidScale {
                    percent: self.display_scale_percent,
                },
                "displayScalePercent",
            ));
        }

        let mut seen: RapidHashSet<&str> = RapidHashSet::default();
        for (boundary, pair) in self.delimiters() {
            let key = match boundary {
                MathBoundary::Inline => "inlineMathDelimiters",
                MathBoundary::Display => "displayMathDelimiters",
            };
            if pair.is_empty() {
                return Err(ConfigError::at(
                    ConfigErrorKind::EmptyDelimiter { boundary },
                    key,
                ));
            }
            if !seen.insert(pair.open.as_str()) {
                return Err(ConfigError::at(
                    ConfigErrorKind::DuplicateDelimiter {
                        open: pair.open.clone(),
                    },
                    key,
                ));
            }
        }

        if !self.process_escapes && self.inline_math.iter().any(|pair| pair.open == "$") {
            warn!("`$` opens inline math while escapes are off; literal dollar signs cannot be written");
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            inline_math: default_inline_math(),
            display_math: default_display_math(),
            process_escapes: true,
            display_scale_percent: 100,
            macros: Arc::default(),
        }
    }
}

fn default_inline_math() -> Vec<DelimiterPair> {
    vec![
        DelimiterPair::new("$", "$"),
        DelimiterPair::new(r"\(", r"\)"),
    ]
}

fn default_display_math() -> Vec<DelimiterPair> {
    vec![
        DelimiterPair::new("$$", "$$"),
        DelimiterPair::new(r"\[", r"\]"),
    ]
}
