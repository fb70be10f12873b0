//! Configuration error handling
//!
//! Every failure the crate can report is a [`ConfigError`]: a categorised
//! [`ConfigErrorKind`] plus, when known, the configuration key the problem was
//! found under. All of them surface while a table or settings document is
//! loaded, never while it is being read afterwards.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use std::io;

use thiserror::Error;

use crate::types::MathBoundary;

/// Main error type returned when a macro table or render settings document is
/// rejected.
#[derive(Debug, Error)]
#[error("Math configuration error: {kind}{context}")]
pub struct ConfigError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ConfigErrorKind>,
    /// Where in the configuration document the problem was found.
    context: ConfigErrorContext,
}

impl ConfigError {
    /// Create a new ConfigError with the given kind
    pub fn new<T: Into<ConfigErrorKind>>(kind: T) -> Self {
        Self {
            kind: Box::new(kind.into()),
            context: ConfigErrorContext::None,
        }
    }

    /// Create a new ConfigError attached to a configuration key such as
    /// `macros.gg`.
    pub fn at<T: Into<ConfigErrorKind>>(kind: T, key: &str) -> Self {
        Self {
            kind: Box::new(kind.into()),
            context: ConfigErrorContext::Key(key.to_owned()),
        }
    }

    /// Attach a configuration key, keeping any key that is already set.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        if matches!(self.context, ConfigErrorContext::None) {
            self.context = ConfigErrorContext::Key(key.to_owned());
        }
        self
    }

    /// The configuration key this error was reported under, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.context {
            ConfigErrorContext::Key(key) => Some(key),
            ConfigErrorContext::None => None,
        }
    }
}

impl From<strum::ParseError> for ConfigError {
    fn from(err: strum::ParseError) -> Self {
        Self::new(ConfigErrorKind::EnumParse(err))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ConfigErrorKind::Json(err))
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::new(ConfigErrorKind::Yaml(err))
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        Self::new(ConfigErrorKind::Io(err))
    }
}

/// Describes the specific reason for a [`ConfigError`].
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigErrorKind {
    #[error("Duplicate macro name: {name}")]
    DuplicateMacroName { name: String },
    #[error(
        "Macro {name} declares {declared} argument(s) but its template uses {found} distinct placeholder(s)"
    )]
    ArityMismatch {
        name: String,
        declared: usize,
        found: usize,
    },
    #[error("Macro {name} never uses placeholder #{index}")]
    MissingPlaceholder { name: String, index: usize },
    #[error("Invalid placeholder '#{found}' in macro {name}")]
    InvalidPlaceholder { name: String, found: char },
    #[error("Incomplete placeholder at end of macro {name}")]
    IncompletePlaceholder { name: String },
    #[error("Macro {name} declares {arity} arguments, at most 9 are allowed")]
    ArityTooLarge { name: String, arity: usize },
    #[error("Unbalanced braces in the template of macro {name}")]
    UnbalancedBraces { name: String },
    #[error("Invalid macro name: '{name}'")]
    InvalidMacroName { name: String },
    #[error("Unknown configuration option: {key}")]
    UnknownOption { key: String },
    #[error("Empty {boundary} math delimiter")]
    EmptyDelimiter { boundary: MathBoundary },
    #[error("Math delimiter '{open}' is declared more than once")]
    DuplicateDelimiter { open: String },
    #[error("Display scale must be a positive percentage, got {percent}")]
    InvalidScale { percent: u32 },
    #[error("Undefined macro: {name}")]
    UndefinedMacro { name: String },
    #[error("Macro {name} expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Unsupported configuration format: '{extension}'")]
    UnsupportedFormat { extension: String },
    #[error("{0}")]
    EnumParse(strum::ParseError),
    #[error("Invalid JSON configuration: {0}")]
    Json(serde_json::Error),
    #[error("Invalid YAML configuration: {0}")]
    Yaml(serde_yaml::Error),
    #[error("Failed to read configuration: {0}")]
    Io(io::Error),
}

#[derive(Debug, Clone, Default)]
enum ConfigErrorContext {
    #[default]
    None,
    Key(String),
}

impl fmt::Display for ConfigErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Key(key) => write!(f, " (at `{key}`)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_creation() {
        let error = ConfigError::new(ConfigErrorKind::DuplicateMacroName {
            name: "kt".to_owned(),
        });
        assert!(matches!(
            error.kind.as_ref(),
            ConfigErrorKind::DuplicateMacroName { name } if name == "kt"
        ));
        assert_eq!(
            error.to_string(),
            "Math configuration error: Duplicate macro name: kt"
        );
        assert_eq!(error.key(), None);
    }

    #[test]
    fn test_config_error_with_key_context() {
        let error = ConfigError::at(
            ConfigErrorKind::UnknownOption {
                key: "inlineMath".to_owned(),
            },
            "inlineMath",
        );
        assert_eq!(error.key(), Some("inlineMath"));
        assert!(error.to_string().ends_with("(at `inlineMath`)"));

        // An existing key is not replaced by an outer one.
        let error = error.with_key("tex");
        assert_eq!(error.key(), Some("inlineMath"));
    }

    #[test]
    fn test_io_error_conversion() {
        let error = ConfigError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(matches!(error.kind.as_ref(), ConfigErrorKind::Io(_)));
        assert!(error.to_string().contains("Failed to read configuration"));
    }
}
