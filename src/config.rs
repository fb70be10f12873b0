//! Loading and saving render settings as JSON or YAML documents
//!
//! The document is a flat object:
//!
//! ```json
//! {
//!   "inlineMathDelimiters": [["$", "$"], ["\\(", "\\)"]],
//!   "displayMathDelimiters": [["\\[", "\\]"]],
//!   "processEscapes": true,
//!   "displayScalePercent": 130,
//!   "macros": {
//!     "Pom": "{\\rm I\\!P}",
//!     "gg": ["{\\gamma\\gamma\\rightarrow #1}", 1]
//!   }
//! }
//! ```
//!
//! Every key is optional. Unknown keys are reported rather than ignored, and
//! a macro name that appears twice inside `macros` is reported rather than
//! silently overwritten; both checks run on the raw document, before the
//! settings are built.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::fs;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};
use tracing::info;

use crate::{
    macro_table::MacroTable,
    macros::MacroDefinition,
    types::{ConfigError, ConfigErrorKind, DelimiterPair, RenderSettings},
};

/// Document formats understood by [`load_str`], [`load_path`] and [`dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    /// [`ConfigErrorKind::UnsupportedFormat`] for a missing or unknown
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse().map_err(|_| {
            ConfigError::new(ConfigErrorKind::UnsupportedFormat {
                extension: extension.to_owned(),
            })
        })
    }
}

/// One value of the `macros` object: a plain template (no arguments) or a
/// `[template, arity]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum MacroEntry {
    Plain(String),
    Parameterized(String, usize),
}

impl From<MacroEntry> for MacroDefinition {
    fn from(entry: MacroEntry) -> Self {
        match entry {
            MacroEntry::Plain(template) => Self::plain(template),
            MacroEntry::Parameterized(template, arity) => Self::new(template, arity),
        }
    }
}

impl From<&MacroDefinition> for MacroEntry {
    fn from(definition: &MacroDefinition) -> Self {
        if definition.is_parameterized() {
            Self::Parameterized(definition.template().to_owned(), definition.arity())
        } else {
            Self::Plain(definition.template().to_owned())
        }
    }
}

/// The `macros` object in document order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MacroEntries(Vec<(String, MacroEntry)>);

impl<'de> Deserialize<'de> for MacroEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = MacroEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from macro name to template or [template, arity]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((name, entry)) = map.next_entry::<String, MacroEntry>()? {
                    entries.push((name, entry));
                }
                Ok(MacroEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl Serialize for MacroEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// Raw configuration document, before validation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_math_delimiters: Option<Vec<DelimiterPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_math_delimiters: Option<Vec<DelimiterPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    process_escapes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_scale_percent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    macros: Option<MacroEntries>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

impl SettingsDocument {
    fn into_settings(self) -> Result<RenderSettings, ConfigError> {
        if let Some(key) = self.unknown.into_keys().next() {
            return Err(ConfigError::at(
                ConfigErrorKind::UnknownOption { key: key.clone() },
                &key,
            ));
        }

        let macros = match self.macros {
            Some(MacroEntries(entries)) => MacroTable::new(
                entries
                    .into_iter()
                    .map(|(name, entry)| (name, MacroDefinition::from(entry))),
            )?,
            None => MacroTable::empty(),
        };

        RenderSettings::builder()
            .maybe_inline_math(self.inline_math_delimiters)
            .maybe_display_math(self.display_math_delimiters)
            .maybe_process_escapes(self.process_escapes)
            .maybe_display_scale_percent(self.display_scale_percent)
            .macros(macros)
            .build()
    }

    fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            inline_math_delimiters: Some(settings.inline_math.clone()),
            display_math_delimiters: Some(settings.display_math.clone()),
            process_escapes: Some(settings.process_escapes),
            display_scale_percent: Some(settings.display_scale_percent),
            macros: Some(MacroEntries(
                settings
                    .macros
                    .iter()
                    .map(|(name, definition)| (name.to_owned(), MacroEntry::from(definition)))
                    .collect(),
            )),
            unknown: BTreeMap::new(),
        }
    }
}

/// Parse and validate settings from a document in memory.
///
/// # Errors
/// Syntax errors of the underlying format, [`ConfigErrorKind::UnknownOption`]
/// for an unrecognised key, and every validation error of
/// [`MacroTable::new`] and [`RenderSettings::builder`].
pub fn load_str(input: &str, format: ConfigFormat) -> Result<RenderSettings, ConfigError> {
    let document: SettingsDocument = match format {
        ConfigFormat::Json => serde_json::from_str(input)?,
        ConfigFormat::Yaml => serde_yaml::from_str(input)?,
    };
    document.into_settings()
}

/// Read, parse and validate a settings file; the format follows the file
/// extension.
///
/// # Errors
/// As [`load_str`], plus [`ConfigErrorKind::UnsupportedFormat`] and I/O
/// failures.
pub fn load_path(path: &Path) -> Result<RenderSettings, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let input = fs::read_to_string(path)?;
    let settings = load_str(&input, format)?;
    info!(
        path = %path.display(),
        %format,
        macros = settings.macros.len(),
        "loaded math configuration"
    );
    Ok(settings)
}

/// Serialize settings to a document that [`load_str`] reads back into equal
/// settings. Macros are written in name order.
///
/// # Errors
/// Serialization failures of the underlying format.
pub fn dump(settings: &RenderSettings, format: ConfigFormat) -> Result<String, ConfigError> {
    let document = SettingsDocument::from_settings(settings);
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&document)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&document)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::builtins::notation_settings;

    fn kind_of(result: Result<RenderSettings, ConfigError>) -> ConfigErrorKind {
        *result.unwrap_err().kind
    }

    #[test]
    fn test_load_full_json_document() {
        let input = r#"{
            "inlineMathDelimiters": [["\\(", "\\)"]],
            "displayMathDelimiters": [["\\[", "\\]"]],
            "processEscapes": true,
            "displayScalePercent": 130,
            "macros": {
                "Pom": "{\\rm I\\!P}",
                "gg": ["{\\gamma\\gamma\\rightarrow #1}", 1]
            }
        }"#;
        let settings = load_str(input, ConfigFormat::Json).unwrap();
        assert_eq!(settings.inline_math, [DelimiterPair::new(r"\(", r"\)")]);
        assert_eq!(settings.display_scale_percent, 130);
        assert_eq!(settings.macros.resolve("Pom"), Some(r"{\rm I\!P}"));
        assert_eq!(settings.macros.get("gg").map(MacroDefinition::arity), Some(1));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = load_str("{}", ConfigFormat::Json).unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_unknown_option_is_reported() {
        let kind = kind_of(load_str(r#"{"inlineMath": []}"#, ConfigFormat::Json));
        assert!(matches!(kind, ConfigErrorKind::UnknownOption { key } if key == "inlineMath"));
    }

    #[test]
    fn test_duplicate_macro_in_document() {
        let input = r#"{"macros": {"kt": "{k_{\\rm T}}", "kt": "{k_T}"}}"#;
        let kind = kind_of(load_str(input, ConfigFormat::Json));
        assert!(matches!(kind, ConfigErrorKind::DuplicateMacroName { name } if name == "kt"));
    }

    #[test]
    fn test_zero_arity_pair_with_placeholder() {
        let input = r#"{"macros": {"ggx": ["{\\gg{#1}}", 0]}}"#;
        let kind = kind_of(load_str(input, ConfigFormat::Json));
        assert!(matches!(kind, ConfigErrorKind::ArityMismatch { .. }));
    }

    #[test]
    fn test_malformed_macro_value() {
        let kind = kind_of(load_str(r#"{"macros": {"kt": 3}}"#, ConfigFormat::Json));
        assert!(matches!(kind, ConfigErrorKind::Json(_)));
    }

    #[test]
    fn test_yaml_document() {
        let input = r#"
processEscapes: false
displayScalePercent: 120
macros:
  pt: '{p_{\rm T}}'
  gg: ['{\gamma\gamma\rightarrow #1}', 1]
"#;
        let settings = load_str(input, ConfigFormat::Yaml).unwrap();
        assert!(!settings.process_escapes);
        assert_eq!(settings.macros.len(), 2);
        assert_eq!(settings.macros.resolve("pt"), Some(r"{p_{\rm T}}"));
    }

    #[test]
    fn test_round_trip() {
        let settings = notation_settings().unwrap();
        for format in [ConfigFormat::Json, ConfigFormat::Yaml] {
            let text = dump(&settings, format).unwrap();
            let reloaded = load_str(&text, format).unwrap();
            assert_eq!(reloaded, settings, "{format}");
        }
    }

    #[test]
    fn test_plain_macros_serialize_as_strings() {
        let table = MacroTable::new([
            ("Reg", MacroDefinition::plain(r"{\rm I\!R}")),
            ("gg", MacroDefinition::new(r"{\gamma\gamma\rightarrow #1}", 1)),
        ])
        .unwrap();
        let settings = RenderSettings::builder().macros(table).build().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&dump(&settings, ConfigFormat::Json).unwrap()).unwrap();
        assert_eq!(value["macros"]["Reg"], r"{\rm I\!R}");
        assert_eq!(
            value["macros"]["gg"],
            serde_json::json!([r"{\gamma\gamma\rightarrow #1}", 1])
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("math.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("math.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        let err = ConfigFormat::from_path(Path::new("math.toml")).unwrap_err();
        assert!(matches!(
            err.kind.as_ref(),
            ConfigErrorKind::UnsupportedFormat { extension } if extension == "toml"
        ));
    }
}
