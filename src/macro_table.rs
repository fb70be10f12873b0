//! The macro table handed to the rendering engine
//!
//! A `MacroTable` is built once from a list of `(name, definition)` entries,
//! validated eagerly and immutable afterwards. It has no mutation API, so a
//! single table can be shared across threads behind an `Arc` without locking.
//!
//! Performance characteristics:
//! - construction is O(n) in the number of entries
//! - `resolve` and `get` are O(1)
//! - `iter` sorts by name, O(n log n), for deterministic serialized output

use alloc::string::String;
use alloc::vec::Vec;

use rapidhash::RapidHashMap;
use tracing::debug;

use crate::{
    macros::MacroDefinition,
    types::{ConfigError, ConfigErrorKind},
};

/// Make it easier to switch between different hash backends.
pub type KeyMap<K, V> = RapidHashMap<K, V>;

/// Immutable name → template lookup.
///
/// # Examples
///
/// ```rust
/// use mathconf::{MacroDefinition, MacroTable};
///
/// let table = MacroTable::new([
///     ("Pom", MacroDefinition::plain(r"{\rm I\!P}")),
///     ("gg", MacroDefinition::new(r"{\gamma\gamma\rightarrow #1}", 1)),
/// ])
/// .unwrap();
///
/// assert_eq!(table.resolve("Pom"), Some(r"{\rm I\!P}"));
/// assert_eq!(
///     table.expand("gg", &["X"]).unwrap(),
///     r"{\gamma\gamma\rightarrow X}"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    definitions: KeyMap<String, MacroDefinition>,
}

impl MacroTable {
    /// Build and validate a table.
    ///
    /// The whole table is rejected on the first invalid entry; the returned
    /// error carries the key `macros.<name>`.
    ///
    /// # Errors
    /// - [`ConfigErrorKind::DuplicateMacroName`] if a name appears twice.
    /// - Any per-entry error from [`MacroDefinition::validate`].
    pub fn new<I, N>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (N, MacroDefinition)>,
        N: Into<String>,
    {
        let entries = entries.into_iter();
        let mut definitions = KeyMap::default();
        definitions.reserve(entries.size_hint().0);

        for (name, definition) in entries {
            let name = name.into();
            let key = format!("macros.{name}");
            if definitions.contains_key(&name) {
                return Err(ConfigError::at(
                    ConfigErrorKind::DuplicateMacroName { name },
                    &key,
                ));
            }
            definition
                .validate(&name)
                .map_err(|e| e.with_key(&key))?;
            definitions.insert(name, definition);
        }

        debug!(macros = definitions.len(), "macro table loaded");
        Ok(Self { definitions })
    }

    /// An empty table. Valid, and yields an engine configuration with no
    /// custom macros.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The literal template for `name`, without any substitution.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(MacroDefinition::template)
    }

    /// The full definition for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.definitions.get(name)
    }

    /// Detect whether `name` has a definition
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Expand `name` with positional `args`.
    ///
    /// # Errors
    /// [`ConfigErrorKind::UndefinedMacro`] for an unknown name, or
    /// [`ConfigErrorKind::ArgumentCountMismatch`] when `args` does not match
    /// the macro's arity.
    pub fn expand(&self, name: &str, args: &[&str]) -> Result<String, ConfigError> {
        let definition = self.get(name).ok_or_else(|| {
            ConfigError::new(ConfigErrorKind::UndefinedMacro {
                name: name.to_owned(),
            })
        })?;
        definition.expand(name, args)
    }

    /// Number of macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table defines no macros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All entries, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroDefinition)> {
        let mut entries: Vec<_> = self
            .definitions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use std::thread;

    fn sample() -> MacroTable {
        MacroTable::new([
            ("kt", MacroDefinition::plain(r"{k_{\rm T}}")),
            ("Pom", MacroDefinition::plain(r"{\rm I\!P}")),
            ("gg", MacroDefinition::new(r"{\gamma\gamma\rightarrow #1}", 1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_returns_literal_template() {
        let table = sample();
        assert_eq!(table.resolve("Pom"), Some(r"{\rm I\!P}"));
        assert_eq!(table.resolve("gg"), Some(r"{\gamma\gamma\rightarrow #1}"));
        assert_eq!(table.resolve("missing"), None);
        assert!(table.contains("kt"));
        assert!(!table.contains("pt"));
    }

    #[test]
    fn test_expand() {
        let table = sample();
        assert_eq!(
            table.expand("gg", &["X"]).unwrap(),
            r"{\gamma\gamma\rightarrow X}"
        );
        let err = table.expand("ggx", &[]).unwrap_err();
        assert!(matches!(
            err.kind.as_ref(),
            ConfigErrorKind::UndefinedMacro { name } if name == "ggx"
        ));
    }

    #[test]
    fn test_duplicate_name_rejects_table() {
        let err = MacroTable::new([
            ("kt", MacroDefinition::plain(r"{k_{\rm T}}")),
            ("kt", MacroDefinition::plain(r"{k_T}")),
        ])
        .unwrap_err();
        assert!(matches!(
            err.kind.as_ref(),
            ConfigErrorKind::DuplicateMacroName { name } if name == "kt"
        ));
        assert_eq!(err.key(), Some("macros.kt"));
    }

    #[test]
    fn test_duplicate_name_wins_over_malformed_entry() {
        let err = MacroTable::new([
            ("kt", MacroDefinition::plain("a")),
            ("kt", MacroDefinition::plain("#")),
        ])
        .unwrap_err();
        assert!(matches!(
            err.kind.as_ref(),
            ConfigErrorKind::DuplicateMacroName { name } if name == "kt"
        ));
    }

    #[test]
    fn test_invalid_entry_carries_key() {
        let err = MacroTable::new([("ggx", MacroDefinition::new(r"{\gg{#1}}", 0))]).unwrap_err();
        assert!(matches!(
            err.kind.as_ref(),
            ConfigErrorKind::ArityMismatch { .. }
        ));
        assert_eq!(err.key(), Some("macros.ggx"));
    }

    #[test]
    fn test_empty_table() {
        let table = MacroTable::new(Vec::<(String, MacroDefinition)>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table, MacroTable::empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_iter_is_sorted_by_name() {
        let table = sample();
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Pom", "gg", "kt"]);
    }

    #[test]
    fn test_shared_readers() {
        let table = Arc::new(sample());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.expand("gg", &["Y"]).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), r"{\gamma\gamma\rightarrow Y}");
        }
    }
}
