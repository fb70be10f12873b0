//! Validated macro tables and render settings for math typesetting
//!
//! Documentation sites hand their math engine (MathJax or KaTeX) a small
//! configuration object at page load: notation macros, the delimiters that
//! mark inline and display math, escape processing and an output scale. This
//! crate builds that object from typed values or from a JSON/YAML document,
//! rejects anything malformed before a single page is rendered, and emits the
//! engine-specific form.
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::impl_trait_in_params)]
// clippy exceptions
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

pub mod config;
pub mod emit;
pub mod macro_table;
pub mod macros;
pub mod types;

pub use crate::config::ConfigFormat;
pub use crate::emit::{EmitForm, Engine};
pub use crate::macro_table::MacroTable;
pub use crate::macros::MacroDefinition;
pub use crate::types::{ConfigError, ConfigErrorKind, DelimiterPair, MathBoundary, RenderSettings};

use std::path::Path;

/// Loads a settings file and renders the configuration for `engine`.
///
/// This is the whole pipeline a documentation build needs: read the JSON or
/// YAML document, validate every macro and option, and produce the object (or
/// script) that the page hands to the engine.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// let script = mathconf::render_file(
///     Path::new("doc/math.yaml"),
///     mathconf::Engine::MathJax,
///     mathconf::EmitForm::Script,
/// )?;
/// println!("{script}");
/// # Ok::<(), mathconf::ConfigError>(())
/// ```
pub fn render_file(path: &Path, engine: Engine, form: EmitForm) -> Result<String, ConfigError> {
    let settings = config::load_path(path)?;
    emit::render(&settings, engine, form)
}

/// Validates a settings document held in memory and renders it for `engine`.
///
/// # Examples
///
/// ```rust
/// use mathconf::{ConfigFormat, EmitForm, Engine};
///
/// let config = mathconf::render_str(
///     r#"{"macros": {"Pom": "{\\rm I\\!P}"}}"#,
///     ConfigFormat::Json,
///     Engine::MathJax,
///     EmitForm::Object,
/// )
/// .unwrap();
/// assert!(config.contains("Pom"));
/// ```
pub fn render_str(
    input: &str,
    format: ConfigFormat,
    engine: Engine,
    form: EmitForm,
) -> Result<String, ConfigError> {
    let settings = config::load_str(input, format)?;
    emit::render(&settings, engine, form)
}
