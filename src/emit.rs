//! Engine-specific configuration output
//!
//! Turns validated [`RenderSettings`] into the configuration object a
//! rendering engine reads at page load: the MathJax v3 global config, or the
//! option object of KaTeX's auto-render extension.

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value, json};
use strum::{Display, EnumString};
use tracing::debug;

use crate::{
    macros::MacroDefinition,
    types::{ConfigError, DelimiterPair, RenderSettings},
};

/// Rendering engines that can consume the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Engine {
    /// MathJax 3 (`window.MathJax`).
    #[default]
    MathJax,
    /// KaTeX with the auto-render extension.
    Katex,
}

/// Shape of the emitted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitForm {
    /// A bare JSON object.
    #[default]
    Object,
    /// A JavaScript snippet that registers the object with the engine.
    Script,
}

/// MathJax v3 configuration.
///
/// Macros without arguments are plain strings, parameterized macros are
/// `[template, arity]` pairs. The scale goes to the CommonHTML output as a
/// factor (`1.3` for 130%).
#[must_use]
pub fn mathjax_config(settings: &RenderSettings) -> Value {
    let macros: Map<String, Value> = settings
        .macros
        .iter()
        .map(|(name, definition)| (name.to_owned(), mathjax_macro(definition)))
        .collect();

    json!({
        "tex": {
            "inlineMath": settings.inline_math,
            "displayMath": settings.display_math,
            "processEscapes": settings.process_escapes,
            "macros": macros,
        },
        "chtml": {
            "scale": settings.display_scale(),
        },
    })
}

fn mathjax_macro(definition: &MacroDefinition) -> Value {
    if definition.is_parameterized() {
        json!([definition.template(), definition.arity()])
    } else {
        Value::from(definition.template())
    }
}

/// KaTeX auto-render options.
///
/// KaTeX keys macros by their full control sequence and infers the arity from
/// the template. Display delimiters come first: auto-render matches in list
/// order, so `$$` has to be tried before `$`. KaTeX has no option for escape
/// processing or output scale; those settings are left to the page.
#[must_use]
pub fn katex_options(settings: &RenderSettings) -> Value {
    let delimiters: Vec<Value> = settings
        .display_math
        .iter()
        .map(|pair| katex_delimiter(pair, true))
        .chain(
            settings
                .inline_math
                .iter()
                .map(|pair| katex_delimiter(pair, false)),
        )
        .collect();

    let macros: Map<String, Value> = settings
        .macros
        .iter()
        .map(|(name, definition)| (format!("\\{name}"), Value::from(definition.template())))
        .collect();

    if settings.display_scale_percent != 100 {
        debug!(
            percent = settings.display_scale_percent,
            "display scale is not part of KaTeX options"
        );
    }

    json!({
        "delimiters": delimiters,
        "macros": macros,
        "throwOnError": false,
    })
}

fn katex_delimiter(pair: &DelimiterPair, display: bool) -> Value {
    json!({
        "left": pair.open,
        "right": pair.close,
        "display": display,
    })
}

/// Render the configuration for `engine` as text.
///
/// # Errors
/// Fails only if JSON serialization fails.
pub fn render(
    settings: &RenderSettings,
    engine: Engine,
    form: EmitForm,
) -> Result<String, ConfigError> {
    let value = match engine {
        Engine::MathJax => mathjax_config(settings),
        Engine::Katex => katex_options(settings),
    };
    let body = serde_json::to_string_pretty(&value)?;

    Ok(match (form, engine) {
        (EmitForm::Object, _) => body,
        (EmitForm::Script, Engine::MathJax) => format!("window.MathJax = {body};\n"),
        (EmitForm::Script, Engine::Katex) => format!(
            "document.addEventListener(\"DOMContentLoaded\", function () {{\n  renderMathInElement(document.body, {body});\n}});\n"
        ),
    })
}
