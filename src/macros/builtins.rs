//! Built-in notation macros
//!
//! The shorthand used throughout the physics documentation pages: photon-photon
//! processes, the Pomeron and the usual transverse-momentum symbols.

use phf::phf_map;

use crate::{
    macro_table::MacroTable,
    macros::MacroDefinition,
    types::{ConfigError, RenderSettings},
};

/// Notation macros as `name => (template, arity)`.
pub static NOTATION_MACROS: phf::Map<&'static str, (&'static str, usize)> = phf_map! {
    "Pom" => (r"{\rm I\!P}", 0),
    "Reg" => (r"{\rm I\!R}", 0),
    "gg" => (r"{\gamma\gamma\rightarrow #1}", 1),
    "ggx" => (r"{\gg{X}}", 0),
    "ggll" => (r"{\gg{\ell^+\ell^-}}", 0),
    "ggff" => (r"{\gg{f\bar f}}", 0),
    "ggww" => (r"{\gg{W^+W^-}}", 0),
    "kt" => (r"{k_{\rm T}}", 0),
    "pt" => (r"{p_{\rm T}}", 0),
    "vecqt" => (r"{\bf q_{\rm T}}", 0),
    "xbj" => (r"{x_{\rm Bj}}", 0),
};

/// Display scale used by the documentation pages, in percent.
pub const NOTATION_SCALE_PERCENT: u32 = 130;

/// Build a validated table from [`NOTATION_MACROS`].
pub fn notation_table() -> Result<MacroTable, ConfigError> {
    MacroTable::new(
        NOTATION_MACROS
            .entries()
            .map(|(name, (template, arity))| (*name, MacroDefinition::new(*template, *arity))),
    )
}

/// Render settings for the documentation pages: the notation macros, escape
/// processing on and a 130% display scale.
pub fn notation_settings() -> Result<RenderSettings, ConfigError> {
    RenderSettings::builder()
        .macros(notation_table()?)
        .process_escapes(true)
        .display_scale_percent(NOTATION_SCALE_PERCENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_table_is_valid() {
        let table = notation_table().unwrap();
        assert_eq!(table.len(), NOTATION_MACROS.len());
        assert_eq!(table.resolve("Pom"), Some(r"{\rm I\!P}"));
        assert_eq!(table.get("gg").map(MacroDefinition::arity), Some(1));
    }

    #[test]
    fn test_notation_templates_balance_braces() {
        for (name, (template, arity)) in NOTATION_MACROS.entries() {
            MacroDefinition::new(*template, *arity)
                .validate(name)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn test_photon_photon_shorthands_chain_through_gg() {
        let table = notation_table().unwrap();
        for name in ["ggx", "ggll", "ggff", "ggww"] {
            let template = table.resolve(name).unwrap();
            assert!(template.starts_with(r"{\gg{"), "{name}: {template}");
            assert!(template.ends_with("}}"), "{name}: {template}");
        }
    }

    #[test]
    fn test_notation_settings() {
        let settings = notation_settings().unwrap();
        assert_eq!(settings.display_scale_percent, 130);
        assert!(settings.process_escapes);
        assert!(settings.macros.contains("xbj"));
    }
}
