#![allow(dead_code)]

use std::io::Write as _;
use std::panic::{UnwindSafe, catch_unwind};

use mathconf::{ConfigError, ConfigErrorKind, MacroDefinition, MacroTable};
use tempfile::NamedTempFile;

/// Run one described case; a returned error or a panic fails the test with
/// the description attached.
pub fn it<F>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), ConfigError> + UnwindSafe,
{
    match catch_unwind(test_fn) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test '{desc}' failed with Result::Err: {e}"),
        Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                (*s).to_owned()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "<non-string panic payload>".to_owned()
            };
            panic!("Test '{desc}' panicked: {msg}");
        }
    }
}

/// The two macros used across the scenarios: a literal and a one-argument
/// template.
pub fn pom_and_gg() -> Result<MacroTable, ConfigError> {
    MacroTable::new([
        ("Pom", MacroDefinition::plain(r"{\rm I\!P}")),
        ("gg", MacroDefinition::new(r"{\gamma\gamma\rightarrow #1}", 1)),
    ])
}

/// Write `contents` to a temporary file with the given extension.
pub fn config_file(extension: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Unwrap the error kind of a failed load.
pub fn error_kind<T: std::fmt::Debug>(result: Result<T, ConfigError>) -> ConfigErrorKind {
    *result.unwrap_err().kind
}

#[macro_export]
macro_rules! assert_let {
    ($pat:pat = $expr:expr, $($arg:tt)+) => {
        let $pat = $expr else {
            panic!($($arg)+);
        };
    };
    ($pat:pat = $expr:expr) => {
        let $pat = $expr else {
            panic!(
                "assert_let failed: pattern `{}` did not match {} at {}:{}",
                stringify!($pat), stringify!($expr),
                file!(), line!(),
            );
        };
    };
}
