//! Macro definitions for math notation
//!
//! A macro maps a control-word name (`\gg`, without the backslash) to a
//! template. Templates may contain positional placeholders `#1`..`#9`, which
//! are replaced by caller arguments when the rendering engine expands the
//! macro; `##` stands for a literal `#`.
//!
//! This module owns the per-entry rules: placeholder syntax, arity
//! bookkeeping, brace balance and name shape. Table-wide rules (unique names)
//! live in [`crate::macro_table`].

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{ConfigError, ConfigErrorKind};

pub mod builtins;

/// TeX accepts at most nine positional parameters per macro.
pub const MAX_ARITY: usize = 9;

/// One entry of the macro table: a template and the number of positional
/// arguments it takes.
///
/// An arity of 0 means the template is inserted literally. For arity `n > 0`
/// the template must use exactly the placeholders `#1` through `#n`.
///
/// # Examples
///
/// ```rust
/// use mathconf::MacroDefinition;
///
/// let gg = MacroDefinition::new(r"{\gamma\gamma\rightarrow #1}", 1);
/// gg.validate("gg").unwrap();
/// assert_eq!(
///     gg.expand("gg", &["X"]).unwrap(),
///     r"{\gamma\gamma\rightarrow X}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroDefinition {
    template: Cow<'static, str>,
    arity: usize,
}

impl MacroDefinition {
    /// Create a definition with an explicit arity.
    ///
    /// Nothing is checked here; validation happens when the definition is
    /// inserted into a [`crate::MacroTable`] or through [`Self::validate`].
    #[must_use]
    pub fn new<T: Into<Cow<'static, str>>>(template: T, arity: usize) -> Self {
        Self {
            template: template.into(),
            arity,
        }
    }

    /// Create a definition that takes no arguments.
    #[must_use]
    pub fn plain<T: Into<Cow<'static, str>>>(template: T) -> Self {
        Self::new(template, 0)
    }

    /// The raw template, placeholders included.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of positional arguments.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Whether the macro takes at least one argument.
    #[must_use]
    pub const fn is_parameterized(&self) -> bool {
        self.arity > 0
    }

    /// Check this definition against the per-entry rules.
    ///
    /// # Errors
    /// - [`ConfigErrorKind::InvalidMacroName`] if `name` is not a TeX control
    ///   word or control symbol.
    /// - [`ConfigErrorKind::ArityTooLarge`] for more than [`MAX_ARITY`]
    ///   arguments.
    /// - [`ConfigErrorKind::InvalidPlaceholder`] /
    ///   [`ConfigErrorKind::IncompletePlaceholder`] for malformed `#` uses.
    /// - [`ConfigErrorKind::ArityMismatch`] when the number of distinct
    ///   placeholders differs from the declared arity.
    /// - [`ConfigErrorKind::MissingPlaceholder`] when the count matches but
    ///   numbering is not contiguous from `#1`.
    /// - [`ConfigErrorKind::UnbalancedBraces`] when `{`/`}` do not pair up.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !is_valid_name(name) {
            return Err(ConfigError::new(ConfigErrorKind::InvalidMacroName {
                name: name.to_owned(),
            }));
        }
        if self.arity > MAX_ARITY {
            return Err(ConfigError::new(ConfigErrorKind::ArityTooLarge {
                name: name.to_owned(),
                arity: self.arity,
            }));
        }

        let mut used = [false; MAX_ARITY + 1];
        for segment in split_template(name, &self.template)? {
            if let Segment::Placeholder(index) = segment {
                used[index] = true;
            }
        }
        let found = used.iter().filter(|u| **u).count();
        if found != self.arity {
            return Err(ConfigError::new(ConfigErrorKind::ArityMismatch {
                name: name.to_owned(),
                declared: self.arity,
                found,
            }));
        }
        if let Some(index) = (1..=self.arity).find(|i| !used[*i]) {
            return Err(ConfigError::new(ConfigErrorKind::MissingPlaceholder {
                name: name.to_owned(),
                index,
            }));
        }

        if !braces_balanced(&self.template) {
            return Err(ConfigError::new(ConfigErrorKind::UnbalancedBraces {
                name: name.to_owned(),
            }));
        }
        Ok(())
    }

    /// Substitute `args` into the template, the way the rendering engine
    /// does on each use of the macro.
    ///
    /// `#n` becomes `args[n - 1]` and `##` becomes `#`. Arguments are inserted
    /// verbatim and are not scanned for placeholders themselves.
    ///
    /// # Errors
    /// [`ConfigErrorKind::ArgumentCountMismatch`] if `args.len()` differs
    /// from the arity, or a placeholder error for a template that was never
    /// validated.
    pub fn expand(&self, name: &str, args: &[&str]) -> Result<String, ConfigError> {
        if args.len() != self.arity {
            return Err(ConfigError::new(ConfigErrorKind::ArgumentCountMismatch {
                name: name.to_owned(),
                expected: self.arity,
                found: args.len(),
            }));
        }

        let mut out = String::with_capacity(self.template.len());
        for segment in split_template(name, &self.template)? {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Hash => out.push('#'),
                Segment::Placeholder(index) => {
                    let arg = args.get(index - 1).ok_or_else(|| {
                        ConfigError::new(ConfigErrorKind::ArityMismatch {
                            name: name.to_owned(),
                            declared: self.arity,
                            found: index,
                        })
                    })?;
                    out.push_str(arg);
                }
            }
        }
        Ok(out)
    }
}

/// A piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    /// Literal text copied as is.
    Text(&'a str),
    /// An escaped `##`, standing for a single `#`.
    Hash,
    /// A positional placeholder `#n`, 1-based.
    Placeholder(usize),
}

/// Split a template into literal runs and placeholders.
fn split_template<'a>(name: &str, template: &'a str) -> Result<Vec<Segment<'a>>, ConfigError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '#' {
            continue;
        }
        if start < i {
            segments.push(Segment::Text(&template[start..i]));
        }
        match chars.next() {
            Some((_, '#')) => segments.push(Segment::Hash),
            Some((_, digit @ '1'..='9')) => {
                let index = digit.to_digit(10).unwrap_or_default() as usize;
                segments.push(Segment::Placeholder(index));
            }
            Some((_, found)) => {
                return Err(ConfigError::new(ConfigErrorKind::InvalidPlaceholder {
                    name: name.to_owned(),
                    found,
                }));
            }
            None => {
                return Err(ConfigError::new(ConfigErrorKind::IncompletePlaceholder {
                    name: name.to_owned(),
                }));
            }
        }
        start = chars.peek().map_or(template.len(), |&(j, _)| j);
    }

    if start < template.len() {
        segments.push(Segment::Text(&template[start..]));
    }
    Ok(segments)
}

/// `{` and `}` must pair up; `\{` and `\}` are literal braces.
fn braces_balanced(template: &str) -> bool {
    let mut depth = 0usize;
    let mut escaped = false;
    for ch in template.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// A name is a control word (ASCII letters) or a control symbol (a single
/// non-alphanumeric printable character). The leading backslash is not part
/// of the name.
fn is_valid_name(name: &str) -> bool {
    match name.as_bytes() {
        [] => false,
        [single] if !single.is_ascii_alphanumeric() => single.is_ascii_graphic(),
        bytes => bytes.iter().all(u8::is_ascii_alphabetic),
    }
}
