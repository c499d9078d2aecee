//! Reference values: `element(#id)` and `env(name [index]* [, fallback])`.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use crate::error::{CssError, Result};
use crate::lexical::escape::write_identifier;
use crate::lexical::unit::{sequence_to_string, write_sequence};
use crate::lexical::{LexicalUnit, Operator};

/// `element(#id)`: an image rendered from another element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementReference {
    id: String,
}

impl ElementReference {
    /// Create a reference to the element with the given id.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self { id })
    }

    /// Build from the arguments of `element(...)`.
    pub fn from_args(args: &[LexicalUnit]) -> Result<Self> {
        match args {
            [LexicalUnit::Hash(id)] => Self::new(id.clone()),
            [LexicalUnit::String { .. }] => Err(CssError::InvalidModification(
                "element() takes an id, not a string".into(),
            )),
            _ => Err(CssError::syntax(format!(
                "element() expects '#id', got '{}'",
                sequence_to_string(args)
            ))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return a reference to another element.
    pub fn with_id(&self, id: impl Into<String>) -> Result<Self> {
        Self::new(id)
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("element(")?;
        LexicalUnit::Hash(self.id.clone()).write_css(dest, false)?;
        dest.write_char(')')
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(CssError::syntax("element() needs an id"));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(CssError::InvalidCharacter(format!(
            "element id '{id}' contains whitespace"
        )));
    }
    Ok(())
}

impl fmt::Display for ElementReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f)
    }
}

/// Environment variable prefixes defined by user agents. All of them are
/// lengths.
const KNOWN_ENV_PREFIXES: &[&str] = &[
    "safe-area-inset-",
    "safe-area-max-inset-",
    "titlebar-area-",
    "keyboard-inset-",
    "viewport-segment-",
];

/// `env(name [index]* [, fallback])`.
#[derive(Debug, Clone)]
pub struct EnvValue {
    name: String,
    indices: Vec<i32>,
    fallback: Option<Vec<LexicalUnit>>,
}

impl EnvValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: Vec::new(),
            fallback: None,
        }
    }

    /// Set the integer indices (`env(viewport-segment-width 0 1)`).
    pub fn with_indices(mut self, indices: Vec<i32>) -> Self {
        self.indices = indices;
        self
    }

    /// Set the fallback used when the variable is not defined.
    pub fn with_fallback(mut self, fallback: Vec<LexicalUnit>) -> Self {
        self.fallback = (!fallback.is_empty()).then_some(fallback);
        self
    }

    /// Build from the arguments of `env(...)`.
    pub fn from_args(args: &[LexicalUnit]) -> Result<Self> {
        let mut parts = args.splitn(2, |u| u.is_operator(Operator::Comma));
        let head = parts.next().unwrap_or_default();
        let fallback = parts.next();

        let (name, index_units) = match head.split_first() {
            Some((LexicalUnit::Ident(name), rest)) => (name.clone(), rest),
            _ => return Err(CssError::syntax("env() needs a variable name")),
        };
        let indices = index_units
            .iter()
            .map(|u| match u {
                LexicalUnit::Integer(n) => i32::try_from(*n)
                    .map_err(|_| CssError::syntax(format!("env() index {n} out of range"))),
                other => Err(CssError::syntax(format!("invalid env() index '{other}'"))),
            })
            .collect::<Result<Vec<_>>>()?;

        if fallback.is_some_and(<[LexicalUnit]>::is_empty) {
            return Err(CssError::syntax("env() has an empty fallback"));
        }
        Ok(Self {
            name,
            indices,
            fallback: fallback.map(<[LexicalUnit]>::to_vec),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    pub fn fallback(&self) -> Option<&[LexicalUnit]> {
        self.fallback.as_deref()
    }

    /// Returns `true` if the variable is one the user agent defines, whose
    /// type is statically a `<length>`.
    pub fn is_known(&self) -> bool {
        let lower = self.name.to_ascii_lowercase();
        KNOWN_ENV_PREFIXES
            .iter()
            .any(|prefix| lower.len() > prefix.len() && lower.starts_with(prefix))
    }

    fn fallback_text(&self) -> Option<String> {
        self.fallback.as_deref().map(sequence_to_string)
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        dest.write_str("env(")?;
        write_identifier(dest, &self.name)?;
        for index in &self.indices {
            write!(dest, " {index}")?;
        }
        if let Some(fallback) = &self.fallback {
            dest.write_str(if minify { "," } else { ", " })?;
            write_sequence(dest, fallback, minify)?;
        }
        dest.write_char(')')
    }
}

impl PartialEq for EnvValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.indices == other.indices
            && self.fallback_text() == other.fallback_text()
    }
}

impl Eq for EnvValue {}

impl Hash for EnvValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.indices.hash(state);
        self.fallback_text().hash(state);
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}
