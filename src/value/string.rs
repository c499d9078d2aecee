//! String and identifier values.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use crate::config::{ParserConfig, QuoteStyle};
use crate::error::{CssError, Result};
use crate::lexical::escape::{write_identifier, write_string};
use crate::lexical::unit::choose_quote;
use crate::lexical::LexicalUnit;

/// A quoted string, e.g. `"Times New Roman"`.
///
/// The quote style is a serialization preference only: it takes no part in
/// equality. If the content holds the preferred quote and not the other one,
/// the other one is used.
#[derive(Debug, Clone)]
pub struct StringValue {
    content: String,
    quote: Option<QuoteStyle>,
}

impl StringValue {
    /// Create a string with no quote preference.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            quote: None,
        }
    }

    /// Create a string that prefers the given quote.
    pub fn with_quote(content: impl Into<String>, quote: QuoteStyle) -> Self {
        Self {
            content: content.into(),
            quote: Some(quote),
        }
    }

    /// Create a string that prefers the quote style configured in `config`.
    pub fn new_with(content: impl Into<String>, config: &ParserConfig) -> Self {
        Self::with_quote(content, config.quote)
    }

    /// Build a string from a lexical unit. A bare identifier is accepted and
    /// becomes a string quoted with the configured quote style.
    pub fn from_lexical(unit: &LexicalUnit, config: &ParserConfig) -> Result<Self> {
        match unit {
            LexicalUnit::String { value, quote } => Ok(Self::with_quote(value.clone(), *quote)),
            LexicalUnit::Ident(name) => Ok(Self::new_with(name.clone(), config)),
            other => Err(CssError::InvalidModification(format!(
                "expected a string, got '{other}'"
            ))),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn preferred_quote(&self) -> Option<QuoteStyle> {
        self.quote
    }

    /// Return a copy with new content and the same quote preference.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            quote: self.quote,
        }
    }

    /// The quote that will actually be written.
    pub fn effective_quote(&self) -> QuoteStyle {
        choose_quote(&self.content, self.quote.unwrap_or_default())
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        write_string(dest, &self.content, self.effective_quote())
    }
}

impl PartialEq for StringValue {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for StringValue {}

impl Hash for StringValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content.hash(state);
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f)
    }
}

/// An identifier such as `auto`, `bold` or a custom identifier.
///
/// Identifiers are case-sensitive; CSS-wide keywords are never identifiers,
/// see [`crate::value::KeywordValue`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentValue {
    name: String,
}

impl IdentValue {
    /// Create an identifier. The empty identifier is rejected.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CssError::InvalidCharacter("empty identifier".into()));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the identifier is a dotted chain, only produced by
    /// legacy IE compatibility parsing.
    pub fn is_dotted(&self) -> bool {
        self.name.contains('.')
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        write_identifier(dest, &self.name)
    }
}

impl fmt::Display for IdentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f)
    }
}
