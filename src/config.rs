//! Parser configuration: compatibility mode, quote preference, base URL.

use std::fmt;

/// The quote character used when serializing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStyle {
    /// `"..."`
    #[default]
    Double,
    /// `'...'`
    Single,
}

impl QuoteStyle {
    /// The quote character itself.
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }

    /// The opposite quote style.
    pub fn other(self) -> Self {
        match self {
            QuoteStyle::Double => QuoteStyle::Single,
            QuoteStyle::Single => QuoteStyle::Double,
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// ParserConfig
// ---------------------------------------------------------------------------

/// Configuration for turning text or lexical units into values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserConfig {
    /// Accept legacy IE functions (`expression()`, `eval()`, `progid:`) and
    /// dotted identifier chains.
    pub ie_compat: bool,
    /// Quote style given to strings that carry no preference of their own.
    pub quote: QuoteStyle,
    /// Base URL attached to every parsed `url()` value.
    pub base_url: Option<String>,
}

impl ParserConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable IE compatibility (builder).
    pub fn with_ie_compat(mut self, enabled: bool) -> Self {
        self.ie_compat = enabled;
        self
    }

    /// Set the default quote style (builder).
    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }

    /// Set the base URL (builder).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }
}
