//! The value model: every kind of CSS property value as one closed enum.
//!
//! Values are built from lexical units by [`ValueFactory`], serialize to
//! canonical text through `Display` and to minified text through
//! [`Value::minified_css_text`], and compare structurally.

pub mod color;
pub mod expression;
pub mod factory;
pub mod function;
pub mod keyword;
pub mod list;
pub mod numeric;
pub mod proxy;
pub mod reference;
pub mod shape;
pub mod string;
pub mod unicode_range;
pub mod url;

use std::fmt::{self, Write};

pub use color::ColorValue;
pub use expression::ExpressionValue;
pub use factory::ValueFactory;
pub use function::{FunctionKind, FunctionValue};
pub use keyword::{CssWideKeyword, KeywordValue};
pub use list::{Separator, ValueList};
pub use numeric::{CssUnit, NumericValue, UnitCategory};
pub use proxy::ProxyValue;
pub use reference::{ElementReference, EnvValue};
pub use shape::{FillRule, PathValue, RectValue};
pub use string::{IdentValue, StringValue};
pub use unicode_range::UnicodeRangeValue;
pub use url::UrlValue;

use crate::config::ParserConfig;
use crate::error::{CssError, Result};

/// Broad classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// A single value of a known kind.
    Typed,
    List,
    /// Kind unknown until a substitution is resolved.
    Proxy,
}

/// The kind tag of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Percentage,
    Dimension,
    String,
    Ident,
    Url,
    Color,
    UnicodeRange,
    Element,
    Env,
    Path,
    Rect,
    Function,
    Expression,
    Keyword,
    List,
    Proxy,
}

/// Serialization options threaded through nested values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Format {
    pub(crate) minify: bool,
    /// Legacy IE functions keep their canonical spacing (owning property is
    /// `filter` or `-ms-filter`).
    pub(crate) keep_ie_spacing: bool,
}

impl Format {
    pub(crate) const CANONICAL: Format = Format {
        minify: false,
        keep_ie_spacing: false,
    };

    pub(crate) const MINIFIED: Format = Format {
        minify: true,
        keep_ie_spacing: false,
    };

    pub(crate) fn keeping_ie_spacing(self) -> Format {
        Format {
            keep_ie_spacing: true,
            ..self
        }
    }
}

/// A CSS value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Numeric(NumericValue),
    String(StringValue),
    Ident(IdentValue),
    Url(UrlValue),
    Color(ColorValue),
    UnicodeRange(UnicodeRangeValue),
    Element(ElementReference),
    Env(EnvValue),
    Path(PathValue),
    Rect(RectValue),
    Function(FunctionValue),
    Expression(ExpressionValue),
    /// A CSS-wide keyword; shared, so clones point at the same instance.
    Keyword(&'static KeywordValue),
    List(ValueList),
    Proxy(ProxyValue),
}

impl Value {
    /// Parse `text` with the default configuration.
    pub fn parse(text: &str) -> Result<Value> {
        Self::parse_with(text, &ParserConfig::default())
    }

    /// Parse `text` with the given configuration.
    pub fn parse_with(text: &str, config: &ParserConfig) -> Result<Value> {
        ValueFactory::new(config.clone()).parse(text)
    }

    pub fn category(&self) -> ValueCategory {
        match self {
            Value::List(_) => ValueCategory::List,
            Value::Proxy(_) => ValueCategory::Proxy,
            _ => ValueCategory::Typed,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Numeric(n) => match n.unit() {
                CssUnit::Number => ValueKind::Number,
                CssUnit::Percent => ValueKind::Percentage,
                _ => ValueKind::Dimension,
            },
            Value::String(_) => ValueKind::String,
            Value::Ident(_) => ValueKind::Ident,
            Value::Url(_) => ValueKind::Url,
            Value::Color(_) => ValueKind::Color,
            Value::UnicodeRange(_) => ValueKind::UnicodeRange,
            Value::Element(_) => ValueKind::Element,
            Value::Env(_) => ValueKind::Env,
            Value::Path(_) => ValueKind::Path,
            Value::Rect(_) => ValueKind::Rect,
            Value::Function(_) => ValueKind::Function,
            Value::Expression(_) => ValueKind::Expression,
            Value::Keyword(_) => ValueKind::Keyword,
            Value::List(_) => ValueKind::List,
            Value::Proxy(_) => ValueKind::Proxy,
        }
    }

    /// The list, if this value is one.
    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns `true` if this is the given CSS-wide keyword.
    pub fn is_keyword(&self, keyword: CssWideKeyword) -> bool {
        matches!(self, Value::Keyword(k) if k.keyword() == keyword)
    }

    /// Text without optional whitespace.
    pub fn minified_css_text(&self) -> String {
        let mut out = String::new();
        let _ = self.write_to(&mut out, Format::MINIFIED);
        out
    }

    /// Minified text for a value owned by `property`. Legacy IE functions
    /// under `filter` and `-ms-filter` keep their spacing.
    pub fn minified_css_text_for(&self, property: &str) -> String {
        let mut format = Format::MINIFIED;
        if property.eq_ignore_ascii_case("filter") || property.eq_ignore_ascii_case("-ms-filter") {
            format = format.keeping_ie_spacing();
        }
        let mut out = String::new();
        let _ = self.write_to(&mut out, format);
        out
    }

    /// Parse `text` as a replacement for this value. The replacement must be
    /// of the same kind.
    pub fn with_css_text(&self, text: &str, config: &ParserConfig) -> Result<Value> {
        if text.trim().is_empty() {
            return match self {
                Value::UnicodeRange(_) => Err(CssError::InvalidAccess(
                    "a unicode range cannot be empty".into(),
                )),
                Value::List(list) => Ok(Value::List(ValueList::empty(list.separator()))),
                _ => Err(CssError::syntax("empty value")),
            };
        }

        let replacement = match (self, Value::parse_with(text, config)?) {
            (Value::String(_), Value::Ident(ident)) => {
                Value::String(StringValue::new_with(ident.name(), config))
            }
            (_, replacement) => replacement,
        };
        if replacement.kind() != self.kind() {
            return Err(CssError::InvalidModification(format!(
                "cannot replace a {:?} value with '{replacement}' ({:?})",
                self.kind(),
                replacement.kind()
            )));
        }
        if let (Value::UnicodeRange(old), Value::UnicodeRange(new)) = (self, &replacement) {
            if old.is_wildcard() != new.is_wildcard() {
                return Err(CssError::InvalidModification(format!(
                    "cannot replace '{old}' with '{new}'"
                )));
            }
        }
        Ok(replacement)
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        let format = if minify { Format::MINIFIED } else { Format::CANONICAL };
        self.write_to(dest, format)
    }

    pub(crate) fn write_to<W: Write>(&self, dest: &mut W, format: Format) -> fmt::Result {
        let minify = format.minify;
        match self {
            Value::Numeric(v) => v.write_css(dest, minify),
            Value::String(v) => v.write_css(dest),
            Value::Ident(v) => v.write_css(dest),
            Value::Url(v) => v.write_css(dest, minify),
            Value::Color(v) => v.write_css(dest, minify),
            Value::UnicodeRange(v) => v.write_css(dest),
            Value::Element(v) => v.write_css(dest),
            Value::Env(v) => v.write_css(dest, minify),
            Value::Path(v) => v.write_css(dest, minify),
            Value::Rect(v) => v.write_css(dest, minify),
            Value::Function(v) => v.write_to(dest, format),
            Value::Expression(v) => v.write_css(dest, minify),
            Value::Keyword(v) => dest.write_str(v.name()),
            Value::List(v) => v.write_to(dest, format),
            Value::Proxy(v) => v.write_css(dest, minify),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, Format::CANONICAL)
    }
}
