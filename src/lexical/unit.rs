//! The lexical-unit tree: typed tokens with nested functions and blocks.

use std::fmt::{self, Write};

use crate::config::QuoteStyle;
use crate::lexical::escape::{write_identifier, write_identifier_with, write_string};
use crate::value::numeric::write_number;

/// An operator or delimiter between lexical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `=` (legacy IE filters).
    Equals,
    /// `:` (legacy IE filters).
    Colon,
    /// Any other single-character delimiter (legacy IE expressions).
    Delim(char),
}

/// A single node of a parsed CSS value.
#[derive(Debug, Clone, PartialEq)]
pub enum LexicalUnit {
    /// An integer literal like `3`.
    Integer(i64),
    /// A real literal like `1.5`.
    Real(f64),
    /// A number with a unit suffix like `12em`. The unit is unescaped.
    Dimension { value: f64, unit: String },
    /// A percentage like `18.1%`.
    Percentage(f64),
    /// An identifier (unescaped).
    Ident(String),
    /// A quoted string (unescaped) with the quote it was written with.
    String { value: String, quote: QuoteStyle },
    /// A `url()` reference, quoted or not.
    Url(String),
    /// A hash token like `#fff` (without the `#`).
    Hash(String),
    /// A unicode range, the text after `U+`.
    UnicodeRange(String),
    /// A function with its argument units.
    Function { name: String, args: Vec<LexicalUnit> },
    /// A parenthesised group.
    Block(Vec<LexicalUnit>),
    /// An operator or delimiter.
    Operator(Operator),
}

impl LexicalUnit {
    /// Returns `true` if this unit is the given operator.
    pub fn is_operator(&self, op: Operator) -> bool {
        matches!(self, LexicalUnit::Operator(o) if *o == op)
    }

    /// Returns the function name if this is a function.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            LexicalUnit::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if this unit is, or contains, a `var()`, `attr()` or
    /// `env()` reference.
    pub fn contains_substitution(&self) -> bool {
        match self {
            LexicalUnit::Function { name, args } => {
                is_substitution_name(name) || args.iter().any(LexicalUnit::contains_substitution)
            }
            LexicalUnit::Block(args) => args.iter().any(LexicalUnit::contains_substitution),
            _ => false,
        }
    }

    /// Returns `true` if this unit is, or contains, a `var()` or `attr()`
    /// reference. `env()` is excluded since it has a value kind of its own.
    pub fn contains_var_or_attr(&self) -> bool {
        match self {
            LexicalUnit::Function { name, args } => {
                name.eq_ignore_ascii_case("var")
                    || name.eq_ignore_ascii_case("attr")
                    || args.iter().any(LexicalUnit::contains_var_or_attr)
            }
            LexicalUnit::Block(args) => args.iter().any(LexicalUnit::contains_var_or_attr),
            _ => false,
        }
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        match self {
            LexicalUnit::Integer(n) => write!(dest, "{n}"),
            LexicalUnit::Real(v) => write_number(dest, *v, minify),
            LexicalUnit::Dimension { value, unit } => {
                write_number(dest, *value, minify)?;
                write_identifier(dest, unit)
            }
            LexicalUnit::Percentage(v) => {
                write_number(dest, *v, minify)?;
                dest.write_char('%')
            }
            LexicalUnit::Ident(name) => write_identifier(dest, name),
            LexicalUnit::String { value, quote } => {
                write_string(dest, value, choose_quote(value, *quote))
            }
            LexicalUnit::Url(href) => write_url(dest, href),
            LexicalUnit::Hash(name) => {
                dest.write_char('#')?;
                for c in name.chars() {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c as u32) >= 0x80 {
                        dest.write_char(c)?;
                    } else {
                        dest.write_char('\\')?;
                        dest.write_char(c)?;
                    }
                }
                Ok(())
            }
            LexicalUnit::UnicodeRange(range) => write!(dest, "U+{}", range.to_ascii_lowercase()),
            LexicalUnit::Function { name, args } => {
                if is_progid(name) {
                    write_identifier_with(dest, name, true)?;
                } else {
                    write_identifier(dest, name)?;
                }
                dest.write_char('(')?;
                write_sequence(dest, args, minify)?;
                dest.write_char(')')
            }
            LexicalUnit::Block(args) => {
                dest.write_char('(')?;
                write_sequence(dest, args, minify)?;
                dest.write_char(')')
            }
            LexicalUnit::Operator(op) => dest.write_str(match op {
                Operator::Comma => ",",
                Operator::Slash => "/",
                Operator::Plus => "+",
                Operator::Minus => "-",
                Operator::Multiply => "*",
                Operator::Equals => "=",
                Operator::Colon => ":",
                Operator::Delim(c) => return dest.write_char(*c),
            }),
        }
    }

    /// Minified text of this unit.
    pub fn minified_css_text(&self) -> String {
        let mut out = String::new();
        let _ = self.write_css(&mut out, true);
        out
    }
}

impl fmt::Display for LexicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

/// Legacy IE filter functions are written verbatim: `progid:A.B.c(...)`.
pub(crate) fn is_progid(name: &str) -> bool {
    name.len() > 7 && name.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("progid:"))
}

fn is_substitution_name(name: &str) -> bool {
    ["var", "attr", "env"]
        .iter()
        .any(|n| name.eq_ignore_ascii_case(n))
}

/// Pick the quote for `content`: the preferred one unless the content holds
/// that quote and not the other.
pub(crate) fn choose_quote(content: &str, preferred: QuoteStyle) -> QuoteStyle {
    let other = preferred.other();
    if content.contains(preferred.as_char()) && !content.contains(other.as_char()) {
        other
    } else {
        preferred
    }
}

/// Write `url(...)`, quoting the reference when it would not survive
/// unquoted.
pub(crate) fn write_url<W: Write>(dest: &mut W, href: &str) -> fmt::Result {
    let needs_quotes = href.is_empty()
        || href
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')' | '\\') || c.is_control());
    dest.write_str("url(")?;
    if needs_quotes {
        write_string(dest, href, choose_quote(href, QuoteStyle::Double))?;
    } else {
        dest.write_str(href)?;
    }
    dest.write_char(')')
}

/// Serialize a unit sequence, placing whitespace the way CSS expects it.
pub(crate) fn write_sequence<W: Write>(dest: &mut W, units: &[LexicalUnit], minify: bool) -> fmt::Result {
    let mut prev: Option<&LexicalUnit> = None;
    for unit in units {
        if let Some(p) = prev {
            let sep = separator_between(p, unit, minify);
            dest.write_str(sep)?;
        }
        unit.write_css(dest, minify)?;
        prev = Some(unit);
    }
    Ok(())
}

fn separator_between(prev: &LexicalUnit, next: &LexicalUnit, minify: bool) -> &'static str {
    use LexicalUnit::Operator as Op;
    match (prev, next) {
        (_, Op(Operator::Comma)) => "",
        (Op(Operator::Comma), _) => {
            if minify {
                ""
            } else {
                " "
            }
        }
        (Op(Operator::Equals | Operator::Colon), _) | (_, Op(Operator::Equals | Operator::Colon)) => "",
        (Op(Operator::Slash | Operator::Multiply), _) | (_, Op(Operator::Slash | Operator::Multiply)) => {
            if minify {
                ""
            } else {
                " "
            }
        }
        // `+` and `-` stay whitespace-delimited, calc() requires it.
        _ => " ",
    }
}

/// Split a unit sequence on a top-level operator.
pub fn split_on(units: &[LexicalUnit], op: Operator) -> Vec<&[LexicalUnit]> {
    units.split(|u| u.is_operator(op)).collect()
}

/// Serialize a unit sequence to canonical text.
pub fn sequence_to_string(units: &[LexicalUnit]) -> String {
    let mut out = String::new();
    let _ = write_sequence(&mut out, units, false);
    out
}

/// Serialize a unit sequence to minified text.
pub fn sequence_to_minified_string(units: &[LexicalUnit]) -> String {
    let mut out = String::new();
    let _ = write_sequence(&mut out, units, true);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> LexicalUnit {
        LexicalUnit::Ident(s.into())
    }

    #[test]
    fn test_function_serialization() {
        let var = LexicalUnit::Function {
            name: "var".into(),
            args: vec![
                ident("--x"),
                LexicalUnit::Operator(Operator::Comma),
                LexicalUnit::Dimension { value: 0.5, unit: "em".into() },
            ],
        };
        assert_eq!(var.to_string(), "var(--x, 0.5em)");
        assert_eq!(var.minified_css_text(), "var(--x,.5em)");
    }

    #[test]
    fn test_plus_keeps_spaces_when_minified() {
        let units = vec![
            LexicalUnit::Percentage(10.0),
            LexicalUnit::Operator(Operator::Plus),
            LexicalUnit::Integer(2),
        ];
        assert_eq!(sequence_to_minified_string(&units), "10% + 2");
    }

    #[test]
    fn test_contains_substitution() {
        let nested = LexicalUnit::Function {
            name: "rgb".into(),
            args: vec![LexicalUnit::Function { name: "VAR".into(), args: vec![ident("--r")] }],
        };
        assert!(nested.contains_substitution());
        assert!(nested.contains_var_or_attr());
        let env = LexicalUnit::Function { name: "env".into(), args: vec![ident("foo")] };
        assert!(env.contains_substitution());
        assert!(!env.contains_var_or_attr());
        assert!(!ident("var").contains_substitution());
    }

    #[test]
    fn test_choose_quote() {
        assert_eq!(choose_quote("it's", QuoteStyle::Single), QuoteStyle::Double);
        assert_eq!(choose_quote("say \"x\" it's", QuoteStyle::Single), QuoteStyle::Single);
        assert_eq!(choose_quote("plain", QuoteStyle::Double), QuoteStyle::Double);
    }

    #[test]
    fn test_url_quoting() {
        let mut out = String::new();
        write_url(&mut out, "a b.png").unwrap();
        assert_eq!(out, "url(\"a b.png\")");
        out.clear();
        write_url(&mut out, "a.png").unwrap();
        assert_eq!(out, "url(a.png)");
    }

    #[test]
    fn test_split_on_comma() {
        let units = vec![
            ident("a"),
            LexicalUnit::Operator(Operator::Comma),
            ident("b"),
            ident("c"),
        ];
        let parts = split_on(&units, Operator::Comma);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].len(), 2);
    }
}
