//! Recursive descent parser from tokens to a [`LexicalUnit`] chain.
//!
//! Uses the logos-based tokenizer from [`crate::lexical::tokenizer`] and keeps
//! byte spans around so adjacency (no whitespace between two tokens) can be
//! detected, which matters for legacy IE dotted identifiers.

use crate::config::ParserConfig;
use crate::lexical::escape::unescape;
use crate::lexical::tokenizer::{tokenize, SpannedToken, Token};
use crate::lexical::unit::{LexicalUnit, Operator};

/// Errors from lexical parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexicalError {
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Parse a CSS value into its lexical units.
pub fn parse(input: &str, config: &ParserConfig) -> Result<Vec<LexicalUnit>, LexicalError> {
    let tokens = tokenize(input).map_err(|position| LexicalError::UnexpectedToken {
        position,
        message: format!("unrecognized character {:?}", input[position..].chars().next()),
    })?;

    let mut parser = Parser {
        tokens,
        cursor: 0,
        ie_compat: config.ie_compat,
    };
    parser.parse_sequence(false)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    ie_compat: bool,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_at(&self, offset: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.cursor + offset)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    /// Returns `true` if the token at `cursor + offset` immediately follows
    /// the one before it.
    fn is_adjacent_at(&self, offset: usize) -> bool {
        let index = self.cursor + offset;
        if index == 0 {
            return false;
        }
        match (self.tokens.get(index - 1), self.tokens.get(index)) {
            (Some(prev), Some(curr)) => curr.start == prev.end,
            _ => false,
        }
    }

    /// Parse units until end of input, or until `)` when inside a function or
    /// block.
    fn parse_sequence(&mut self, nested: bool) -> Result<Vec<LexicalUnit>, LexicalError> {
        let mut units = Vec::new();
        loop {
            match self.peek() {
                None if nested => {
                    return Err(LexicalError::UnexpectedEof("expected ')'".into()));
                }
                None => break,
                Some(t) if t.token == Token::ParenClose => {
                    if nested {
                        self.advance();
                        break;
                    }
                    return Err(LexicalError::UnexpectedToken {
                        position: t.start,
                        message: "unbalanced ')'".into(),
                    });
                }
                Some(_) => units.push(self.parse_unit()?),
            }
        }
        Ok(units)
    }

    fn parse_unit(&mut self) -> Result<LexicalUnit, LexicalError> {
        let tok = self
            .advance()
            .ok_or_else(|| LexicalError::UnexpectedEof("expected value".into()))?;

        match tok.token {
            Token::Number => parse_number(&tok),
            Token::Percentage => {
                let value = parse_float(&tok, &tok.text[..tok.text.len() - 1])?;
                Ok(LexicalUnit::Percentage(value))
            }
            Token::Dimension => {
                let (num, unit) = split_dimension(&tok.text).ok_or_else(|| unexpected(&tok, "invalid dimension"))?;
                let value = parse_float(&tok, num)?;
                Ok(LexicalUnit::Dimension {
                    value,
                    unit: unescape(unit),
                })
            }
            Token::Ident => {
                if self.ie_compat {
                    return self.parse_compat_chain(unescape(&tok.text));
                }
                Ok(LexicalUnit::Ident(unescape(&tok.text)))
            }
            Token::Function => {
                let name = unescape(&tok.text[..tok.text.len() - 1]);
                self.parse_function(name)
            }
            Token::Url => {
                let inner = &tok.text[4..tok.text.len() - 1];
                Ok(LexicalUnit::Url(unescape(inner.trim_matches(is_css_whitespace))))
            }
            Token::StringDouble | Token::StringSingle => {
                let quote = if tok.token == Token::StringDouble {
                    crate::config::QuoteStyle::Double
                } else {
                    crate::config::QuoteStyle::Single
                };
                Ok(LexicalUnit::String {
                    value: unescape(&tok.text[1..tok.text.len() - 1]),
                    quote,
                })
            }
            Token::Hash => Ok(LexicalUnit::Hash(unescape(&tok.text[1..]))),
            Token::UnicodeRange => Ok(LexicalUnit::UnicodeRange(tok.text[2..].to_string())),
            Token::ParenOpen => Ok(LexicalUnit::Block(self.parse_sequence(true)?)),
            Token::Comma => Ok(LexicalUnit::Operator(Operator::Comma)),
            Token::Slash => Ok(LexicalUnit::Operator(Operator::Slash)),
            Token::Plus => Ok(LexicalUnit::Operator(Operator::Plus)),
            Token::Minus => Ok(LexicalUnit::Operator(Operator::Minus)),
            Token::Star => Ok(LexicalUnit::Operator(Operator::Multiply)),
            Token::Equals => Ok(LexicalUnit::Operator(Operator::Equals)),
            Token::Colon => Ok(LexicalUnit::Operator(Operator::Colon)),
            Token::Delim if self.ie_compat => {
                let c = tok.text.chars().next().unwrap_or('?');
                Ok(LexicalUnit::Operator(Operator::Delim(c)))
            }
            Token::Delim | Token::Dot | Token::ParenClose => Err(unexpected(&tok, "unexpected delimiter")),
        }
    }

    fn parse_function(&mut self, name: String) -> Result<LexicalUnit, LexicalError> {
        // `url("...")` is the same reference as `url(...)`.
        if name.eq_ignore_ascii_case("url") {
            let is_quoted = matches!(
                self.peek().map(|t| t.token),
                Some(Token::StringDouble | Token::StringSingle)
            ) && self.peek_at(1).is_some_and(|t| t.token == Token::ParenClose);
            if is_quoted {
                let string = self.advance().map(|t| t.text).unwrap_or_default();
                self.advance();
                return Ok(LexicalUnit::Url(unescape(&string[1..string.len() - 1])));
            }
        }
        let args = self.parse_sequence(true)?;
        Ok(LexicalUnit::Function { name, args })
    }

    /// Fold `a.b.c`, `progid:A.B.c(...)` and `a.b(...)` into a single
    /// identifier or function. Only reached in IE compatibility mode.
    fn parse_compat_chain(&mut self, head: String) -> Result<LexicalUnit, LexicalError> {
        let mut name = head;
        loop {
            let sep = match self.peek() {
                Some(t) if self.is_adjacent_at(0) && matches!(t.token, Token::Dot | Token::Colon) => t.token,
                _ => break,
            };
            // `progid:` is the only place a colon joins a chain.
            if sep == Token::Colon && !name.eq_ignore_ascii_case("progid") {
                break;
            }
            let next_is_part = self
                .peek_at(1)
                .is_some_and(|t| matches!(t.token, Token::Ident | Token::Function))
                && self.is_adjacent_at(1);
            if !next_is_part {
                break;
            }
            self.advance();
            name.push(if sep == Token::Dot { '.' } else { ':' });
            let part = self
                .advance()
                .ok_or_else(|| LexicalError::UnexpectedEof("expected identifier".into()))?;
            if part.token == Token::Function {
                name.push_str(&unescape(&part.text[..part.text.len() - 1]));
                return self.parse_function(name);
            }
            name.push_str(&unescape(&part.text));
        }
        Ok(LexicalUnit::Ident(name))
    }
}

fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn unexpected(tok: &SpannedToken, message: &str) -> LexicalError {
    LexicalError::UnexpectedToken {
        position: tok.start,
        message: format!("{message}: '{}'", tok.text),
    }
}

fn parse_float(tok: &SpannedToken, text: &str) -> Result<f64, LexicalError> {
    text.parse::<f64>()
        .map_err(|_| unexpected(tok, "invalid number"))
}

fn parse_number(tok: &SpannedToken) -> Result<LexicalUnit, LexicalError> {
    if tok.text.contains('.') {
        return Ok(LexicalUnit::Real(parse_float(tok, &tok.text)?));
    }
    match tok.text.parse::<i64>() {
        Ok(n) => Ok(LexicalUnit::Integer(n)),
        Err(_) => Ok(LexicalUnit::Real(parse_float(tok, &tok.text)?)),
    }
}

/// Split a dimension string like "-1.5em" into ("-1.5", "em").
///
/// An `e` starts an exponent only when digits follow it, so "1e3px" is
/// ("1e3", "px") while "1em" is ("1", "em").
fn split_dimension(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    i = digits_from(i);
    if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        i = digits_from(i + 1);
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(i + 1), Some(b'+' | b'-')));
        if bytes.get(i + 1 + sign).is_some_and(u8::is_ascii_digit) {
            i = digits_from(i + 1 + sign);
        }
    }
    if i == 0 || i >= s.len() {
        return None;
    }
    Some((&s[..i], &s[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoteStyle;

    // ── Helper ───────────────────────────────────────────────────────

    fn lex(input: &str) -> Vec<LexicalUnit> {
        parse(input, &ParserConfig::default()).unwrap()
    }

    fn lex_compat(input: &str) -> Vec<LexicalUnit> {
        let config = ParserConfig::new().with_ie_compat(true);
        parse(input, &config).unwrap()
    }

    // ── Leaves ───────────────────────────────────────────────────────

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("3 -1.5 .25"),
            vec![
                LexicalUnit::Integer(3),
                LexicalUnit::Real(-1.5),
                LexicalUnit::Real(0.25),
            ]
        );
    }

    #[test]
    fn test_dimension_split() {
        assert_eq!(
            lex("-12.5em"),
            vec![LexicalUnit::Dimension {
                value: -12.5,
                unit: "em".into()
            }]
        );
        assert_eq!(split_dimension("10px"), Some(("10", "px")));
        assert_eq!(split_dimension("px"), None);
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(
            lex("1e3 1e3px 2.5E-2px 1em 1e2%"),
            vec![
                LexicalUnit::Real(1000.0),
                LexicalUnit::Dimension {
                    value: 1000.0,
                    unit: "px".into()
                },
                LexicalUnit::Dimension {
                    value: 0.025,
                    unit: "px".into()
                },
                LexicalUnit::Dimension {
                    value: 1.0,
                    unit: "em".into()
                },
                LexicalUnit::Percentage(100.0),
            ]
        );
        assert_eq!(split_dimension("1e+2em"), Some(("1e+2", "em")));
        assert_eq!(split_dimension("1e-x"), Some(("1", "e-x")));
    }

    #[test]
    fn test_strings_keep_quote() {
        assert_eq!(
            lex(r"'a\'b'"),
            vec![LexicalUnit::String {
                value: "a'b".into(),
                quote: QuoteStyle::Single
            }]
        );
    }

    #[test]
    fn test_url_forms_agree() {
        assert_eq!(lex("url(a.png)"), lex("url('a.png')"));
        assert_eq!(lex("URL( a.png )"), vec![LexicalUnit::Url("a.png".into())]);
    }

    #[test]
    fn test_hash_and_unicode_range() {
        assert_eq!(
            lex("#fff U+0-7F"),
            vec![
                LexicalUnit::Hash("fff".into()),
                LexicalUnit::UnicodeRange("0-7F".into()),
            ]
        );
    }

    // ── Nesting ──────────────────────────────────────────────────────

    #[test]
    fn test_nested_function() {
        let units = lex("calc((1px + 2%) * 3)");
        let LexicalUnit::Function { name, args } = &units[0] else {
            panic!("expected function, got {units:?}");
        };
        assert_eq!(name, "calc");
        assert!(matches!(args[0], LexicalUnit::Block(_)));
        assert!(args[1].is_operator(Operator::Multiply));
        assert_eq!(args[2], LexicalUnit::Integer(3));
    }

    #[test]
    fn test_unclosed_function() {
        let err = parse("rgb(1, 2", &ParserConfig::default());
        assert!(matches!(err, Err(LexicalError::UnexpectedEof(_))));
    }

    #[test]
    fn test_unbalanced_paren() {
        let err = parse("a)", &ParserConfig::default());
        assert!(matches!(err, Err(LexicalError::UnexpectedToken { position: 1, .. })));
    }

    // ── IE compatibility ─────────────────────────────────────────────

    #[test]
    fn test_dot_rejected_without_compat() {
        assert!(parse("document.body", &ParserConfig::default()).is_err());
    }

    #[test]
    fn test_dotted_chain_with_compat() {
        assert_eq!(
            lex_compat("document.body.clientWidth"),
            vec![LexicalUnit::Ident("document.body.clientWidth".into())]
        );
    }

    #[test]
    fn test_progid_function() {
        let units = lex_compat("progid:DXImageTransform.Microsoft.Alpha(Opacity=80)");
        assert_eq!(
            units,
            vec![LexicalUnit::Function {
                name: "progid:DXImageTransform.Microsoft.Alpha".into(),
                args: vec![
                    LexicalUnit::Ident("Opacity".into()),
                    LexicalUnit::Operator(Operator::Equals),
                    LexicalUnit::Integer(80),
                ],
            }]
        );
    }

    #[test]
    fn test_compat_delimiters() {
        let units = lex_compat("expression(a > b ? 1 : 2)");
        let LexicalUnit::Function { args, .. } = &units[0] else {
            panic!("expected function");
        };
        assert!(args[1].is_operator(Operator::Delim('>')));
        assert!(parse("a > b", &ParserConfig::default()).is_err());
    }
}
