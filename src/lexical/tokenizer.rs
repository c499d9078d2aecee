//! logos-based tokenizer for CSS property values.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `10px` as Dimension beats `10` as Number)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `url(a.png)` matches [`Token::Url`], not `Function` + `Ident` + ...
//! - `U+0-7F` matches [`Token::UnicodeRange`], not `Ident` + `Number`
//! - `-5px` matches [`Token::Dimension`], not `Minus` + `Dimension`
//! - `1e3` matches [`Token::Number`] (raised priority), not a dimension in `e3`

use logos::Logos;

/// CSS value token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Unicode range: `U+26`, `U+0-7F`, `U+4??`.
    #[regex(r"[uU]\+[0-9a-fA-F?]{1,6}(-[0-9a-fA-F]{1,6})?")]
    UnicodeRange,

    /// Unquoted URL: `url(image.png)`.
    #[regex(r#"[uU][rR][lL]\([ \t\n\r\f]*([^"'()\\ \t\n\r\f]|\\[^\n\r\f])*[ \t\n\r\f]*\)"#)]
    Url,

    /// Function name including the opening parenthesis: `rgb(`, `var(`.
    #[regex(r"(--|-?([a-zA-Z_]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f]))([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f])*\(")]
    Function,

    /// Percentage: `50%`, `-2.5%`, `1e2%`.
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?%")]
    Percentage,

    /// Dimension: number with unit suffix like `10px`, `1.5em`, `90deg`.
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?-?([a-zA-Z_]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f])([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f])*")]
    Dimension,

    /// Number: integer or real, possibly signed, with an optional exponent.
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?", priority = 5)]
    Number,

    /// Double-quoted string literal, escapes included.
    #[regex(r#""([^"\\\n\r\f]|\\[^\n\r\f]|\\\r?\n)*""#)]
    StringDouble,

    /// Single-quoted string literal, escapes included.
    #[regex(r"'([^'\\\n\r\f]|\\[^\n\r\f]|\\\r?\n)*'")]
    StringSingle,

    /// Hash: `#fff`, `#my-id`.
    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f])+")]
    Hash,

    /// Identifier, custom property names (`--foo`) included.
    #[regex(r"(--|-?([a-zA-Z_]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f]))([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t\n\r\f]?|\\[^0-9a-fA-F\n\r\f])*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `,`
    #[token(",")]
    Comma,

    /// `/`
    #[token("/")]
    Slash,

    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `.`
    #[token(".")]
    Dot,

    /// `=`
    #[token("=")]
    Equals,

    /// Other delimiters only meaningful inside legacy IE expressions.
    #[regex(r"[<>?!&|]")]
    Delim,
}

/// A token with its source slice and byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    /// Byte offset where this token starts in the source.
    pub start: usize,
    /// Byte offset where this token ends in the source.
    pub end: usize,
}

/// Tokenize a CSS value, keeping byte spans so callers can detect whitespace.
///
/// Returns the byte offset of the first character that fails to lex.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, usize> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    for (result, span) in lexer.spanned() {
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                text: input[span.clone()].to_string(),
                start: span.start,
                end: span.end,
            }),
            Err(()) => return Err(span.start),
        }
    }
    Ok(tokens)
}
