//! CSS escape handling: decoding escapes in source text and re-escaping
//! identifiers and strings on output.

use std::fmt::{self, Write};

use crate::config::QuoteStyle;

const REPLACEMENT: char = '\u{FFFD}';

/// Decode CSS escapes (`\41 `, `\"`, escaped newlines) in a token body.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            None => out.push(REPLACEMENT),
            Some(h) if h.is_ascii_hexdigit() => {
                let mut code: u32 = 0;
                let mut digits = 0;
                while digits < 6 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            digits += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                // One whitespace character terminates a hex escape.
                if chars.peek().is_some_and(|w| matches!(w, ' ' | '\t' | '\n' | '\r' | '\x0c')) {
                    chars.next();
                }
                let decoded = match code {
                    0 => REPLACEMENT,
                    _ => char::from_u32(code).unwrap_or(REPLACEMENT),
                };
                out.push(decoded);
            }
            Some('\n') | Some('\x0c') => {
                chars.next();
            }
            Some('\r') => {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(other) => {
                chars.next();
                out.push(other);
            }
        }
    }

    out
}

fn write_hex_escape<W: Write>(dest: &mut W, c: char) -> fmt::Result {
    write!(dest, "\\{:x} ", c as u32)
}

/// Serialize an identifier, escaping whatever would not re-tokenize as the
/// same identifier.
pub fn write_identifier<W: Write>(dest: &mut W, ident: &str) -> fmt::Result {
    write_identifier_with(dest, ident, false)
}

/// Like [`write_identifier`], but leaves `.` and `:` unescaped so legacy IE
/// filter names (`progid:DXImageTransform.Microsoft.Alpha`) are written as IE
/// expects them.
pub fn write_identifier_with<W: Write>(dest: &mut W, ident: &str, allow_dots: bool) -> fmt::Result {
    if ident == "-" {
        return dest.write_str("\\-");
    }
    let first = ident.chars().next();
    for (i, c) in ident.chars().enumerate() {
        match c {
            '\0' => dest.write_char(REPLACEMENT)?,
            '\u{1}'..='\u{1f}' | '\u{7f}' => write_hex_escape(dest, c)?,
            '0'..='9' if i == 0 => write_hex_escape(dest, c)?,
            '0'..='9' if i == 1 && first == Some('-') => write_hex_escape(dest, c)?,
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => dest.write_char(c)?,
            '.' | ':' if allow_dots => dest.write_char(c)?,
            c if (c as u32) >= 0x80 => dest.write_char(c)?,
            c => {
                dest.write_char('\\')?;
                dest.write_char(c)?;
            }
        }
    }
    Ok(())
}

/// Serialize string content between the given quotes.
pub fn write_string<W: Write>(dest: &mut W, content: &str, quote: QuoteStyle) -> fmt::Result {
    let q = quote.as_char();
    dest.write_char(q)?;
    for c in content.chars() {
        match c {
            '\0' => dest.write_char(REPLACEMENT)?,
            '\u{1}'..='\u{1f}' | '\u{7f}' => write_hex_escape(dest, c)?,
            '\\' => dest.write_str("\\\\")?,
            c if c == q => {
                dest.write_char('\\')?;
                dest.write_char(c)?;
            }
            c => dest.write_char(c)?,
        }
    }
    dest.write_char(q)
}

/// Returns the identifier as serialized text.
pub fn identifier_to_string(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    // Writing into a String cannot fail.
    let _ = write_identifier(&mut out, ident);
    out
}
