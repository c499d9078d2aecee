//! `unicode-range` values: `U+26`, `U+0-7F`, `U+4??`.

use std::fmt::{self, Write};

use crate::error::{CssError, Result};

const MAX_CODE_POINT: u32 = 0x10FFFF;

/// A unicode range.
///
/// Wildcard and explicit forms are different variants: a wildcard can only be
/// updated with another wildcard, an explicit range only with code points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnicodeRangeValue {
    /// `U+26`
    Single(u32),
    /// `U+0-7F`
    Range(u32, u32),
    /// `U+4??`, pattern stored lowercase without `U+`.
    Wildcard(String),
}

impl UnicodeRangeValue {
    /// Parse the text following `U+`.
    pub fn parse(text: &str) -> Result<Self> {
        if text.contains('?') {
            return validate_wildcard(text).map(UnicodeRangeValue::Wildcard);
        }
        parse_explicit(text)
    }

    /// Parse full CSS text such as `U+0-7F`. Empty text is an access error:
    /// a range cannot be cleared.
    pub fn from_css_text(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CssError::InvalidAccess(
                "a unicode range cannot be empty".into(),
            ));
        }
        let rest = text
            .strip_prefix("U+")
            .or_else(|| text.strip_prefix("u+"))
            .ok_or_else(|| CssError::syntax(format!("not a unicode range: '{text}'")))?;
        Self::parse(rest)
    }

    /// Replace the wildcard pattern (text after `U+`).
    pub fn with_wildcard(&self, pattern: &str) -> Result<Self> {
        if !matches!(self, UnicodeRangeValue::Wildcard(_)) {
            return Err(CssError::InvalidModification(format!(
                "'{self}' is not a wildcard range"
            )));
        }
        if pattern.is_empty() {
            return Err(CssError::InvalidCharacter("empty wildcard".into()));
        }
        if !pattern.contains('?') {
            return Err(CssError::syntax(format!("'{pattern}' is not a wildcard")));
        }
        validate_wildcard(pattern).map(UnicodeRangeValue::Wildcard)
    }

    /// Replace the code points of an explicit range.
    pub fn with_range(&self, low: u32, high: u32) -> Result<Self> {
        if matches!(self, UnicodeRangeValue::Wildcard(_)) {
            return Err(CssError::InvalidModification(format!(
                "'{self}' is a wildcard range"
            )));
        }
        check_bounds(low, high)?;
        Ok(if low == high {
            UnicodeRangeValue::Single(low)
        } else {
            UnicodeRangeValue::Range(low, high)
        })
    }

    /// The inclusive code point interval covered.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            UnicodeRangeValue::Single(cp) => (*cp, *cp),
            UnicodeRangeValue::Range(low, high) => (*low, *high),
            UnicodeRangeValue::Wildcard(pattern) => {
                let low = u32::from_str_radix(&pattern.replace('?', "0"), 16).unwrap_or(0);
                let high = u32::from_str_radix(&pattern.replace('?', "f"), 16)
                    .unwrap_or(MAX_CODE_POINT);
                (low, high.min(MAX_CODE_POINT))
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, UnicodeRangeValue::Wildcard(_))
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            UnicodeRangeValue::Single(cp) => write!(dest, "U+{cp:x}"),
            UnicodeRangeValue::Range(low, high) => write!(dest, "U+{low:x}-{high:x}"),
            UnicodeRangeValue::Wildcard(pattern) => write!(dest, "U+{pattern}"),
        }
    }
}

impl fmt::Display for UnicodeRangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f)
    }
}

fn parse_hex(text: &str) -> Result<u32> {
    if text.is_empty() || text.len() > 6 || !text.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CssError::syntax(format!("invalid code point '{text}'")));
    }
    u32::from_str_radix(text, 16).map_err(|e| CssError::syntax(e.to_string()))
}

fn check_bounds(low: u32, high: u32) -> Result<()> {
    if high > MAX_CODE_POINT {
        return Err(CssError::syntax(format!("code point {high:x} out of range")));
    }
    if low > high {
        return Err(CssError::syntax(format!("inverted range {low:x}-{high:x}")));
    }
    Ok(())
}

fn parse_explicit(text: &str) -> Result<UnicodeRangeValue> {
    match text.split_once('-') {
        Some((low, high)) => {
            let (low, high) = (parse_hex(low)?, parse_hex(high)?);
            check_bounds(low, high)?;
            Ok(UnicodeRangeValue::Range(low, high))
        }
        None => {
            let cp = parse_hex(text)?;
            check_bounds(cp, cp)?;
            Ok(UnicodeRangeValue::Single(cp))
        }
    }
}

/// Hex digits followed only by `?`, at most six characters in total.
fn validate_wildcard(pattern: &str) -> Result<String> {
    let digits = pattern.trim_end_matches('?');
    let valid = !pattern.is_empty()
        && pattern.len() <= 6
        && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(CssError::syntax(format!("malformed wildcard '{pattern}'")));
    }
    Ok(pattern.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn range(text: &str) -> UnicodeRangeValue {
        UnicodeRangeValue::parse(text).unwrap()
    }

    #[test]
    fn test_forms() {
        assert_eq!(range("26"), UnicodeRangeValue::Single(0x26));
        assert_eq!(range("0-7F"), UnicodeRangeValue::Range(0, 0x7f));
        assert_eq!(range("4??"), UnicodeRangeValue::Wildcard("4??".into()));
    }

    #[test]
    fn test_serialization_lowercase() {
        assert_eq!(range("0-7F").to_string(), "U+0-7f");
        assert_eq!(range("A??").to_string(), "U+a??");
    }

    #[test]
    fn test_wildcard_bounds() {
        assert_eq!(range("4??").bounds(), (0x400, 0x4ff));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(UnicodeRangeValue::parse("?4").map_err(|e| e.kind()), Err(ErrorKind::Syntax));
        assert_eq!(UnicodeRangeValue::parse("7F-0").map_err(|e| e.kind()), Err(ErrorKind::Syntax));
        assert_eq!(UnicodeRangeValue::parse("110000").map_err(|e| e.kind()), Err(ErrorKind::Syntax));
    }

    #[test]
    fn test_with_wildcard_errors() {
        let wild = range("4??");
        assert_eq!(wild.with_wildcard("").map_err(|e| e.kind()), Err(ErrorKind::InvalidCharacter));
        assert_eq!(wild.with_wildcard("4?x").map_err(|e| e.kind()), Err(ErrorKind::Syntax));
        assert_eq!(wild.with_wildcard("5?").ok(), Some(range("5?")));

        let explicit = range("0-7F");
        assert_eq!(
            explicit.with_wildcard("5?").map_err(|e| e.kind()),
            Err(ErrorKind::InvalidModification)
        );
    }

    #[test]
    fn test_with_range() {
        let explicit = range("26");
        assert_eq!(explicit.with_range(0x20, 0x20).ok(), Some(UnicodeRangeValue::Single(0x20)));
        assert_eq!(explicit.with_range(0x20, 0x7e).ok(), Some(UnicodeRangeValue::Range(0x20, 0x7e)));
        assert_eq!(
            range("4??").with_range(1, 2).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidModification)
        );
    }

    #[test]
    fn test_empty_css_text() {
        assert_eq!(
            UnicodeRangeValue::from_css_text("").map_err(|e| e.kind()),
            Err(ErrorKind::InvalidAccess)
        );
        assert_eq!(UnicodeRangeValue::from_css_text("u+1f600").ok(), Some(range("1F600")));
    }
}
