//! Shape values: `path()` and `rect()`.

use std::fmt::{self, Write};

use crate::config::QuoteStyle;
use crate::error::{CssError, Result};
use crate::lexical::escape::write_string;
use crate::lexical::unit::choose_quote;
use crate::lexical::{LexicalUnit, Operator};
use crate::value::numeric::UnitCategory;
use crate::value::Value;

/// The `fill-rule` of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

impl FillRule {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("nonzero") {
            Some(FillRule::Nonzero)
        } else if name.eq_ignore_ascii_case("evenodd") {
            Some(FillRule::Evenodd)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FillRule::Nonzero => "nonzero",
            FillRule::Evenodd => "evenodd",
        }
    }
}

/// `path([<fill-rule>,] <string>)`.
///
/// An absent fill rule behaves as `nonzero` but is kept absent, so
/// `path("M0 0")` and `path(nonzero, "M0 0")` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathValue {
    fill_rule: Option<FillRule>,
    data: String,
}

impl PathValue {
    pub fn new(fill_rule: Option<FillRule>, data: impl Into<String>) -> Result<Self> {
        let data = data.into();
        if data.trim().is_empty() {
            return Err(CssError::syntax("path() data is empty"));
        }
        Ok(Self { fill_rule, data })
    }

    /// Build from the arguments of `path(...)`.
    pub fn from_args(args: &[LexicalUnit]) -> Result<Self> {
        match args {
            [LexicalUnit::String { value, .. }] => Self::new(None, value.clone()),
            [LexicalUnit::Ident(rule), LexicalUnit::Operator(Operator::Comma), LexicalUnit::String { value, .. }] => {
                let rule = FillRule::from_name(rule)
                    .ok_or_else(|| CssError::syntax(format!("unknown fill rule '{rule}'")))?;
                Self::new(Some(rule), value.clone())
            }
            _ => Err(CssError::syntax("path() expects [<fill-rule>,] <string>")),
        }
    }

    pub fn fill_rule(&self) -> Option<FillRule> {
        self.fill_rule
    }

    /// The fill rule in effect, `nonzero` when none was given.
    pub fn effective_fill_rule(&self) -> FillRule {
        self.fill_rule.unwrap_or_default()
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn with_fill_rule(&self, fill_rule: Option<FillRule>) -> Self {
        Self {
            fill_rule,
            data: self.data.clone(),
        }
    }

    pub fn with_data(&self, data: impl Into<String>) -> Result<Self> {
        Self::new(self.fill_rule, data)
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        dest.write_str("path(")?;
        if let Some(rule) = self.fill_rule {
            dest.write_str(rule.name())?;
            dest.write_str(if minify { "," } else { ", " })?;
        }
        write_string(dest, &self.data, choose_quote(&self.data, QuoteStyle::Double))?;
        dest.write_char(')')
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

/// `rect(top right bottom left)`, also accepted in the legacy comma form.
///
/// Sides are lengths, percentages, `auto` or math expressions. Both forms
/// serialize with commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RectValue {
    sides: Box<[Value; 4]>,
}

impl RectValue {
    pub fn new(top: Value, right: Value, bottom: Value, left: Value) -> Result<Self> {
        let sides = [top, right, bottom, left];
        if let Some(bad) = sides.iter().find(|side| !is_side(side)) {
            return Err(CssError::syntax(format!("invalid rect() side '{bad}'")));
        }
        Ok(Self {
            sides: Box::new(sides),
        })
    }

    /// Build from the four side values in order.
    pub fn from_sides(sides: Vec<Value>) -> Result<Self> {
        let count = sides.len();
        let [top, right, bottom, left]: [Value; 4] = sides
            .try_into()
            .map_err(|_| CssError::syntax(format!("rect() needs 4 sides, got {count}")))?;
        Self::new(top, right, bottom, left)
    }

    /// Side `index` (0 = top, clockwise). Indices above 3 have no side.
    pub fn side(&self, index: usize) -> Option<&Value> {
        self.sides.get(index)
    }

    /// Return a copy with side `index` replaced. Indices above 3 are
    /// ignored.
    pub fn with_side(&self, index: usize, value: Value) -> Result<Self> {
        if !is_side(&value) {
            return Err(CssError::syntax(format!("invalid rect() side '{value}'")));
        }
        let mut sides = self.sides.clone();
        if let Some(slot) = sides.get_mut(index) {
            *slot = value;
        }
        Ok(Self { sides })
    }

    pub fn sides(&self) -> &[Value; 4] {
        &self.sides
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        dest.write_str("rect(")?;
        for (i, side) in self.sides.iter().enumerate() {
            if i > 0 {
                dest.write_str(if minify { "," } else { ", " })?;
            }
            side.write_css(dest, minify)?;
        }
        dest.write_char(')')
    }
}

fn is_side(value: &Value) -> bool {
    match value {
        Value::Numeric(n) => {
            matches!(n.unit().category(), UnitCategory::Length | UnitCategory::Percentage) || n.is_zero()
        }
        Value::Expression(_) => true,
        Value::Ident(ident) => ident.name().eq_ignore_ascii_case("auto"),
        _ => false,
    }
}

impl fmt::Display for RectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::numeric::NumericValue;

    fn px(v: f64) -> Value {
        Value::Numeric(NumericValue::dimension(v, "px"))
    }

    fn em(v: f64) -> Value {
        Value::Numeric(NumericValue::dimension(v, "em"))
    }

    fn rect() -> RectValue {
        RectValue::new(
            px(2.0),
            em(12.0),
            em(3.0),
            Value::Numeric(NumericValue::dimension(2.0, "pt")),
        ).unwrap()
    }

    // ── path() ───────────────────────────────────────────────────────

    #[test]
    fn test_path_serialization() {
        let path = PathValue::new(Some(FillRule::Evenodd), "M 10 10 L 20 20").unwrap();
        assert_eq!(path.to_string(), "path(evenodd, \"M 10 10 L 20 20\")");
        let mut out = String::new();
        path.write_css(&mut out, true).unwrap();
        assert_eq!(out, "path(evenodd,\"M 10 10 L 20 20\")");
    }

    #[test]
    fn test_path_fill_rule_in_equality() {
        let bare = PathValue::new(None, "M0 0").unwrap();
        let nonzero = bare.with_fill_rule(Some(FillRule::Nonzero));
        assert_eq!(bare.effective_fill_rule(), FillRule::Nonzero);
        assert_ne!(bare, nonzero);
        assert_ne!(bare, bare.with_fill_rule(Some(FillRule::Evenodd)));
    }

    #[test]
    fn test_path_rejects_empty_data() {
        assert!(PathValue::new(None, "  ").is_err());
    }

    // ── rect() ───────────────────────────────────────────────────────

    #[test]
    fn test_rect_serialization() {
        let rect = rect();
        assert_eq!(rect.to_string(), "rect(2px, 12em, 3em, 2pt)");
        let mut out = String::new();
        rect.write_css(&mut out, true).unwrap();
        assert_eq!(out, "rect(2px,12em,3em,2pt)");
    }

    #[test]
    fn test_rect_side_index_beyond_three() {
        let rect = rect();
        assert_eq!(rect.side(3), Some(&Value::Numeric(NumericValue::dimension(2.0, "pt"))));
        assert_eq!(rect.side(4), None);
        let same = rect.with_side(7, px(9.0)).unwrap();
        assert_eq!(same, rect);
    }

    #[test]
    fn test_rect_with_side_is_independent() {
        let original = rect();
        let changed = original.with_side(0, px(5.0)).unwrap();
        assert_eq!(changed.side(0), Some(&px(5.0)));
        assert_eq!(original.side(0), Some(&px(2.0)));
    }

    #[test]
    fn test_rect_rejects_non_length() {
        let err = RectValue::from_sides(vec![px(1.0), px(1.0), px(1.0)]);
        assert!(matches!(err, Err(CssError::Syntax(_))));
        let err = rect().with_side(1, Value::Numeric(NumericValue::dimension(3.0, "deg")));
        assert!(matches!(err, Err(CssError::Syntax(_))));
    }
}
