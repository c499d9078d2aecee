//! Numeric values: numbers, percentages and dimensions with their units.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use crate::lexical::escape::write_identifier;

/// The family a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    /// A plain number.
    Number,
    /// `%`.
    Percentage,
    /// `px`, `em`, `vw`, ...
    Length,
    /// `deg`, `rad`, ...
    Angle,
    /// `s`, `ms`.
    Time,
    /// `hz`, `khz`.
    Frequency,
    /// `dpi`, `dppx`, ...
    Resolution,
    /// `fr`.
    Flex,
    /// A unit this engine does not know.
    Unknown,
}

macro_rules! css_units {
    ($($variant:ident => $name:literal, $category:ident, $factor:expr;)*) => {
        /// A CSS unit. Absolute units carry a conversion factor to the
        /// canonical unit of their category.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum CssUnit {
            /// A dimensionless number.
            Number,
            /// `%`.
            Percent,
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
            /// Any other unit, stored lowercase.
            Unknown(String),
        }

        impl CssUnit {
            /// Look up a unit by name, ignoring ASCII case.
            pub fn from_name(name: &str) -> CssUnit {
                let lower = name.to_ascii_lowercase();
                match lower.as_str() {
                    "%" => CssUnit::Percent,
                    "" => CssUnit::Number,
                    $($name => CssUnit::$variant,)*
                    _ => CssUnit::Unknown(lower),
                }
            }

            /// The serialized unit suffix.
            pub fn name(&self) -> &str {
                match self {
                    CssUnit::Number => "",
                    CssUnit::Percent => "%",
                    $(CssUnit::$variant => $name,)*
                    CssUnit::Unknown(name) => name,
                }
            }

            /// The category this unit belongs to.
            pub fn category(&self) -> UnitCategory {
                match self {
                    CssUnit::Number => UnitCategory::Number,
                    CssUnit::Percent => UnitCategory::Percentage,
                    $(CssUnit::$variant => UnitCategory::$category,)*
                    CssUnit::Unknown(_) => UnitCategory::Unknown,
                }
            }

            /// Factor converting this unit to its category's canonical unit,
            /// or `None` for relative units.
            pub fn canonical_factor(&self) -> Option<f64> {
                match self {
                    CssUnit::Number | CssUnit::Percent => Some(1.0),
                    $(CssUnit::$variant => $factor,)*
                    CssUnit::Unknown(_) => None,
                }
            }
        }
    };
}

css_units! {
    // Absolute lengths, canonical px.
    Px => "px", Length, Some(1.0);
    Cm => "cm", Length, Some(96.0 / 2.54);
    Mm => "mm", Length, Some(96.0 / 25.4);
    Q => "q", Length, Some(96.0 / 101.6);
    In => "in", Length, Some(96.0);
    Pt => "pt", Length, Some(96.0 / 72.0);
    Pc => "pc", Length, Some(16.0);
    // Font and viewport relative lengths.
    Em => "em", Length, None;
    Rem => "rem", Length, None;
    Ex => "ex", Length, None;
    Rex => "rex", Length, None;
    Cap => "cap", Length, None;
    Rcap => "rcap", Length, None;
    Ch => "ch", Length, None;
    Rch => "rch", Length, None;
    Ic => "ic", Length, None;
    Ric => "ric", Length, None;
    Lh => "lh", Length, None;
    Rlh => "rlh", Length, None;
    Vw => "vw", Length, None;
    Vh => "vh", Length, None;
    Vi => "vi", Length, None;
    Vb => "vb", Length, None;
    Vmin => "vmin", Length, None;
    Vmax => "vmax", Length, None;
    Svw => "svw", Length, None;
    Svh => "svh", Length, None;
    Lvw => "lvw", Length, None;
    Lvh => "lvh", Length, None;
    Dvw => "dvw", Length, None;
    Dvh => "dvh", Length, None;
    Cqw => "cqw", Length, None;
    Cqh => "cqh", Length, None;
    Cqi => "cqi", Length, None;
    Cqb => "cqb", Length, None;
    Cqmin => "cqmin", Length, None;
    Cqmax => "cqmax", Length, None;
    // Angles, canonical deg.
    Deg => "deg", Angle, Some(1.0);
    Grad => "grad", Angle, Some(0.9);
    Rad => "rad", Angle, Some(180.0 / std::f64::consts::PI);
    Turn => "turn", Angle, Some(360.0);
    // Times, canonical s.
    S => "s", Time, Some(1.0);
    Ms => "ms", Time, Some(0.001);
    // Frequencies, canonical hz.
    Hz => "hz", Frequency, Some(1.0);
    Khz => "khz", Frequency, Some(1000.0);
    // Resolutions, canonical dppx.
    Dppx => "dppx", Resolution, Some(1.0);
    X => "x", Resolution, Some(1.0);
    Dpi => "dpi", Resolution, Some(1.0 / 96.0);
    Dpcm => "dpcm", Resolution, Some(2.54 / 96.0);
    // Flex.
    Fr => "fr", Flex, None;
}

impl CssUnit {
    /// The canonical unit absolute units of `category` convert to.
    pub fn canonical_for(category: UnitCategory) -> Option<CssUnit> {
        match category {
            UnitCategory::Number => Some(CssUnit::Number),
            UnitCategory::Percentage => Some(CssUnit::Percent),
            UnitCategory::Length => Some(CssUnit::Px),
            UnitCategory::Angle => Some(CssUnit::Deg),
            UnitCategory::Time => Some(CssUnit::S),
            UnitCategory::Frequency => Some(CssUnit::Hz),
            UnitCategory::Resolution => Some(CssUnit::Dppx),
            UnitCategory::Flex | UnitCategory::Unknown => None,
        }
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssUnit::Unknown(name) => write_identifier(f, name),
            other => f.write_str(other.name()),
        }
    }
}

/// Write a number the way CSS serializes it: integers without a fraction,
/// reals without trailing zeros. Minified output drops the leading zero.
pub fn write_number<W: Write>(dest: &mut W, value: f64, minify: bool) -> fmt::Result {
    if value.is_nan() {
        return dest.write_str("NaN");
    }
    if value.is_infinite() {
        return dest.write_str(if value > 0.0 { "infinity" } else { "-infinity" });
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return write!(dest, "{}", value as i64);
    }
    let text = value.to_string();
    if minify {
        if let Some(rest) = text.strip_prefix("0.") {
            return write!(dest, ".{rest}");
        }
        if let Some(rest) = text.strip_prefix("-0.") {
            return write!(dest, "-.{rest}");
        }
    }
    dest.write_str(&text)
}

/// Format a number to a `String`, see [`write_number`].
pub fn format_number(value: f64, minify: bool) -> String {
    let mut out = String::new();
    let _ = write_number(&mut out, value, minify);
    out
}

/// A number, percentage or dimension, e.g. `3`, `18.1%`, `12em`.
#[derive(Debug, Clone)]
pub struct NumericValue {
    value: f64,
    unit: CssUnit,
    /// Whether the source was an integer literal (matters for `<integer>`).
    integer: bool,
}

impl NumericValue {
    /// Create a numeric value with the given unit.
    pub fn new(value: f64, unit: CssUnit) -> Self {
        Self {
            value,
            unit,
            integer: false,
        }
    }

    /// A plain real number.
    pub fn number(value: f64) -> Self {
        Self::new(value, CssUnit::Number)
    }

    /// An integer number.
    pub fn integer(value: i64) -> Self {
        Self {
            value: value as f64,
            unit: CssUnit::Number,
            integer: true,
        }
    }

    /// A percentage.
    pub fn percentage(value: f64) -> Self {
        Self::new(value, CssUnit::Percent)
    }

    /// A dimension; the unit name is matched case-insensitively.
    pub fn dimension(value: f64, unit: &str) -> Self {
        Self::new(value, CssUnit::from_name(unit))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &CssUnit {
        &self.unit
    }

    /// Returns `true` if this is an integer literal.
    pub fn is_integer(&self) -> bool {
        self.unit == CssUnit::Number && self.integer
    }

    /// Returns `true` if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Return a copy with the magnitude replaced.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            unit: self.unit.clone(),
            integer: self.integer && value.fract() == 0.0,
        }
    }

    /// Convert an absolute unit to its category's canonical unit.
    pub fn to_canonical(&self) -> Option<NumericValue> {
        let factor = self.unit.canonical_factor()?;
        let unit = CssUnit::canonical_for(self.unit.category())?;
        Some(NumericValue::new(self.value * factor, unit))
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        write_number(dest, self.value, minify)?;
        write!(dest, "{}", self.unit)
    }
}

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit
            && (self.value == other.value || (self.value.is_nan() && other.value.is_nan()))
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unit.hash(state);
        // Normalize -0.0 and NaN so equal values hash alike.
        let bits = if self.value == 0.0 {
            0u64
        } else if self.value.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.value.to_bits()
        };
        bits.hash(state);
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_integer() {
        let n = NumericValue::integer(10);
        assert_eq!(n.value(), 10.0);
        assert_eq!(n.unit(), &CssUnit::Number);
        assert!(n.is_integer());
        assert_eq!(n.to_string(), "10");
    }

    #[test]
    fn test_number_real() {
        let n = NumericValue::number(2.5);
        assert!(!n.is_integer());
        assert_eq!(n.to_string(), "2.5");
    }

    #[test]
    fn test_percentage() {
        let p = NumericValue::percentage(18.1);
        assert_eq!(p.unit().category(), UnitCategory::Percentage);
        assert_eq!(p.to_string(), "18.1%");
    }

    #[test]
    fn test_dimension_case_insensitive() {
        let d = NumericValue::dimension(12.0, "EM");
        assert_eq!(d.unit(), &CssUnit::Em);
        assert_eq!(d.to_string(), "12em");
    }

    #[test]
    fn test_unknown_unit() {
        let d = NumericValue::dimension(3.0, "Foo");
        assert_eq!(d.unit(), &CssUnit::Unknown("foo".into()));
        assert_eq!(d.unit().category(), UnitCategory::Unknown);
        assert_eq!(d.to_string(), "3foo");
    }

    #[test]
    fn test_minified_number() {
        assert_eq!(format_number(0.5, true), ".5");
        assert_eq!(format_number(-0.25, true), "-.25");
        assert_eq!(format_number(0.5, false), "0.5");
        assert_eq!(format_number(-0.0, false), "0");
    }

    #[test]
    fn test_minified_dimension() {
        let mut out = String::new();
        NumericValue::dimension(0.5, "em")
            .write_css(&mut out, true)
            .unwrap();
        assert_eq!(out, ".5em");
        assert_eq!(NumericValue::dimension(0.0, "px").to_string(), "0px");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_number(f64::INFINITY, false), "infinity");
        assert_eq!(format_number(f64::NEG_INFINITY, false), "-infinity");
        assert_eq!(format_number(f64::NAN, false), "NaN");
    }

    #[test]
    fn test_canonical_conversion() {
        let inch = NumericValue::dimension(1.0, "in").to_canonical();
        assert_eq!(inch, Some(NumericValue::dimension(96.0, "px")));
        let turn = NumericValue::dimension(0.5, "turn").to_canonical();
        assert_eq!(turn, Some(NumericValue::dimension(180.0, "deg")));
        assert!(NumericValue::dimension(1.0, "em").to_canonical().is_none());
    }

    #[test]
    fn test_equality_ignores_literal_form() {
        assert_eq!(NumericValue::integer(2), NumericValue::number(2.0));
        assert_ne!(NumericValue::number(2.0), NumericValue::percentage(2.0));
    }

    #[test]
    fn test_negative_zero_hashes_like_zero() {
        use std::collections::hash_map::DefaultHasher;
        let hash = |v: &NumericValue| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let a = NumericValue::number(0.0);
        let b = NumericValue::number(-0.0);
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }
}
