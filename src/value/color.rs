//! Color values: `#hex` and the functional color notations.

use std::fmt::{self, Write};

use crate::error::{CssError, Result};
use crate::value::Value;

/// Color functions this engine understands.
const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color",
];

/// Returns `true` if `name` is a color function name (ASCII case-insensitive).
pub fn is_color_function(name: &str) -> bool {
    COLOR_FUNCTIONS.iter().any(|f| name.eq_ignore_ascii_case(f))
}

/// Returns `true` if `name` is a named color, `transparent` or
/// `currentcolor`.
pub fn is_named_color(name: &str) -> bool {
    if name.eq_ignore_ascii_case("currentcolor") {
        return true;
    }
    name.chars().all(|c| c.is_ascii_alphabetic()) && csscolorparser::parse(name).is_ok()
}

/// A color given as a hex triplet or through a color function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorValue {
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`, stored lowercase without
    /// the `#`.
    Hex(String),
    /// `rgb(...)`, `hsl(...)`, `color(...)`, ...
    Function(ColorFunction),
}

/// The components of a functional color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorFunction {
    name: String,
    components: Vec<Value>,
    alpha: Option<Box<Value>>,
    /// Legacy comma syntax: `rgb(1, 2, 3)`.
    commas: bool,
}

impl ColorValue {
    /// Parse the digits of a hex color (without `#`).
    pub fn hex(digits: &str) -> Result<Self> {
        if !matches!(digits.len(), 3 | 4 | 6 | 8) {
            return Err(CssError::syntax(format!(
                "hex color needs 3, 4, 6 or 8 digits, got '#{digits}'"
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CssError::InvalidCharacter(format!(
                "not a hex color: '#{digits}'"
            )));
        }
        Ok(ColorValue::Hex(digits.to_ascii_lowercase()))
    }

    /// Build a functional color from its components.
    ///
    /// Components must be numbers, percentages, angles, math expressions or
    /// the `none` keyword; `color()` additionally starts with a color space
    /// identifier.
    pub fn function(
        name: &str,
        components: Vec<Value>,
        alpha: Option<Value>,
        commas: bool,
    ) -> Result<Self> {
        let name = name.to_ascii_lowercase();
        if !is_color_function(&name) {
            return Err(CssError::syntax(format!("not a color function: {name}()")));
        }

        let channels = if name == "color" {
            match components.split_first() {
                Some((Value::Ident(_), rest)) => rest,
                _ => {
                    return Err(CssError::syntax("color() needs a color space first"));
                }
            }
        } else {
            if components.len() != 3 {
                return Err(CssError::syntax(format!(
                    "{name}() needs 3 components, got {}",
                    components.len()
                )));
            }
            &components[..]
        };
        if let Some(bad) = channels
            .iter()
            .chain(alpha.iter())
            .find(|c| !is_channel(c))
        {
            return Err(CssError::syntax(format!("invalid color component '{bad}'")));
        }

        Ok(ColorValue::Function(ColorFunction {
            name,
            components,
            alpha: alpha.map(Box::new),
            commas,
        }))
    }

    /// Resolve to 8-bit RGBA, when the color is fully concrete.
    pub fn to_rgba8(&self) -> Option<[u8; 4]> {
        csscolorparser::parse(&self.to_string())
            .ok()
            .map(|c| c.to_rgba8())
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        match self {
            ColorValue::Hex(digits) => {
                dest.write_char('#')?;
                if minify {
                    if let Some(short) = shorten_hex(digits) {
                        return dest.write_str(&short);
                    }
                }
                dest.write_str(digits)
            }
            ColorValue::Function(func) => func.write_css(dest, minify),
        }
    }
}

impl ColorFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Value] {
        &self.components
    }

    pub fn alpha(&self) -> Option<&Value> {
        self.alpha.as_deref()
    }

    fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        dest.write_str(&self.name)?;
        dest.write_char('(')?;
        let sep = match (self.commas, minify) {
            (true, false) => ", ",
            (true, true) => ",",
            (false, _) => " ",
        };
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                dest.write_str(sep)?;
            }
            c.write_css(dest, minify)?;
        }
        if let Some(alpha) = &self.alpha {
            let alpha_sep = match (self.commas, minify) {
                (true, _) => sep,
                (false, false) => " / ",
                (false, true) => "/",
            };
            dest.write_str(alpha_sep)?;
            alpha.write_css(dest, minify)?;
        }
        dest.write_char(')')
    }
}

fn is_channel(value: &Value) -> bool {
    match value {
        Value::Numeric(_) | Value::Expression(_) => true,
        Value::Ident(ident) => ident.name().eq_ignore_ascii_case("none"),
        _ => false,
    }
}

/// `aabbcc` → `abc`, `aabbccdd` → `abcd`.
fn shorten_hex(digits: &str) -> Option<String> {
    let bytes = digits.as_bytes();
    if !matches!(bytes.len(), 6 | 8) {
        return None;
    }
    let pairs: Vec<&[u8]> = bytes.chunks(2).collect();
    if pairs.iter().all(|p| p[0] == p[1]) {
        Some(pairs.iter().map(|p| p[0] as char).collect())
    } else {
        None
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}
