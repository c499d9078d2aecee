//! Builds [`Value`]s from lexical units.

use tracing::debug;

use crate::calc::MathFunction;
use crate::config::ParserConfig;
use crate::error::{CssError, Result};
use crate::lexical::{self, LexicalUnit, Operator};
use crate::value::color::is_color_function;
use crate::value::{
    ColorValue, ElementReference, EnvValue, ExpressionValue, FunctionKind, FunctionValue,
    IdentValue, KeywordValue, NumericValue, PathValue, ProxyValue, RectValue, Separator,
    StringValue, UnicodeRangeValue, UrlValue, Value, ValueList,
};

/// Turns lexical units into values, validating each kind on the way.
///
/// Comma binds loosest, then slash, then whitespace: `a b / c, d` is a comma
/// list whose first item is a slash list.
#[derive(Debug, Clone, Default)]
pub struct ValueFactory {
    config: ParserConfig,
}

impl ValueFactory {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenize and build a value from `text`.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let units = lexical::parse(text, &self.config)?;
        self.from_units(&units)
    }

    /// Build a value from a unit sequence. An empty sequence is an empty
    /// list.
    pub fn from_units(&self, units: &[LexicalUnit]) -> Result<Value> {
        if units.is_empty() {
            return Ok(Value::List(ValueList::empty(Separator::Space)));
        }
        self.build_comma_level(units)
    }

    fn build_comma_level(&self, units: &[LexicalUnit]) -> Result<Value> {
        self.build_level(units, Operator::Comma, Separator::Comma, Self::build_slash_level)
    }

    fn build_slash_level(&self, units: &[LexicalUnit]) -> Result<Value> {
        self.build_level(units, Operator::Slash, Separator::Slash, Self::build_space_level)
    }

    fn build_space_level(&self, units: &[LexicalUnit]) -> Result<Value> {
        match units {
            [single] => self.from_unit(single),
            _ => {
                let items = units
                    .iter()
                    .map(|unit| self.from_unit(unit))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(ValueList::new(Separator::Space, items)))
            }
        }
    }

    fn build_level(
        &self,
        units: &[LexicalUnit],
        op: Operator,
        separator: Separator,
        next: fn(&Self, &[LexicalUnit]) -> Result<Value>,
    ) -> Result<Value> {
        let parts = lexical::unit::split_on(units, op);
        if parts.len() == 1 {
            return next(self, units);
        }
        let items = parts
            .into_iter()
            .map(|part| {
                if part.is_empty() {
                    return Err(CssError::syntax(format!("empty item in '{}'", lexical::unit::sequence_to_string(units))));
                }
                next(self, part)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::List(ValueList::new(separator, items)))
    }

    /// Build a single value from one unit.
    pub fn from_unit(&self, unit: &LexicalUnit) -> Result<Value> {
        if unit.contains_var_or_attr() {
            debug!(unit = %unit, "value holds a substitution, keeping it as a proxy");
            return Ok(Value::Proxy(ProxyValue::new(vec![unit.clone()])));
        }

        match unit {
            LexicalUnit::Integer(n) => Ok(Value::Numeric(NumericValue::integer(*n))),
            LexicalUnit::Real(v) => Ok(Value::Numeric(NumericValue::number(*v))),
            LexicalUnit::Percentage(v) => Ok(Value::Numeric(NumericValue::percentage(*v))),
            LexicalUnit::Dimension { value, unit } => {
                Ok(Value::Numeric(NumericValue::dimension(*value, unit)))
            }
            LexicalUnit::Ident(name) => match KeywordValue::lookup(name) {
                Some(keyword) => Ok(Value::Keyword(keyword)),
                None => Ok(Value::Ident(IdentValue::new(name.clone())?)),
            },
            LexicalUnit::String { .. } => {
                Ok(Value::String(StringValue::from_lexical(unit, &self.config)?))
            }
            LexicalUnit::Url(href) => {
                let url = UrlValue::new(href.clone());
                Ok(Value::Url(match &self.config.base_url {
                    Some(base) => url.with_base(base.clone()),
                    None => url,
                }))
            }
            LexicalUnit::Hash(digits) => Ok(Value::Color(ColorValue::hex(digits)?)),
            LexicalUnit::UnicodeRange(range) => {
                Ok(Value::UnicodeRange(UnicodeRangeValue::parse(range)?))
            }
            LexicalUnit::Function { name, args } => self.from_function(name, args),
            LexicalUnit::Block(_) => Err(CssError::syntax(format!(
                "unexpected parenthesised group '{unit}'"
            ))),
            LexicalUnit::Operator(_) => Err(CssError::syntax(format!("unexpected '{unit}'"))),
        }
    }

    fn from_function(&self, name: &str, args: &[LexicalUnit]) -> Result<Value> {
        if MathFunction::from_name(name).is_some() {
            return Ok(Value::Expression(ExpressionValue::from_function(name, args)?));
        }
        if is_color_function(name) {
            return self.color_function(name, args).map(Value::Color);
        }
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "element" => return Ok(Value::Element(ElementReference::from_args(args)?)),
            "env" => return Ok(Value::Env(EnvValue::from_args(args)?)),
            "path" => return Ok(Value::Path(PathValue::from_args(args)?)),
            "rect" => return self.rect(args).map(Value::Rect),
            _ => {}
        }

        let kind = FunctionKind::classify(name, self.config.ie_compat);
        if kind == FunctionKind::IeCompat {
            return Ok(Value::Function(FunctionValue::raw(name, kind, args.to_vec())));
        }
        match self.function_args(args) {
            Ok(values) => Ok(Value::Function(FunctionValue::new(name, kind, values))),
            Err(err) => {
                debug!(function = name, error = %err, "keeping function arguments as lexical units");
                Ok(Value::Function(FunctionValue::raw(name, kind, args.to_vec())))
            }
        }
    }

    fn function_args(&self, args: &[LexicalUnit]) -> Result<Vec<Value>> {
        if args.is_empty() {
            return Ok(Vec::new());
        }
        lexical::unit::split_on(args, Operator::Comma)
            .into_iter()
            .map(|part| {
                if part.is_empty() {
                    Err(CssError::syntax("empty function argument"))
                } else {
                    self.build_slash_level(part)
                }
            })
            .collect()
    }

    /// `rgb(1, 2, 3)`, `rgb(1 2 3 / 50%)`, `color(display-p3 1 0 0)`.
    fn color_function(&self, name: &str, args: &[LexicalUnit]) -> Result<ColorValue> {
        let singles = |parts: Vec<&[LexicalUnit]>| -> Result<Vec<Value>> {
            parts
                .into_iter()
                .map(|part| match part {
                    [unit] => self.from_unit(unit),
                    _ => Err(CssError::syntax(format!("{name}() expects one value per component"))),
                })
                .collect()
        };

        let commas = args.iter().any(|u| u.is_operator(Operator::Comma));
        if commas {
            let mut components = singles(lexical::unit::split_on(args, Operator::Comma))?;
            let alpha = if components.len() == 4 { components.pop() } else { None };
            return ColorValue::function(name, components, alpha, true);
        }

        let mut halves = lexical::unit::split_on(args, Operator::Slash).into_iter();
        let channels = halves.next().unwrap_or_default();
        let alpha = match (halves.next(), halves.next()) {
            (None, _) => None,
            (Some([unit]), None) => Some(self.from_unit(unit)?),
            _ => return Err(CssError::syntax(format!("{name}() has a malformed alpha"))),
        };
        let components = channels
            .iter()
            .map(|unit| self.from_unit(unit))
            .collect::<Result<Vec<_>>>()?;
        ColorValue::function(name, components, alpha, false)
    }

    /// `rect(t r b l)` or `rect(t, r, b, l)`.
    fn rect(&self, args: &[LexicalUnit]) -> Result<RectValue> {
        let units: Vec<&LexicalUnit> = if args.iter().any(|u| u.is_operator(Operator::Comma)) {
            lexical::unit::split_on(args, Operator::Comma)
                .into_iter()
                .map(|part| match part {
                    [unit] => Ok(unit),
                    _ => Err(CssError::syntax("rect() expects one value per side")),
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            args.iter().collect()
        };
        let sides = units
            .into_iter()
            .map(|unit| self.from_unit(unit))
            .collect::<Result<Vec<_>>>()?;
        RectValue::from_sides(sides)
    }
}
