//! Math expression trees and their parser.
//!
//! Operands come from the lexical layer; `+ -` bind looser than `* /`, and
//! parenthesised groups arrive as [`LexicalUnit::Block`]s.

use std::fmt::{self, Write};

use crate::error::{CssError, Result};
use crate::lexical::{LexicalUnit, Operator};
use crate::value::numeric::{CssUnit, NumericValue};
use crate::value::proxy::ProxyValue;

/// `round()` rounding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    Nearest,
    Up,
    Down,
    ToZero,
}

impl Rounding {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "nearest" => Rounding::Nearest,
            "up" => Rounding::Up,
            "down" => Rounding::Down,
            "to-zero" => Rounding::ToZero,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Rounding::Nearest => "nearest",
            Rounding::Up => "up",
            Rounding::Down => "down",
            Rounding::ToZero => "to-zero",
        }
    }
}

macro_rules! math_functions {
    ($($variant:ident => $name:literal, $min:literal..=$max:expr;)+) => {
        /// The math functions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MathFunction {
            $($variant,)+
        }

        impl MathFunction {
            /// Look up a math function by name (ASCII case-insensitive).
            pub fn from_name(name: &str) -> Option<Self> {
                $(if name.eq_ignore_ascii_case($name) {
                    return Some(MathFunction::$variant);
                })+
                None
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(MathFunction::$variant => $name,)+
                }
            }

            /// Accepted argument count, not counting a `round()` strategy.
            fn arity(self) -> (usize, usize) {
                match self {
                    $(MathFunction::$variant => ($min, $max),)+
                }
            }
        }
    };
}

math_functions! {
    Calc => "calc", 1..=1;
    Min => "min", 1..=usize::MAX;
    Max => "max", 1..=usize::MAX;
    Clamp => "clamp", 3..=3;
    Abs => "abs", 1..=1;
    Sign => "sign", 1..=1;
    Round => "round", 1..=2;
    Mod => "mod", 2..=2;
    Rem => "rem", 2..=2;
    Sqrt => "sqrt", 1..=1;
    Pow => "pow", 2..=2;
    Hypot => "hypot", 1..=usize::MAX;
    Exp => "exp", 1..=1;
    Log => "log", 1..=2;
    Sin => "sin", 1..=1;
    Cos => "cos", 1..=1;
    Tan => "tan", 1..=1;
    Asin => "asin", 1..=1;
    Acos => "acos", 1..=1;
    Atan => "atan", 1..=1;
    Atan2 => "atan2", 2..=2;
}

/// Numeric constants usable inside math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    E,
    Pi,
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Constant {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "e" => Constant::E,
            "pi" => Constant::Pi,
            "infinity" => Constant::Infinity,
            "-infinity" => Constant::NegativeInfinity,
            "nan" => Constant::NaN,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::E => "e",
            Constant::Pi => "pi",
            Constant::Infinity => "infinity",
            Constant::NegativeInfinity => "-infinity",
            Constant::NaN => "NaN",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::E => std::f64::consts::E,
            Constant::Pi => std::f64::consts::PI,
            Constant::Infinity => f64::INFINITY,
            Constant::NegativeInfinity => f64::NEG_INFINITY,
            Constant::NaN => f64::NAN,
        }
    }
}

/// A node of a math expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A number, percentage or dimension literal.
    Operand(NumericValue),
    Constant(Constant),
    /// `var()` / `attr()` / `env()`: unknown until substitution.
    Substitution(ProxyValue),
    Sum(Box<Expr>, Box<Expr>),
    Difference(Box<Expr>, Box<Expr>),
    Product(Box<Expr>, Box<Expr>),
    Quotient(Box<Expr>, Box<Expr>),
    /// A parenthesised sub-expression.
    Group(Box<Expr>),
    Function {
        function: MathFunction,
        /// Only set for `round()`.
        rounding: Option<Rounding>,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Parse a math function call such as `calc(1px + 2%)`.
    pub fn parse_function(name: &str, args: &[LexicalUnit]) -> Result<Expr> {
        let function = MathFunction::from_name(name)
            .ok_or_else(|| CssError::syntax(format!("unknown math function {name}()")))?;

        let mut groups: Vec<&[LexicalUnit]> = args.split(|u| u.is_operator(Operator::Comma)).collect();
        let mut rounding = None;
        if function == MathFunction::Round {
            if let Some([LexicalUnit::Ident(keyword)]) = groups.first() {
                if let Some(strategy) = Rounding::from_name(keyword) {
                    rounding = Some(strategy);
                    groups.remove(0);
                }
            }
        }

        let (min, max) = function.arity();
        if groups.len() < min || groups.len() > max || args.is_empty() {
            return Err(CssError::syntax(format!(
                "{}() takes {} argument(s), got {}",
                function.name(),
                if min == max { min.to_string() } else { format!("{min} or more") },
                if args.is_empty() { 0 } else { groups.len() }
            )));
        }

        let args = groups
            .into_iter()
            .map(|group| ExprParser::new(group).parse_all())
            .collect::<Result<Vec<_>>>()?;
        Ok(Expr::Function {
            function,
            rounding,
            args,
        })
    }

    /// Returns `true` if the tree holds an unresolved substitution.
    pub fn has_substitution(&self) -> bool {
        match self {
            Expr::Substitution(_) => true,
            Expr::Operand(_) | Expr::Constant(_) => false,
            Expr::Sum(a, b) | Expr::Difference(a, b) | Expr::Product(a, b) | Expr::Quotient(a, b) => {
                a.has_substitution() || b.has_substitution()
            }
            Expr::Group(inner) => inner.has_substitution(),
            Expr::Function { args, .. } => args.iter().any(Expr::has_substitution),
        }
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        let binary = |dest: &mut W, a: &Expr, op: &str, b: &Expr, tight: bool| -> fmt::Result {
            a.write_css(dest, minify)?;
            if minify && tight {
                dest.write_str(op)?;
            } else {
                write!(dest, " {op} ")?;
            }
            b.write_css(dest, minify)
        };
        match self {
            Expr::Operand(n) => n.write_css(dest, minify),
            Expr::Constant(c) => dest.write_str(c.name()),
            Expr::Substitution(p) => p.write_css(dest, minify),
            // `+` and `-` must stay whitespace-delimited.
            Expr::Sum(a, b) => binary(dest, a, "+", b, false),
            Expr::Difference(a, b) => binary(dest, a, "-", b, false),
            Expr::Product(a, b) => binary(dest, a, "*", b, true),
            Expr::Quotient(a, b) => binary(dest, a, "/", b, true),
            Expr::Group(inner) => {
                dest.write_char('(')?;
                inner.write_css(dest, minify)?;
                dest.write_char(')')
            }
            Expr::Function {
                function,
                rounding,
                args,
            } => {
                dest.write_str(function.name())?;
                dest.write_char('(')?;
                let sep = if minify { "," } else { ", " };
                if let Some(strategy) = rounding {
                    dest.write_str(strategy.name())?;
                    dest.write_str(sep)?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        dest.write_str(sep)?;
                    }
                    arg.write_css(dest, minify)?;
                }
                dest.write_char(')')
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

/// Recursive-descent parser over one comma-free argument.
struct ExprParser<'a> {
    units: &'a [LexicalUnit],
    cursor: usize,
}

impl<'a> ExprParser<'a> {
    fn new(units: &'a [LexicalUnit]) -> Self {
        Self { units, cursor: 0 }
    }

    fn peek(&self) -> Option<&'a LexicalUnit> {
        self.units.get(self.cursor)
    }

    fn parse_all(mut self) -> Result<Expr> {
        if self.units.is_empty() {
            return Err(CssError::syntax("empty math argument"));
        }
        let expr = self.parse_sum()?;
        match self.peek() {
            None => Ok(expr),
            Some(extra) => Err(CssError::syntax(format!(
                "unexpected '{extra}' in math expression"
            ))),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some(LexicalUnit::Operator(op @ (Operator::Plus | Operator::Minus))) => *op,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.parse_product()?;
            lhs = if op == Operator::Plus {
                Expr::Sum(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Difference(Box::new(lhs), Box::new(rhs))
            };
        }
    }

    fn parse_product(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_operand()?;
        loop {
            let op = match self.peek() {
                Some(LexicalUnit::Operator(op @ (Operator::Multiply | Operator::Slash))) => *op,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.parse_operand()?;
            lhs = if op == Operator::Multiply {
                Expr::Product(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Quotient(Box::new(lhs), Box::new(rhs))
            };
        }
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        let unit = self
            .peek()
            .ok_or_else(|| CssError::syntax("math expression ends with an operator"))?;
        self.cursor += 1;
        match unit {
            LexicalUnit::Integer(n) => Ok(Expr::Operand(NumericValue::integer(*n))),
            LexicalUnit::Real(v) => Ok(Expr::Operand(NumericValue::number(*v))),
            LexicalUnit::Percentage(v) => Ok(Expr::Operand(NumericValue::percentage(*v))),
            LexicalUnit::Dimension { value, unit } => {
                let unit = CssUnit::from_name(unit);
                if let CssUnit::Unknown(name) = &unit {
                    return Err(CssError::syntax(format!("unknown unit '{name}'")));
                }
                Ok(Expr::Operand(NumericValue::new(*value, unit)))
            }
            LexicalUnit::Ident(name) => Constant::from_name(name)
                .map(Expr::Constant)
                .ok_or_else(|| CssError::syntax(format!("unexpected '{name}' in math expression"))),
            LexicalUnit::Block(inner) => {
                let expr = ExprParser::new(inner).parse_all()?;
                Ok(Expr::Group(Box::new(expr)))
            }
            LexicalUnit::Function { name, args } => {
                if unit.contains_substitution() && MathFunction::from_name(name).is_none() {
                    return Ok(Expr::Substitution(ProxyValue::new(vec![unit.clone()])));
                }
                Expr::parse_function(name, args)
            }
            other => Err(CssError::syntax(format!(
                "unexpected '{other}' in math expression"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::lexical::parse;

    fn expr(text: &str) -> Result<Expr> {
        let units = parse(text, &ParserConfig::default())?;
        match units.as_slice() {
            [LexicalUnit::Function { name, args }] => Expr::parse_function(name, args),
            _ => panic!("expected one function in '{text}'"),
        }
    }

    fn ok(text: &str) -> Expr {
        expr(text).unwrap()
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_precedence() {
        let Expr::Function { args, .. } = ok("calc(1px + 2px * 3)") else {
            panic!("expected function");
        };
        assert!(matches!(&args[0], Expr::Sum(_, rhs) if matches!(**rhs, Expr::Product(..))));
    }

    #[test]
    fn test_left_associative() {
        let Expr::Function { args, .. } = ok("calc(10px - 2px - 3px)") else {
            panic!("expected function");
        };
        assert!(matches!(&args[0], Expr::Difference(lhs, _) if matches!(**lhs, Expr::Difference(..))));
    }

    #[test]
    fn test_round_strategy() {
        let e = ok("round(up, 7px, 2px)");
        assert!(matches!(e, Expr::Function { rounding: Some(Rounding::Up), ref args, .. } if args.len() == 2));
    }

    #[test]
    fn test_substitution_operand() {
        let e = ok("calc(var(--x) * 2)");
        assert!(e.has_substitution());
        assert!(!ok("calc(2 * 3)").has_substitution());
    }

    #[test]
    fn test_errors() {
        assert!(expr("calc()").is_err());
        assert!(expr("calc(1px +)").is_err());
        assert!(expr("calc(1px 2px)").is_err());
        assert!(expr("clamp(1px, 2px)").is_err());
        assert!(expr("calc(foo)").is_err());
        assert!(expr("calc(1parsec)").is_err());
    }

    // ── Serialization ────────────────────────────────────────────────

    #[test]
    fn test_serialization() {
        assert_eq!(ok("calc(18.1% * 2)").to_string(), "calc(18.1% * 2)");
        assert_eq!(ok("calc( (1px + 2%)/3 )").to_string(), "calc((1px + 2%) / 3)");
        assert_eq!(ok("clamp(1px,2vw,PI * 1px)").to_string(), "clamp(1px, 2vw, pi * 1px)");
    }

    #[test]
    fn test_minified_keeps_additive_spaces() {
        let mut out = String::new();
        ok("calc(0.5px + 18.1% * 2)").write_css(&mut out, true).unwrap();
        assert_eq!(out, "calc(.5px + 18.1%*2)");
    }
}
