//! Unit-aware evaluation of math expressions.
//!
//! Every intermediate result carries one unit and its integer power. A
//! literal number has power 0, a percentage or dimension power 1. Absolute
//! units of one category are converted to the category's canonical unit
//! (px, deg, s, hz, dppx) when two different ones meet.

use std::fmt;

use tracing::trace;

use crate::calc::expr::{Expr, MathFunction, Rounding};
use crate::error::{CssError, Result};
use crate::value::numeric::{CssUnit, NumericValue};

/// A unit raised to an integer power.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedUnit {
    pub unit: CssUnit,
    pub power: i32,
}

impl TrackedUnit {
    /// A dimensionless number.
    pub fn number() -> Self {
        Self {
            unit: CssUnit::Number,
            power: 0,
        }
    }

    /// `unit` to the first power.
    pub fn of(unit: CssUnit) -> Self {
        if unit == CssUnit::Number {
            return Self::number();
        }
        Self { unit, power: 1 }
    }

    fn with_power(unit: CssUnit, power: i32) -> Self {
        if power == 0 {
            Self::number()
        } else {
            Self { unit, power }
        }
    }

    pub fn is_number(&self) -> bool {
        self.power == 0
    }

    /// Factor converting a value in this unit to the canonical unit of its
    /// category, if the unit is absolute.
    fn canonical(&self) -> Option<(f64, TrackedUnit)> {
        let factor = self.unit.canonical_factor()?;
        let unit = CssUnit::canonical_for(self.unit.category())?;
        Some((factor.powi(self.power), TrackedUnit::with_power(unit, self.power)))
    }
}

impl fmt::Display for TrackedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.power {
            0 => f.write_str("number"),
            1 => write!(f, "{}", self.unit),
            n => write!(f, "{}^{n}", self.unit),
        }
    }
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub unit: TrackedUnit,
}

impl Evaluation {
    fn new(value: f64, unit: TrackedUnit) -> Self {
        Self { value, unit }
    }

    fn number(value: f64) -> Self {
        Self::new(value, TrackedUnit::number())
    }

    /// The CSS unit the expression resolves to.
    pub fn unit(&self) -> &CssUnit {
        &self.unit.unit
    }

    pub fn power(&self) -> i32 {
        self.unit.power
    }

    /// The result as a numeric value, when it has power 0 or 1.
    pub fn to_numeric(&self) -> Option<NumericValue> {
        match self.unit.power {
            0 => Some(NumericValue::number(self.value)),
            1 => Some(NumericValue::new(self.value, self.unit.unit.clone())),
            _ => None,
        }
    }

    fn canonical(&self) -> Option<Evaluation> {
        let (factor, unit) = self.unit.canonical()?;
        Some(Evaluation::new(self.value * factor, unit))
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.unit)
    }
}

/// Bring `values` to one unit and power, converting absolute units to their
/// canonical unit when they differ.
fn common_unit(values: Vec<Evaluation>) -> Result<(Vec<f64>, TrackedUnit)> {
    let Some(first) = values.first() else {
        return Ok((Vec::new(), TrackedUnit::number()));
    };
    let unit = first.unit.clone();
    if values.iter().all(|v| v.unit == unit) {
        return Ok((values.into_iter().map(|v| v.value).collect(), unit));
    }

    let converted = values
        .iter()
        .map(Evaluation::canonical)
        .collect::<Option<Vec<_>>>()
        .filter(|c| c.iter().all(|v| v.unit == c[0].unit));
    match converted {
        Some(converted) => {
            let unit = converted[0].unit.clone();
            Ok((converted.into_iter().map(|v| v.value).collect(), unit))
        }
        None => {
            let units: Vec<String> = values.iter().map(|v| v.unit.to_string()).collect();
            Err(CssError::evaluation(format!(
                "incompatible units: {}",
                units.join(", ")
            )))
        }
    }
}

/// Bring two operands to the same base unit, powers left alone.
fn same_base(a: Evaluation, b: Evaluation) -> Result<(Evaluation, Evaluation)> {
    if a.unit.unit == b.unit.unit {
        return Ok((a, b));
    }
    match (a.canonical(), b.canonical()) {
        (Some(ca), Some(cb)) if ca.unit.unit == cb.unit.unit => Ok((ca, cb)),
        _ => Err(CssError::evaluation(format!(
            "cannot combine {} and {}",
            a.unit, b.unit
        ))),
    }
}

/// Evaluates [`Expr`] trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `expr`. The final result must be a number or a single unit
    /// to the first power; intermediate results may have any power.
    pub fn evaluate(&self, expr: &Expr) -> Result<Evaluation> {
        let result = self.eval(expr)?;
        if !matches!(result.unit.power, 0 | 1) {
            return Err(CssError::evaluation(format!(
                "{expr} resolves to {}, which is not a CSS unit",
                result.unit
            )));
        }
        Ok(result)
    }

    fn eval(&self, expr: &Expr) -> Result<Evaluation> {
        let result = match expr {
            Expr::Operand(n) => Evaluation::new(n.value(), TrackedUnit::of(n.unit().clone())),
            Expr::Constant(c) => Evaluation::number(c.value()),
            Expr::Substitution(p) => {
                return Err(CssError::evaluation(format!(
                    "'{p}' must be substituted before evaluation"
                )));
            }
            Expr::Group(inner) => self.eval(inner)?,
            Expr::Sum(a, b) => {
                let (values, unit) = common_unit(vec![self.eval(a)?, self.eval(b)?])?;
                Evaluation::new(values[0] + values[1], unit)
            }
            Expr::Difference(a, b) => {
                let (values, unit) = common_unit(vec![self.eval(a)?, self.eval(b)?])?;
                Evaluation::new(values[0] - values[1], unit)
            }
            Expr::Product(a, b) => self.multiply(self.eval(a)?, self.eval(b)?)?,
            Expr::Quotient(a, b) => self.divide(self.eval(a)?, self.eval(b)?)?,
            Expr::Function {
                function,
                rounding,
                args,
            } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.apply(*function, *rounding, args)?
            }
        };
        trace!(expr = %expr, result = %result, "evaluated");
        Ok(result)
    }

    fn multiply(&self, a: Evaluation, b: Evaluation) -> Result<Evaluation> {
        if a.unit.is_number() {
            return Ok(Evaluation::new(a.value * b.value, b.unit));
        }
        if b.unit.is_number() {
            return Ok(Evaluation::new(a.value * b.value, a.unit));
        }
        let (a, b) = same_base(a, b)?;
        let power = a.unit.power + b.unit.power;
        Ok(Evaluation::new(
            a.value * b.value,
            TrackedUnit::with_power(a.unit.unit, power),
        ))
    }

    fn divide(&self, a: Evaluation, b: Evaluation) -> Result<Evaluation> {
        if b.unit.is_number() {
            return Ok(Evaluation::new(a.value / b.value, a.unit));
        }
        if a.unit.is_number() {
            let power = -b.unit.power;
            return Ok(Evaluation::new(
                a.value / b.value,
                TrackedUnit::with_power(b.unit.unit, power),
            ));
        }
        let (a, b) = same_base(a, b)?;
        let power = a.unit.power - b.unit.power;
        Ok(Evaluation::new(
            a.value / b.value,
            TrackedUnit::with_power(a.unit.unit, power),
        ))
    }

    fn apply(
        &self,
        function: MathFunction,
        rounding: Option<Rounding>,
        mut args: Vec<Evaluation>,
    ) -> Result<Evaluation> {
        let name = function.name();
        match function {
            MathFunction::Calc => args
                .pop()
                .ok_or_else(|| CssError::evaluation("calc() without argument")),
            MathFunction::Min | MathFunction::Max => {
                let (values, unit) = common_unit(args)?;
                let pick = if function == MathFunction::Min { f64::min } else { f64::max };
                let value = values
                    .into_iter()
                    .reduce(pick)
                    .ok_or_else(|| CssError::evaluation(format!("{name}() without argument")))?;
                Ok(Evaluation::new(value, unit))
            }
            MathFunction::Clamp => {
                let (values, unit) = common_unit(args)?;
                let [low, value, high] = values.as_slice() else {
                    return Err(CssError::evaluation("clamp() takes 3 arguments"));
                };
                Ok(Evaluation::new(low.max(value.min(*high)), unit))
            }
            MathFunction::Abs => {
                let arg = single(args, name)?;
                Ok(Evaluation::new(arg.value.abs(), arg.unit))
            }
            MathFunction::Sign => {
                let arg = single(args, name)?;
                let sign = if arg.value > 0.0 {
                    1.0
                } else if arg.value < 0.0 {
                    -1.0
                } else {
                    arg.value
                };
                Ok(Evaluation::number(sign))
            }
            MathFunction::Round => {
                if let [only] = args.as_slice() {
                    if !only.unit.is_number() {
                        return Err(CssError::evaluation(format!(
                            "round() of {} needs a rounding interval",
                            only.unit
                        )));
                    }
                }
                let (values, unit) = common_unit(args)?;
                let (value, step) = match values.as_slice() {
                    [value] => (*value, 1.0),
                    [value, step] => (*value, *step),
                    _ => return Err(CssError::evaluation("round() takes 1 or 2 arguments")),
                };
                let ratio = value / step;
                let rounded = match rounding.unwrap_or(Rounding::Nearest) {
                    Rounding::Nearest => (ratio + 0.5).floor(),
                    Rounding::Up => ratio.ceil(),
                    Rounding::Down => ratio.floor(),
                    Rounding::ToZero => ratio.trunc(),
                };
                Ok(Evaluation::new(rounded * step, unit))
            }
            MathFunction::Mod | MathFunction::Rem => {
                let (values, unit) = common_unit(args)?;
                let [a, b] = values.as_slice() else {
                    return Err(CssError::evaluation(format!("{name}() takes 2 arguments")));
                };
                let (a, b) = (*a, *b);
                let value = if function == MathFunction::Mod {
                    a - b * (a / b).floor()
                } else {
                    a % b
                };
                Ok(Evaluation::new(value, unit))
            }
            MathFunction::Sqrt => {
                let arg = single(args, name)?;
                if arg.unit.power % 2 != 0 {
                    return Err(CssError::evaluation(format!(
                        "sqrt() of {} has no CSS unit",
                        arg.unit
                    )));
                }
                let power = arg.unit.power / 2;
                Ok(Evaluation::new(
                    arg.value.sqrt(),
                    TrackedUnit::with_power(arg.unit.unit, power),
                ))
            }
            MathFunction::Pow => {
                let (base, exponent) = (numeric_arg(&args, 0, name)?, numeric_arg(&args, 1, name)?);
                Ok(Evaluation::number(base.powf(exponent)))
            }
            MathFunction::Hypot => {
                let (values, unit) = common_unit(args)?;
                let value = values.iter().map(|v| v * v).sum::<f64>().sqrt();
                Ok(Evaluation::new(value, unit))
            }
            MathFunction::Exp => Ok(Evaluation::number(numeric_arg(&args, 0, name)?.exp())),
            MathFunction::Log => {
                let value = numeric_arg(&args, 0, name)?;
                let result = if args.len() > 1 {
                    value.log(numeric_arg(&args, 1, name)?)
                } else {
                    value.ln()
                };
                Ok(Evaluation::number(result))
            }
            MathFunction::Sin | MathFunction::Cos | MathFunction::Tan => {
                let radians = to_radians(single(args, name)?)?;
                let value = match function {
                    MathFunction::Sin => radians.sin(),
                    MathFunction::Cos => radians.cos(),
                    _ => radians.tan(),
                };
                Ok(Evaluation::number(value))
            }
            MathFunction::Asin | MathFunction::Acos | MathFunction::Atan => {
                let value = numeric_arg(&args, 0, name)?;
                let radians = match function {
                    MathFunction::Asin => value.asin(),
                    MathFunction::Acos => value.acos(),
                    _ => value.atan(),
                };
                Ok(Evaluation::new(radians.to_degrees(), TrackedUnit::of(CssUnit::Deg)))
            }
            MathFunction::Atan2 => {
                let (values, _) = common_unit(args)?;
                let [y, x] = values.as_slice() else {
                    return Err(CssError::evaluation("atan2() takes 2 arguments"));
                };
                let radians = y.atan2(*x);
                Ok(Evaluation::new(radians.to_degrees(), TrackedUnit::of(CssUnit::Deg)))
            }
        }
    }
}

fn single(mut args: Vec<Evaluation>, name: &str) -> Result<Evaluation> {
    if args.len() != 1 {
        return Err(CssError::evaluation(format!(
            "{name}() takes 1 argument, got {}",
            args.len()
        )));
    }
    args.pop()
        .ok_or_else(|| CssError::evaluation(format!("{name}() without argument")))
}

/// Argument `index`, which must be a plain number.
fn numeric_arg(args: &[Evaluation], index: usize, name: &str) -> Result<f64> {
    match args.get(index) {
        Some(arg) if arg.unit.is_number() => Ok(arg.value),
        Some(arg) => Err(CssError::evaluation(format!(
            "{name}() needs a number, got {}",
            arg.unit
        ))),
        None => Err(CssError::evaluation(format!("{name}() is missing an argument"))),
    }
}

fn to_radians(arg: Evaluation) -> Result<f64> {
    if arg.unit.is_number() {
        return Ok(arg.value);
    }
    match arg.canonical() {
        Some(deg) if deg.unit == TrackedUnit::of(CssUnit::Deg) => Ok(deg.value.to_radians()),
        _ => Err(CssError::evaluation(format!(
            "expected an angle, got {}",
            arg.unit
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::error::ErrorKind;
    use crate::lexical::{parse, LexicalUnit};

    fn eval(text: &str) -> Result<Evaluation> {
        let units = parse(text, &ParserConfig::default())?;
        let [LexicalUnit::Function { name, args }] = units.as_slice() else {
            panic!("expected one function in '{text}'");
        };
        Evaluator::new().evaluate(&Expr::parse_function(name, args)?)
    }

    fn ok(text: &str) -> Evaluation {
        eval(text).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // ── Literals and arithmetic ──────────────────────────────────────

    #[test]
    fn test_percentage_times_number() {
        let result = ok("calc(18.1% * 2)");
        assert_close(result.value, 36.2);
        assert_eq!(result.unit, TrackedUnit::of(CssUnit::Percent));
        assert_eq!(result.power(), 1);
    }

    #[test]
    fn test_plain_number_has_power_zero() {
        let result = ok("calc(2 * 3)");
        assert_eq!(result.value, 6.0);
        assert_eq!(result.unit, TrackedUnit::number());
    }

    #[test]
    fn test_addition_same_unit() {
        let result = ok("calc(1em + 2em)");
        assert_eq!(result.value, 3.0);
        assert_eq!(result.unit(), &CssUnit::Em);
    }

    #[test]
    fn test_addition_converts_absolute_units() {
        let result = ok("calc(1in + 4px)");
        assert_close(result.value, 100.0);
        assert_eq!(result.unit(), &CssUnit::Px);
    }

    #[test]
    fn test_addition_mismatch_is_error() {
        for text in ["calc(1px + 10%)", "calc(1em + 1px)", "calc(1 + 1px)", "calc(1s + 1deg)"] {
            assert_eq!(eval(text).map_err(|e| e.kind()), Err(ErrorKind::Evaluation), "{text}");
        }
    }

    #[test]
    fn test_unit_ratio_is_number() {
        let result = ok("calc(10px / 2px)");
        assert_eq!(result.value, 5.0);
        assert!(result.unit.is_number());
    }

    #[test]
    fn test_squared_unit_rejected_at_top() {
        assert_eq!(eval("calc(2px * 3px)").map_err(|e| e.kind()), Err(ErrorKind::Evaluation));
        let result = ok("calc(2px * 3px / 1px)");
        assert_eq!(result.value, 6.0);
        assert_eq!(result.unit(), &CssUnit::Px);
    }

    #[test]
    fn test_nested_groups() {
        let result = ok("calc((1px + 2px) * (3 - 1))");
        assert_eq!(result.value, 6.0);
        assert_eq!(result.unit(), &CssUnit::Px);
    }

    #[test]
    fn test_substitution_is_error() {
        assert_eq!(eval("calc(var(--x) * 2)").map_err(|e| e.kind()), Err(ErrorKind::Evaluation));
    }

    // ── Functions ────────────────────────────────────────────────────

    #[test]
    fn test_max_of_percentages() {
        let result = ok("max(1.2 * 3%, 2%)");
        assert_close(result.value, 3.6);
        assert_eq!(result.unit(), &CssUnit::Percent);
    }

    #[test]
    fn test_min_and_clamp() {
        assert_eq!(ok("min(3px, 1px, 2px)").value, 1.0);
        assert_eq!(ok("clamp(1px, 5px, 3px)").value, 3.0);
        assert_eq!(ok("clamp(1px, 0px, 3px)").value, 1.0);
        assert_eq!(eval("min(1px, 1%)").map_err(|e| e.kind()), Err(ErrorKind::Evaluation));
    }

    #[test]
    fn test_sign_is_dimensionless() {
        let result = ok("sign(18%)");
        assert_eq!(result.value, 1.0);
        assert_eq!(result.unit, TrackedUnit::number());
        assert_eq!(result.power(), 0);
        assert_eq!(ok("sign(-2px)").value, -1.0);
        assert_eq!(ok("sign(0em)").value, 0.0);
    }

    #[test]
    fn test_abs_keeps_unit() {
        let result = ok("abs(-4vw)");
        assert_eq!(result.value, 4.0);
        assert_eq!(result.unit(), &CssUnit::Vw);
    }

    #[test]
    fn test_round_strategies() {
        assert_eq!(ok("round(7px, 2px)").value, 8.0);
        assert_eq!(ok("round(down, 7px, 2px)").value, 6.0);
        assert_eq!(ok("round(up, 6.1, 2)").value, 8.0);
        assert_eq!(ok("round(to-zero, -7px, 2px)").value, -6.0);
        assert_eq!(ok("round(2.5)").value, 3.0);
        assert!(eval("round(7px)").is_err());
    }

    #[test]
    fn test_mod_and_rem_signs() {
        assert_eq!(ok("mod(-7px, 3px)").value, 2.0);
        assert_eq!(ok("rem(-7px, 3px)").value, -1.0);
    }

    #[test]
    fn test_wrong_arity_is_an_error() {
        use crate::calc::expr::Constant;

        let call = |function, args: Vec<Expr>| Expr::Function {
            function,
            rounding: None,
            args,
        };
        let pi = || Expr::Constant(Constant::Pi);
        for expr in [
            call(MathFunction::Mod, vec![pi()]),
            call(MathFunction::Rem, vec![pi(), pi(), pi()]),
            call(MathFunction::Atan2, vec![pi()]),
            call(MathFunction::Round, Vec::new()),
            call(MathFunction::Round, vec![pi(), pi(), pi()]),
        ] {
            assert_eq!(
                Evaluator::new().evaluate(&expr).map_err(|e| e.kind()),
                Err(ErrorKind::Evaluation),
                "{expr:?}"
            );
        }
    }

    #[test]
    fn test_exponential() {
        assert_eq!(ok("pow(2, 10)").value, 1024.0);
        assert_eq!(ok("sqrt(16)").value, 4.0);
        assert_eq!(ok("hypot(3px, 4px)").value, 5.0);
        assert_close(ok("log(e)").value, 1.0);
        assert_close(ok("log(8, 2)").value, 3.0);
        assert!(eval("pow(2px, 2)").is_err());
    }

    #[test]
    fn test_trigonometry() {
        assert_close(ok("sin(90deg)").value, 1.0);
        assert_close(ok("cos(0.5turn)").value, -1.0);
        assert_close(ok("tan(0)").value, 0.0);
        let angle = ok("atan2(1px, 1px)");
        assert_close(angle.value, 45.0);
        assert_eq!(angle.unit(), &CssUnit::Deg);
        assert_close(ok("acos(1)").value, 0.0);
        assert!(eval("sin(1px)").is_err());
    }

    #[test]
    fn test_constants() {
        assert_close(ok("calc(pi)").value, std::f64::consts::PI);
        assert_eq!(ok("calc(-infinity)").value, f64::NEG_INFINITY);
        assert!(ok("calc(NaN)").value.is_nan());
    }

    #[test]
    fn test_to_numeric() {
        let result = ok("calc(1px + 2px)");
        assert_eq!(result.to_numeric(), Some(NumericValue::dimension(3.0, "px")));
    }
}
