//! Math function values such as `calc(18.1% * 2)`.

use std::fmt::{self, Write};

use crate::calc::{CalcType, Evaluation, Evaluator, Expr, MathFunction};
use crate::error::{CssError, Result};
use crate::lexical::LexicalUnit;

/// A math function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpressionValue {
    expr: Expr,
}

impl ExpressionValue {
    /// Wrap an expression tree; its root must be a math function call.
    pub fn new(expr: Expr) -> Result<Self> {
        match expr {
            Expr::Function { .. } => Ok(Self { expr }),
            other => Err(CssError::syntax(format!(
                "'{other}' is not a math function"
            ))),
        }
    }

    /// Parse `name(args)`.
    pub fn from_function(name: &str, args: &[LexicalUnit]) -> Result<Self> {
        Self::new(Expr::parse_function(name, args)?)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The outer math function.
    pub fn function(&self) -> Option<MathFunction> {
        match &self.expr {
            Expr::Function { function, .. } => Some(*function),
            _ => None,
        }
    }

    /// Static type, see [`CalcType`].
    pub fn calc_type(&self) -> CalcType {
        CalcType::of(&self.expr)
    }

    /// Evaluate with unit tracking.
    pub fn evaluate(&self) -> Result<Evaluation> {
        Evaluator::new().evaluate(&self.expr)
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        self.expr.write_css(dest, minify)
    }
}

impl fmt::Display for ExpressionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::Constant;
    use crate::value::numeric::CssUnit;

    #[test]
    fn test_root_must_be_function() {
        assert!(ExpressionValue::new(Expr::Constant(Constant::Pi)).is_err());
    }

    #[test]
    fn test_evaluate() {
        let args = vec![
            LexicalUnit::Percentage(18.1),
            LexicalUnit::Operator(crate::lexical::Operator::Multiply),
            LexicalUnit::Integer(2),
        ];
        let value = ExpressionValue::from_function("calc", &args).unwrap();
        assert_eq!(value.function(), Some(MathFunction::Calc));
        assert_eq!(value.to_string(), "calc(18.1% * 2)");
        assert_eq!(value.calc_type(), CalcType::Percentage);
        let result = value.evaluate().unwrap();
        assert_eq!(result.unit(), &CssUnit::Percent);
    }
}
