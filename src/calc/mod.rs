//! Math expressions: `calc()`, `min()`, `max()`, `clamp()` and the other
//! math functions.
//!
//! [`Expr`] is the parsed tree, [`Evaluator`] computes a value with its unit
//! and [`CalcType`] gives its type without evaluating.

pub mod eval;
pub mod expr;
pub mod typing;

pub use eval::{Evaluation, Evaluator, TrackedUnit};
pub use expr::{Constant, Expr, MathFunction, Rounding};
pub use typing::CalcType;
