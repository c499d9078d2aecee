//! Static type of a math expression, for grammar matching.

use crate::calc::expr::{Expr, MathFunction};
use crate::value::numeric::UnitCategory;

/// What a math expression resolves to, without evaluating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcType {
    Number,
    Percentage,
    Length,
    /// A length and a percentage combined, e.g. `calc(1px + 10%)`.
    LengthPercentage,
    Angle,
    Time,
    Frequency,
    Resolution,
    Flex,
    /// Holds a substitution; known only after `var()` resolution.
    Unresolved,
    /// Combines incompatible types, e.g. `calc(1px + 1s)`.
    Invalid,
}

impl CalcType {
    fn of_category(category: UnitCategory) -> CalcType {
        match category {
            UnitCategory::Number => CalcType::Number,
            UnitCategory::Percentage => CalcType::Percentage,
            UnitCategory::Length => CalcType::Length,
            UnitCategory::Angle => CalcType::Angle,
            UnitCategory::Time => CalcType::Time,
            UnitCategory::Frequency => CalcType::Frequency,
            UnitCategory::Resolution => CalcType::Resolution,
            UnitCategory::Flex => CalcType::Flex,
            UnitCategory::Unknown => CalcType::Invalid,
        }
    }

    /// Type of `expr`.
    ///
    /// Intermediate products may carry a unit to any power, as in
    /// `calc(2px * 3px / 1px)`; only the final result must be a number or a
    /// single unit.
    pub fn of(expr: &Expr) -> CalcType {
        Typed::of(expr).resolve()
    }

    /// Returns `true` if the type is settled and valid.
    pub fn is_resolved(self) -> bool {
        !matches!(self, CalcType::Unresolved | CalcType::Invalid)
    }

    fn add(self, other: CalcType) -> CalcType {
        use CalcType::*;
        match (self, other) {
            (Invalid, _) | (_, Invalid) => Invalid,
            (Unresolved, _) | (_, Unresolved) => Unresolved,
            (a, b) if a == b => a,
            (Length | Percentage | LengthPercentage, Length | Percentage | LengthPercentage) => {
                LengthPercentage
            }
            _ => Invalid,
        }
    }

    fn of_function(function: MathFunction, args: &[CalcType]) -> CalcType {
        let combined = || {
            args.iter()
                .copied()
                .reduce(CalcType::add)
                .unwrap_or(CalcType::Invalid)
        };
        let all_numbers = || {
            if args.contains(&CalcType::Invalid) {
                CalcType::Invalid
            } else if args.contains(&CalcType::Unresolved) {
                CalcType::Unresolved
            } else if args.iter().all(|t| *t == CalcType::Number) {
                CalcType::Number
            } else {
                CalcType::Invalid
            }
        };

        match function {
            MathFunction::Calc
            | MathFunction::Min
            | MathFunction::Max
            | MathFunction::Clamp
            | MathFunction::Abs
            | MathFunction::Round
            | MathFunction::Mod
            | MathFunction::Rem
            | MathFunction::Hypot => combined(),
            MathFunction::Sign => match combined() {
                CalcType::Invalid => CalcType::Invalid,
                _ => CalcType::Number,
            },
            MathFunction::Sqrt | MathFunction::Pow | MathFunction::Exp | MathFunction::Log => {
                all_numbers()
            }
            MathFunction::Sin | MathFunction::Cos | MathFunction::Tan => match combined() {
                CalcType::Number | CalcType::Angle | CalcType::Unresolved => CalcType::Number,
                _ => CalcType::Invalid,
            },
            MathFunction::Asin | MathFunction::Acos | MathFunction::Atan => match all_numbers() {
                CalcType::Number | CalcType::Unresolved => CalcType::Angle,
                _ => CalcType::Invalid,
            },
            MathFunction::Atan2 => match combined() {
                CalcType::Invalid => CalcType::Invalid,
                _ => CalcType::Angle,
            },
        }
    }
}

/// A type raised to a power: `px * px` is `Length` squared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Typed {
    base: CalcType,
    power: i32,
}

impl Typed {
    const NUMBER: Typed = Typed {
        base: CalcType::Number,
        power: 0,
    };

    fn of_type(base: CalcType) -> Typed {
        match base {
            CalcType::Number => Typed::NUMBER,
            base => Typed { base, power: 1 },
        }
    }

    fn of(expr: &Expr) -> Typed {
        match expr {
            Expr::Group(inner) => Typed::of(inner),
            Expr::Sum(a, b) | Expr::Difference(a, b) => Typed::of(a).add(Typed::of(b)),
            Expr::Product(a, b) => Typed::of(a).combine(Typed::of(b), 1),
            Expr::Quotient(a, b) => Typed::of(a).combine(Typed::of(b), -1),
            Expr::Function {
                function: MathFunction::Sqrt,
                args,
                ..
            } => match args.as_slice() {
                [arg] => Typed::of(arg).sqrt(),
                _ => Typed::of_type(CalcType::Invalid),
            },
            Expr::Operand(n) => Typed::of_type(CalcType::of_category(n.unit().category())),
            Expr::Constant(_) => Typed::NUMBER,
            Expr::Substitution(_) => Typed::of_type(CalcType::Unresolved),
            Expr::Function { function, args, .. } => {
                let types: Vec<CalcType> = args.iter().map(CalcType::of).collect();
                Typed::of_type(CalcType::of_function(*function, &types))
            }
        }
    }

    fn is_settled(self) -> bool {
        self.base.is_resolved()
    }

    fn add(self, other: Typed) -> Typed {
        if self.is_settled() && other.is_settled() && self.power != other.power {
            return Typed::of_type(CalcType::Invalid);
        }
        Typed {
            base: self.base.add(other.base),
            power: self.power,
        }
    }

    /// Multiply (`sign` 1) or divide (`sign` -1).
    fn combine(self, other: Typed, sign: i32) -> Typed {
        use CalcType::*;
        match (self.base, other.base) {
            (Invalid, _) | (_, Invalid) => Typed::of_type(Invalid),
            (Unresolved, _) | (_, Unresolved) => Typed::of_type(Unresolved),
            (_, Number) => self,
            (Number, base) => Typed {
                base,
                power: sign * other.power,
            },
            (LengthPercentage, _) | (_, LengthPercentage) => Typed::of_type(Invalid),
            (a, b) if a == b => match self.power + sign * other.power {
                0 => Typed::NUMBER,
                power => Typed { base: a, power },
            },
            _ => Typed::of_type(Invalid),
        }
    }

    fn sqrt(self) -> Typed {
        match self.base {
            CalcType::Invalid | CalcType::Unresolved => self,
            _ if self.power % 2 != 0 => Typed::of_type(CalcType::Invalid),
            base => match self.power / 2 {
                0 => Typed::NUMBER,
                power => Typed { base, power },
            },
        }
    }

    fn resolve(self) -> CalcType {
        match self.power {
            0 | 1 => self.base,
            _ if self.is_settled() => CalcType::Invalid,
            _ => self.base,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::lexical::{parse, LexicalUnit};

    fn type_of(text: &str) -> CalcType {
        let units = parse(text, &ParserConfig::default()).unwrap();
        let [LexicalUnit::Function { name, args }] = units.as_slice() else {
            panic!("expected one function in '{text}'");
        };
        let expr = Expr::parse_function(name, args).unwrap();
        CalcType::of(&expr)
    }

    #[test]
    fn test_operands() {
        assert_eq!(type_of("calc(1px)"), CalcType::Length);
        assert_eq!(type_of("calc(10%)"), CalcType::Percentage);
        assert_eq!(type_of("calc(2)"), CalcType::Number);
        assert_eq!(type_of("calc(1turn)"), CalcType::Angle);
    }

    #[test]
    fn test_length_percentage_mix() {
        assert_eq!(type_of("calc(1px + 10%)"), CalcType::LengthPercentage);
        assert_eq!(type_of("min(1em, 50%)"), CalcType::LengthPercentage);
    }

    #[test]
    fn test_incompatible() {
        assert_eq!(type_of("calc(1px + 1s)"), CalcType::Invalid);
        assert_eq!(type_of("calc(1px * 1px)"), CalcType::Invalid);
        assert_eq!(type_of("calc(1px * 1s / 1s)"), CalcType::Invalid);
        assert_eq!(type_of("calc(1 + 1px)"), CalcType::Invalid);
    }

    #[test]
    fn test_ratio_is_number() {
        assert_eq!(type_of("calc(10px / 2px)"), CalcType::Number);
        assert_eq!(type_of("calc(10px / 2)"), CalcType::Length);
    }

    #[test]
    fn test_substitution_unresolved() {
        assert_eq!(type_of("calc(var(--x) + 1px)"), CalcType::Unresolved);
        assert!(!CalcType::Unresolved.is_resolved());
    }

    #[test]
    fn test_function_types() {
        assert_eq!(type_of("sign(-3px)"), CalcType::Number);
        assert_eq!(type_of("sin(45deg)"), CalcType::Number);
        assert_eq!(type_of("atan2(1px, 2px)"), CalcType::Angle);
        assert_eq!(type_of("acos(1)"), CalcType::Angle);
        assert_eq!(type_of("pow(2, 3)"), CalcType::Number);
        assert_eq!(type_of("sqrt(4px)"), CalcType::Invalid);
    }

    #[test]
    fn test_intermediate_powers() {
        assert_eq!(type_of("calc(2px * 3px / 1px)"), CalcType::Length);
        assert_eq!(type_of("calc(2px * 3px / (1px * 1px))"), CalcType::Number);
        assert_eq!(type_of("calc(1 / 1px * 2px)"), CalcType::Number);
        assert_eq!(type_of("calc(1px * 1px + 2px * 2px)"), CalcType::Invalid);
        assert_eq!(type_of("calc(1px * 1px + 2px)"), CalcType::Invalid);
        assert_eq!(type_of("sqrt(4px * 1px)"), CalcType::Length);
        assert_eq!(type_of("calc(sqrt(4px * 1px) + 1px)"), CalcType::Length);
    }
}
