//! Matching values against a compiled [`Descriptor`].
//!
//! The outcome is three-valued: a value holding an unresolved substitution
//! may only be classifiable once the substitution is known, in which case
//! the result is [`MatchResult::Pending`].
//!
//! Shape is decided before content. A component without a multiplier never
//! matches a list, `+` never matches a comma list and `#` never matches a
//! space list, whatever the elements are. Within a list, False beats Pending
//! beats True. Across alternatives, True beats Pending beats False.

use tracing::debug;

use crate::calc::{CalcType, MathFunction};
use crate::value::color::{is_color_function, is_named_color};
use crate::value::{
    CssWideKeyword, EnvValue, FunctionKind, ProxyValue, Separator, UnitCategory, Value,
    ValueFactory, ValueList,
};

use super::descriptor::{Component, ComponentName, DataType, Descriptor, Multiplier};

/// Three-valued match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    True,
    False,
    /// Decidable only after substitution.
    Pending,
}

impl MatchResult {
    /// List combination: False if either is False, else Pending if either
    /// is Pending, else True.
    pub fn and(self, other: MatchResult) -> MatchResult {
        match (self, other) {
            (MatchResult::False, _) | (_, MatchResult::False) => MatchResult::False,
            (MatchResult::Pending, _) | (_, MatchResult::Pending) => MatchResult::Pending,
            _ => MatchResult::True,
        }
    }

    /// Alternative combination: True if either is True, else Pending if
    /// either is Pending, else False.
    pub fn or(self, other: MatchResult) -> MatchResult {
        match (self, other) {
            (MatchResult::True, _) | (_, MatchResult::True) => MatchResult::True,
            (MatchResult::Pending, _) | (_, MatchResult::Pending) => MatchResult::Pending,
            _ => MatchResult::False,
        }
    }

    /// `and` over all results; True when empty.
    pub fn all(results: impl IntoIterator<Item = MatchResult>) -> MatchResult {
        results.into_iter().fold(MatchResult::True, MatchResult::and)
    }

    /// `or` over all results; False when empty.
    pub fn any(results: impl IntoIterator<Item = MatchResult>) -> MatchResult {
        results.into_iter().fold(MatchResult::False, MatchResult::or)
    }
}

impl From<bool> for MatchResult {
    fn from(matched: bool) -> Self {
        if matched {
            MatchResult::True
        } else {
            MatchResult::False
        }
    }
}

/// Property knowledge the matcher may consult.
///
/// The default methods know nothing: keywords stay Pending and every
/// identifier outside the CSS-wide set is a custom identifier.
pub trait MatchContext {
    /// The value a CSS-wide keyword stands for in this context.
    fn resolve_keyword(&self, _keyword: CssWideKeyword) -> Option<Value> {
        None
    }

    /// Returns `true` if `ident` is one of the owning property's own
    /// keywords, so it cannot be a `<custom-ident>`.
    fn is_property_keyword(&self, _ident: &str) -> bool {
        false
    }
}

/// A context with no property knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl MatchContext for NoContext {}

impl Value {
    /// Match this value against `grammar` without property context.
    pub fn matches(&self, grammar: &Descriptor) -> MatchResult {
        self.matches_with(grammar, &NoContext)
    }

    /// Match this value against `grammar`, consulting `ctx` for keywords.
    pub fn matches_with(&self, grammar: &Descriptor, ctx: &dyn MatchContext) -> MatchResult {
        if grammar.is_universal() {
            return MatchResult::True;
        }
        MatchResult::any(
            grammar
                .components()
                .iter()
                .map(|component| self.matches_component_with(component, ctx)),
        )
    }

    /// Match against one alternative.
    pub fn matches_component(&self, component: &Component) -> MatchResult {
        self.matches_component_with(component, &NoContext)
    }

    fn matches_component_with(&self, component: &Component, ctx: &dyn MatchContext) -> MatchResult {
        let component = component.unpremultiplied();
        let name = component.name();
        match self {
            Value::List(list) => match_list(list, name, component.multiplier(), ctx),
            Value::Keyword(keyword) => match ctx.resolve_keyword(keyword.keyword()) {
                Some(resolved) => resolved.matches_component_with(&component, ctx),
                None => pending(self, name, "keyword depends on the property"),
            },
            _ => classify(self, name, ctx),
        }
    }
}

fn match_list(
    list: &ValueList,
    name: &ComponentName,
    multiplier: Option<Multiplier>,
    ctx: &dyn MatchContext,
) -> MatchResult {
    let shape_fits = matches!(
        (list.separator(), multiplier),
        (Separator::Comma, Some(Multiplier::Comma)) | (Separator::Space, Some(Multiplier::Space))
    );
    if !shape_fits || list.is_empty() {
        debug!(
            separator = ?list.separator(),
            ?multiplier,
            len = list.len(),
            "list shape does not fit {name}"
        );
        return MatchResult::False;
    }
    MatchResult::all(list.iter().map(|item| classify(item, name, ctx)))
}

fn pending(value: &Value, name: &ComponentName, reason: &str) -> MatchResult {
    debug!(value = %value, component = %name, reason, "match pending");
    MatchResult::Pending
}

/// Classify a single, non-list value.
fn classify(value: &Value, name: &ComponentName, ctx: &dyn MatchContext) -> MatchResult {
    let ty = match name {
        ComponentName::Ident(literal) => return classify_literal(value, literal),
        ComponentName::DataType(ty) => *ty,
    };

    match value {
        Value::Numeric(n) => match n.unit().category() {
            UnitCategory::Number => match ty {
                DataType::Number => MatchResult::True,
                DataType::Integer => n.is_integer().into(),
                DataType::Length | DataType::LengthPercentage => n.is_zero().into(),
                _ => MatchResult::False,
            },
            category => category_fits(category, ty).into(),
        },
        Value::String(_) => (ty == DataType::String).into(),
        Value::Ident(ident) => match ty {
            DataType::CustomIdent => {
                (!is_reserved(ident.name()) && !ctx.is_property_keyword(ident.name())).into()
            }
            DataType::Color => is_named_color(ident.name()).into(),
            _ => MatchResult::False,
        },
        Value::Url(_) => matches!(ty, DataType::Url | DataType::Image).into(),
        Value::Color(_) => (ty == DataType::Color).into(),
        Value::UnicodeRange(_) => MatchResult::False,
        Value::Element(_) => (ty == DataType::Image).into(),
        Value::Env(env) => classify_env(env, value, name, ty, ctx),
        Value::Path(_) | Value::Rect(_) => (ty == DataType::BasicShape).into(),
        Value::Function(function) => match function.kind() {
            FunctionKind::Transform => (ty == DataType::TransformFunction).into(),
            FunctionKind::Image => (ty == DataType::Image).into(),
            FunctionKind::Shape => (ty == DataType::BasicShape).into(),
            FunctionKind::Generic | FunctionKind::Counter | FunctionKind::IeCompat => {
                MatchResult::False
            }
        },
        Value::Expression(expr) => match expr.calc_type() {
            CalcType::Unresolved if ty.is_numeric() => {
                pending(value, name, "math function holds a substitution")
            }
            calc => calc_type_fits(calc, ty).into(),
        },
        Value::Proxy(proxy) => classify_proxy(proxy, value, name, ty),
        Value::Keyword(_) => pending(value, name, "keyword depends on the property"),
        Value::List(_) => MatchResult::False,
    }
}

fn classify_literal(value: &Value, literal: &str) -> MatchResult {
    match value {
        Value::Ident(ident) => (ident.name() == literal).into(),
        Value::Proxy(proxy) if proxy.is_bare_reference() => MatchResult::Pending,
        Value::Env(env) if !env.is_known() && env.fallback().is_none() => MatchResult::Pending,
        _ => MatchResult::False,
    }
}

fn classify_env(
    env: &EnvValue,
    value: &Value,
    name: &ComponentName,
    ty: DataType,
    ctx: &dyn MatchContext,
) -> MatchResult {
    if env.is_known() {
        return matches!(ty, DataType::Length | DataType::LengthPercentage).into();
    }
    match env.fallback() {
        Some(units) => match ValueFactory::default().from_units(units) {
            Ok(fallback) => classify(&fallback, name, ctx),
            Err(err) => {
                debug!(value = %value, error = %err, "unparsable env() fallback");
                MatchResult::False
            }
        },
        None => pending(value, name, "unknown environment variable"),
    }
}

fn classify_proxy(
    proxy: &ProxyValue,
    value: &Value,
    name: &ComponentName,
    ty: DataType,
) -> MatchResult {
    let Some((function, _)) = proxy.outer_function() else {
        return pending(value, name, "substitution inside a sequence");
    };
    if proxy.is_bare_reference() {
        return pending(value, name, "bare substitution");
    }
    if function.eq_ignore_ascii_case("element") {
        return (ty == DataType::Image).into();
    }
    if is_color_function(function) {
        return (ty == DataType::Color).into();
    }
    if MathFunction::from_name(function).is_some() {
        return if ty.is_numeric() {
            pending(value, name, "math function holds a substitution")
        } else {
            MatchResult::False
        };
    }
    match FunctionKind::classify(function, false) {
        FunctionKind::Image => (ty == DataType::Image).into(),
        FunctionKind::Transform => (ty == DataType::TransformFunction).into(),
        FunctionKind::Shape => (ty == DataType::BasicShape).into(),
        _ => pending(value, name, "function holds a substitution"),
    }
}

fn category_fits(category: UnitCategory, ty: DataType) -> bool {
    match category {
        UnitCategory::Percentage => matches!(ty, DataType::Percentage | DataType::LengthPercentage),
        UnitCategory::Length => matches!(ty, DataType::Length | DataType::LengthPercentage),
        UnitCategory::Angle => ty == DataType::Angle,
        UnitCategory::Time => ty == DataType::Time,
        UnitCategory::Frequency => ty == DataType::Frequency,
        UnitCategory::Resolution => ty == DataType::Resolution,
        UnitCategory::Flex => ty == DataType::Flex,
        UnitCategory::Number | UnitCategory::Unknown => false,
    }
}

fn calc_type_fits(calc: CalcType, ty: DataType) -> bool {
    match calc {
        CalcType::Number => matches!(ty, DataType::Number | DataType::Integer),
        CalcType::Percentage => matches!(ty, DataType::Percentage | DataType::LengthPercentage),
        CalcType::Length => matches!(ty, DataType::Length | DataType::LengthPercentage),
        CalcType::LengthPercentage => ty == DataType::LengthPercentage,
        CalcType::Angle => ty == DataType::Angle,
        CalcType::Time => ty == DataType::Time,
        CalcType::Frequency => ty == DataType::Frequency,
        CalcType::Resolution => ty == DataType::Resolution,
        CalcType::Flex => ty == DataType::Flex,
        CalcType::Unresolved | CalcType::Invalid => false,
    }
}

/// `default` and the CSS-wide keywords are never custom identifiers.
fn is_reserved(ident: &str) -> bool {
    ident.eq_ignore_ascii_case("default") || crate::value::KeywordValue::lookup(ident).is_some()
}
