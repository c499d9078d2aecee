//! Integration tests for gilt-cssom.
//!
//! These tests exercise the public API from outside the crate: parsing,
//! serialization, equality, syntax matching and calc() evaluation together.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use gilt_cssom::calc::TrackedUnit;
use gilt_cssom::value::{CssUnit, ElementReference, Separator, UnicodeRangeValue};
use gilt_cssom::{
    Descriptor, ErrorKind, MatchResult, ParserConfig, Value, ValueFactory, ValueKind,
};
use pretty_assertions::assert_eq;

fn value(text: &str) -> Value {
    Value::parse(text).unwrap()
}

fn grammar(text: &str) -> Descriptor {
    Descriptor::parse(text).unwrap()
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn test_canonical_text_round_trips() {
    let samples = [
        "12px",
        "50%",
        "3",
        "1.5",
        "\"Times New Roman\"",
        "url(\"a.png\")",
        "#ff0000",
        "U+26",
        "U+0-7f",
        "U+4??",
        "element(#header)",
        "env(safe-area-inset-left)",
        "env(foo 1 2, 12px)",
        "path(evenodd, \"M0 0 L10 10\")",
        "rect(2px, 12em, 3em, 2pt)",
        "rotate(10deg)",
        "rgb(1 2 3 / 0.5)",
        "calc(1px + 2em * 3)",
        "inherit",
        "a b / c, d",
        "var(--x)",
    ];
    for text in samples {
        let parsed = value(text);
        assert_eq!(parsed.to_string(), text);
        assert_eq!(value(&parsed.to_string()), parsed, "{text}");
    }
}

#[test]
fn test_minified_text() {
    insta::assert_snapshot!(value("rect(2px 12em 3em 2pt)").minified_css_text(), @"rect(2px,12em,3em,2pt)");
    insta::assert_snapshot!(value("#aabbcc").minified_css_text(), @"#abc");
    insta::assert_snapshot!(value("skew(10deg, 0.5deg)").minified_css_text(), @"skew(10deg,.5deg)");
    insta::assert_snapshot!(value("calc(1px + 2em * 3)").minified_css_text(), @"calc(1px + 2em*3)");
    insta::assert_snapshot!(value("a b / c, d").minified_css_text(), @"a b/c,d");
}

#[test]
fn test_ie_filter_keeps_spacing() {
    let config = ParserConfig::new().with_ie_compat(true);
    let filter = Value::parse_with("progid:DXImageTransform.Microsoft.Alpha(Opacity=80, Style=1)", &config).unwrap();
    assert_eq!(filter.minified_css_text_for("filter"), filter.to_string());
    assert_eq!(
        filter.minified_css_text_for("background"),
        "progid:DXImageTransform.Microsoft.Alpha(Opacity=80,Style=1)"
    );
}

// ---------------------------------------------------------------------------
// Equality and hashing
// ---------------------------------------------------------------------------

#[test]
fn test_equal_values_hash_alike() {
    let pairs = [
        ("INHERIT", "inherit"),
        ("url(a.png)", "url('a.png')"),
        ("12PX", "12px"),
        ("ROTATE(10deg)", "rotate(10deg)"),
    ];
    for (a, b) in pairs {
        let (a, b) = (value(a), value(b));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}

#[test]
fn test_significant_fields_break_equality() {
    let pairs = [
        ("path('M0 0')", "path(evenodd, 'M0 0')"),
        ("path('M0 0')", "path('M1 1')"),
        ("env(foo 1 2)", "env(foo 1)"),
        ("env(foo, 1px)", "env(foo, 2px)"),
        ("env(foo, 1px)", "env(foo)"),
        ("element(#a)", "element(#b)"),
        ("a, b", "a b"),
    ];
    for (a, b) in pairs {
        let (x, y) = (value(a), value(b));
        assert!(x != y, "{a} == {b}");
        assert_ne!(hash_of(&x), hash_of(&y), "{a} / {b}");
    }
}

#[test]
fn test_url_resolution_equality() {
    let absolute = value("url('http://example.com/dir/file.txt')");
    let relative = ValueFactory::new(ParserConfig::new().with_base_url("http://example.com/foo/"))
        .parse("url('../dir/file.txt')").unwrap();
    let elsewhere = ValueFactory::new(ParserConfig::new().with_base_url("http://example.com/foo/bar/"))
        .parse("url('../dir/file.txt')").unwrap();
    assert_eq!(absolute, relative);
    assert_eq!(hash_of(&absolute), hash_of(&relative));
    assert!(absolute != elsewhere);
}

// ---------------------------------------------------------------------------
// Clone fidelity
// ---------------------------------------------------------------------------

#[test]
fn test_clone_is_independent() {
    let original = value("a, b");
    let mut copy = original.clone();
    assert_eq!(copy, original);
    if let Value::List(list) = &mut copy {
        list.push(value("c"));
    }
    assert_eq!(original.to_string(), "a, b");
    assert_eq!(copy.to_string(), "a, b, c");
}

#[test]
fn test_keyword_clone_shares_singleton() {
    let a = value("Inherit");
    let b = a.clone();
    let (Value::Keyword(x), Value::Keyword(y)) = (&a, &b) else {
        panic!("expected keywords");
    };
    assert!(std::ptr::eq(*x, *y));
    let Value::Keyword(fresh) = value("inherit") else {
        panic!("expected a keyword");
    };
    assert!(std::ptr::eq(*x, fresh));
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[test]
fn test_matching_precedence_known_idents() {
    let list = value("foo, bar");
    assert_eq!(list.matches(&grammar("<custom-ident>#")), MatchResult::True);
    assert_eq!(list.matches(&grammar("<custom-ident>+")), MatchResult::False);
    assert_eq!(list.matches(&grammar("<color>")), MatchResult::False);
    assert_eq!(list.matches(&grammar("*")), MatchResult::True);
}

#[test]
fn test_matching_precedence_with_variable() {
    let list = value("foo, var(--bar)");
    assert_eq!(list.as_list().map(|l| l.separator()), Some(Separator::Comma));
    assert_eq!(list.matches(&grammar("<custom-ident>#")), MatchResult::Pending);
    assert_eq!(list.matches(&grammar("<custom-ident>+")), MatchResult::False);
    assert_eq!(list.matches(&grammar("*")), MatchResult::True);
}

#[test]
fn test_env_references() {
    let known = value("env(safe-area-inset-left)");
    assert_eq!(known.matches(&grammar("<length>")), MatchResult::True);
    let unknown = value("env(foo-bar)");
    assert_eq!(unknown.matches(&grammar("<length>")), MatchResult::Pending);
    assert_eq!(unknown.matches(&grammar("*")), MatchResult::True);
}

#[test]
fn test_alternatives_prefer_true() {
    let g = grammar("<color> | <length> | auto");
    assert_eq!(value("12px").matches(&g), MatchResult::True);
    assert_eq!(value("inherit").matches(&g), MatchResult::Pending);
    assert_eq!(value("url(a.png)").matches(&g), MatchResult::False);
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn evaluate(text: &str) -> gilt_cssom::Evaluation {
    match value(text) {
        Value::Expression(expr) => expr.evaluate().unwrap(),
        other => panic!("expected an expression, got {:?}", other.kind()),
    }
}

#[test]
fn test_evaluate_percentage_product() {
    let result = evaluate("calc(18.1% * 2)");
    assert!((result.value - 36.2).abs() < 1e-9);
    assert_eq!(result.unit, TrackedUnit::of(CssUnit::Percent));
    assert_eq!(result.power(), 1);
}

#[test]
fn test_evaluate_max() {
    let result = evaluate("max(1.2 * 3%, 2%)");
    assert!((result.value - 3.6).abs() < 1e-9);
    assert_eq!(result.unit(), &CssUnit::Percent);
}

#[test]
fn test_evaluate_sign() {
    let result = evaluate("sign(18%)");
    assert_eq!(result.value, 1.0);
    assert_eq!(result.unit, TrackedUnit::number());
    assert_eq!(result.power(), 0);
}

#[test]
fn test_evaluate_mixed_units_fails() {
    let Value::Expression(expr) = value("min(1px, 10%)") else {
        panic!("expected an expression");
    };
    assert_eq!(expr.evaluate().map_err(|e| e.kind()), Err(ErrorKind::Evaluation));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_error_kinds() {
    assert_eq!(
        ElementReference::new("a b").map_err(|e| e.kind()),
        Err(ErrorKind::InvalidCharacter)
    );
    let single = UnicodeRangeValue::parse("26").unwrap();
    assert_eq!(
        single.with_wildcard("4??").map_err(|e| e.kind()),
        Err(ErrorKind::InvalidModification)
    );
    assert_eq!(
        value("element(#a)").with_css_text("'a'", &ParserConfig::default()).map_err(|e| e.kind()),
        Err(ErrorKind::InvalidModification)
    );
    assert_eq!(Value::parse("rgb(1 2").map_err(|e| e.kind()), Err(ErrorKind::Syntax));
    assert_eq!(value("U+26").kind(), ValueKind::UnicodeRange);
}

#[test]
fn test_exponent_numbers() {
    assert_eq!(value("1e3").kind(), ValueKind::Number);
    assert_eq!(value("1e3").matches(&grammar("<number>")), MatchResult::True);
    assert_eq!(value("1em").kind(), ValueKind::Dimension);
    let result = evaluate("calc(1e3px / 2)");
    assert!((result.value - 500.0).abs() < 1e-9);
    assert_eq!(result.unit(), &CssUnit::Px);
}
