//! Values whose concrete kind depends on an unresolved `var()` or `attr()`.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use crate::lexical::unit::{sequence_to_string, write_sequence};
use crate::lexical::LexicalUnit;

/// A value containing a substitution, kept as its lexical units until the
/// substitution is resolved.
#[derive(Debug, Clone)]
pub struct ProxyValue {
    units: Vec<LexicalUnit>,
}

impl ProxyValue {
    pub fn new(units: Vec<LexicalUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[LexicalUnit] {
        &self.units
    }

    /// The outer function when the proxy is a single function call, e.g.
    /// `element` for `element(var(--id))`.
    pub fn outer_function(&self) -> Option<(&str, &[LexicalUnit])> {
        match self.units.as_slice() {
            [LexicalUnit::Function { name, args }] => Some((name, args)),
            _ => None,
        }
    }

    /// Returns `true` if the proxy is a bare `var()` or `attr()` reference.
    pub fn is_bare_reference(&self) -> bool {
        self.outer_function().is_some_and(|(name, _)| {
            name.eq_ignore_ascii_case("var") || name.eq_ignore_ascii_case("attr")
        })
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        write_sequence(dest, &self.units, minify)
    }
}

impl PartialEq for ProxyValue {
    fn eq(&self, other: &Self) -> bool {
        sequence_to_string(&self.units) == sequence_to_string(&other.units)
    }
}

impl Eq for ProxyValue {}

impl Hash for ProxyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        sequence_to_string(&self.units).hash(state);
    }
}

impl fmt::Display for ProxyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}
