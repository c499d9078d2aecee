//! Property metadata consulted by the matcher.
//!
//! The engine reads these databases and never writes them. [`PropertyTable`]
//! is a small in-memory implementation of both traits.

use std::collections::{HashMap, HashSet};

use crate::syntax::{Descriptor, MatchContext, MatchResult};
use crate::value::{CssWideKeyword, Value};

/// Longhand property facts.
pub trait PropertyDatabase {
    /// Initial value of `property`, if it has one.
    fn initial_value(&self, property: &str) -> Option<Value>;

    fn is_inherited(&self, property: &str) -> bool;

    fn is_known_property(&self, property: &str) -> bool;
}

/// Shorthand property facts.
pub trait ShorthandDatabase {
    /// Returns `true` if `property` belongs to some shorthand.
    fn is_shorthand_subproperty(&self, property: &str) -> bool;

    fn is_shorthand_subproperty_of(&self, shorthand: &str, longhand: &str) -> bool;

    /// Returns `true` if `ident` is a keyword of `property`'s own grammar.
    fn is_identifier(&self, property: &str, ident: &str) -> bool;
}

/// The property a value is being matched for, with the databases that
/// describe it.
#[derive(Clone, Copy)]
pub struct PropertyContext<'a> {
    property: &'a str,
    properties: &'a dyn PropertyDatabase,
    shorthands: Option<&'a dyn ShorthandDatabase>,
}

impl<'a> PropertyContext<'a> {
    pub fn new(property: &'a str, properties: &'a dyn PropertyDatabase) -> Self {
        Self {
            property,
            properties,
            shorthands: None,
        }
    }

    /// Attach a shorthand database (builder).
    pub fn with_shorthands(mut self, shorthands: &'a dyn ShorthandDatabase) -> Self {
        self.shorthands = Some(shorthands);
        self
    }

    pub fn property(&self) -> &str {
        self.property
    }

    fn initial(&self) -> Option<Value> {
        if !self.properties.is_known_property(self.property) {
            return None;
        }
        self.properties.initial_value(self.property)
    }
}

impl MatchContext for PropertyContext<'_> {
    fn resolve_keyword(&self, keyword: CssWideKeyword) -> Option<Value> {
        match keyword {
            CssWideKeyword::Initial => self.initial(),
            CssWideKeyword::Unset if !self.properties.is_inherited(self.property) => self.initial(),
            _ => None,
        }
    }

    fn is_property_keyword(&self, ident: &str) -> bool {
        self.shorthands
            .is_some_and(|db| db.is_identifier(self.property, ident))
    }
}

/// Match `value` against `grammar` for the property described by `ctx`.
///
/// `initial` resolves to the property's initial value (Pending when the
/// property or its initial value is unknown), and identifiers the shorthand
/// database knows as property keywords are not custom identifiers.
pub fn matches_in(value: &Value, grammar: &Descriptor, ctx: &PropertyContext<'_>) -> MatchResult {
    value.matches_with(grammar, ctx)
}

// ---------------------------------------------------------------------------
// PropertyTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PropertyEntry {
    initial: Option<Value>,
    inherited: bool,
    keywords: HashSet<String>,
}

/// In-memory property and shorthand database.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    properties: HashMap<String, PropertyEntry>,
    shorthands: HashMap<String, Vec<String>>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a longhand (builder).
    pub fn with_property(mut self, name: &str, initial: Option<Value>, inherited: bool) -> Self {
        self.properties.insert(
            name.to_ascii_lowercase(),
            PropertyEntry {
                initial,
                inherited,
                keywords: HashSet::new(),
            },
        );
        self
    }

    /// Register keywords of a longhand's grammar (builder). Unknown
    /// properties are ignored.
    pub fn with_keywords(mut self, name: &str, keywords: &[&str]) -> Self {
        if let Some(entry) = self.properties.get_mut(&name.to_ascii_lowercase()) {
            entry
                .keywords
                .extend(keywords.iter().map(|k| k.to_ascii_lowercase()));
        }
        self
    }

    /// Register a shorthand and its longhands (builder).
    pub fn with_shorthand(mut self, name: &str, longhands: &[&str]) -> Self {
        self.shorthands.insert(
            name.to_ascii_lowercase(),
            longhands.iter().map(|l| l.to_ascii_lowercase()).collect(),
        );
        self
    }

    fn entry(&self, property: &str) -> Option<&PropertyEntry> {
        self.properties.get(&property.to_ascii_lowercase())
    }
}

impl PropertyDatabase for PropertyTable {
    fn initial_value(&self, property: &str) -> Option<Value> {
        self.entry(property).and_then(|e| e.initial.clone())
    }

    fn is_inherited(&self, property: &str) -> bool {
        self.entry(property).is_some_and(|e| e.inherited)
    }

    fn is_known_property(&self, property: &str) -> bool {
        self.entry(property).is_some()
    }
}

impl ShorthandDatabase for PropertyTable {
    fn is_shorthand_subproperty(&self, property: &str) -> bool {
        let property = property.to_ascii_lowercase();
        self.shorthands.values().any(|l| l.contains(&property))
    }

    fn is_shorthand_subproperty_of(&self, shorthand: &str, longhand: &str) -> bool {
        self.shorthands
            .get(&shorthand.to_ascii_lowercase())
            .is_some_and(|l| l.contains(&longhand.to_ascii_lowercase()))
    }

    fn is_identifier(&self, property: &str, ident: &str) -> bool {
        let ident = ident.to_ascii_lowercase();
        if let Some(entry) = self.entry(property) {
            return entry.keywords.contains(&ident);
        }
        // A shorthand accepts the keywords of its longhands.
        self.shorthands
            .get(&property.to_ascii_lowercase())
            .is_some_and(|longhands| {
                longhands
                    .iter()
                    .filter_map(|l| self.properties.get(l))
                    .any(|e| e.keywords.contains(&ident))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Value {
        Value::parse(text).unwrap()
    }

    fn grammar(text: &str) -> Descriptor {
        Descriptor::parse(text).unwrap()
    }

    fn table() -> PropertyTable {
        PropertyTable::new()
            .with_property("width", Some(value("auto")), false)
            .with_property("color", Some(value("black")), true)
            .with_property("list-style-type", Some(value("disc")), true)
            .with_keywords("list-style-type", &["disc", "circle", "none"])
            .with_property("--no-initial", None, false)
            .with_shorthand("list-style", &["list-style-type", "list-style-position"])
    }

    // ── Databases ────────────────────────────────────────────────────

    #[test]
    fn test_property_lookup() {
        let db = table();
        assert!(db.is_known_property("WIDTH"));
        assert!(!db.is_known_property("height"));
        assert!(db.is_inherited("color"));
        assert!(!db.is_inherited("width"));
        assert_eq!(db.initial_value("width"), Some(value("auto")));
    }

    #[test]
    fn test_shorthand_lookup() {
        let db = table();
        assert!(db.is_shorthand_subproperty("list-style-type"));
        assert!(!db.is_shorthand_subproperty("width"));
        assert!(db.is_shorthand_subproperty_of("list-style", "list-style-type"));
        assert!(!db.is_shorthand_subproperty_of("list-style", "width"));
        assert!(db.is_identifier("list-style-type", "Circle"));
        assert!(db.is_identifier("list-style", "disc"));
        assert!(!db.is_identifier("list-style", "square"));
    }

    // ── Keyword resolution ───────────────────────────────────────────

    #[test]
    fn test_initial_resolves() {
        let db = table();
        let ctx = PropertyContext::new("width", &db);
        assert_eq!(matches_in(&value("initial"), &grammar("auto"), &ctx), MatchResult::True);
        assert_eq!(matches_in(&value("initial"), &grammar("<length>"), &ctx), MatchResult::False);
        assert_eq!(matches_in(&value("unset"), &grammar("auto"), &ctx), MatchResult::True);
    }

    #[test]
    fn test_initial_unknown_is_pending() {
        let db = table();
        let unknown = PropertyContext::new("height", &db);
        assert_eq!(matches_in(&value("initial"), &grammar("auto"), &unknown), MatchResult::Pending);
        let none = PropertyContext::new("--no-initial", &db);
        assert_eq!(matches_in(&value("initial"), &grammar("auto"), &none), MatchResult::Pending);
    }

    #[test]
    fn test_inherit_stays_pending() {
        let db = table();
        let ctx = PropertyContext::new("color", &db);
        assert_eq!(matches_in(&value("inherit"), &grammar("<color>"), &ctx), MatchResult::Pending);
        assert_eq!(matches_in(&value("unset"), &grammar("<color>"), &ctx), MatchResult::Pending);
        assert_eq!(matches_in(&value("inherit"), &grammar("*"), &ctx), MatchResult::True);
    }

    // ── Identifiers ──────────────────────────────────────────────────

    #[test]
    fn test_property_keyword_is_not_custom_ident() {
        let db = table();
        let ctx = PropertyContext::new("list-style-type", &db).with_shorthands(&db);
        assert_eq!(matches_in(&value("circle"), &grammar("<custom-ident>"), &ctx), MatchResult::False);
        assert_eq!(matches_in(&value("fancy"), &grammar("<custom-ident>"), &ctx), MatchResult::True);
        assert_eq!(value("circle").matches(&grammar("<custom-ident>")), MatchResult::True);
    }
}
