//! Ordered value lists.

use std::fmt::{self, Write};

use crate::value::{Format, Value};

/// How the items of a [`ValueList`] are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Comma,
    Space,
    Slash,
}

impl Separator {
    fn as_str(self, minify: bool) -> &'static str {
        match (self, minify) {
            (Separator::Comma, false) => ", ",
            (Separator::Comma, true) => ",",
            (Separator::Space, _) => " ",
            (Separator::Slash, false) => " / ",
            (Separator::Slash, true) => "/",
        }
    }
}

/// A comma-, space- or slash-separated list of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueList {
    separator: Separator,
    items: Vec<Value>,
}

impl ValueList {
    pub fn new(separator: Separator, items: Vec<Value>) -> Self {
        Self { separator, items }
    }

    pub fn empty(separator: Separator) -> Self {
        Self::new(separator, Vec::new())
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Append an item.
    pub fn push(&mut self, item: Value) {
        self.items.push(item);
    }

    /// Replace the item at `index`, returning the old one. Out-of-range
    /// indices leave the list unchanged.
    pub fn set(&mut self, index: usize, item: Value) -> Option<Value> {
        self.items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub(crate) fn write_to<W: Write>(&self, dest: &mut W, format: Format) -> fmt::Result {
        let sep = self.separator.as_str(format.minify);
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                dest.write_str(sep)?;
            }
            item.write_to(dest, format)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, Format::CANONICAL)
    }
}
