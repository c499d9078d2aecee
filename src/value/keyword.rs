//! CSS-wide keywords as process-wide singletons.

use std::fmt;

use once_cell::sync::Lazy;

/// Which CSS-wide keyword a [`KeywordValue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssWideKeyword {
    Inherit,
    Initial,
    Unset,
    Revert,
    RevertLayer,
}

impl CssWideKeyword {
    pub fn name(self) -> &'static str {
        match self {
            CssWideKeyword::Inherit => "inherit",
            CssWideKeyword::Initial => "initial",
            CssWideKeyword::Unset => "unset",
            CssWideKeyword::Revert => "revert",
            CssWideKeyword::RevertLayer => "revert-layer",
        }
    }
}

/// A CSS-wide keyword value.
///
/// Only the instances in the keyword table exist; values hold a
/// `&'static KeywordValue`, so cloning a keyword value shares the instance.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct KeywordValue {
    keyword: CssWideKeyword,
}

static KEYWORDS: Lazy<[KeywordValue; 5]> = Lazy::new(|| {
    [
        CssWideKeyword::Inherit,
        CssWideKeyword::Initial,
        CssWideKeyword::Unset,
        CssWideKeyword::Revert,
        CssWideKeyword::RevertLayer,
    ]
    .map(|keyword| KeywordValue { keyword })
});

impl KeywordValue {
    /// Look up a keyword by name, ASCII case-insensitively.
    pub fn lookup(name: &str) -> Option<&'static KeywordValue> {
        KEYWORDS
            .iter()
            .find(|k| k.keyword.name().eq_ignore_ascii_case(name))
    }

    /// The singleton for `keyword`.
    pub fn get(keyword: CssWideKeyword) -> &'static KeywordValue {
        let index = match keyword {
            CssWideKeyword::Inherit => 0,
            CssWideKeyword::Initial => 1,
            CssWideKeyword::Unset => 2,
            CssWideKeyword::Revert => 3,
            CssWideKeyword::RevertLayer => 4,
        };
        &KEYWORDS[index]
    }

    pub fn inherit() -> &'static KeywordValue {
        Self::get(CssWideKeyword::Inherit)
    }

    pub fn initial() -> &'static KeywordValue {
        Self::get(CssWideKeyword::Initial)
    }

    pub fn keyword(&self) -> CssWideKeyword {
        self.keyword
    }

    pub fn name(&self) -> &'static str {
        self.keyword.name()
    }
}

impl fmt::Display for KeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
