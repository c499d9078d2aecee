//! `url()` values with resolution-aware equality.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use url::Url;

use crate::config::QuoteStyle;
use crate::lexical::escape::write_string;
use crate::lexical::unit::{choose_quote, write_url};

/// A URL reference, possibly relative to a base.
///
/// Two URL values are equal when they resolve to the same resource, even if
/// their literal text differs: `url('../dir/file.txt')` against base
/// `http://example.com/foo/` equals `url('http://example.com/dir/file.txt')`.
#[derive(Debug, Clone)]
pub struct UrlValue {
    href: String,
    base: Option<String>,
}

impl UrlValue {
    /// Create a URL value with no base.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            base: None,
        }
    }

    /// Return a copy resolved against the given base.
    pub fn with_base(&self, base: impl Into<String>) -> Self {
        Self {
            href: self.href.clone(),
            base: Some(base.into()),
        }
    }

    /// Return a copy pointing somewhere else, same base.
    pub fn with_href(&self, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            base: self.base.clone(),
        }
    }

    /// The literal reference text.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Resolve the reference against its base.
    ///
    /// Absolute references resolve to themselves. A relative reference
    /// without a base does not resolve. A relative base yields a relative
    /// result.
    pub fn resolved(&self) -> Option<String> {
        if let Ok(absolute) = Url::parse(&self.href) {
            return Some(absolute.into());
        }
        let base = self.base.as_deref()?;
        match Url::parse(base) {
            Ok(base_url) => base_url.join(&self.href).ok().map(String::from),
            Err(_) => Some(resolve_relative(base, &self.href)),
        }
    }

    /// Returns `true` if the value denotes the same resource as `other`, or
    /// failing that, if both have the same literal reference text.
    pub fn is_equivalent(&self, other: &UrlValue) -> bool {
        self == other || self.href.trim() == other.href.trim()
    }

    /// Comparison key: the resolved reference, or the literal text when it
    /// does not resolve.
    fn key(&self) -> String {
        self.resolved().unwrap_or_else(|| self.href.clone())
    }

    pub(crate) fn write_css<W: Write>(&self, dest: &mut W, minify: bool) -> fmt::Result {
        if minify {
            return write_url(dest, &self.href);
        }
        dest.write_str("url(")?;
        write_string(dest, &self.href, choose_quote(&self.href, QuoteStyle::Double))?;
        dest.write_char(')')
    }
}

impl PartialEq for UrlValue {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for UrlValue {}

impl Hash for UrlValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for UrlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, false)
    }
}

/// Split `path?query#fragment` into the path and the rest.
fn split_suffix(reference: &str) -> (&str, &str) {
    match reference.find(['?', '#']) {
        Some(i) => reference.split_at(i),
        None => (reference, ""),
    }
}

/// Resolve `reference` against a base that is itself relative.
fn resolve_relative(base: &str, reference: &str) -> String {
    let (base_path, _) = split_suffix(base);
    if reference.is_empty() {
        return base.split('#').next().unwrap_or(base).to_string();
    }
    if reference.starts_with("//") {
        return reference.to_string();
    }
    if reference.starts_with('#') {
        let without_fragment = base.split('#').next().unwrap_or(base);
        return format!("{without_fragment}{reference}");
    }
    if reference.starts_with('?') {
        return format!("{base_path}{reference}");
    }
    let (ref_path, ref_suffix) = split_suffix(reference);
    let merged = if ref_path.starts_with('/') {
        ref_path.to_string()
    } else {
        let dir = match base_path.rfind('/') {
            Some(i) => &base_path[..=i],
            None => "",
        };
        format!("{dir}{ref_path}")
    };
    format!("{}{ref_suffix}", normalize_path(&merged))
}

/// Remove `.` and `..` segments. Leading `..` segments of a relative path
/// are kept since there is nothing to climb out of.
fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);
    let mut out: Vec<&str> = Vec::new();
    let mut trailing_slash = false;

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." | "" => trailing_slash = i == last,
            ".." => {
                if out.last().is_some_and(|s| *s != "..") {
                    out.pop();
                } else if !absolute {
                    out.push("..");
                }
                trailing_slash = i == last;
            }
            s => {
                out.push(s);
                trailing_slash = false;
            }
        }
    }

    let mut result = String::new();
    if absolute {
        result.push('/');
    }
    result.push_str(&out.join("/"));
    if trailing_slash && !out.is_empty() {
        result.push('/');
    }
    result
}
