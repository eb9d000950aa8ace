//! Include declarations and the ordered, deduplicating include set.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{Error, Result};

/// Where an include must be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeVisibility {
    /// Emitted in the declaration artifact; required by consumers.
    #[default]
    Public,
    /// Emitted only in the definition artifact.
    Private,
}

impl IncludeVisibility {
    /// Combine two requests for the same include; public dominates.
    pub fn dominant(self, other: IncludeVisibility) -> IncludeVisibility {
        match (self, other) {
            (IncludeVisibility::Private, IncludeVisibility::Private) => IncludeVisibility::Private,
            _ => IncludeVisibility::Public,
        }
    }
}

/// A literal header reference, in canonical form.
///
/// Two includes compare equal when they use the same bracket style and
/// their paths normalize to the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    path: String,
    system: bool,
}

impl Include {
    /// A system header, rendered as `<path>`.
    pub fn system(path: &str) -> Result<Self> {
        Self::with_style(path, true)
    }

    /// A project-local header, rendered as `"path"`.
    pub fn local(path: &str) -> Result<Self> {
        Self::with_style(path, false)
    }

    /// Parse a literal reference: `<vector>`, `"grid.h"` or bare `grid.h`.
    ///
    /// Bare paths are treated as local includes.
    pub fn parse(literal: &str) -> Result<Self> {
        let literal = literal.trim();
        let literal = literal
            .strip_prefix("#include")
            .map(str::trim_start)
            .unwrap_or(literal);

        if let Some(inner) = literal
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
        {
            Self::system(inner)
        } else if let Some(inner) = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
        {
            Self::local(inner)
        } else {
            Self::local(literal)
        }
    }

    fn with_style(path: &str, system: bool) -> Result<Self> {
        let path = Self::normalize(path);
        if path.is_empty() {
            return Err(Error::invalid_identifier(
                path,
                "include",
                "header path cannot be empty",
            ));
        }
        if path.contains(['<', '>', '"']) {
            return Err(Error::invalid_identifier(
                path,
                "include",
                "unmatched bracket or quote in header path",
            ));
        }
        Ok(Self { path, system })
    }

    /// Canonicalize a header path.
    ///
    /// Backslashes become forward slashes, repeated separators and `.`
    /// segments collapse, and whitespace around segments is dropped.
    pub fn normalize(path: &str) -> String {
        let path = path.trim().replace('\\', "/");
        let absolute = path.starts_with('/');
        let segments: Vec<&str> = path
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        let joined = segments.join("/");
        if absolute && !joined.is_empty() {
            format!("/{}", joined)
        } else {
            joined
        }
    }

    /// The normalized header path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this is an angle-bracket include.
    pub fn is_system(&self) -> bool {
        self.system
    }

    /// The full preprocessor directive.
    pub fn directive(&self) -> String {
        format!("#include {}", self)
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.system {
            write!(f, "<{}>", self.path)
        } else {
            write!(f, "\"{}\"", self.path)
        }
    }
}

/// Ordered set of includes with visibility.
///
/// Maintains first-seen order for byte-stable output. Requesting an
/// include again never moves it; requesting it as public promotes it.
///
/// ```
/// use sfgen_model::{Include, IncludeSet, IncludeVisibility};
///
/// let mut set = IncludeSet::new();
/// set.insert(Include::parse("<cmath>").unwrap(), IncludeVisibility::Private);
/// set.insert(Include::parse("<cstdint>").unwrap(), IncludeVisibility::Public);
/// set.insert(Include::parse("<cmath>").unwrap(), IncludeVisibility::Public);
///
/// let (public, private) = set.partition();
/// assert_eq!(public.len(), 2);
/// assert!(private.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeSet {
    entries: IndexMap<Include, IncludeVisibility>,
}

impl IncludeSet {
    /// Create a new empty include set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an include with the given visibility.
    pub fn insert(&mut self, include: Include, visibility: IncludeVisibility) {
        self.entries
            .entry(include)
            .and_modify(|v| *v = v.dominant(visibility))
            .or_insert(visibility);
    }

    /// Merge another set into this one, preserving first-seen order.
    pub fn merge(&mut self, other: &IncludeSet) {
        for (include, visibility) in &other.entries {
            self.insert(include.clone(), *visibility);
        }
    }

    /// Union of two sets: `a`'s entries first, then unseen entries of `b`.
    pub fn merged(a: &IncludeSet, b: &IncludeSet) -> IncludeSet {
        let mut out = a.clone();
        out.merge(b);
        out
    }

    /// Split into (public, private) lists, each in first-seen order.
    pub fn partition(&self) -> (Vec<&Include>, Vec<&Include>) {
        let mut public = Vec::new();
        let mut private = Vec::new();
        for (include, visibility) in &self.entries {
            match visibility {
                IncludeVisibility::Public => public.push(include),
                IncludeVisibility::Private => private.push(include),
            }
        }
        (public, private)
    }

    /// Check if an include has been requested with any visibility.
    pub fn contains(&self, include: &Include) -> bool {
        self.entries.contains_key(include)
    }

    /// The effective visibility of an include.
    pub fn visibility(&self, include: &Include) -> Option<IncludeVisibility> {
        self.entries.get(include).copied()
    }

    /// Iterate over all includes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Include, IncludeVisibility)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of distinct includes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc(s: &str) -> Include {
        Include::parse(s).unwrap()
    }

    #[test]
    fn test_parse_styles() {
        assert!(inc("<vector>").is_system());
        assert!(!inc("\"grid.h\"").is_system());
        assert!(!inc("grid.h").is_system());
        assert_eq!(inc("#include <cmath>"), inc("<cmath>"));
    }

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(Include::normalize(" sub//dir/./grid.h "), "sub/dir/grid.h");
        assert_eq!(Include::normalize("sub\\dir\\grid.h"), "sub/dir/grid.h");
        assert_eq!(Include::normalize("../up.h"), "../up.h");
        assert_eq!(Include::normalize("/abs//x.h"), "/abs/x.h");
        assert_eq!(inc("< sub//x.h >"), inc("<sub/x.h>"));
    }

    #[test]
    fn test_empty_include_rejected() {
        assert!(Include::parse("<>").is_err());
        assert!(Include::parse("  ").is_err());
    }

    #[test]
    fn test_unmatched_bracket_or_quote_rejected() {
        for literal in ["<vector", "vector>", "\"grid.h", "grid.h\"", "<grid.h\"", "<a<b>"] {
            let err = Include::parse(literal).unwrap_err();
            assert!(
                matches!(*err, Error::InvalidIdentifier { .. }),
                "{literal}: {err:?}"
            );
        }
        assert!(Include::local("grid>.h").is_err());
    }

    #[test]
    fn test_directive() {
        assert_eq!(inc("<vector>").directive(), "#include <vector>");
        assert_eq!(inc("grid.h").directive(), "#include \"grid.h\"");
    }

    #[test]
    fn test_public_dominates_private() {
        let mut set = IncludeSet::new();
        set.insert(inc("<span>"), IncludeVisibility::Private);
        set.insert(inc("<span>"), IncludeVisibility::Public);
        set.insert(inc("<span>"), IncludeVisibility::Private);

        let (public, private) = set.partition();
        assert_eq!(public, vec![&inc("<span>")]);
        assert!(private.is_empty());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut set = IncludeSet::new();
        set.insert(inc("<zeta>"), IncludeVisibility::Public);
        set.insert(inc("<alpha>"), IncludeVisibility::Private);
        set.insert(inc("<mid>"), IncludeVisibility::Public);
        set.insert(inc("<alpha>"), IncludeVisibility::Public);

        let order: Vec<&str> = set.iter().map(|(i, _)| i.path()).collect();
        assert_eq!(order, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let mut a = IncludeSet::new();
        a.insert(inc("<b>"), IncludeVisibility::Private);
        a.insert(inc("<a>"), IncludeVisibility::Public);

        let mut b = IncludeSet::new();
        b.insert(inc("<c>"), IncludeVisibility::Private);
        b.insert(inc("<b>"), IncludeVisibility::Public);

        let merged = IncludeSet::merged(&a, &b);
        let order: Vec<&str> = merged.iter().map(|(i, _)| i.path()).collect();
        assert_eq!(order, ["b", "a", "c"]);
        assert_eq!(
            merged.visibility(&inc("<b>")),
            Some(IncludeVisibility::Public)
        );
        assert!(merged.contains(&inc("<c>")));
    }
}
