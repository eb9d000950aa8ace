//! Qualified names and identifier validation.

use std::fmt;

use crate::{Error, Result};

/// Separator between scope segments in a qualified name.
pub const SCOPE_SEPARATOR: &str = "::";

/// A qualified name: namespace path plus leaf name.
///
/// ```
/// use sfgen_model::Identifier;
///
/// let id = Identifier::parse("demo::detail::applyScale").unwrap();
/// assert_eq!(id.scope(), ["demo", "detail"]);
/// assert_eq!(id.leaf(), "applyScale");
/// assert_eq!(id.to_string(), "demo::detail::applyScale");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    scope: Vec<String>,
    leaf: String,
}

impl Identifier {
    /// Create an identifier from scope segments and a leaf name.
    pub fn new(
        scope: impl IntoIterator<Item = impl Into<String>>,
        leaf: impl Into<String>,
    ) -> Result<Self> {
        let scope: Vec<String> = scope.into_iter().map(Into::into).collect();
        let leaf = leaf.into();

        for segment in &scope {
            validate_name(segment, "namespace")?;
        }
        validate_name(&leaf, "identifier")?;

        Ok(Self { scope, leaf })
    }

    /// Create an identifier at the root scope.
    pub fn simple(leaf: impl Into<String>) -> Result<Self> {
        Self::new(std::iter::empty::<String>(), leaf)
    }

    /// Parse a `::`-separated qualified name. A leading `::` is ignored.
    pub fn parse(qualified: &str) -> Result<Self> {
        let mut segments = parse_scope(qualified);
        let leaf = segments.pop().unwrap_or_default();
        if leaf.is_empty() {
            return Err(Error::invalid_identifier(
                qualified,
                "identifier",
                "leaf name cannot be empty",
            ));
        }
        Self::new(segments, leaf)
    }

    /// The enclosing namespace path.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// The unqualified name.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Whether this identifier lives directly at the root scope.
    pub fn is_root_level(&self) -> bool {
        self.scope.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.scope {
            write!(f, "{}{}", segment, SCOPE_SEPARATOR)?;
        }
        write!(f, "{}", self.leaf)
    }
}

/// Split a qualified scope path into trimmed segments.
///
/// Empty segments are kept so that validation can reject them.
pub(crate) fn parse_scope(qualified: &str) -> Vec<String> {
    let trimmed = qualified.trim();
    let trimmed = trimmed.strip_prefix(SCOPE_SEPARATOR).unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(SCOPE_SEPARATOR)
        .map(|s| s.trim().to_string())
        .collect()
}

/// Parse and validate a namespace path such as `a::b::c`.
pub fn parse_namespace_path(qualified: &str) -> Result<Vec<String>> {
    let segments = parse_scope(qualified);
    if segments.is_empty() {
        return Err(Error::invalid_identifier(
            qualified,
            "namespace",
            "namespace path cannot be empty",
        ));
    }
    for segment in &segments {
        validate_name(segment, "namespace")?;
    }
    Ok(segments)
}

/// Join scope segments back into a qualified name.
pub fn join_scope(segments: &[String]) -> String {
    segments.join(SCOPE_SEPARATOR)
}

/// Validate that a name is a usable identifier in the target language.
pub fn validate_name(name: &str, kind: &str) -> Result<()> {
    match invalid_reason(name) {
        Some(reason) => Err(Error::invalid_identifier(name, kind, reason)),
        None => Ok(()),
    }
}

fn invalid_reason(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }

    if is_reserved_word(name) {
        return Some("name is a reserved keyword");
    }

    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    if !starts_ok {
        return Some("name must start with a letter or underscore");
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("name contains invalid characters");
    }

    None
}

/// Reserved words of the target language that cannot name an artifact.
pub(crate) const RESERVED_WORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "consteval", "constexpr", "constinit", "const_cast", "continue",
    "co_await", "co_return", "co_yield", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "not", "nullptr", "operator", "or", "private", "protected", "public",
    "register", "reinterpret_cast", "requires", "return", "short", "signed", "sizeof",
    "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "while", "xor",
];

/// Check if a name is a reserved word
pub(crate) fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let id = Identifier::parse("a::b::c").unwrap();
        assert_eq!(id.scope(), ["a", "b"]);
        assert_eq!(id.leaf(), "c");
        assert!(!id.is_root_level());
    }

    #[test]
    fn test_parse_leading_separator_and_spaces() {
        let id = Identifier::parse(":: demo :: run").unwrap();
        assert_eq!(id.scope(), ["demo"]);
        assert_eq!(id.leaf(), "run");
    }

    #[test]
    fn test_empty_leaf_is_invalid() {
        for input in ["", "demo::", "::"] {
            let err = Identifier::parse(input).unwrap_err();
            assert!(
                matches!(*err, Error::InvalidIdentifier { .. }),
                "expected InvalidIdentifier for {input:?}"
            );
        }
    }

    #[test]
    fn test_empty_scope_segment_is_invalid() {
        let err = Identifier::parse("a::::b").unwrap_err();
        match *err {
            Error::InvalidIdentifier { kind, .. } => assert_eq!(kind, "namespace"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reserved_and_malformed_names() {
        assert!(validate_name("class", "function").is_err());
        assert!(validate_name("9lives", "function").is_err());
        assert!(validate_name("has-dash", "function").is_err());
        assert!(validate_name("_ok_1", "function").is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        let id = Identifier::new(["demo", "kernels"], "scale").unwrap();
        assert_eq!(id.to_string(), "demo::kernels::scale");
        assert_eq!(Identifier::simple("f").unwrap().to_string(), "f");
    }

    #[test]
    fn test_parse_namespace_path() {
        assert_eq!(parse_namespace_path("a::b").unwrap(), ["a", "b"]);
        assert!(parse_namespace_path("").is_err());
        assert!(parse_namespace_path("a::").is_err());
    }
}
