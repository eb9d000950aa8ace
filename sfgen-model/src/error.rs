use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for module construction (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(sfgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(sfgen::parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(sfgen::parse_error))]
    ParseJson {
        filename: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} name '{name}'")]
    #[diagnostic(
        code(sfgen::invalid_identifier),
        help("{reason}. Use only letters, numbers, and underscores, starting with a letter or underscore.")
    )]
    InvalidIdentifier {
        name: String,
        kind: String,
        reason: String,
    },

    #[error("duplicate {kind} '{name}' in {scope}")]
    #[diagnostic(
        code(sfgen::duplicate_identifier),
        help("'{name}' is already declared as a {existing} in this scope; rename one of them")
    )]
    DuplicateIdentifier {
        name: String,
        kind: String,
        existing: String,
        scope: String,
    },

    #[error("cannot attach {member} to '{owner}': no such class")]
    #[diagnostic(
        code(sfgen::unresolved_scope),
        help("add the class '{owner}' before attaching methods to it")
    )]
    UnresolvedScope { owner: String, member: String },

    #[error("body of '{owner}' is not a balanced code fragment")]
    #[diagnostic(code(sfgen::unbalanced_fragment), help("{reason}"))]
    UnbalancedFragment { owner: String, reason: String },

    #[error("kernel '{name}' has no body")]
    #[diagnostic(
        code(sfgen::missing_body),
        help("kernels are definition-only and must carry a body")
    )]
    MissingBody { name: String },

    #[error("'{owner}' requires {include}, which the module does not include")]
    #[diagnostic(
        code(sfgen::unresolved_include),
        help("declare the include on the module, or disable strict_includes")
    )]
    UnresolvedInclude { include: String, owner: String },

    #[error("configuration key '{key}' is set to {found} but the command line requests {requested}")]
    #[diagnostic(
        code(sfgen::config_conflict),
        help("remove '{key}' from the description's [config] table or drop the command-line flag")
    )]
    ConfigConflict {
        key: String,
        found: String,
        requested: String,
    },
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(
        name: impl Into<String>,
        kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidIdentifier {
            name: name.into(),
            kind: kind.into(),
            reason: reason.into(),
        })
    }

    /// Create a duplicate identifier error
    pub fn duplicate_identifier(
        name: impl Into<String>,
        kind: impl Into<String>,
        existing: impl Into<String>,
        scope: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::DuplicateIdentifier {
            name: name.into(),
            kind: kind.into(),
            existing: existing.into(),
            scope: scope.into(),
        })
    }

    /// Create an unresolved scope error
    pub fn unresolved_scope(owner: impl Into<String>, member: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnresolvedScope {
            owner: owner.into(),
            member: member.into(),
        })
    }

    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create an io error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }
}
