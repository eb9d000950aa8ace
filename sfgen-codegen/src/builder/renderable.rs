//! Renderable trait and CodeFragment for decoupled code generation.
//!
//! Renderers describe output as a tree of fragments; the
//! [`CodeBuilder`](super::CodeBuilder) turns fragments into indented text.

/// Represents a fragment of generated code.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    /// A single line of code (will have newline appended).
    Line(String),
    /// A blank line.
    Blank,
    /// A block with header, body fragments, and optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    /// Indent the contained fragments.
    Indent(Vec<CodeFragment>),
    /// A sequence of fragments.
    Sequence(Vec<CodeFragment>),
    /// A `/** ... */` documentation comment.
    DocComment(String),
}

impl CodeFragment {
    /// Create a line fragment.
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    /// Create a blank line fragment.
    pub fn blank() -> Self {
        Self::Blank
    }

    /// Create a block fragment.
    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }

    /// Create an indented fragment sequence.
    pub fn indent(fragments: Vec<CodeFragment>) -> Self {
        Self::Indent(fragments)
    }

    /// Create a sequence of fragments.
    pub fn sequence(fragments: Vec<CodeFragment>) -> Self {
        Self::Sequence(fragments)
    }

    /// Create a documentation comment fragment.
    pub fn doc(s: impl Into<String>) -> Self {
        Self::DocComment(s.into())
    }

    /// One line per line of `text`, without indentation of its own.
    pub fn lines(text: &str) -> Vec<CodeFragment> {
        text.lines().map(CodeFragment::line).collect()
    }

    /// Join groups of fragments with a single blank line between them.
    pub fn separated(groups: impl IntoIterator<Item = Vec<CodeFragment>>) -> Vec<CodeFragment> {
        let mut out = Vec::new();
        for group in groups {
            if group.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(CodeFragment::Blank);
            }
            out.extend(group);
        }
        out
    }
}

/// Trait for types that can be rendered to code fragments.
pub trait Renderable {
    /// Convert this node to a sequence of code fragments.
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl Renderable for CodeFragment {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.clone()]
    }
}

impl Renderable for Vec<CodeFragment> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separated_skips_empty_groups() {
        let joined = CodeFragment::separated([
            vec![CodeFragment::line("a")],
            vec![],
            vec![CodeFragment::line("b"), CodeFragment::line("c")],
        ]);
        assert_eq!(
            joined,
            vec![
                CodeFragment::line("a"),
                CodeFragment::Blank,
                CodeFragment::line("b"),
                CodeFragment::line("c"),
            ]
        );
    }

    #[test]
    fn test_lines_keeps_blank_lines() {
        let lines = CodeFragment::lines("x;\n\ny;");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], CodeFragment::line(""));
    }
}
