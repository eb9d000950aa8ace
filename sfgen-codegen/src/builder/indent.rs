//! Indentation configuration for code generation.

/// Indentation of emitted code: a number of spaces per nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    width: usize,
}

impl Indent {
    /// Default indentation of emitted sources.
    pub const DEFAULT: Self = Self::spaces(2);

    pub const fn spaces(width: usize) -> Self {
        Self { width }
    }

    /// Spaces per level.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The string for one indent level.
    pub fn unit(&self) -> String {
        " ".repeat(self.width)
    }

    /// The prefix for `depth` nesting levels.
    pub fn prefix(&self, depth: usize) -> String {
        " ".repeat(self.width * depth)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::DEFAULT
    }
}
