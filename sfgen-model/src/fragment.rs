//! Opaque, pre-compiled statement text.

use crate::Include;

/// Statement text spliced verbatim into a definition.
///
/// The text is never parsed or rewritten. The only structural invariant
/// checked is bracket balance, so a fragment can never close a scope it
/// did not open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelBody {
    text: String,
    requires: Vec<Include>,
}

impl KernelBody {
    /// Wrap statement text. Trailing whitespace is dropped.
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim_end().to_string(),
            requires: Vec::new(),
        }
    }

    /// Declare an include this body depends on.
    pub fn requires(mut self, include: Include) -> Self {
        if !self.requires.contains(&include) {
            self.requires.push(include);
        }
        self
    }

    /// The statement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Includes the body declares it needs.
    pub fn required_includes(&self) -> &[Include] {
        &self.requires
    }

    /// Iterate over the body's lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Check that brackets balance outside comments and literals.
    ///
    /// Returns a human-readable reason on failure.
    pub fn check_balanced(&self) -> Result<(), String> {
        check_balanced(&self.text)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// The kind of token the previous code character belonged to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
    Other,
    Word,
    Number,
}

fn closing_for(open: char) -> char {
    match open {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

fn check_balanced(text: &str) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut state = Lexical::Code;
    let mut line = 1;
    let mut token = Token::Other;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        if state == Lexical::Code {
            let previous = token;
            token = match c {
                // `'` inside a numeric literal is a digit separator: 1'000, 0xFF'FF.
                '\'' | '.' if previous == Token::Number => Token::Number,
                c if c.is_ascii_alphanumeric() || c == '_' => match previous {
                    Token::Other if c.is_ascii_digit() => Token::Number,
                    Token::Other => Token::Word,
                    kind => kind,
                },
                _ => Token::Other,
            };
            if c == '\'' && token == Token::Number {
                continue;
            }
        } else {
            token = Token::Other;
        }
        match state {
            Lexical::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = Lexical::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lexical::BlockComment;
                }
                '"' => state = Lexical::Str,
                '\'' => state = Lexical::Char,
                '{' | '(' | '[' => stack.push((c, line)),
                '}' | ')' | ']' => match stack.pop() {
                    Some((open, _)) if closing_for(open) == c => {}
                    Some((open, opened_at)) => {
                        return Err(format!(
                            "'{}' on line {} does not match '{}' opened on line {}",
                            c, line, open, opened_at
                        ));
                    }
                    None => return Err(format!("unmatched '{}' on line {}", c, line)),
                },
                _ => {}
            },
            Lexical::LineComment => {
                if c == '\n' {
                    state = Lexical::Code;
                }
            }
            Lexical::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lexical::Code;
                }
            }
            Lexical::Str | Lexical::Char => {
                let quote = if state == Lexical::Str { '"' } else { '\'' };
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    state = Lexical::Code;
                } else if c == '\n' {
                    return Err(format!("unterminated literal on line {}", line - 1));
                }
            }
        }
    }

    if state == Lexical::BlockComment {
        return Err("unterminated block comment".to_string());
    }
    if matches!(state, Lexical::Str | Lexical::Char) {
        return Err(format!("unterminated literal on line {}", line));
    }
    if let Some((open, opened_at)) = stack.pop() {
        return Err(format!("'{}' opened on line {} is never closed", open, opened_at));
    }
    Ok(())
}
