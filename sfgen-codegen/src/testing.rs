//! Test utilities for emitted sources.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

/// Check that every `namespace ... {` is closed by a matching
/// `} // namespace <fq>` in reverse order.
///
/// The comment on each closing line must name the fully-qualified path of
/// the scope it closes. Returns the maximum nesting depth.
pub fn check_scope_balance(text: &str) -> Result<usize, String> {
    let mut stack: Vec<String> = Vec::new();
    let mut max_depth = 0;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if let Some(name) = trimmed
            .strip_prefix("namespace ")
            .and_then(|rest| rest.strip_suffix(" {"))
        {
            stack.push(name.to_string());
            max_depth = max_depth.max(stack.len());
        } else if let Some(fq) = trimmed.strip_prefix("} // namespace ") {
            let expected = stack.join("::");
            if stack.pop().is_none() {
                return Err(format!("line {}: close of '{}' with no open scope", line_no, fq));
            }
            if fq != expected {
                return Err(format!(
                    "line {}: closes '{}' but the innermost scope is '{}'",
                    line_no, fq, expected
                ));
            }
        }
    }

    match stack.last() {
        Some(open) => Err(format!("scope '{}' is never closed", open)),
        None => Ok(max_depth),
    }
}

/// Panic unless [`check_scope_balance`] succeeds.
pub fn assert_scopes_balanced(text: &str) {
    if let Err(reason) = check_scope_balance(text) {
        panic!("unbalanced scopes: {}\n\n{}", reason, text);
    }
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {}\n", exp));
                diff.push_str(&format!("  actual:   {}\n", act));
            }
        }

        panic!("Content mismatch:\n{}", diff);
    }
}
