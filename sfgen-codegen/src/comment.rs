//! Comment formatting.

/// Lines of a `/** ... */` documentation comment.
///
/// Single-line text stays on one line; longer text gets one ` * ` line
/// per line of input. A `*/` inside the text is written as `* /`.
pub fn doc_lines(text: &str) -> Vec<String> {
    let text = escape_close(text.trim());
    if !text.contains('\n') {
        return vec![format!("/** {} */", text)];
    }
    let mut lines = vec!["/**".to_string()];
    lines.extend(text.lines().map(star_line));
    lines.push(" */".to_string());
    lines
}

/// Format free text as a C block comment, e.g. for a prelude.
///
/// ```
/// use sfgen_codegen::block_comment;
///
/// let prelude = block_comment("Generated by sfgen.\nDo not edit.");
/// assert_eq!(prelude, "/*\n * Generated by sfgen.\n * Do not edit.\n */");
/// ```
pub fn block_comment(text: &str) -> String {
    let text = escape_close(text.trim_end());
    let mut lines = vec!["/*".to_string()];
    lines.extend(text.lines().map(star_line));
    lines.push(" */".to_string());
    lines.join("\n")
}

/// Break any `*/` so the text cannot end the enclosing comment.
fn escape_close(text: &str) -> String {
    text.replace("*/", "* /")
}

fn star_line(line: &str) -> String {
    let line = line.trim_end();
    if line.is_empty() {
        " *".to_string()
    } else {
        format!(" * {}", line)
    }
}
