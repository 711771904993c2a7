//! Cleanup for raw model replies.

/// Strip a Markdown code fence wrapped around a whole reply.
///
/// Models often answer "LaTeX only" requests as ```` ```latex ... ``` ````.
/// Text without a leading fence is returned trimmed but otherwise untouched.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`latex`, `tex`, ...) on the opening line.
    let body = match after_open.split_once('\n') {
        Some((_, rest)) => rest,
        None => return single_line_fence(after_open),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// A fence opened and closed on one line, where no newline separates the
/// info string from the content. An opening fence alone holds nothing.
fn single_line_fence(after_open: &str) -> &str {
    let Some(inner) = after_open.trim_end().strip_suffix("```") else {
        return "";
    };

    match inner.split_once(char::is_whitespace) {
        Some((info, rest)) if !info.is_empty() && info.chars().all(|c| c.is_ascii_alphanumeric()) => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}
