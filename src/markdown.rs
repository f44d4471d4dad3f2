/// Sanitize user input for embedding in a Markdown heading or list item.
/// Replaces newlines (which would break the block structure) with spaces.
pub(crate) fn sanitize_inline(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Escape a value for a double-quoted YAML scalar.
pub(crate) fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
