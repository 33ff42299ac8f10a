//! Line arithmetic over byte offsets
//!
//! Offsets past the end of the text clamp to the end. Lines are split on `\n` only; a `\r`
//! before it stays part of the line's content.

/// 1-based line number of the line containing `offset`
pub fn line_of_offset(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Byte offset where the line containing `offset` starts
pub fn line_start(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end]
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0)
}

/// Byte offset just past the line containing `offset`, newline included
///
/// For the last line without a trailing newline this is the end of the text.
pub fn line_end(text: &str, offset: usize) -> usize {
    let start = offset.min(text.len());
    text.as_bytes()[start..]
        .iter()
        .position(|b| *b == b'\n')
        .map(|pos| start + pos + 1)
        .unwrap_or(text.len())
}

/// Leading spaces and tabs of the line starting at `start`
pub fn leading_whitespace(text: &str, start: usize) -> &str {
    let rest = &text[start.min(text.len())..];
    let width = rest
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &rest[..width]
}

/// Indentation of the line containing `offset`
pub fn line_indent(text: &str, offset: usize) -> &str {
    leading_whitespace(text, line_start(text, offset))
}
