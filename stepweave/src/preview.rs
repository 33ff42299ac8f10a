//! Preview renderer
//!
//! Shows where each operation would land without patching anything:
//!
//!     --- docs/login.md
//!     +++ docs/login.md (with inline tests)
//!
//!     @@ line 3 @@
//!      context before
//!      Click **Login**.
//!     +<!-- step {"click":"Login"} -->
//!      context after
//!
//! Hunks follow ascending offset; operations sharing an offset keep their given order.

use crate::planner::{Anchor, EditOperation};
use crate::text::{line_indent, line_of_offset};

/// Context lines shown on each side of an insertion
pub const CONTEXT_LINES: usize = 2;

/// Render a diff-style preview of `operations` against `source`
pub fn render_preview(source: &str, operations: &[EditOperation], path: &str) -> String {
    let lines: Vec<&str> = match source.strip_suffix('\n') {
        Some(body) => body.split('\n').collect(),
        None if source.is_empty() => Vec::new(),
        None => source.split('\n').collect(),
    };

    let mut ordered: Vec<&EditOperation> = operations.iter().collect();
    ordered.sort_by_key(|op| op.offset);

    let mut out = vec![
        format!("--- {path}"),
        format!("+++ {path} (with inline tests)"),
        String::new(),
    ];

    for op in ordered {
        let line = line_of_offset(source, op.offset);
        // index of the first source line after the insertion
        let split = match op.anchor {
            Anchor::InsertBefore => line - 1,
            Anchor::InsertAfter => line,
        }
        .min(lines.len());

        out.push(format!("@@ line {line} @@"));
        for context in &lines[split.saturating_sub(CONTEXT_LINES)..split] {
            out.push(format!(" {context}"));
        }
        let proposed = format!("{}{}", line_indent(source, op.offset), op.content);
        for proposed_line in proposed.split('\n') {
            out.push(format!("+{proposed_line}"));
        }
        for context in &lines[split..(split + CONTEXT_LINES).min(lines.len())] {
            out.push(format!(" {context}"));
        }
        out.push(String::new());
    }

    out.join("\n")
}
