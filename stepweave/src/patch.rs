//! Batch patcher
//!
//! Positions are resolved against the original text first, then the insertions are spliced
//! from the highest position down, so no insertion shifts a position not yet used. Operations
//! that land on the same position appear in the output in the order they were given.

use crate::planner::{Anchor, EditOperation};
use crate::text::{line_end, line_indent, line_start};

struct Insertion {
    position: usize,
    order: usize,
    text: String,
}

/// Byte position an operation inserts at
pub fn insertion_point(source: &str, op: &EditOperation) -> usize {
    match op.anchor {
        Anchor::InsertBefore => line_start(source, op.offset),
        Anchor::InsertAfter => line_end(source, op.offset),
    }
}

/// Apply all operations to `source` and return the patched text
///
/// Each insertion is a full line carrying the indentation of the line it is anchored to.
pub fn apply_edits(source: &str, operations: &[EditOperation]) -> String {
    if operations.is_empty() {
        return source.to_string();
    }

    let unterminated = !source.is_empty() && !source.ends_with('\n');
    let mut insertions: Vec<Insertion> = operations
        .iter()
        .enumerate()
        .map(|(order, op)| Insertion {
            position: insertion_point(source, op),
            order,
            text: format!("{}{}\n", line_indent(source, op.offset), op.content),
        })
        .collect();

    // The first insertion after an unterminated last line closes that line.
    if unterminated {
        if let Some(first_at_end) = insertions
            .iter_mut()
            .filter(|insertion| insertion.position == source.len())
            .min_by_key(|insertion| insertion.order)
        {
            first_at_end.text.insert(0, '\n');
        }
    }

    insertions.sort_by(|a, b| {
        b.position
            .cmp(&a.position)
            .then_with(|| b.order.cmp(&a.order))
    });

    let extra: usize = insertions.iter().map(|insertion| insertion.text.len()).sum();
    let mut result = String::with_capacity(source.len() + extra);
    result.push_str(source);
    for insertion in &insertions {
        result.insert_str(insertion.position, &insertion.text);
    }
    result
}
