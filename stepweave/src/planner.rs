//! Update planner
//!
//! Turns one test and its bound steps into edit operations. Every statement is serialized
//! here, before anything touches the source, so a step that cannot be written fails the
//! whole plan instead of leaving a half-patched document.

use crate::binder::{Binding, BoundStep};
use crate::error::InjectError;
use crate::format::CommentFormat;
use crate::patch::apply_edits;
use crate::preview::render_preview;
use crate::serializer::{serialize_step, serialize_test, serialize_test_end, PayloadSyntax};
use crate::step::TestDeclaration;
use serde::Serialize;

/// Which side of the target line an insertion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// Before the line containing the offset
    #[default]
    InsertBefore,
    /// After the line containing the offset
    InsertAfter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditKind {
    TestStart,
    Step,
    TestEnd,
}

/// A single insertion into the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOperation {
    /// Byte offset into the original source
    pub offset: usize,
    pub content: String,
    pub anchor: Anchor,
    pub kind: EditKind,
}

impl EditOperation {
    pub fn new(offset: usize, content: String, anchor: Anchor, kind: EditKind) -> Self {
        EditOperation {
            offset,
            content,
            anchor,
            kind,
        }
    }
}

/// Plan the edits for one test
///
/// A test with an id or description gets start and end markers around its steps. A test
/// without steps yields nothing.
pub fn plan_test(
    test: &TestDeclaration,
    bound: &[BoundStep<'_, '_>],
    format: &CommentFormat,
    syntax: PayloadSyntax,
) -> Result<Vec<EditOperation>, InjectError> {
    let (Some(first), Some(last)) = (bound.first(), bound.last()) else {
        return Ok(Vec::new());
    };
    let with_markers = test.has_header();
    let mut operations = Vec::with_capacity(bound.len() + 2);

    if with_markers {
        operations.push(EditOperation::new(
            first.start_offset(),
            serialize_test(test, format, syntax),
            Anchor::InsertBefore,
            EditKind::TestStart,
        ));
    }

    for step in bound {
        let statement = serialize_step(step.step, format, syntax).map_err(|source| {
            InjectError::Serialization {
                index: step.index,
                source,
            }
        })?;
        let (offset, anchor) = match step.binding {
            Binding::Matched { content, .. } => (content.end, Anchor::InsertAfter),
            Binding::Unmatched {
                suggested_offset, ..
            } => (suggested_offset, Anchor::InsertBefore),
        };
        operations.push(EditOperation::new(offset, statement, anchor, EditKind::Step));
    }

    if with_markers {
        operations.push(EditOperation::new(
            last.end_offset() + 1,
            serialize_test_end(format),
            Anchor::InsertAfter,
            EditKind::TestEnd,
        ));
    }

    Ok(operations)
}

/// All operations of a request, consumed by exactly one of [`apply`](EditPlan::apply) or
/// [`preview`](EditPlan::preview)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    operations: Vec<EditOperation>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, operations: Vec<EditOperation>) {
        self.operations.extend(operations);
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of step statements, markers excluded
    pub fn step_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.kind == EditKind::Step)
            .count()
    }

    /// Patch the source
    pub fn apply(self, source: &str) -> String {
        apply_edits(source, &self.operations)
    }

    /// Render a diff-style preview; the source is untouched
    pub fn preview(self, source: &str, path: &str) -> String {
        render_preview(source, &self.operations, path)
    }
}
