//! Inline test injection for documentation sources
//!
//!     This crate binds structured test steps (`{"click": "Submit"}`, `{"goTo": "https://..."}`)
//!     to the prose and markup of a documentation file, and produces edits that embed each step
//!     as an inline comment right beside the text it verifies.
//!
//!     This is a pure lib, that is, it powers stepweave-cli but is shell agnostic: no code here
//!     prints, reads env vars or touches the filesystem. Callers hand in the source text and the
//!     parsed spec, and get back text.
//!
//! Pipeline
//!
//!     Leaves first:
//!     - registry: file extension → comment format (the tokens wrapping an inline statement)
//!     - format: comment formats and markup dialects (markdown, html, asciidoc, xml)
//!     - matcher: dialect regexes → deduplicated, offset-sorted content matches
//!     - binder: greedy highest-score assignment of steps to content matches
//!     - planner: bound steps → edit operations (test start, one per step, test end)
//!     - serializer: step / test payload rendering (json, yaml, xml attributes) and wrapping
//!     - patch: applies an edit list to the source exactly once
//!     - preview: diff-style rendering of the same edit list, no mutation
//!
//!     inject.rs wires the stages together behind the request/response contract, and
//!     validate.rs holds the step validators (structural and schema-backed).
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # CommentFormat and Dialect
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── <dialect>.rs        # Built-in markup patterns per dialect
//!     │   └── mod.rs
//!     ├── step.rs                 # Step / TestDeclaration / TestSpec, action detection
//!     ├── text.rs                 # Line arithmetic shared by matcher, patcher and preview
//!     ├── matcher.rs
//!     ├── binder.rs
//!     ├── planner.rs
//!     ├── serializer.rs
//!     ├── patch.rs
//!     ├── preview.rs
//!     ├── validate.rs
//!     ├── inject.rs
//!     └── lib.rs
//!
//! Offsets
//!
//!     All offsets are byte offsets into the UTF-8 source. Every offset the matcher produces
//!     sits on a character boundary, and the patcher only ever splices at line boundaries, so
//!     multi-byte text is safe.
//!
//! Heuristics
//!
//!     Markup recognition is regex based and therefore approximate: bold text in a table
//!     header is a `find` candidate just like a UI label. False positives and negatives are an
//!     accepted property of the approach, and unmatched steps are a normal, reported outcome.
//!
pub mod binder;
pub mod error;
pub mod format;
pub mod formats;
pub mod inject;
pub mod matcher;
pub mod patch;
pub mod planner;
pub mod preview;
pub mod registry;
pub mod serializer;
pub mod step;
pub mod text;
pub mod validate;

pub use binder::{bind_steps, Binding, BoundStep};
pub use error::{FormatError, InjectError, StepError};
pub use format::{CommentFormat, Dialect};
pub use inject::{inject, InjectOptions, InjectOutcome, InjectRequest, InjectResponse};
pub use matcher::{ContentMatch, Matcher, PatternDescriptor};
pub use planner::{plan_test, Anchor, EditKind, EditOperation, EditPlan};
pub use registry::FormatRegistry;
pub use serializer::{PayloadSyntax, SyntaxPreference};
pub use step::{Step, TestDeclaration, TestSpec};
pub use validate::{select_validator, validate_spec, ValidationReport, Validator};
