//! Built-in markup patterns
//!
//! Each dialect module holds a static table of [`PatternSpec`]s: a regex, the action it
//! implies and the capture group that carries the value. The tables are compiled into
//! [`MarkupPattern`]s per invocation by [`builtin_patterns`].
//!
//! Recognition is lexical. A pattern sees raw text, not a parsed document, so a bold phrase in
//! a heading is as much a `find` candidate as one in a paragraph.

pub mod asciidoc;
pub mod html;
pub mod markdown;
pub mod xml;

use crate::format::Dialect;
use crate::matcher::MarkupPattern;

/// Static description of a built-in pattern
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub name: &'static str,
    pub regex: &'static str,
    pub action: &'static str,
    /// Logical name of the value capture (`url`, `text`, ...)
    pub field: &'static str,
    /// Regex group holding the value; 0 is the whole match
    pub group: usize,
    /// A match directly preceded by this character is dropped
    pub rejected_prefix: Option<char>,
}

impl PatternSpec {
    pub const fn new(
        name: &'static str,
        regex: &'static str,
        action: &'static str,
        field: &'static str,
        group: usize,
    ) -> Self {
        PatternSpec {
            name,
            regex,
            action,
            field,
            group,
            rejected_prefix: None,
        }
    }

    pub const fn not_preceded_by(self, prefix: char) -> Self {
        PatternSpec {
            rejected_prefix: Some(prefix),
            ..self
        }
    }
}

/// Pattern table for a dialect
pub fn pattern_specs(dialect: Dialect) -> &'static [PatternSpec] {
    match dialect {
        Dialect::Markdown => markdown::PATTERNS,
        Dialect::Html => html::PATTERNS,
        Dialect::Asciidoc => asciidoc::PATTERNS,
        Dialect::Xml => xml::PATTERNS,
    }
}

/// Compile the built-in patterns of a dialect, in table order
pub fn builtin_patterns(dialect: Dialect) -> Vec<MarkupPattern> {
    pattern_specs(dialect)
        .iter()
        .map(MarkupPattern::from_spec)
        .collect()
}
