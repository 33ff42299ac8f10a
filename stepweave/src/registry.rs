//! Format registry for comment format discovery and selection
//!
//! This module provides a centralized registry for the comment formats inline statements can
//! be written in. Formats can be registered and retrieved by name, or resolved from a file
//! extension.

use crate::error::FormatError;
use crate::format::{extension_of, CommentFormat};
use std::collections::HashMap;

/// Name of the format used when no extension matches
pub const DEFAULT_FORMAT: &str = "htmlComment";

/// Registry of comment formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let format = registry.comment_format_for_path("docs/setup.adoc");
/// assert_eq!(format.name(), "asciidocComment");
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, CommentFormat>,
    fallback: CommentFormat,
}

impl FormatRegistry {
    /// Create a registry with no extension mappings
    ///
    /// Lookups still resolve to the HTML comment format.
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
            fallback: CommentFormat::html_comment(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register(&mut self, format: CommentFormat) {
        self.formats.insert(format.name().to_string(), format);
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&CommentFormat, FormatError> {
        self.formats
            .get(name)
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the comment format for a file extension
    ///
    /// Matching is case-insensitive and the leading dot is optional. Unknown extensions fall
    /// back to HTML comments; this lookup never fails. When several registered formats claim
    /// the same extension, the one with the smallest name wins so that resolution does not
    /// depend on hash order.
    pub fn comment_format_for_extension(&self, extension: &str) -> &CommentFormat {
        let mut candidates: Vec<&CommentFormat> = self
            .formats
            .values()
            .filter(|format| format.applies_to(extension))
            .collect();
        candidates.sort_by(|a, b| a.name().cmp(b.name()));
        candidates.first().copied().unwrap_or(&self.fallback)
    }

    /// Resolve the comment format from a file path
    pub fn comment_format_for_path(&self, path: &str) -> &CommentFormat {
        self.comment_format_for_extension(&extension_of(path))
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(CommentFormat::html_comment());
        registry.register(CommentFormat::jsx_comment());
        registry.register(CommentFormat::xml_processing_instruction());
        registry.register(CommentFormat::asciidoc_comment());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
