//! Comment formats and markup dialects
//!
//! A [`CommentFormat`] is the set of literal tokens used to embed a payload inline in a given
//! kind of document: `<!-- step {...} -->` in Markdown, `<?doc-detective step ... ?>` in DITA,
//! and so on. A [`Dialect`] selects which markup patterns the matcher runs over the source.
//!
//! The two are resolved independently from the file extension: `.mdx` files use the Markdown
//! dialect but JSX comments.

use std::fmt;
use std::path::Path;

/// Literal open/close tokens for inline test statements
///
/// Tokens carry their own padding (`"<!-- step "`, `" -->"`) so that a single-line statement is
/// simply `open + payload + close`. Multi-line statements use the trimmed tokens on their own
/// lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFormat {
    name: String,
    extensions: Vec<String>,
    pub test_open: String,
    pub test_close: String,
    pub test_end_open: String,
    pub test_end_close: String,
    pub step_open: String,
    pub step_close: String,
}

impl CommentFormat {
    /// Build a format from a statement prefix and close token.
    ///
    /// `prefix` is everything before the keyword, separator included (`"<!-- "`, `"// ("`);
    /// `close` ends every statement (`" -->"`).
    pub fn new(name: &str, extensions: &[&str], prefix: &str, close: &str) -> Self {
        CommentFormat {
            name: name.to_string(),
            extensions: extensions.iter().map(|ext| normalize_extension(ext)).collect(),
            test_open: format!("{prefix}test "),
            test_close: close.to_string(),
            test_end_open: format!("{prefix}test end"),
            test_end_close: close.to_string(),
            step_open: format!("{prefix}step "),
            step_close: close.to_string(),
        }
    }

    /// `<!-- test ... -->`, the fallback for unknown extensions
    pub fn html_comment() -> Self {
        Self::new(
            "htmlComment",
            &[".md", ".markdown", ".html", ".htm"],
            "<!-- ",
            " -->",
        )
    }

    /// `{/* test ... */}` for MDX and JSX sources
    pub fn jsx_comment() -> Self {
        Self::new("jsxComment", &[".mdx", ".jsx", ".tsx"], "{/* ", " */}")
    }

    /// `<?doc-detective test ... ?>` for XML and DITA
    pub fn xml_processing_instruction() -> Self {
        Self::new(
            "xmlProcessingInstruction",
            &[".xml", ".dita", ".ditamap"],
            "<?doc-detective ",
            " ?>",
        )
    }

    /// `// (test ...)` for AsciiDoc
    pub fn asciidoc_comment() -> Self {
        Self::new(
            "asciidocComment",
            &[".adoc", ".asciidoc", ".asc"],
            "// (",
            ")",
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extensions this format applies to, lowercase with leading dot
    pub fn file_extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether this format applies to `extension` (case-insensitive, dot optional).
    pub fn applies_to(&self, extension: &str) -> bool {
        let normalized = normalize_extension(extension);
        self.extensions.iter().any(|ext| *ext == normalized)
    }
}

/// Markup dialect whose patterns the matcher runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Dialect {
    #[default]
    Markdown,
    Html,
    Asciidoc,
    Xml,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Markdown,
        Dialect::Html,
        Dialect::Asciidoc,
        Dialect::Xml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Markdown => "markdown",
            Dialect::Html => "html",
            Dialect::Asciidoc => "asciidoc",
            Dialect::Xml => "xml",
        }
    }

    /// Resolve a dialect by name
    pub fn parse(name: &str) -> Option<Dialect> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.name().eq_ignore_ascii_case(name))
    }

    /// Resolve the dialect for an extension, defaulting to Markdown.
    pub fn from_extension(extension: &str) -> Dialect {
        match normalize_extension(extension).as_str() {
            ".md" | ".markdown" | ".mdx" => Dialect::Markdown,
            ".html" | ".htm" => Dialect::Html,
            ".adoc" | ".asciidoc" | ".asc" => Dialect::Asciidoc,
            ".xml" | ".dita" | ".ditamap" => Dialect::Xml,
            _ => Dialect::Markdown,
        }
    }

    pub fn from_path(path: &str) -> Dialect {
        Self::from_extension(&extension_of(path))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract the extension of `path` with its leading dot, or an empty string.
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
