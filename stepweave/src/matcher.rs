//! Markup matcher
//!
//! Runs every pattern of a dialect over the raw source and returns the spans a step could be
//! bound to. The result is sorted by start offset and pairwise non-containing: when one span
//! lies inside another, only the larger survives. Partial overlaps are kept.

use crate::error::InjectError;
use crate::format::Dialect;
use crate::formats::{builtin_patterns, PatternSpec};
use crate::text::line_of_offset;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Capture field name used by caller-supplied patterns
pub const CUSTOM_FIELD: &str = "value";

/// A caller-supplied pattern, merged after the built-in ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub regex: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_group: Option<usize>,
}

impl PatternDescriptor {
    pub fn new(regex: &str, action: &str) -> Self {
        PatternDescriptor {
            name: None,
            regex: regex.to_string(),
            action: action.to_string(),
            value_group: None,
        }
    }

    /// Name reported on matches, `custom:<action>` unless given
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("custom:{}", self.action))
    }
}

/// A compiled pattern
#[derive(Debug, Clone)]
pub struct MarkupPattern {
    name: String,
    regex: Regex,
    actions: Vec<String>,
    capture_groups: Vec<(String, usize)>,
    rejected_prefix: Option<char>,
}

impl MarkupPattern {
    /// Compile a built-in table entry
    ///
    /// Built-in tables are static and covered by tests, so a compile failure here is a bug.
    pub fn from_spec(spec: &PatternSpec) -> Self {
        MarkupPattern {
            name: spec.name.to_string(),
            regex: Regex::new(spec.regex).expect("built-in pattern compiles"),
            actions: vec![spec.action.to_string()],
            capture_groups: vec![(spec.field.to_string(), spec.group)],
            rejected_prefix: spec.rejected_prefix,
        }
    }

    /// Compile a caller-supplied pattern
    pub fn custom(descriptor: &PatternDescriptor) -> Result<Self, InjectError> {
        let name = descriptor.display_name();
        let regex = Regex::new(&descriptor.regex).map_err(|source| InjectError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        let group = descriptor.value_group.unwrap_or(1);
        if group >= regex.captures_len() {
            return Err(InjectError::InvalidInput(format!(
                "pattern '{name}' has no capture group {group}"
            )));
        }

        Ok(MarkupPattern {
            name,
            regex,
            actions: vec![descriptor.action.clone()],
            capture_groups: vec![(CUSTOM_FIELD.to_string(), group)],
            rejected_prefix: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    fn scan(&self, text: &str, out: &mut Vec<ContentMatch>) {
        for captures in self.regex.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if let Some(rejected) = self.rejected_prefix {
                if text[..whole.start()].chars().next_back() == Some(rejected) {
                    continue;
                }
            }

            out.push(ContentMatch {
                pattern_name: self.name.clone(),
                actions: self.actions.clone(),
                capture_groups: self.capture_groups.clone(),
                match_text: whole.as_str().to_string(),
                groups: captures
                    .iter()
                    .map(|group| group.map(|g| g.as_str().to_string()))
                    .collect(),
                start: whole.start(),
                end: whole.end(),
                line: line_of_offset(text, whole.start()),
            });
        }
    }
}

/// One pattern hit in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMatch {
    pub pattern_name: String,
    pub actions: Vec<String>,
    /// Logical field name → regex group (0 is the whole match)
    pub capture_groups: Vec<(String, usize)>,
    pub match_text: String,
    /// Every regex group by index, group 0 included
    pub groups: Vec<Option<String>>,
    pub start: usize,
    pub end: usize,
    /// 1-based line of `start`
    pub line: usize,
}

impl ContentMatch {
    /// The action this match implies for binding
    pub fn action(&self) -> Option<&str> {
        self.actions.first().map(String::as_str)
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// Captured text of a logical field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.capture_groups
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, index)| self.group(*index))
    }

    /// The value compared against step text: the first capture field, else the whole match
    pub fn value(&self) -> &str {
        self.capture_groups
            .first()
            .and_then(|(_, index)| self.group(*index))
            .unwrap_or(&self.match_text)
    }

    /// Whether `other` lies entirely within this match
    pub fn contains(&self, other: &ContentMatch) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

/// Pattern set for one dialect, built-ins first
#[derive(Debug, Clone)]
pub struct Matcher {
    dialect: Dialect,
    patterns: Vec<MarkupPattern>,
}

impl Matcher {
    /// Build a matcher from the dialect's built-ins plus caller patterns
    pub fn new(dialect: Dialect, custom: &[PatternDescriptor]) -> Result<Self, InjectError> {
        let mut patterns = builtin_patterns(dialect);
        for descriptor in custom {
            patterns.push(MarkupPattern::custom(descriptor)?);
        }
        Ok(Matcher { dialect, patterns })
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Matcher {
            dialect,
            patterns: builtin_patterns(dialect),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn patterns(&self) -> &[MarkupPattern] {
        &self.patterns
    }

    /// Find all candidate spans in `text`
    pub fn find(&self, text: &str) -> Vec<ContentMatch> {
        let mut found = Vec::new();
        for pattern in &self.patterns {
            pattern.scan(text, &mut found);
        }
        let raw = found.len();

        // stable: equal starts keep pattern order
        found.sort_by_key(|m| m.start);

        let mut kept: Vec<ContentMatch> = Vec::with_capacity(found.len());
        for candidate in found {
            if kept.iter().any(|existing| existing.contains(&candidate)) {
                continue;
            }
            kept.retain(|existing| !candidate.contains(existing));
            kept.push(candidate);
        }

        debug!(
            "{} matcher: {} raw matches, {} after deduplication",
            self.dialect,
            raw,
            kept.len()
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(dialect: Dialect, text: &str) -> Vec<ContentMatch> {
        Matcher::for_dialect(dialect).find(text)
    }

    fn summary(matches: &[ContentMatch]) -> Vec<(&str, &str)> {
        matches
            .iter()
            .map(|m| (m.pattern_name.as_str(), m.value()))
            .collect()
    }

    #[test]
    fn test_click_swallows_bold() {
        let matches = find(Dialect::Markdown, "Click **Submit** to continue.");
        assert_eq!(summary(&matches), vec![("clickOnscreenText", "Submit")]);
        let m = &matches[0];
        assert_eq!(m.start, 0);
        assert_eq!(m.end, "Click **Submit**".len());
        assert_eq!(m.line, 1);
        assert_eq!(m.action(), Some("click"));
        assert_eq!(m.field("text"), Some("Submit"));
    }

    #[test]
    fn test_bold_is_lazy() {
        let matches = find(Dialect::Markdown, "**One** and **Two**");
        assert_eq!(
            summary(&matches),
            vec![("findOnscreenText", "One"), ("findOnscreenText", "Two")]
        );
    }

    #[test]
    fn test_go_to_swallows_link() {
        let matches = find(
            Dialect::Markdown,
            "Go to [the site](https://example.com \"Home\").",
        );
        assert_eq!(summary(&matches), vec![("goToUrl", "https://example.com")]);
    }

    #[test]
    fn test_image_is_not_a_link() {
        let matches = find(Dialect::Markdown, "![diagram](https://example.com/a.png)");
        assert_eq!(
            summary(&matches),
            vec![("screenshotImage", "https://example.com/a.png")]
        );
    }

    #[test]
    fn test_link_and_type() {
        let text = "See [docs](https://docs.example.com).\nType \"hello world\" in the box.";
        let matches = find(Dialect::Markdown, text);
        assert_eq!(
            summary(&matches),
            vec![
                ("checkHyperlink", "https://docs.example.com"),
                ("typeText", "hello world")
            ]
        );
        assert_eq!(matches[1].line, 2);
        assert_eq!(matches[1].field("keys"), Some("hello world"));
    }

    #[test]
    fn test_html_patterns() {
        let text = r#"<p>Tap <b>Save</b>, then see <a class="x" href="https://a.io/x">docs</a> and <strong>Done</strong>.</p>"#;
        assert_eq!(
            summary(&find(Dialect::Html, text)),
            vec![
                ("clickOnscreenText", "Save"),
                ("checkHyperlink", "https://a.io/x"),
                ("findOnscreenText", "Done")
            ]
        );
    }

    #[test]
    fn test_asciidoc_link_value_is_whole_match() {
        let matches = find(Dialect::Asciidoc, "Visit https://example.com[Example] now.");
        assert_eq!(
            summary(&matches),
            vec![("checkHyperlink", "https://example.com[Example]")]
        );
    }

    #[test]
    fn test_asciidoc_click() {
        let matches = find(Dialect::Asciidoc, "Click *Apply* and check *Status*.");
        assert_eq!(
            summary(&matches),
            vec![("clickOnscreenText", "Apply"), ("findOnscreenText", "Status")]
        );
    }

    #[test]
    fn test_xml_uicontrol() {
        let text = "<step><cmd>Select the <uicontrol>Options</uicontrol> menu.</cmd></step>\n<p><uicontrol>OK</uicontrol></p>";
        let matches = find(Dialect::Xml, text);
        assert_eq!(
            summary(&matches),
            vec![("clickUiControl", "Options"), ("findUiControl", "OK")]
        );
        assert_eq!(matches[1].line, 2);
    }

    #[test]
    fn test_no_matches() {
        assert!(find(Dialect::Markdown, "Nothing to see here.").is_empty());
        assert!(find(Dialect::Markdown, "").is_empty());
    }

    #[test]
    fn test_custom_pattern_appended() {
        let custom = vec![PatternDescriptor::new(r"Press the (\w+) key", "type")];
        let matcher = Matcher::new(Dialect::Markdown, &custom).unwrap();
        let matches = matcher.find("Press the Enter key.");
        assert_eq!(summary(&matches), vec![("custom:type", "Enter")]);
        assert_eq!(matches[0].field(CUSTOM_FIELD), Some("Enter"));
    }

    #[test]
    fn test_custom_pattern_value_group() {
        let custom = vec![PatternDescriptor {
            name: Some("menuPath".into()),
            regex: r"menu (\w+) > (\w+)".into(),
            action: "click".into(),
            value_group: Some(2),
        }];
        let matcher = Matcher::new(Dialect::Html, &custom).unwrap();
        let matches = matcher.find("Open menu File > Export");
        assert_eq!(summary(&matches), vec![("menuPath", "Export")]);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let custom = vec![PatternDescriptor::new(r"(unclosed", "find")];
        let err = Matcher::new(Dialect::Markdown, &custom).unwrap_err();
        assert!(matches!(err, InjectError::InvalidPattern { .. }));
        assert_eq!(err.exit_code(), 2);

        let custom = vec![PatternDescriptor::new(r"no groups", "find")];
        assert!(Matcher::new(Dialect::Markdown, &custom).is_err());
    }

    #[test]
    fn test_partial_overlap_is_kept() {
        let custom = vec![PatternDescriptor {
            name: None,
            regex: r"(Submit\*\* to)".into(),
            action: "find".into(),
            value_group: None,
        }];
        let matcher = Matcher::new(Dialect::Markdown, &custom).unwrap();
        let matches = matcher.find("Click **Submit** to go");
        assert_eq!(matches.len(), 2);
        assert!(matches[0].start < matches[1].start);
    }
}
