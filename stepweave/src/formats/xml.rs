//! DITA / XML patterns

use super::PatternSpec;

pub const PATTERNS: &[PatternSpec] = &[
    PatternSpec::new(
        "checkHyperlink",
        r#"<xref\s+[^>]*href="(https?://[^"]+)"[^>]*>"#,
        "checkLink",
        "url",
        1,
    ),
    PatternSpec::new(
        "clickUiControl",
        r"(?:[Cc]lick|[Tt]ap|[Ss]elect)\s+(?:the\s+)?<uicontrol>([^<]+)</uicontrol>",
        "click",
        "text",
        1,
    ),
    PatternSpec::new(
        "findUiControl",
        r"<uicontrol>([^<]+)</uicontrol>",
        "find",
        "text",
        1,
    ),
];
