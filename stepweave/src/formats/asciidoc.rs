//! AsciiDoc patterns
//!
//! | Pattern             | Recognizes              | Action      | Value              |
//! |---------------------|-------------------------|-------------|--------------------|
//! | `checkHyperlink`    | `https://...[label]`    | `checkLink` | url (whole match)  |
//! | `clickOnscreenText` | click/tap `*Label*`     | `click`     | text               |
//! | `findOnscreenText`  | `*Label*`               | `find`      | text               |
//!
//! The hyperlink value includes the `[label]` suffix, so a `checkLink` step naming the bare
//! URL binds through substring similarity rather than exact equality.

use super::PatternSpec;

pub const PATTERNS: &[PatternSpec] = &[
    PatternSpec::new(
        "checkHyperlink",
        r"https?://[^\s\[]+\[[^\]]*\]",
        "checkLink",
        "url",
        0,
    ),
    PatternSpec::new(
        "clickOnscreenText",
        r"\b(?:[Cc]lick|[Tt]ap)\b\s+\*([^*]+)\*",
        "click",
        "text",
        1,
    ),
    PatternSpec::new("findOnscreenText", r"\*([^*]+)\*", "find", "text", 1),
];
