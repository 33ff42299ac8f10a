//! HTML patterns
//!
//! | Pattern             | Recognizes                        | Action      | Value |
//! |---------------------|-----------------------------------|-------------|-------|
//! | `checkHyperlink`    | `<a ... href="https://...">`      | `checkLink` | url   |
//! | `clickOnscreenText` | click/tap `<strong>`/`<b>` label  | `click`     | text  |
//! | `findOnscreenText`  | `<strong>`/`<b>` label            | `find`      | text  |

use super::PatternSpec;

pub const PATTERNS: &[PatternSpec] = &[
    PatternSpec::new(
        "checkHyperlink",
        r#"<a\s+[^>]*href="(https?://[^"]+)"[^>]*>"#,
        "checkLink",
        "url",
        1,
    ),
    PatternSpec::new(
        "clickOnscreenText",
        r"\b(?:[Cc]lick|[Tt]ap)\b\s+<(?:strong|b)>(.+?)</(?:strong|b)>",
        "click",
        "text",
        1,
    ),
    PatternSpec::new(
        "findOnscreenText",
        r"<(?:strong|b)>(.+?)</(?:strong|b)>",
        "find",
        "text",
        1,
    ),
];
