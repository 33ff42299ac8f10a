//! Markdown patterns
//!
//! | Pattern             | Recognizes                                  | Action       | Value        |
//! |---------------------|---------------------------------------------|--------------|--------------|
//! | `checkHyperlink`    | `[text](https://...)`, not an image         | `checkLink`  | url          |
//! | `clickOnscreenText` | click/tap/choose/select/check `**Label**`   | `click`      | text         |
//! | `findOnscreenText`  | `**Label**`                                 | `find`       | text         |
//! | `goToUrl`           | go to/open/visit/... `[text](https://...)`  | `goTo`       | url          |
//! | `typeText`          | press/enter/type `"keys"`                   | `type`       | keys         |
//! | `screenshotImage`   | `![alt](path)`                              | `screenshot` | path         |
//!
//! Bold text is matched lazily (`.+?`), so `**a** and **b**` yields two spans. Neither form
//! crosses a line break.

use super::PatternSpec;

pub const PATTERNS: &[PatternSpec] = &[
    PatternSpec::new(
        "checkHyperlink",
        r#"\[[^\]]+\]\(\s*(https?://[^\s)]+)(?:\s+"[^"]*")?\s*\)"#,
        "checkLink",
        "url",
        1,
    )
    .not_preceded_by('!'),
    PatternSpec::new(
        "clickOnscreenText",
        r"\b(?:[Cc]lick|[Tt]ap|[Ll]eft-click|[Cc]hoose|[Ss]elect|[Cc]heck)\b\s+\*\*(.+?)\*\*",
        "click",
        "text",
        1,
    ),
    PatternSpec::new("findOnscreenText", r"\*\*(.+?)\*\*", "find", "text", 1),
    PatternSpec::new(
        "goToUrl",
        r#"\b(?:[Gg]o\s+to|[Oo]pen|[Nn]avigate\s+to|[Vv]isit|[Aa]ccess|[Pp]roceed\s+to|[Ll]aunch)\b\s+\[[^\]]+\]\(\s*(https?://[^\s)]+)(?:\s+"[^"]*")?\s*\)"#,
        "goTo",
        "url",
        1,
    ),
    PatternSpec::new(
        "typeText",
        r#"\b(?:[Pp]ress|[Ee]nter|[Tt]ype)\b\s+"([^"]+)""#,
        "type",
        "keys",
        1,
    ),
    PatternSpec::new(
        "screenshotImage",
        r#"!\[[^\]]*\]\(\s*([^\s)]+)(?:\s+"[^"]*")?\s*\)"#,
        "screenshot",
        "path",
        1,
    ),
];
