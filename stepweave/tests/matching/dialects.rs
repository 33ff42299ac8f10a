use stepweave::format::Dialect;
use stepweave::{ContentMatch, Matcher, PatternDescriptor};

fn names(matches: &[ContentMatch]) -> Vec<(&str, &str, usize)> {
    matches
        .iter()
        .map(|m| (m.pattern_name.as_str(), m.value(), m.line))
        .collect()
}

#[test]
fn test_markdown_document() {
    let text = concat!(
        "# Setup\n",
        "\n",
        "Open [the console](https://console.example.com).\n",
        "Read [the guide](https://example.com/guide \"Guide\").\n",
        "![Console](images/console.png)\n",
        "Select **Project** and then **Settings**.\n",
        "Type \"my-project\" in the box.\n",
    );
    let matches = Matcher::for_dialect(Dialect::Markdown).find(text);
    assert_eq!(
        names(&matches),
        vec![
            ("goToUrl", "https://console.example.com", 3),
            ("checkHyperlink", "https://example.com/guide", 4),
            ("screenshotImage", "images/console.png", 5),
            ("clickOnscreenText", "Project", 6),
            ("findOnscreenText", "Settings", 6),
            ("typeText", "my-project", 7),
        ]
    );
}

#[test]
fn test_html_document() {
    let text = "<p>Visit <a class=\"x\" href=\"https://example.com\">us</a>, then tap <b>Go</b>.</p>\n<p><strong>Note</strong></p>\n";
    let matches = Matcher::for_dialect(Dialect::Html).find(text);
    assert_eq!(
        names(&matches),
        vec![
            ("checkHyperlink", "https://example.com", 1),
            ("clickOnscreenText", "Go", 1),
            ("findOnscreenText", "Note", 2),
        ]
    );
}

#[test]
fn test_asciidoc_document() {
    let text = "Click *Deploy*.\nThe *status* turns green.\nhttps://example.com[Docs]\n";
    let matches = Matcher::for_dialect(Dialect::Asciidoc).find(text);
    assert_eq!(
        names(&matches),
        vec![
            ("clickOnscreenText", "Deploy", 1),
            ("findOnscreenText", "status", 2),
            ("checkHyperlink", "https://example.com[Docs]", 3),
        ]
    );
}

#[test]
fn test_xml_document() {
    let text = "<p>See <xref href=\"https://example.com/ref\" format=\"html\"/>.</p>\n<cmd>Tap <uicontrol>Apply</uicontrol> or check <uicontrol>Log</uicontrol>.</cmd>\n";
    let matches = Matcher::for_dialect(Dialect::Xml).find(text);
    assert_eq!(
        names(&matches),
        vec![
            ("checkHyperlink", "https://example.com/ref", 1),
            ("clickUiControl", "Apply", 2),
            ("findUiControl", "Log", 2),
        ]
    );
}

#[test]
fn test_custom_pattern_runs_after_builtins() {
    let custom = PatternDescriptor {
        name: Some("waitSeconds".to_string()),
        value_group: Some(1),
        ..PatternDescriptor::new(r"[Ww]ait (\d+) seconds", "wait")
    };
    let matcher = Matcher::new(Dialect::Markdown, &[custom]).unwrap();
    assert_eq!(matcher.patterns().last().unwrap().name(), "waitSeconds");

    let matches = matcher.find("Click **Run**, then wait 10 seconds.\n");
    assert_eq!(
        names(&matches),
        vec![("clickOnscreenText", "Run", 1), ("waitSeconds", "10", 1)]
    );
    assert_eq!(matches[1].action(), Some("wait"));
    assert_eq!(matches[1].field("value"), Some("10"));
}

#[test]
fn test_nothing_to_match() {
    for dialect in Dialect::ALL {
        assert!(Matcher::for_dialect(dialect).find("plain prose only\n").is_empty());
        assert!(Matcher::for_dialect(dialect).find("").is_empty());
    }
}
