use crate::common::{run, run_with, spec};
use serde_json::json;
use stepweave::format::Dialect;
use stepweave::{inject, InjectOptions, InjectRequest, PatternDescriptor, SyntaxPreference};

#[test]
fn test_html_keeps_indentation() {
    let outcome = run(
        json!({"steps": [{"click": "Save"}]}),
        "<p>\n  Click <strong>Save</strong> now.\n</p>\n",
        "page.html",
        true,
    );
    assert_eq!(
        outcome.result,
        "<p>\n  Click <strong>Save</strong> now.\n  <!-- step {\"click\":\"Save\"} -->\n</p>\n"
    );
}

#[test]
fn test_mdx_uses_jsx_comments() {
    let outcome = run(
        json!({"steps": [{"click": "Next"}]}),
        "Click **Next**.\n",
        "intro.mdx",
        true,
    );
    assert_eq!(outcome.result, "Click **Next**.\n{/* step {\"click\":\"Next\"} */}\n");
}

#[test]
fn test_asciidoc_link_binds_on_the_bare_url() {
    let outcome = run(
        json!({"steps": [{"checkLink": "https://example.com/docs"}]}),
        "See https://example.com/docs[the docs] for more.\n",
        "guide.adoc",
        true,
    );
    assert!(outcome.unmatched_steps.is_empty());
    assert_eq!(
        outcome.result,
        "See https://example.com/docs[the docs] for more.\n// (step {\"checkLink\":\"https://example.com/docs\"})\n"
    );
}

#[test]
fn test_dita_with_attribute_payloads() {
    let outcome = run_with(
        json!({"steps": [{"click": "OK"}]}),
        "<step><cmd>Select the <uicontrol>OK</uicontrol> button.</cmd></step>\n",
        "task.dita",
        true,
        SyntaxPreference::Xml,
    );
    assert_eq!(
        outcome.result,
        "<step><cmd>Select the <uicontrol>OK</uicontrol> button.</cmd></step>\n<?doc-detective step click=\"OK\" ?>\n"
    );
}

#[test]
fn test_auto_syntax_follows_existing_statements() {
    let outcome = run_with(
        json!({"steps": [{"click": "Next"}]}),
        "<!-- step click: Login -->\n\nClick **Next** to move on.\n",
        "flow.md",
        true,
        SyntaxPreference::Auto,
    );
    assert_eq!(
        outcome.result,
        "<!-- step click: Login -->\n\nClick **Next** to move on.\n<!-- step click: Next -->\n"
    );
}

#[test]
fn test_custom_patterns_extend_the_dialect() {
    let pattern = PatternDescriptor::new(r"Wait (\d+) seconds", "wait");
    let request = InjectRequest::new(
        spec(json!({"steps": [{"wait": 5}]})),
        "Wait 5 seconds for the page.\n",
        "slow.md",
    )
    .with_options(InjectOptions {
        apply: true,
        ..InjectOptions::default()
    })
    .with_custom_patterns(Dialect::Markdown, vec![pattern.clone()]);

    let outcome = inject(&request).unwrap();
    assert!(outcome.unmatched_steps.is_empty());
    assert_eq!(outcome.result, "Wait 5 seconds for the page.\n<!-- step {\"wait\":5} -->\n");

    // patterns registered for another dialect do not apply
    let elsewhere = InjectRequest::new(
        spec(json!({"steps": [{"wait": 5}]})),
        "Wait 5 seconds for the page.\n",
        "slow.md",
    )
    .with_custom_patterns(Dialect::Html, vec![pattern]);
    assert_eq!(inject(&elsewhere).unwrap().unmatched_steps.len(), 1);
}
