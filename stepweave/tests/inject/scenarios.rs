use crate::common::{run, spec};
use serde_json::json;
use stepweave::format::Dialect;
use stepweave::{bind_steps, plan_test, Anchor, EditKind, Matcher, PayloadSyntax, FormatRegistry};

#[test]
fn test_click_binds_exactly_and_lands_after_the_line() {
    let source = "Click **Submit** to continue.";
    let spec = spec(json!({"steps": [{"click": "Submit"}]}));
    let test = &spec.tests()[0];

    let matches = Matcher::for_dialect(Dialect::Markdown).find(source);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pattern_name, "clickOnscreenText");

    let bound = bind_steps(&test.steps, &matches);
    assert_eq!(bound[0].confidence(), 1.0);

    let registry = FormatRegistry::with_defaults();
    let format = registry.comment_format_for_path("guide.md");
    let operations = plan_test(test, &bound, format, PayloadSyntax::Json).unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].kind, EditKind::Step);
    assert_eq!(operations[0].anchor, Anchor::InsertAfter);
    assert_eq!(operations[0].content, r#"<!-- step {"click":"Submit"} -->"#);

    let outcome = run(json!({"steps": [{"click": "Submit"}]}), source, "guide.md", true);
    assert_eq!(
        outcome.result,
        "Click **Submit** to continue.\n<!-- step {\"click\":\"Submit\"} -->\n"
    );
    assert_eq!(outcome.step_count, 1);
    assert!(outcome.unmatched_steps.is_empty());
}

#[test]
fn test_unmatched_step_is_reported_and_placed_at_the_top() {
    let source = "The Total: $42 is shown.\n";
    let outcome = run(json!({"steps": [{"find": "Total: $42"}]}), source, "cart.md", true);

    assert_eq!(outcome.step_count, 1);
    assert_eq!(outcome.unmatched_steps.len(), 1);
    let group = &outcome.unmatched_steps[0];
    assert_eq!(group.test_id, None);
    assert_eq!(group.steps.len(), 1);
    assert_eq!(group.steps[0].step_index, 0);
    assert_eq!(group.steps[0].action.as_deref(), Some("find"));
    assert_eq!(group.steps[0].suggested_line, 1);
    assert_eq!(
        outcome.result,
        "<!-- step {\"find\":\"Total: $42\"} -->\nThe Total: $42 is shown.\n"
    );
}

#[test]
fn test_named_test_is_wrapped_in_markers() {
    let source = "# Login\n\nGo to [the app](https://example.com/app).\n\nClick **Sign in**.\n";
    let spec_value = json!({
        "testId": "t1",
        "steps": [{"goTo": "https://example.com/app"}, {"click": "Sign in"}]
    });

    let outcome = run(spec_value.clone(), source, "login.md", true);
    assert_eq!(outcome.step_count, 2);
    assert!(outcome.unmatched_steps.is_empty());
    assert_eq!(
        outcome.result,
        concat!(
            "# Login\n",
            "\n",
            "<!-- test {\"testId\":\"t1\"} -->\n",
            "Go to [the app](https://example.com/app).\n",
            "<!-- step {\"goTo\":\"https://example.com/app\"} -->\n",
            "\n",
            "Click **Sign in**.\n",
            "<!-- step {\"click\":\"Sign in\"} -->\n",
            "<!-- test end -->\n",
        )
    );

    let preview = run(spec_value, source, "login.md", false);
    assert!(!preview.applied);
    let start = preview.result.find("<!-- test {").unwrap();
    let first_step = preview.result.find("<!-- step {\"goTo\"").unwrap();
    let last_step = preview.result.find("<!-- step {\"click\"").unwrap();
    let end = preview.result.find("<!-- test end -->").unwrap();
    assert!(start < first_step && first_step < last_step && last_step < end);
}

#[test]
fn test_each_test_binds_against_the_whole_document() {
    let source = "Click **A**.\nClick **B**.\n";
    let outcome = run(
        json!({"tests": [
            {"testId": "first", "steps": [{"click": "A"}]},
            {"testId": "second", "steps": [{"click": "B"}]}
        ]}),
        source,
        "two.md",
        true,
    );
    assert_eq!(
        outcome.result,
        concat!(
            "<!-- test {\"testId\":\"first\"} -->\n",
            "Click **A**.\n",
            "<!-- step {\"click\":\"A\"} -->\n",
            "<!-- test end -->\n",
            "<!-- test {\"testId\":\"second\"} -->\n",
            "Click **B**.\n",
            "<!-- step {\"click\":\"B\"} -->\n",
            "<!-- test end -->\n",
        )
    );
}

#[test]
fn test_unmatched_after_a_bound_step_reports_its_line() {
    let source = "Intro.\nClick **Save**.\nSome text.\n";
    let outcome = run(
        json!({"testId": "save", "steps": [{"click": "Save"}, {"find": "Missing"}]}),
        source,
        "save.md",
        false,
    );
    assert_eq!(outcome.step_count, 2);
    let group = &outcome.unmatched_steps[0];
    assert_eq!(group.test_id.as_deref(), Some("save"));
    assert_eq!(group.steps[0].step_index, 1);
    assert_eq!(group.steps[0].suggested_line, 2);
}

#[test]
fn test_empty_inputs_leave_the_source_alone() {
    let source = "Nothing to see.\n";
    let no_tests = run(json!({"tests": []}), source, "a.md", true);
    assert_eq!(no_tests.result, source);
    assert_eq!(no_tests.step_count, 0);

    let no_steps = run(json!({"testId": "empty", "steps": []}), source, "a.md", true);
    assert_eq!(no_steps.result, source);
    assert!(no_steps.unmatched_steps.is_empty());
}

#[test]
fn test_preview_of_a_single_step() {
    let outcome = run(
        json!({"steps": [{"click": "Submit"}]}),
        "Click **Submit** to continue.\n",
        "guide.md",
        false,
    );
    assert_eq!(
        outcome.result,
        concat!(
            "--- guide.md\n",
            "+++ guide.md (with inline tests)\n",
            "\n",
            "@@ line 1 @@\n",
            " Click **Submit** to continue.\n",
            "+<!-- step {\"click\":\"Submit\"} -->\n",
        )
    );
}
