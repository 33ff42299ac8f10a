//! Property tests over generated documents and edit lists

use proptest::prelude::*;
use serde_json::{Map, Value};
use stepweave::format::Dialect;
use stepweave::patch::apply_edits;
use stepweave::preview::render_preview;
use stepweave::serializer::render_payload;
use stepweave::{bind_steps, Anchor, EditKind, EditOperation, Matcher, PayloadSyntax, Step};

const FRAGMENTS: &[&str] = &[
    "Click ",
    "select ",
    "**Save**",
    "**",
    " and ",
    "text ",
    "\n",
    "  ",
    "[docs](https://example.com/docs)",
    "go to ",
    "Press \"Enter\" ",
    "![shot](img/a.png)",
    "*",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.concat())
}

fn step() -> impl Strategy<Value = Step> {
    prop::sample::select(vec![
        ("click", "Save"),
        ("find", "Save"),
        ("find", "Other"),
        ("goTo", "https://example.com/docs"),
        ("checkLink", "https://example.com/docs"),
        ("type", "Enter"),
        ("screenshot", "img/a.png"),
    ])
    .prop_map(|(action, value)| Step::action_only(action, value))
}

fn operations() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..400, any::<bool>()), 0..8)
}

fn to_ops(source: &str, raw: &[(usize, bool)]) -> Vec<EditOperation> {
    raw.iter()
        .enumerate()
        .map(|(i, (offset, after))| {
            let anchor = if *after {
                Anchor::InsertAfter
            } else {
                Anchor::InsertBefore
            };
            EditOperation::new(
                offset % (source.len() + 3),
                format!("<!-- step {i} -->"),
                anchor,
                EditKind::Step,
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn test_matches_are_sorted_and_never_nested(text in document()) {
        let matches = Matcher::for_dialect(Dialect::Markdown).find(&text);
        for pair in matches.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
        for (i, a) in matches.iter().enumerate() {
            for b in &matches[i + 1..] {
                prop_assert!(!a.contains(b) && !b.contains(a));
            }
        }
    }

    #[test]
    fn test_no_match_is_bound_twice(text in document(), steps in prop::collection::vec(step(), 0..10)) {
        let matches = Matcher::for_dialect(Dialect::Markdown).find(&text);
        let bound = bind_steps(&steps, &matches);
        prop_assert_eq!(bound.len(), steps.len());

        let mut starts: Vec<usize> = bound
            .iter()
            .filter_map(|b| b.content())
            .map(|content| content.start)
            .collect();
        let total = starts.len();
        starts.sort_unstable();
        starts.dedup();
        prop_assert_eq!(starts.len(), total);
    }

    #[test]
    fn test_each_insertion_adds_one_line(text in document(), raw in operations()) {
        let ops = to_ops(&text, &raw);
        let patched = apply_edits(&text, &ops);
        prop_assert_eq!(patched.lines().count(), text.lines().count() + ops.len());

        let mut reversed = ops.clone();
        reversed.reverse();
        let patched_reversed = apply_edits(&text, &reversed);
        prop_assert_eq!(patched_reversed.lines().count(), patched.lines().count());
    }

    #[test]
    fn test_preview_is_repeatable(text in document(), raw in operations()) {
        let ops = to_ops(&text, &raw);
        let before = text.clone();
        let first = render_preview(&text, &ops, "doc.md");
        let second = render_preview(&text, &ops, "doc.md");
        prop_assert_eq!(first, second);
        prop_assert_eq!(text, before);
    }

    #[test]
    fn test_json_payload_parses_back(
        entries in prop::collection::vec(("[a-zA-Z]{1,8}", "[ -~]{0,12}", any::<i32>()), 0..6)
    ) {
        let mut fields = Map::new();
        for (key, text, number) in entries {
            fields.insert(key.clone(), Value::from(text));
            fields.insert(format!("{key}N"), Value::from(number));
        }
        let payload = render_payload(&fields, PayloadSyntax::Json);
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        prop_assert_eq!(parsed, Value::Object(fields));
    }
}
