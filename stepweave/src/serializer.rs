//! Inline statement serializer
//!
//! A statement is a comment wrapper around a payload:
//!
//!     <!-- step {"click":"Submit"} -->
//!     <?doc-detective step click="Submit" ?>
//!     // (step
//!     goTo:
//!       url: https://example.com
//!     )
//!
//! Payloads come in three syntaxes. JSON is compact with key order kept. XML is space-joined
//! attributes. YAML is one line per key with a single nested level; anything deeper is written
//! as inline JSON. A payload containing a newline is wrapped with the trimmed open and close
//! tokens on their own lines.

use crate::error::StepError;
use crate::format::CommentFormat;
use crate::step::{Step, TestDeclaration};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Characters that force a YAML scalar into double quotes
const YAML_SPECIAL: &[char] = &[
    ':', '#', '[', ']', '{', '}', '|', '>', '!', '&', '*', '?', '\'', '"',
];

/// Comment wrappers of existing statements, inner payload in group 1
static STATEMENT_WRAPPERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"<!--\s*(?:test|step)\s+((?s:.*?))\s*-->",
        r"\{\s*/\*\s*(?:test|step)\s+((?s:.*?))\s*\*/\s*\}",
        r"<\?doc-detective\s+(?:test|step)\s+((?s:.*?))\s*\?>",
        r"//\s*\(\s*(?:test|step)\s+((?s:.*?))\s*\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("statement wrapper compiles"))
    .collect()
});

static JSON_KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"?\w+"?\s*:\s*[{\["']"#).expect("json probe compiles"));
static XML_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\w+\s*=\s*["']?[^{]"#).expect("xml probe compiles"));
static YAML_BLOCK_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+:\s*\n|\n\s+\w+:").expect("yaml probe compiles"));
static YAML_INLINE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+:\s+[^{]").expect("yaml probe compiles"));

/// Payload syntax of an inline statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSyntax {
    #[default]
    Json,
    Yaml,
    Xml,
}

impl PayloadSyntax {
    pub fn name(&self) -> &'static str {
        match self {
            PayloadSyntax::Json => "json",
            PayloadSyntax::Yaml => "yaml",
            PayloadSyntax::Xml => "xml",
        }
    }

    /// Infer the syntax of an existing statement, wrapper optional
    ///
    /// Ambiguous or empty input is JSON.
    pub fn detect(statement: &str) -> PayloadSyntax {
        let mut content = statement.trim();
        for wrapper in STATEMENT_WRAPPERS.iter() {
            if let Some(inner) = wrapper.captures(content).and_then(|c| c.get(1)) {
                content = inner.as_str().trim();
            }
        }

        if content.starts_with('{') || JSON_KEY_VALUE.is_match(content) {
            PayloadSyntax::Json
        } else if XML_ATTRIBUTE.is_match(content) {
            PayloadSyntax::Xml
        } else if YAML_BLOCK_KEY.is_match(content)
            || (YAML_INLINE_KEY.is_match(content) && !content.contains('{'))
        {
            PayloadSyntax::Yaml
        } else {
            PayloadSyntax::Json
        }
    }

    /// Syntax of the first test or step statement in a document, if any
    pub fn detect_in_document(source: &str) -> Option<PayloadSyntax> {
        STATEMENT_WRAPPERS
            .iter()
            .filter_map(|wrapper| {
                wrapper.captures_iter(source).find_map(|captures| {
                    let inner = captures.get(1)?;
                    if inner.as_str().trim() == "end" {
                        return None;
                    }
                    let start = captures.get(0)?.start();
                    Some((start, inner.as_str()))
                })
            })
            .min_by_key(|(start, _)| *start)
            .map(|(_, inner)| PayloadSyntax::detect(inner))
    }
}

impl fmt::Display for PayloadSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PayloadSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(PayloadSyntax::Json),
            "yaml" => Ok(PayloadSyntax::Yaml),
            "xml" => Ok(PayloadSyntax::Xml),
            other => Err(format!("unknown syntax '{other}' (expected json, yaml or xml)")),
        }
    }
}

/// Requested syntax, `auto` follows the document's existing statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxPreference {
    #[default]
    Json,
    Yaml,
    Xml,
    Auto,
}

impl SyntaxPreference {
    pub fn resolve(&self, source: &str) -> PayloadSyntax {
        match self {
            SyntaxPreference::Json => PayloadSyntax::Json,
            SyntaxPreference::Yaml => PayloadSyntax::Yaml,
            SyntaxPreference::Xml => PayloadSyntax::Xml,
            SyntaxPreference::Auto => {
                PayloadSyntax::detect_in_document(source).unwrap_or_default()
            }
        }
    }
}

impl FromStr for SyntaxPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(SyntaxPreference::Auto);
        }
        s.parse::<PayloadSyntax>().map(|syntax| match syntax {
            PayloadSyntax::Json => SyntaxPreference::Json,
            PayloadSyntax::Yaml => SyntaxPreference::Yaml,
            PayloadSyntax::Xml => SyntaxPreference::Xml,
        })
    }
}

/// Render an object in the given payload syntax
pub fn render_payload(fields: &Map<String, Value>, syntax: PayloadSyntax) -> String {
    match syntax {
        PayloadSyntax::Json => Value::Object(fields.clone()).to_string(),
        PayloadSyntax::Xml => fields
            .iter()
            .map(|(key, value)| match value {
                Value::String(text) => format!("{key}=\"{text}\""),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(" "),
        PayloadSyntax::Yaml => {
            let mut lines = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                match value {
                    Value::Object(nested) => {
                        lines.push(format!("{key}:"));
                        for (sub_key, sub_value) in nested {
                            lines.push(format!("  {sub_key}: {}", yaml_scalar(sub_value)));
                        }
                    }
                    other => lines.push(format!("{key}: {}", yaml_scalar(other))),
                }
            }
            lines.join("\n")
        }
    }
}

/// Strings are quoted only when needed; everything else is JSON.
fn yaml_scalar(value: &Value) -> String {
    match value {
        Value::String(text) if text.contains(YAML_SPECIAL) || text.contains('\n') => {
            format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Wrap a payload in open/close tokens
pub fn wrap(payload: &str, open: &str, close: &str) -> String {
    if payload.contains('\n') {
        format!("{}\n{}\n{}", open.trim(), payload, close.trim())
    } else {
        format!("{open}{payload}{close}")
    }
}

/// Whether a step can be written as just `{action: value}`
fn is_simple(step: &Step, action: &str) -> bool {
    if step.action_keys().len() != 1 || step.carries_metadata() {
        return false;
    }
    matches!(
        step.get(action),
        Some(Value::String(_) | Value::Number(_) | Value::Bool(_))
    )
}

/// Serialize a step as an inline statement
///
/// Fails only when the step has no action key. A step with several action keys is written
/// in full.
pub fn serialize_step(
    step: &Step,
    format: &CommentFormat,
    syntax: PayloadSyntax,
) -> Result<String, StepError> {
    let action = step.action_name().ok_or(StepError::NoAction)?;

    let payload = if is_simple(step, action) {
        let mut simple = Map::new();
        if let Some(value) = step.get(action) {
            simple.insert(action.to_string(), value.clone());
        }
        simple
    } else {
        step.without_internal()
    };

    Ok(wrap(
        &render_payload(&payload, syntax),
        &format.step_open,
        &format.step_close,
    ))
}

/// Serialize a test start marker
pub fn serialize_test(test: &TestDeclaration, format: &CommentFormat, syntax: PayloadSyntax) -> String {
    let mut fields = Map::new();
    if let Some(id) = test.test_id.as_deref().filter(|id| !id.is_empty()) {
        fields.insert("testId".to_string(), Value::from(id));
    }
    if let Some(description) = test.description.as_deref().filter(|d| !d.is_empty()) {
        fields.insert("description".to_string(), Value::from(description));
    }
    if let Some(detect) = test.detect_steps {
        fields.insert("detectSteps".to_string(), Value::Bool(detect));
    }
    if let Some(run_on) = test.run_on.as_ref().filter(|value| !value.is_null()) {
        fields.insert("runOn".to_string(), run_on.clone());
    }

    wrap(
        &render_payload(&fields, syntax),
        &format.test_open,
        &format.test_close,
    )
}

/// Serialize a test end marker
pub fn serialize_test_end(format: &CommentFormat) -> String {
    format!("{}{}", format.test_end_open, format.test_end_close)
}
