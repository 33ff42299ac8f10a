//! Step and spec validation
//!
//! Both validators run the same rule engine: each known action maps to an [`ActionRule`]
//! listing the value kinds it accepts and the object properties it needs. The structural
//! validator ships the rules in code; the schema-backed one reads them from a JSON document:
//!
//!     { "actions": { "goTo": { "types": ["string", "object"], "required": ["url"] } } }
//!
//! Use [`select_validator`] to get whichever applies.

use crate::error::StepError;
use crate::step::{Step, TestSpec};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Actions the structural validator accepts
pub const KNOWN_ACTIONS: &[&str] = &[
    "checkLink",
    "click",
    "dragAndDrop",
    "find",
    "goTo",
    "httpRequest",
    "loadCookie",
    "loadVariables",
    "record",
    "runCode",
    "runShell",
    "saveCookie",
    "screenshot",
    "stopRecord",
    "type",
    "wait",
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("schema document defines no actions")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Schema,
    Structural,
}

impl ValidationMode {
    pub fn name(&self) -> &'static str {
        match self {
            ValidationMode::Schema => "schema",
            ValidationMode::Structural => "structural",
        }
    }
}

/// JSON value kinds a rule can accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ValueKind {
    fn of(value: &Value) -> Option<ValueKind> {
        match value {
            Value::String(_) => Some(ValueKind::String),
            Value::Number(_) => Some(ValueKind::Number),
            Value::Bool(_) => Some(ValueKind::Boolean),
            Value::Object(_) => Some(ValueKind::Object),
            Value::Array(_) => Some(ValueKind::Array),
            Value::Null => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        }
    }
}

/// Constraints on one action's value
///
/// `types` empty means any value. `required` properties must be present and non-empty when
/// the value is an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionRule {
    #[serde(default)]
    pub types: Vec<ValueKind>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionRule {
    fn new(types: &[ValueKind], required: &[&str], message: &str) -> Self {
        ActionRule {
            types: types.to_vec(),
            required: required.iter().map(|key| key.to_string()).collect(),
            message: Some(message.to_string()),
        }
    }

    fn any() -> Self {
        ActionRule::default()
    }

    /// Whether `value` satisfies this rule
    pub fn accepts(&self, value: &Value) -> bool {
        if !self.types.is_empty() {
            match ValueKind::of(value) {
                Some(kind) if self.types.contains(&kind) => {}
                _ => return false,
            }
        }
        match value {
            Value::Object(fields) => self
                .required
                .iter()
                .all(|key| fields.get(key).is_some_and(is_truthy)),
            _ => true,
        }
    }

    fn message_for(&self, action: &str) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        let kinds: Vec<&str> = self.types.iter().map(ValueKind::name).collect();
        let mut message = if kinds.is_empty() {
            format!("{action} requires an object")
        } else {
            format!("{action} requires {}", kinds.join(" or "))
        };
        if !self.required.is_empty() {
            message.push_str(&format!(" with {} property", self.required.join(", ")));
        }
        message
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Result of checking one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepValidation {
    pub action: Option<String>,
    pub errors: Vec<String>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a step against a set of action rules
pub trait Validator {
    fn mode(&self) -> ValidationMode;

    fn validate_step(&self, step: &Step) -> StepValidation;
}

fn check_step(rules: &BTreeMap<String, ActionRule>, step: &Step) -> StepValidation {
    let action = match step.action() {
        Ok((action, _)) => action,
        Err(StepError::NoAction) => {
            return StepValidation {
                action: None,
                errors: vec!["Step has no action defined".to_string()],
            }
        }
        Err(StepError::MultipleActions(keys)) => {
            return StepValidation {
                action: keys.first().cloned(),
                errors: vec![format!("Step has multiple actions: {}", keys.join(", "))],
            }
        }
    };

    let Some(rule) = rules.get(action) else {
        let known: Vec<&str> = rules.keys().map(String::as_str).collect();
        return StepValidation {
            action: Some(action.to_string()),
            errors: vec![format!(
                "Unknown action: \"{action}\". Known actions: {}",
                known.join(", ")
            )],
        };
    };

    let mut errors = Vec::new();
    if let Some(value) = step.get(action) {
        if !rule.accepts(value) {
            errors.push(rule.message_for(action));
        }
    }
    StepValidation {
        action: Some(action.to_string()),
        errors,
    }
}

/// Built-in rules for the known actions
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    rules: BTreeMap<String, ActionRule>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        use ValueKind::{Number, Object, String as Text};

        let mut rules = BTreeMap::new();
        let mut rule = |action: &str, rule: ActionRule| {
            rules.insert(action.to_string(), rule);
        };

        rule(
            "goTo",
            ActionRule::new(
                &[Text, Object],
                &["url"],
                "goTo requires a URL string or object with url property",
            ),
        );
        for action in ["click", "find"] {
            rule(
                action,
                ActionRule::new(
                    &[Text, Object],
                    &[],
                    &format!("{action} requires a string (text) or object (with selector)"),
                ),
            );
        }
        rule(
            "type",
            ActionRule::new(&[Object], &["keys"], "type requires an object with keys property"),
        );
        rule(
            "httpRequest",
            ActionRule::new(
                &[Object],
                &["url"],
                "httpRequest requires an object with url property",
            ),
        );
        rule(
            "wait",
            ActionRule::new(
                &[Number, Object],
                &[],
                "wait requires a number (ms) or object (with selector/state)",
            ),
        );
        rule(
            "runShell",
            ActionRule::new(
                &[Object],
                &["command"],
                "runShell requires an object with command property",
            ),
        );
        rule(
            "screenshot",
            ActionRule::new(
                &[Text, Object],
                &[],
                "screenshot requires a string (path) or object (with path)",
            ),
        );
        rule(
            "checkLink",
            ActionRule::new(
                &[Text, Object],
                &["url"],
                "checkLink requires a URL string or object with url property",
            ),
        );
        for action in ["loadVariables", "loadCookie", "saveCookie"] {
            rule(
                action,
                ActionRule::new(
                    &[Text],
                    &[],
                    &format!("{action} requires a file path string"),
                ),
            );
        }
        rule(
            "record",
            ActionRule::new(
                &[Text, Object],
                &[],
                "record requires a string (path) or object",
            ),
        );
        for action in ["dragAndDrop", "runCode", "stopRecord"] {
            rule(action, ActionRule::any());
        }

        StructuralValidator { rules }
    }
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for StructuralValidator {
    fn mode(&self) -> ValidationMode {
        ValidationMode::Structural
    }

    fn validate_step(&self, step: &Step) -> StepValidation {
        check_step(&self.rules, step)
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    actions: BTreeMap<String, ActionRule>,
}

/// Rules loaded from an action-rule schema document
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    rules: BTreeMap<String, ActionRule>,
}

impl SchemaValidator {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(text)?;
        if document.actions.is_empty() {
            return Err(SchemaError::Empty);
        }
        Ok(SchemaValidator {
            rules: document.actions,
        })
    }
}

impl Validator for SchemaValidator {
    fn mode(&self) -> ValidationMode {
        ValidationMode::Schema
    }

    fn validate_step(&self, step: &Step) -> StepValidation {
        check_step(&self.rules, step)
    }
}

/// Schema-backed validation when `schema` is given and loads, structural otherwise
pub fn select_validator(schema: Option<&str>) -> Box<dyn Validator> {
    match schema.map(SchemaValidator::from_json) {
        Some(Ok(validator)) => Box::new(validator),
        Some(Err(err)) => {
            warn!("{err}; falling back to structural validation");
            Box::new(StructuralValidator::new())
        }
        None => Box::new(StructuralValidator::new()),
    }
}

/// One validation problem, located as precisely as possible
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub tests_validated: usize,
    pub steps_validated: usize,
    pub steps_passed: usize,
    pub steps_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub mode: ValidationMode,
    pub errors: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// 0 when valid, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.valid {
            0
        } else {
            1
        }
    }

    pub fn render_human(&self) -> String {
        let mut lines = vec![
            if self.valid {
                "✓ Validation PASSED".to_string()
            } else {
                "✗ Validation FAILED".to_string()
            },
            format!("  Mode: {} validation", self.mode.name()),
            format!("  Tests validated: {}", self.summary.tests_validated),
            format!("  Steps validated: {}", self.summary.steps_validated),
            format!("  Steps passed: {}", self.summary.steps_passed),
            format!("  Steps failed: {}", self.summary.steps_failed),
        ];

        if !self.errors.is_empty() {
            lines.push("\nErrors:".to_string());
            for (number, issue) in self.errors.iter().enumerate() {
                lines.push(format!("\n  {}. {}", number + 1, issue.message));
                if let Some(test_id) = &issue.test_id {
                    lines.push(format!("     Test: {test_id}"));
                }
                if let Some(step_id) = &issue.step_id {
                    lines.push(format!("     Step: {step_id}"));
                }
                if let Some(action) = &issue.action {
                    lines.push(format!("     Action: {action}"));
                }
            }
        }

        lines.join("\n")
    }
}

/// Validate every step of every test
pub fn validate_spec(spec: &TestSpec, validator: &dyn Validator) -> ValidationReport {
    let mut errors = Vec::new();
    let mut summary = ValidationSummary::default();

    if spec.is_empty() {
        errors.push(ValidationIssue {
            message: "Test specification must have at least one test".to_string(),
            ..Default::default()
        });
    }

    for (test_index, test) in spec.tests().iter().enumerate() {
        summary.tests_validated += 1;
        let test_id = test.test_id.clone().filter(|id| !id.is_empty());

        if test.steps.is_empty() {
            errors.push(ValidationIssue {
                message: format!(
                    "Test {test_index} ({}) must have at least one step",
                    test_id.as_deref().unwrap_or("unnamed")
                ),
                test_index: Some(test_index),
                test_id,
                ..Default::default()
            });
            continue;
        }

        for (step_index, step) in test.steps.iter().enumerate() {
            summary.steps_validated += 1;
            let result = validator.validate_step(step);
            if result.is_valid() {
                summary.steps_passed += 1;
                continue;
            }
            summary.steps_failed += 1;
            let step_id = step
                .get("stepId")
                .and_then(Value::as_str)
                .map(str::to_string);
            for message in result.errors {
                errors.push(ValidationIssue {
                    message,
                    test_index: Some(test_index),
                    test_id: test_id.clone(),
                    step_index: Some(step_index),
                    step_id: step_id.clone(),
                    action: result.action.clone(),
                });
            }
        }
    }

    let report = ValidationReport {
        valid: errors.is_empty(),
        mode: validator.mode(),
        errors,
        summary,
    };
    info!(
        "{} validation: {} of {} steps passed",
        report.mode.name(),
        report.summary.steps_passed,
        report.summary.steps_validated
    );
    report
}
