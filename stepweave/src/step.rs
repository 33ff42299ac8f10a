//! Steps, test declarations and specs
//!
//! A step is a JSON object with exactly one *action key* (`click`, `goTo`, ...) plus optional
//! metadata. Action detection lives here and nowhere else: the binder, serializer, validator
//! and the unmatched-step report all ask [`Step::action`] or [`Step::action_name`].

use crate::error::{InjectError, StepError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that describe a step rather than name its action
pub const METADATA_KEYS: &[&str] = &[
    "stepId",
    "description",
    "unsafe",
    "outputs",
    "variables",
    "breakpoint",
    "$schema",
    "sourceLocation",
];

/// Keys stripped before a step is written back into a document
pub const INTERNAL_KEYS: &[&str] = &["sourceLocation"];

/// Object fields consulted, in order, when an action value is an object.
const TEXT_FIELDS: &[&str] = &["url", "elementText", "text", "keys", "path"];

/// A single test step
///
/// Field order is kept as given so that serialized statements read the way they were written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step(Map<String, Value>);

impl Step {
    pub fn new(fields: Map<String, Value>) -> Self {
        Step(fields)
    }

    /// Shorthand for a step with only an action: `Step::action_only("click", "Submit")`.
    pub fn action_only(action: &str, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(action.to_string(), value.into());
        Step(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All non-metadata keys, in order
    pub fn action_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| !METADATA_KEYS.contains(key))
            .collect()
    }

    /// The action key and its value; exactly one must exist.
    pub fn action(&self) -> Result<(&str, &Value), StepError> {
        let keys = self.action_keys();
        match keys.as_slice() {
            [] => Err(StepError::NoAction),
            [key] => {
                let value = &self.0[*key];
                Ok((key, value))
            }
            _ => Err(StepError::MultipleActions(
                keys.iter().map(|key| key.to_string()).collect(),
            )),
        }
    }

    /// First action key, without enforcing uniqueness
    pub fn action_name(&self) -> Option<&str> {
        self.action_keys().into_iter().next()
    }

    /// Text the binder compares against matched markup
    ///
    /// The action value itself when it is a string; for object values the first string among
    /// `url`, `elementText`, `text`, `keys` and `path`.
    pub fn comparable_text(&self) -> Option<&str> {
        let value = self.get(self.action_name()?)?;
        match value {
            Value::String(text) => Some(text),
            Value::Object(fields) => TEXT_FIELDS
                .iter()
                .find_map(|field| fields.get(*field).and_then(Value::as_str)),
            _ => None,
        }
    }

    /// Whether any metadata field carries a meaningful value
    ///
    /// Empty strings, `false` flags and empty maps do not count.
    pub fn carries_metadata(&self) -> bool {
        let non_empty_str =
            |key: &str| matches!(self.get(key), Some(Value::String(s)) if !s.is_empty());
        let is_true = |key: &str| matches!(self.get(key), Some(Value::Bool(true)));
        let non_empty_map =
            |key: &str| matches!(self.get(key), Some(Value::Object(m)) if !m.is_empty());

        non_empty_str("stepId")
            || non_empty_str("description")
            || is_true("unsafe")
            || non_empty_map("outputs")
            || non_empty_map("variables")
            || is_true("breakpoint")
    }

    /// Copy of the fields without internal-only keys
    pub fn without_internal(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| !INTERNAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl From<Map<String, Value>> for Step {
    fn from(fields: Map<String, Value>) -> Self {
        Step(fields)
    }
}

/// A test: identifier, optional metadata and an ordered list of steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_steps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_on: Option<Value>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl TestDeclaration {
    pub fn new(test_id: &str, steps: Vec<Step>) -> Self {
        TestDeclaration {
            test_id: Some(test_id.to_string()),
            steps,
            ..Default::default()
        }
    }

    /// Whether the test gets explicit start/end markers (non-empty id or description)
    pub fn has_header(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.test_id) || present(&self.description)
    }
}

/// The tests to inject, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestSpec {
    tests: Vec<TestDeclaration>,
}

impl TestSpec {
    pub fn new(tests: Vec<TestDeclaration>) -> Self {
        TestSpec { tests }
    }

    /// Read a spec from parsed JSON
    ///
    /// Accepts either `{ "tests": [...] }` or a bare test declaration.
    pub fn from_value(value: Value) -> Result<Self, InjectError> {
        let Value::Object(mut fields) = value else {
            return Err(InjectError::InvalidInput(
                "spec must be an object".to_string(),
            ));
        };

        match fields.remove("tests") {
            Some(Value::Array(items)) => {
                let tests = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        serde_json::from_value(item).map_err(|err| {
                            InjectError::InvalidInput(format!("test {index}: {err}"))
                        })
                    })
                    .collect::<Result<Vec<TestDeclaration>, _>>()?;
                Ok(TestSpec { tests })
            }
            Some(_) => Err(InjectError::InvalidInput(
                "spec \"tests\" must be an array".to_string(),
            )),
            None => {
                let test = serde_json::from_value(Value::Object(fields)).map_err(|err| {
                    InjectError::InvalidInput(format!("invalid test declaration: {err}"))
                })?;
                Ok(TestSpec { tests: vec![test] })
            }
        }
    }

    pub fn tests(&self) -> &[TestDeclaration] {
        &self.tests
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
