//! Injection requests
//!
//! The request/response contract around the pipeline:
//!
//!     request  { spec, sourceContent, sourcePath, options?: { apply?, syntax? },
//!                config?: { customPatterns?: { <dialect>: [PatternDescriptor] } } }
//!     success  { success: true, result, applied, stepCount, unmatchedSteps, exitCode: 0 }
//!     failure  { success: false, error, exitCode: 1 | 2 }
//!
//! `result` is the patched document when `apply` is set and a preview otherwise. Steps that
//! bind to nothing are still planned, at their suggested offset, and reported under
//! `unmatchedSteps`.

use crate::binder::bind_steps;
use crate::error::InjectError;
use crate::format::Dialect;
use crate::matcher::{Matcher, PatternDescriptor};
use crate::planner::{plan_test, EditPlan};
use crate::registry::FormatRegistry;
use crate::serializer::SyntaxPreference;
use crate::step::TestSpec;
use crate::text::line_of_offset;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const REQUIRED_FIELDS: [&str; 3] = ["spec", "sourceContent", "sourcePath"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectOptions {
    #[serde(default)]
    pub apply: bool,
    #[serde(default)]
    pub syntax: SyntaxPreference,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestConfig {
    #[serde(default)]
    custom_patterns: BTreeMap<String, Vec<PatternDescriptor>>,
}

/// Everything one injection needs
#[derive(Debug, Clone, PartialEq)]
pub struct InjectRequest {
    pub spec: TestSpec,
    pub source_content: String,
    pub source_path: String,
    pub options: InjectOptions,
    /// Extra patterns keyed by dialect name
    pub custom_patterns: BTreeMap<String, Vec<PatternDescriptor>>,
}

impl InjectRequest {
    pub fn new(spec: TestSpec, source_content: impl Into<String>, source_path: impl Into<String>) -> Self {
        InjectRequest {
            spec,
            source_content: source_content.into(),
            source_path: source_path.into(),
            options: InjectOptions::default(),
            custom_patterns: BTreeMap::new(),
        }
    }

    pub fn with_options(mut self, options: InjectOptions) -> Self {
        self.options = options;
        self
    }

    /// Add caller patterns for a dialect, after any already present
    pub fn with_custom_patterns(mut self, dialect: Dialect, patterns: Vec<PatternDescriptor>) -> Self {
        self.custom_patterns
            .entry(dialect.name().to_string())
            .or_default()
            .extend(patterns);
        self
    }

    fn patterns_for(&self, dialect: Dialect) -> &[PatternDescriptor] {
        self.custom_patterns
            .get(dialect.name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse a JSON request
    ///
    /// An `action` field is optional, but when present it must be `"inject"`. Empty strings
    /// are valid content; only absent or null fields count as missing.
    pub fn from_json(input: &str) -> Result<Self, InjectError> {
        if input.trim().is_empty() {
            return Err(InjectError::InvalidInput("No input provided".to_string()));
        }
        let Value::Object(mut fields) = serde_json::from_str::<Value>(input)? else {
            return Err(InjectError::InvalidInput(
                "Request must be a JSON object".to_string(),
            ));
        };

        if let Some(action) = fields.remove("action") {
            match action.as_str() {
                Some("inject") => {}
                Some(other) => return Err(InjectError::UnknownAction(other.to_string())),
                None => return Err(InjectError::UnknownAction(action.to_string())),
            }
        }

        let missing: Vec<&str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| fields.get(*field).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(InjectError::MissingField(missing.join(", ")));
        }

        let spec = TestSpec::from_value(fields.remove("spec").unwrap_or_default())?;
        let source_content = take_string(&mut fields, "sourceContent")?;
        let source_path = take_string(&mut fields, "sourcePath")?;
        let options: InjectOptions = take_object(&mut fields, "options")?;
        let config: RequestConfig = take_object(&mut fields, "config")?;

        Ok(InjectRequest {
            spec,
            source_content,
            source_path,
            options,
            custom_patterns: config.custom_patterns,
        })
    }
}

fn take_string(fields: &mut Map<String, Value>, name: &str) -> Result<String, InjectError> {
    match fields.remove(name) {
        Some(Value::String(text)) => Ok(text),
        _ => Err(InjectError::InvalidInput(format!("{name} must be a string"))),
    }
}

fn take_object<T>(fields: &mut Map<String, Value>, name: &str) -> Result<T, InjectError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match fields.remove(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|err| InjectError::InvalidInput(format!("Invalid {name}: {err}"))),
    }
}

/// A step that bound to nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedStep {
    pub step_index: usize,
    pub action: Option<String>,
    /// 1-based line of the suggested insertion point
    pub suggested_line: usize,
}

/// Unmatched steps of one test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedGroup {
    pub test_id: Option<String>,
    pub steps: Vec<UnmatchedStep>,
}

/// What a successful injection produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectOutcome {
    pub result: String,
    pub applied: bool,
    pub step_count: usize,
    pub unmatched_steps: Vec<UnmatchedGroup>,
}

/// Run the pipeline for one request
pub fn inject(request: &InjectRequest) -> Result<InjectOutcome, InjectError> {
    let source = request.source_content.as_str();
    let registry = FormatRegistry::with_defaults();
    let format = registry.comment_format_for_path(&request.source_path);
    let dialect = Dialect::from_path(&request.source_path);
    let syntax = request.options.syntax.resolve(source);

    let matcher = Matcher::new(dialect, request.patterns_for(dialect))?;
    let matches = matcher.find(source);
    info!(
        "{}: {} dialect, {} format, {} syntax, {} candidate spans",
        request.source_path,
        dialect,
        format.name(),
        syntax,
        matches.len()
    );

    let mut plan = EditPlan::new();
    let mut unmatched_steps = Vec::new();

    for test in request.spec.tests() {
        let label = test.test_id.as_deref().unwrap_or("unnamed");
        if test.steps.is_empty() {
            debug!("test {label} has no steps, skipping");
            continue;
        }

        let bound = bind_steps(&test.steps, &matches);
        let missed: Vec<UnmatchedStep> = bound
            .iter()
            .filter(|step| step.is_unmatched())
            .map(|step| UnmatchedStep {
                step_index: step.index,
                action: step.step.action_name().map(str::to_string),
                suggested_line: line_of_offset(source, step.start_offset()),
            })
            .collect();
        for step in &missed {
            warn!(
                "test {label}: step {} ({}) matched no content, placing at line {}",
                step.step_index,
                step.action.as_deref().unwrap_or("no action"),
                step.suggested_line
            );
        }
        if !missed.is_empty() {
            unmatched_steps.push(UnmatchedGroup {
                test_id: test.test_id.clone(),
                steps: missed,
            });
        }

        plan.extend(plan_test(test, &bound, format, syntax)?);
    }

    let step_count = plan.step_count();
    let applied = request.options.apply;
    let result = if applied {
        plan.apply(source)
    } else {
        plan.preview(source, &request.source_path)
    };
    info!("{step_count} step statements planned (applied: {applied})");

    Ok(InjectOutcome {
        result,
        applied,
        step_count,
        unmatched_steps,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: InjectOutcome,
    pub exit_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    pub exit_code: i32,
}

/// Wire response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InjectResponse {
    Success(SuccessResponse),
    Failure(FailureResponse),
}

impl InjectResponse {
    pub fn from_result(result: Result<InjectOutcome, InjectError>) -> Self {
        match result {
            Ok(outcome) => InjectResponse::Success(SuccessResponse {
                success: true,
                outcome,
                exit_code: 0,
            }),
            Err(err) => InjectResponse::Failure(FailureResponse {
                success: false,
                error: err.to_string(),
                exit_code: err.exit_code(),
            }),
        }
    }

    /// Parse a JSON request, run it and wrap the outcome
    pub fn respond(input: &str) -> Self {
        Self::from_result(InjectRequest::from_json(input).and_then(|request| inject(&request)))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            InjectResponse::Success(response) => response.exit_code,
            InjectResponse::Failure(response) => response.exit_code,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
