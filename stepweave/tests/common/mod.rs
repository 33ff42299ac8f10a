//! Helpers shared by the integration tests.

use serde_json::Value;
use stepweave::{inject, InjectOptions, InjectOutcome, InjectRequest, SyntaxPreference, TestSpec};

pub fn spec(value: Value) -> TestSpec {
    TestSpec::from_value(value).expect("valid spec")
}

/// Run a request with default options except `apply`
pub fn run(spec_value: Value, source: &str, path: &str, apply: bool) -> InjectOutcome {
    run_with(spec_value, source, path, apply, SyntaxPreference::Json)
}

pub fn run_with(
    spec_value: Value,
    source: &str,
    path: &str,
    apply: bool,
    syntax: SyntaxPreference,
) -> InjectOutcome {
    let request =
        InjectRequest::new(spec(spec_value), source, path).with_options(InjectOptions { apply, syntax });
    inject(&request).expect("injection succeeds")
}
