use serde_json::{json, Value};
use stepweave::InjectResponse;

fn respond(request: Value) -> Value {
    let response = InjectResponse::respond(&request.to_string());
    let value: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(value["exitCode"], json!(response.exit_code()));
    value
}

#[test]
fn test_preview_response() {
    let value = respond(json!({
        "action": "inject",
        "spec": {"steps": [{"find": "Total: $42"}]},
        "sourceContent": "The Total: $42 is shown.\n",
        "sourcePath": "cart.md"
    }));
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["applied"], json!(false));
    assert_eq!(value["stepCount"], json!(1));
    assert_eq!(
        value["unmatchedSteps"],
        json!([{"testId": null, "steps": [{"stepIndex": 0, "action": "find", "suggestedLine": 1}]}])
    );
    assert!(value["result"].as_str().unwrap().starts_with("--- cart.md\n"));
}

#[test]
fn test_input_errors_exit_with_two() {
    let missing = respond(json!({"sourcePath": "a.md"}));
    assert_eq!(missing["success"], json!(false));
    assert_eq!(missing["error"], json!("Missing required fields (spec, sourceContent)"));
    assert_eq!(missing["exitCode"], json!(2));

    let bad_pattern = respond(json!({
        "spec": {"steps": [{"click": "A"}]},
        "sourceContent": "Click **A**",
        "sourcePath": "a.md",
        "config": {"customPatterns": {"markdown": [{"regex": "no group", "action": "click"}]}}
    }));
    assert_eq!(bad_pattern["exitCode"], json!(2));
    assert!(bad_pattern["error"].as_str().unwrap().contains("capture group 1"));
}

#[test]
fn test_spec_shape_errors() {
    let value = respond(json!({
        "spec": {"tests": [{"steps": "not a list"}]},
        "sourceContent": "",
        "sourcePath": "a.md"
    }));
    assert_eq!(value["exitCode"], json!(2));
    assert!(value["error"].as_str().unwrap().starts_with("test 0:"));
}
