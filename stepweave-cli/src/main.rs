// Command-line interface for stepweave
//
// This binary wires the stepweave library to files, stdin and stdout. All binding, planning and
// rendering happens in the library; this crate only reads inputs, layers configuration and
// reports results.
//
// Usage:
//  stepweave inject <source> --spec <file> [--apply] [--syntax <s>] [-o <file>] [--in-place]
//  stepweave request [<file>|-]         - JSON request in, JSON response out
//  stepweave validate <spec> [--schema <file>] [--format human|json]
//  stepweave formats                    - List comment formats and dialects
//
// Configuration:
//
// Embedded defaults, then `stepweave.toml` in the working directory (if present), then the file
// given with --config. Command-line flags win over all of them.
//
// Exit codes follow the request contract: 0 on success, 2 for unreadable or malformed input,
// 1 for failures while processing well-formed input. `validate` exits 1 for an invalid spec.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{debug, info, warn, LevelFilter};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;
use stepweave::error::{EXIT_INPUT, EXIT_INTERNAL};
use stepweave::format::Dialect;
use stepweave::{
    inject, select_validator, validate_spec, FormatRegistry, InjectError, InjectOptions,
    InjectOutcome, InjectRequest, InjectResponse, SyntaxPreference, TestSpec,
};
use stepweave_config::{Loader, StepweaveConfig};

const SYNTAXES: &[&str] = &["json", "yaml", "xml", "auto"];
const REPORT_FORMATS: &[&str] = &["human", "json"];

fn build_cli() -> Command {
    Command::new("stepweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Embed structured test steps as inline comments in documentation")
        .long_about(
            "stepweave binds test steps (click, goTo, find, ...) to the prose and markup of a\n\
            documentation file and inserts each step as an inline comment beside the text it\n\
            verifies.\n\n\
            Commands:\n  \
            - inject:   Bind a spec to a document and preview or apply the result\n  \
            - request:  Run a JSON injection request (file or stdin)\n  \
            - validate: Check the steps of a spec\n  \
            - formats:  List comment formats and markup dialects\n\n\
            Examples:\n  \
            stepweave inject docs/login.md --spec login.json             # Preview\n  \
            stepweave inject docs/login.md --spec login.yaml --in-place  # Patch the file\n  \
            stepweave validate login.json --format json"
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a stepweave.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v info, -vv debug); RUST_LOG overrides")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inject")
                .about("Bind a test spec to a document")
                .long_about(
                    "Bind the steps of a test spec to the markup of a document.\n\n\
                    By default a diff-style preview is printed. With --apply the patched\n\
                    document is printed instead, or written with -o / --in-place.\n\
                    Spec files may be JSON or YAML (chosen by extension).\n\n\
                    Steps that match nothing are still inserted at a suggested line and\n\
                    reported on stderr."
                )
                .arg(
                    Arg::new("source")
                        .help("Documentation file to annotate")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .short('s')
                        .value_name("FILE")
                        .help("Test spec (.json, .yaml or .yml)")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .help("Produce the patched document instead of a preview")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("syntax")
                        .long("syntax")
                        .help("Payload syntax for inserted statements")
                        .value_parser(clap::builder::PossibleValuesParser::new(SYNTAXES))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("in-place")
                        .long("in-place")
                        .help("Apply and overwrite the source file")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("output"),
                ),
        )
        .subcommand(
            Command::new("request")
                .about("Run a JSON injection request")
                .long_about(
                    "Read a request { spec, sourceContent, sourcePath, options?, config? }\n\
                    and print the JSON response. The exit code equals the response exitCode.\n\n\
                    Examples:\n  \
                    stepweave request request.json\n  \
                    cat request.json | stepweave request"
                )
                .arg(
                    Arg::new("input")
                        .help("Request file, or '-' for stdin (the default)")
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate the steps of a test spec")
                .arg(
                    Arg::new("spec")
                        .help("Test spec (.json, .yaml or .yml)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .value_name("FILE")
                        .help("Action-rule schema (JSON); built-in rules when absent")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Report format")
                        .default_value("human")
                        .value_parser(clap::builder::PossibleValuesParser::new(REPORT_FORMATS)),
                ),
        )
        .subcommand(Command::new("formats").about("List comment formats and markup dialects"))
}

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"));
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("inject", sub_matches)) => handle_inject_command(sub_matches, &config),
        Some(("request", sub_matches)) => {
            let input = sub_matches.get_one::<String>("input").map(|s| s.as_str());
            handle_request_command(input);
        }
        Some(("validate", sub_matches)) => {
            let spec = sub_matches
                .get_one::<String>("spec")
                .expect("spec is required");
            let schema = sub_matches
                .get_one::<String>("schema")
                .cloned()
                .or_else(|| config.validation.schema.clone());
            let format = sub_matches
                .get_one::<String>("format")
                .map(|s| s.as_str())
                .unwrap_or("human");
            handle_validate_command(spec, schema.as_deref(), format);
        }
        Some(("formats", _)) => handle_formats_command(),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            process::exit(EXIT_INPUT);
        }
    }
}

fn verbosity_level(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(verbosity_level(verbosity))
        .parse_default_env()
        .init();
}

/// Handle the inject command
fn handle_inject_command(sub_matches: &ArgMatches, config: &StepweaveConfig) {
    let source_path = sub_matches
        .get_one::<String>("source")
        .expect("source is required");
    let spec_path = sub_matches
        .get_one::<String>("spec")
        .expect("spec is required");
    let in_place = sub_matches.get_flag("in-place");
    let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());

    let source = fs::read_to_string(source_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{source_path}': {e}");
        process::exit(EXIT_INPUT);
    });
    let spec = load_spec(spec_path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(EXIT_INPUT);
    });

    let options = inject_options(
        config,
        sub_matches.get_flag("apply") || in_place,
        sub_matches.get_one::<String>("syntax").map(|s| s.as_str()),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(EXIT_INPUT);
    });

    let mut request = InjectRequest::new(spec, source, source_path.as_str()).with_options(options);
    request.custom_patterns = config.patterns.to_custom_patterns();

    let outcome = inject(&request).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    });
    report_unmatched(&outcome);

    match (in_place, output) {
        (true, _) => write_output(source_path, &outcome.result),
        (false, Some(path)) => write_output(path, &outcome.result),
        (false, None) => print!("{}", outcome.result),
    }
}

/// Handle the request command
fn handle_request_command(input: Option<&str>) {
    let response = match read_request(input) {
        Ok(text) => InjectResponse::respond(&text),
        Err(e) => InjectResponse::from_result(Err(InjectError::InvalidInput(e))),
    };

    let json = response.to_json().unwrap_or_else(|e| {
        eprintln!("Error encoding response: {e}");
        process::exit(EXIT_INTERNAL);
    });
    println!("{json}");

    let code = response.exit_code();
    if code != 0 {
        process::exit(code);
    }
}

/// Handle the validate command
fn handle_validate_command(spec_path: &str, schema_path: Option<&str>, format: &str) {
    let spec = load_spec(spec_path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(EXIT_INPUT);
    });

    let schema = schema_path.and_then(|path| match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("cannot read schema '{path}': {e}; using built-in rules");
            None
        }
    });
    let validator = select_validator(schema.as_deref());
    let report = validate_spec(&spec, validator.as_ref());

    if format == "json" {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error encoding report: {e}");
            process::exit(EXIT_INTERNAL);
        });
        println!("{json}");
    } else {
        println!("{}", report.render_human());
    }

    process::exit(report.exit_code());
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();

    println!("Comment formats:");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {name:<26}{}{{...}}{}  {}",
                format.step_open,
                format.step_close,
                format.file_extensions().join(" ")
            );
        }
    }

    println!("\nDialects:");
    for dialect in Dialect::ALL {
        println!("  {dialect}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> StepweaveConfig {
    let loader = Loader::new().with_optional_file("stepweave.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        process::exit(EXIT_INPUT);
    })
}

/// Configured options with command-line overrides
fn inject_options(
    config: &StepweaveConfig,
    apply: bool,
    syntax: Option<&str>,
) -> Result<InjectOptions, String> {
    let mut options = InjectOptions::from(&config.inject);
    options.apply |= apply;
    if let Some(raw) = syntax {
        options.syntax = raw.parse::<SyntaxPreference>()?;
    }
    debug!("inject options: {options:?}");
    Ok(options)
}

/// Read a spec file; YAML when the extension says so, JSON otherwise
fn load_spec(path: &str) -> Result<TestSpec, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Error reading spec '{path}': {e}"))?;
    parse_spec(&text, path)
}

fn parse_spec(text: &str, path: &str) -> Result<TestSpec, String> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let value: Value = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(text)
            .map_err(|e| format!("Invalid YAML in spec '{path}': {e}"))?,
        _ => serde_json::from_str(text)
            .map_err(|e| format!("Invalid JSON in spec '{path}': {e}"))?,
    };

    TestSpec::from_value(value).map_err(|e| format!("Invalid spec '{path}': {e}"))
}

fn read_request(input: Option<&str>) -> Result<String, String> {
    match input {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading stdin: {e}"))?;
            Ok(buffer)
        }
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Error reading file '{path}': {e}"))
        }
    }
}

fn report_unmatched(outcome: &InjectOutcome) {
    let total: usize = outcome
        .unmatched_steps
        .iter()
        .map(|group| group.steps.len())
        .sum();
    info!("{} steps placed, {total} unmatched", outcome.step_count);

    for group in &outcome.unmatched_steps {
        let test = group.test_id.as_deref().unwrap_or("unnamed");
        for step in &group.steps {
            eprintln!(
                "unmatched: test {test}, step {} ({}) placed at line {}",
                step.step_index,
                step.action.as_deref().unwrap_or("no action"),
                step.suggested_line
            );
        }
    }
}

fn write_output(path: &str, text: &str) {
    fs::write(path, text).unwrap_or_else(|e| {
        eprintln!("Error writing file '{path}': {e}");
        process::exit(EXIT_INTERNAL);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(verbosity_level(0), LevelFilter::Warn);
        assert_eq!(verbosity_level(1), LevelFilter::Info);
        assert_eq!(verbosity_level(2), LevelFilter::Debug);
        assert_eq!(verbosity_level(9), LevelFilter::Debug);
    }

    #[test]
    fn parse_spec_by_extension() {
        let yaml = "testId: login\nsteps:\n  - click: Submit\n  - goTo: https://example.com\n";
        let spec = parse_spec(yaml, "login.YML").unwrap();
        assert_eq!(spec.tests()[0].test_id.as_deref(), Some("login"));
        assert_eq!(spec.tests()[0].steps.len(), 2);

        let json = r#"{"tests": [{"steps": [{"find": "Welcome"}]}]}"#;
        let spec = parse_spec(json, "spec.json").unwrap();
        assert_eq!(spec.tests().len(), 1);

        assert!(parse_spec(yaml, "spec.json").is_err());
        assert!(parse_spec("[1, 2]", "spec.json").is_err());
    }

    #[test]
    fn inject_options_layer_flags_over_config() {
        let config = load_cli_config(None);
        let defaults = inject_options(&config, false, None).unwrap();
        assert_eq!(defaults, InjectOptions::default());

        let options = inject_options(&config, true, Some("auto")).unwrap();
        assert!(options.apply);
        assert_eq!(options.syntax, SyntaxPreference::Auto);

        assert!(inject_options(&config, false, Some("toml")).is_err());
    }
}
