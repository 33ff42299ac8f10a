use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// Build scripts can't access src/ modules, so the shape is duplicated here
const SYNTAXES: &[&str] = &["json", "yaml", "xml", "auto"];
const REPORT_FORMATS: &[&str] = &["human", "json"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("stepweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Embed structured test steps as inline comments in documentation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inject")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .short('s')
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("apply").long("apply").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("syntax")
                        .long("syntax")
                        .value_parser(clap::builder::PossibleValuesParser::new(SYNTAXES)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("in-place")
                        .long("in-place")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("request").arg(
                Arg::new("input")
                    .index(1)
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            Command::new("validate")
                .arg(
                    Arg::new("spec")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(clap::builder::PossibleValuesParser::new(REPORT_FORMATS)),
                ),
        )
        .subcommand(Command::new("formats"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "stepweave", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "stepweave", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "stepweave", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
