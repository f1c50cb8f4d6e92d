use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::commands;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::telemetry::init_tracing;
use crate::util::Verbosity;

const NAME: &str = "allowsync";

pub fn run() -> ExitCode {
    init_tracing();
    match run_cli(std::env::args_os()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses CLI arguments and dispatches to the selected command. Failures come back as
/// a `CliError` carrying a `sysexits`-compatible status so CI jobs fail with a code
/// that names the unmet precondition.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let result = dispatch(verbosity, &matches)?;
    emit_result(result, output)
}

fn build_cli() -> Command {
    Command::new(NAME)
        .about("Import allow-listed course solutions and run problem checks")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit the command result as JSON instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log the resolved inputs before running the command."),
        )
        .subcommand_required(true)
        .subcommand(commands::import::command())
        .subcommand(commands::validate_name::command())
        .subcommand(commands::check::command())
        .subcommand(commands::compose::command())
}

fn dispatch(
    verbosity: Verbosity,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("import", sub)) => commands::import::run(verbosity, sub),
        Some(("validate-name", sub)) => commands::validate_name::run(sub),
        Some(("check", sub)) => commands::check::run(verbosity, sub),
        Some(("compose", sub)) => commands::compose::run(verbosity, sub),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
