use std::path::PathBuf;

use allowsync::{Pipeline, ProcessRunner};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::commands::CommandResult;
use crate::error::CliError;
use crate::util::{self, Verbosity};

pub fn command() -> Command {
    Command::new("check")
        .about("Run the format, build, lint, test, and bench steps for a problem")
        .arg(
            Arg::new("problem-root")
                .long("problem-root")
                .value_name("DIR")
                .env("PROBLEM_ROOT")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Problem directory to run the toolchain in."),
        )
        .arg(
            Arg::new("cargo")
                .long("cargo")
                .value_name("PROGRAM")
                .env("ALLOWSYNC_CARGO")
                .default_value("cargo")
                .help("Toolchain driver used for every step."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("List the steps without running them."),
        )
}

pub fn run(verbosity: Verbosity, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let dir = util::required::<PathBuf>(matches, "problem-root")?;
    let cargo = util::required::<String>(matches, "cargo")?;
    let pipeline = Pipeline::toolchain(&cargo);

    if verbosity.verbose {
        tracing::info!("checking {} with {cargo}", dir.display());
    }

    if matches.get_flag("dry-run") {
        return Ok(CommandResult::CheckPlanned {
            dir,
            steps: pipeline.steps().to_vec(),
        });
    }

    let report = pipeline.run(&ProcessRunner, &dir)?;
    Ok(CommandResult::Checked { report })
}
