use std::path::PathBuf;

use allowsync::{ProblemId, plan_import};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::commands::CommandResult;
use crate::error::CliError;
use crate::util::{self, Verbosity};

pub fn command() -> Command {
    Command::new("import")
        .about("Copy the allow-listed files of a solution into its course problem")
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("CATEGORY/NAME")
                .env("PROBLEM_NAME")
                .required(true)
                .help("Problem identifier, e.g. ownership/borrow-checker."),
        )
        .arg(
            Arg::new("problem-root")
                .long("problem-root")
                .value_name("DIR")
                .env("PROBLEM_ROOT")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Problem directory in the course repository. Must contain .allowlist."),
        )
        .arg(
            Arg::new("solution")
                .long("solution")
                .value_name("DIR")
                .env("PROBLEM_SOLUTION")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Solution directory in the student repository."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Verify the import and list the files without copying them."),
        )
}

pub fn run(verbosity: Verbosity, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let raw_name = util::required::<String>(matches, "name")?;
    let problem = ProblemId::parse(&raw_name)?;
    tracing::info!("problem name '{problem}' is valid");

    let problem_root = util::required::<PathBuf>(matches, "problem-root")?;
    let solution = util::required::<PathBuf>(matches, "solution")?;
    if verbosity.verbose {
        tracing::info!(
            "importing {} into {}",
            solution.display(),
            problem_root.display()
        );
    }

    let plan = plan_import(&problem_root, &solution)?;
    if matches.get_flag("dry-run") {
        return Ok(CommandResult::ImportPlanned { problem, plan });
    }

    let report = plan.execute()?;
    tracing::info!("import of {problem} succeeded");
    Ok(CommandResult::Imported { problem, report })
}
