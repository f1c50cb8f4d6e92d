use allowsync::ProblemId;
use clap::{Arg, ArgMatches, Command};

use crate::commands::CommandResult;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("validate-name")
        .about("Check that a problem name has the <category>/<name> shape")
        .arg(
            Arg::new("name")
                .value_name("CATEGORY/NAME")
                .env("PROBLEM_NAME")
                .required(true)
                .help("Problem identifier to validate."),
        )
}

pub fn run(matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let raw_name = util::required::<String>(matches, "name")?;
    let problem = ProblemId::parse(&raw_name)?;
    tracing::info!("problem name '{problem}' is valid");
    Ok(CommandResult::NameValid {
        category: problem.category().to_string(),
        name: problem.name().to_string(),
        problem,
    })
}
