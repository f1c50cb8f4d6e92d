use std::path::PathBuf;

use allowsync::{ComposeOptions, compose};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::commands::CommandResult;
use crate::error::CliError;
use crate::util::{self, Verbosity};

pub fn command() -> Command {
    Command::new("compose")
        .about("Build the public course repository from the private one")
        .arg(
            Arg::new("in-path")
                .short('i')
                .long("in-path")
                .value_name("DIR")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the private repository containing .compose.yml."),
        )
        .arg(
            Arg::new("out-path")
                .short('o')
                .long("out-path")
                .value_name("DIR")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the public repository."),
        )
        .arg(
            Arg::new("no-process")
                .long("no-process")
                .action(ArgAction::SetTrue)
                .help("Skip copying entries; only prune and rewrite Cargo.toml."),
        )
        .arg(
            Arg::new("spare")
                .short('s')
                .long("spare")
                .value_name("PATH")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Spare the given public entry from pruning. Repeatable."),
        )
        .arg(
            Arg::new("add-tool")
                .short('t')
                .long("add-tool")
                .value_name("PATH")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Add the given tool to the workspace members. Repeatable."),
        )
}

pub fn run(verbosity: Verbosity, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let options = ComposeOptions {
        in_path: util::required::<PathBuf>(matches, "in-path")?,
        out_path: util::required::<PathBuf>(matches, "out-path")?,
        no_process: matches.get_flag("no-process"),
        spare: collect_paths(matches, "spare"),
        add_tools: collect_paths(matches, "add-tool"),
    };

    if verbosity.verbose {
        tracing::info!(
            "composing {} into {}",
            options.in_path.display(),
            options.out_path.display()
        );
    }

    let report = compose(&options)?;
    Ok(CommandResult::Composed { report })
}

fn collect_paths(matches: &ArgMatches, id: &str) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
