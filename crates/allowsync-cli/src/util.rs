use std::any::Any;

use clap::ArgMatches;

use crate::error::{CliError, ExitStatus};

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

/// Fetches an argument clap already enforces as required, either from the command
/// line or its environment fallback.
pub fn required<T>(matches: &ArgMatches, id: &str) -> Result<T, CliError>
where
    T: Any + Clone + Send + Sync + 'static,
{
    matches.get_one::<T>(id).cloned().ok_or_else(|| {
        CliError::new(format!("missing required argument '{id}'"), ExitStatus::Usage)
    })
}
