mod cli;
mod commands;
mod error;
mod formatter;
mod telemetry;
mod util;

pub use cli::{run, run_cli};
pub use error::{CliError, ExitStatus};
