use std::process::ExitCode;

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` on stdout as human-readable text or a single JSON object.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result)?,
    };
    Ok(ExitCode::from(ExitStatus::Ok.code()))
}

fn print_text(result: &CommandResult) {
    match result {
        CommandResult::NameValid {
            problem,
            category,
            name,
        } => {
            println!("Problem name '{problem}' is valid (category: {category}, name: {name})");
        }
        CommandResult::Imported { problem, report } => {
            println!(
                "Imported {} file(s) for {} into {}",
                report.copied.len(),
                problem,
                report.problem_dir.display()
            );
            for file in &report.copied {
                println!("  - {}", file.display());
            }
        }
        CommandResult::ImportPlanned { problem, plan } => {
            println!(
                "Dry run: would import {} file(s) for {} into {}",
                plan.files.len(),
                problem,
                plan.problem_dir.display()
            );
            for file in &plan.files {
                println!("  - {}", file.relative.display());
            }
        }
        CommandResult::Checked { report } => {
            println!(
                "All checks passed in {} ({})",
                report.dir.display(),
                report.passed.join(", ")
            );
        }
        CommandResult::CheckPlanned { dir, steps } => {
            println!("Dry run: would run {} step(s) in {}", steps.len(), dir.display());
            for step in steps {
                println!("  - {}: {}", step.name, step.command_line());
            }
        }
        CommandResult::Composed { report } => {
            println!(
                "Composed public repository ({} file(s) written, {} entries pruned)",
                report.written,
                report.pruned.len()
            );
            for pruned in &report.pruned {
                println!("  pruned {}", pruned.display());
            }
            if report.members.is_empty() {
                println!("  workspace members: (none)");
            } else {
                println!("  workspace members: {}", report.members.join(", "));
            }
        }
    }
}

fn print_json(result: &CommandResult) -> Result<(), CliError> {
    let payload = serde_json::to_value(result)?;
    println!("{payload}");
    Ok(())
}
