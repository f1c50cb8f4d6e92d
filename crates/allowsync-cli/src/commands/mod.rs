use std::path::PathBuf;

use allowsync::{ComposeReport, ImportPlan, ImportReport, PipelineReport, ProblemId, Step};
use serde::Serialize;

pub mod check;
pub mod compose;
pub mod import;
pub mod validate_name;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    NameValid {
        problem: ProblemId,
        category: String,
        name: String,
    },
    Imported {
        problem: ProblemId,
        report: ImportReport,
    },
    ImportPlanned {
        problem: ProblemId,
        plan: ImportPlan,
    },
    Checked {
        report: PipelineReport,
    },
    CheckPlanned {
        dir: PathBuf,
        steps: Vec<Step>,
    },
    Composed {
        report: ComposeReport,
    },
}
