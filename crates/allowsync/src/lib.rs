//! Allow-list driven course tooling: solution import, toolchain checks, and
//! composition of the public course repository.

pub mod compose;
pub mod error;
pub mod identifier;
pub mod import;
pub mod manifest;
pub mod pipeline;

pub use compose::{ComposeConfig, ComposeOptions, ComposeReport, compose};
pub use error::{CheckError, ComposeError, CopyError, ImportError};
pub use identifier::{ProblemId, validate_identifier};
pub use import::{ImportPlan, ImportReport, PlannedCopy, import_solution, plan_import};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use pipeline::{Pipeline, PipelineReport, ProcessRunner, Step, StepOutcome, StepRunner};
