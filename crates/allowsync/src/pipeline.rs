use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::info;

use crate::error::CheckError;

/// A single toolchain invocation of the check pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed(Option<i32>),
}

/// Executes pipeline steps inside a directory.
pub trait StepRunner {
    fn run(&self, step: &Step, dir: &Path) -> Result<StepOutcome, CheckError>;
}

/// Spawns each step as a child process that inherits stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl StepRunner for ProcessRunner {
    fn run(&self, step: &Step, dir: &Path) -> Result<StepOutcome, CheckError> {
        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(dir)
            .status()
            .map_err(|source| CheckError::Spawn {
                step: step.name.clone(),
                program: step.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(StepOutcome::Passed)
        } else {
            Ok(StepOutcome::Failed(status.code()))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub dir: PathBuf,
    pub passed: Vec<String>,
}

/// Ordered list of steps that stops at the first failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Format check, build, lint, test, and benchmark, all driven by `cargo`.
    pub fn toolchain(cargo: &str) -> Self {
        Self::new(vec![
            Step::new("fmt", cargo, &["fmt", "--", "--check"]),
            Step::new("build", cargo, &["build", "--all-targets"]),
            Step::new(
                "clippy",
                cargo,
                &["clippy", "--all-targets", "--", "-D", "warnings"],
            ),
            Step::new("test", cargo, &["test"]),
            Step::new("bench", cargo, &["bench"]),
        ])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn run<R: StepRunner + ?Sized>(
        &self,
        runner: &R,
        dir: &Path,
    ) -> Result<PipelineReport, CheckError> {
        if !dir.is_dir() {
            return Err(CheckError::NoSuchDirectory(dir.to_path_buf()));
        }

        let mut passed = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            info!("running {}: {}", step.name, step.command_line());
            match runner.run(step, dir)? {
                StepOutcome::Passed => passed.push(step.name.clone()),
                StepOutcome::Failed(code) => {
                    return Err(CheckError::StepFailed {
                        step: step.name.clone(),
                        code,
                    });
                }
            }
        }
        info!("all {} step(s) passed", passed.len());

        Ok(PipelineReport {
            dir: dir.to_path_buf(),
            passed,
        })
    }
}
