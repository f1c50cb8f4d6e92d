use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CopyError, ImportError};
use crate::manifest::{MANIFEST_FILE, Manifest};

/// Checks that must all pass, in this order, before an import touches the filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Precondition {
    ProblemDir,
    SolutionDir,
    Manifest,
}

const PRECONDITIONS: [Precondition; 3] = [
    Precondition::ProblemDir,
    Precondition::SolutionDir,
    Precondition::Manifest,
];

impl Precondition {
    fn check(self, problem_dir: &Path, solution_dir: &Path) -> Result<(), ImportError> {
        match self {
            Precondition::ProblemDir => {
                if !problem_dir.is_dir() {
                    return Err(ImportError::NoSuchProblem(problem_dir.to_path_buf()));
                }
                info!("problem directory {} exists", problem_dir.display());
            }
            Precondition::SolutionDir => {
                if !solution_dir.is_dir() {
                    return Err(ImportError::NoSuchSolution(solution_dir.to_path_buf()));
                }
                info!("solution directory {} exists", solution_dir.display());
            }
            Precondition::Manifest => {
                let manifest = problem_dir.join(MANIFEST_FILE);
                if !manifest.is_file() {
                    return Err(ImportError::MissingManifest(manifest));
                }
                info!("manifest {} exists", manifest.display());
            }
        }
        Ok(())
    }
}

/// One file scheduled for transfer from the solution into the problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedCopy {
    pub relative: PathBuf,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Fully verified import: every source exists and no write has happened yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub problem_dir: PathBuf,
    pub solution_dir: PathBuf,
    pub files: Vec<PlannedCopy>,
}

/// Outcome of a completed import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub problem_dir: PathBuf,
    pub solution_dir: PathBuf,
    pub copied: Vec<PathBuf>,
}

/// Runs the preconditions, reads the manifest, and verifies every listed source
/// without writing anything.
pub fn plan_import(problem_dir: &Path, solution_dir: &Path) -> Result<ImportPlan, ImportError> {
    PRECONDITIONS
        .iter()
        .try_for_each(|check| check.check(problem_dir, solution_dir))?;

    let manifest = Manifest::load(&problem_dir.join(MANIFEST_FILE))?;
    info!("manifest lists {} file(s)", manifest.len());

    let mut files = Vec::with_capacity(manifest.len());
    for relative in manifest.entries() {
        let source = solution_dir.join(relative);
        let destination = problem_dir.join(relative);
        verify_source(solution_dir, relative)?;
        verify_destination(problem_dir, relative)?;
        files.push(PlannedCopy {
            relative: relative.clone(),
            source,
            destination,
        });
    }
    info!("all listed files are present in the solution");

    Ok(ImportPlan {
        problem_dir: problem_dir.to_path_buf(),
        solution_dir: solution_dir.to_path_buf(),
        files,
    })
}

/// Copies the allow-listed files of `solution_dir` into `problem_dir`.
///
/// Nothing is written unless all preconditions pass and every listed file is present
/// in the solution. Files missing from the manifest are never touched.
pub fn import_solution(
    problem_dir: &Path,
    solution_dir: &Path,
) -> Result<ImportReport, ImportError> {
    plan_import(problem_dir, solution_dir)?.execute()
}

impl ImportPlan {
    pub fn execute(self) -> Result<ImportReport, ImportError> {
        let mut copied = Vec::with_capacity(self.files.len());
        for file in self.files {
            copy_file(&file.source, &file.destination)?;
            debug!("copied {}", file.relative.display());
            copied.push(file.relative);
        }
        info!(
            "copied {} file(s) into {}",
            copied.len(),
            self.problem_dir.display()
        );

        Ok(ImportReport {
            problem_dir: self.problem_dir,
            solution_dir: self.solution_dir,
            copied,
        })
    }
}

// Links are never followed inside the solution, at any depth of the listed path.
fn verify_source(solution_dir: &Path, relative: &Path) -> Result<(), CopyError> {
    let mut current = solution_dir.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(CopyError::Symlink(current));
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CopyError::MissingSource(solution_dir.join(relative)));
            }
            Err(err) => return Err(CopyError::io("inspect", &current, err)),
        }
    }

    match fs::symlink_metadata(&current) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(CopyError::NotAFile(current)),
        Err(err) => Err(CopyError::io("inspect", &current, err)),
    }
}

// Every existing ancestor under the problem must be a directory and the target
// itself must not be one, otherwise the copy would fail halfway through.
fn verify_destination(problem_dir: &Path, relative: &Path) -> Result<(), CopyError> {
    let destination = problem_dir.join(relative);
    let mut current = problem_dir.to_path_buf();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            current.push(component);
            match fs::metadata(&current) {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => return Err(CopyError::DestinationParentIsFile(current)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => break,
                Err(err) => return Err(CopyError::io("inspect", &current, err)),
            }
        }
    }

    if destination.is_dir() {
        return Err(CopyError::DestinationIsDirectory(destination));
    }
    Ok(())
}

// Stages next to the destination and renames, so a failed write never leaves a
// truncated file behind.
fn copy_file(source: &Path, destination: &Path) -> Result<(), CopyError> {
    if let Some(dir) = destination.parent() {
        fs::create_dir_all(dir).map_err(|err| CopyError::io("create directory", dir, err))?;
    }

    let staging = staging_path(destination);
    if let Err(err) = fs::copy(source, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(CopyError::io("copy", source, err));
    }
    fs::rename(&staging, destination).map_err(|err| {
        let _ = fs::remove_file(&staging);
        CopyError::io("replace", destination, err)
    })
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".allowsync-tmp");
    destination.with_file_name(name)
}
