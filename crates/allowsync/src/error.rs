use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compose::MarkerError;

/// Failures raised while validating a problem name or importing a solution.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "invalid problem name '{0}': expected <category>/<name> using lowercase letters and hyphens"
    )]
    InvalidIdentifier(String),
    #[error("problem directory {} does not exist", .0.display())]
    NoSuchProblem(PathBuf),
    #[error("solution directory {} does not exist", .0.display())]
    NoSuchSolution(PathBuf),
    #[error("manifest {} does not exist", .0.display())]
    MissingManifest(PathBuf),
    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("manifest line {line}: '{entry}' must be a relative path inside the problem")]
    InvalidManifestEntry { line: usize, entry: String },
    #[error("copy failed: {0}")]
    CopyFailure(#[from] CopyError),
}

/// Reasons the copy stage of an import can fail.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("listed file {} is missing from the solution", .0.display())]
    MissingSource(PathBuf),
    #[error("listed path {} is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("listed path {} is a symbolic link", .0.display())]
    Symlink(PathBuf),
    #[error("destination {} is a directory", .0.display())]
    DestinationIsDirectory(PathBuf),
    #[error("destination parent {} is not a directory", .0.display())]
    DestinationParentIsFile(PathBuf),
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Failures raised by the toolchain check pipeline.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("problem directory {} does not exist", .0.display())]
    NoSuchDirectory(PathBuf),
    #[error("failed to start step '{step}' ({program}): {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("step '{step}' failed {}", describe_exit(.code))]
    StepFailed { step: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("with exit code {code}"),
        None => "after being terminated by a signal".to_string(),
    }
}

/// Failures raised while composing the public course repository.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to process {}: {source}", .path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: MarkerError,
    },
    #[error("entry {} is not valid UTF-8", .0.display())]
    NonUtf8Entry(PathBuf),
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ComposeError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}
