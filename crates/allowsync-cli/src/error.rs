use std::fmt;
use std::io;
use std::process::ExitCode;

use allowsync::{CheckError, ComposeError, CopyError, ImportError};
use clap::error::ErrorKind as ClapErrorKind;

const EX_OK: u8 = 0;
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_SOFTWARE: u8 = 70;
const EX_OSERR: u8 = 71;
const EX_CONFIG: u8 = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok,
    Usage,
    Data,
    NoInput,
    Io,
    Config,
    Software,
    /// Exit code reported by a failed child process.
    Child(u8),
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Ok => EX_OK,
            ExitStatus::Usage => EX_USAGE,
            ExitStatus::Data => EX_DATAERR,
            ExitStatus::NoInput => EX_NOINPUT,
            ExitStatus::Io => EX_OSERR,
            ExitStatus::Config => EX_CONFIG,
            ExitStatus::Software => EX_SOFTWARE,
            ExitStatus::Child(code) => code,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    message: String,
    status: ExitStatus,
}

impl CliError {
    pub fn new(message: impl Into<String>, status: ExitStatus) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status.code())
    }

    /// Emits the single `[ERROR]` line for this failure.
    pub fn print(&self) {
        if !self.message.is_empty() {
            tracing::error!("{}", self.message);
        }
    }
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        let status = match &err {
            ImportError::InvalidIdentifier(_) => ExitStatus::Usage,
            ImportError::NoSuchProblem(_) | ImportError::NoSuchSolution(_) => ExitStatus::NoInput,
            ImportError::MissingManifest(_) | ImportError::InvalidManifestEntry { .. } => {
                ExitStatus::Data
            }
            ImportError::ManifestUnreadable { source, .. }
                if source.kind() == io::ErrorKind::InvalidData =>
            {
                ExitStatus::Data
            }
            ImportError::ManifestUnreadable { .. } => ExitStatus::Io,
            ImportError::CopyFailure(copy) => match copy {
                CopyError::MissingSource(_)
                | CopyError::NotAFile(_)
                | CopyError::Symlink(_)
                | CopyError::DestinationIsDirectory(_)
                | CopyError::DestinationParentIsFile(_) => ExitStatus::Data,
                CopyError::Io { .. } => ExitStatus::Io,
            },
        };
        CliError::new(err.to_string(), status)
    }
}

impl From<CheckError> for CliError {
    fn from(err: CheckError) -> Self {
        let status = match &err {
            CheckError::NoSuchDirectory(_) => ExitStatus::NoInput,
            CheckError::Spawn { .. } => ExitStatus::Software,
            CheckError::StepFailed { code, .. } => ExitStatus::Child(
                code.and_then(|code| u8::try_from(code).ok())
                    .filter(|code| *code != 0)
                    .unwrap_or(1),
            ),
        };
        CliError::new(err.to_string(), status)
    }
}

impl From<ComposeError> for CliError {
    fn from(err: ComposeError) -> Self {
        let status = match &err {
            ComposeError::ConfigRead { .. } | ComposeError::ConfigParse { .. } => {
                ExitStatus::Config
            }
            ComposeError::Marker { .. } | ComposeError::NonUtf8Entry(_) => ExitStatus::Data,
            ComposeError::Walk { .. } | ComposeError::Io { .. } => ExitStatus::Io,
        };
        CliError::new(err.to_string(), status)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let status = match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitStatus::Ok,
            _ => ExitStatus::Usage,
        };
        // clap renders its own multi-line usage text.
        let _ = err.print();
        CliError::new(String::new(), status)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(err.to_string(), ExitStatus::Software)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn import_errors_map_to_sysexits() {
        let cases = [
            (ImportError::InvalidIdentifier("X".into()), 64),
            (ImportError::NoSuchProblem(PathBuf::from("p")), 66),
            (ImportError::NoSuchSolution(PathBuf::from("s")), 66),
            (ImportError::MissingManifest(PathBuf::from("p/.allowlist")), 65),
            (
                ImportError::CopyFailure(CopyError::MissingSource(PathBuf::from("a"))),
                65,
            ),
            (
                ImportError::CopyFailure(CopyError::Symlink(PathBuf::from("s/lib.rs"))),
                65,
            ),
            (
                ImportError::CopyFailure(CopyError::DestinationParentIsFile(PathBuf::from(
                    "p/sub",
                ))),
                65,
            ),
            (
                ImportError::ManifestUnreadable {
                    path: PathBuf::from("p/.allowlist"),
                    source: io::Error::new(
                        io::ErrorKind::InvalidData,
                        "stream did not contain valid UTF-8",
                    ),
                },
                65,
            ),
            (
                ImportError::ManifestUnreadable {
                    path: PathBuf::from("p/.allowlist"),
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                },
                71,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).status().code(), code);
        }
    }

    #[test]
    fn failed_step_passes_child_code_through() {
        let err = CliError::from(CheckError::StepFailed {
            step: "test".into(),
            code: Some(101),
        });
        assert_eq!(err.status(), ExitStatus::Child(101));

        let killed = CliError::from(CheckError::StepFailed {
            step: "test".into(),
            code: None,
        });
        assert_eq!(killed.status(), ExitStatus::Child(1));
    }
}
