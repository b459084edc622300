//! The module containing the crate main [`Error`] type

use std::fmt::Display;
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;

use pretty_assertions::StrComparison;

use crate::comparator::Mismatch;

/// The main judge-fixture error type
///
/// Errors returned by the program under test are never wrapped into this type. They are passed
/// through as they are, so `anyhow::Error::downcast_ref` still finds the original error.
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum Error {
    /// A batch of cases was run and at least one of them failed
    ///
    /// `CasesFailed(failed, total)`
    CasesFailed(usize, usize),
    /// An invalid combination of fixture settings and the target's entry point
    ///
    /// `ConfigurationError(message)`
    ConfigurationError(String),
    /// The target type could not be constructed
    ///
    /// `ConstructionFailed(type_name, message)`
    ConstructionFailed(String, String),
    /// A file name couldn't be resolved to an existing file
    ///
    /// `FileNotFound(file_name, search_root)`
    FileNotFound(String, PathBuf),
    /// The error when trying to start an external [`std::process::Command`] fails
    ///
    /// `LaunchError(executable_path, message)`
    LaunchError(PathBuf, String),
    /// The captured output differs from the expected output file
    Mismatch(Mismatch),
    /// The target has neither a [`crate::Program`] implementation nor a matching entry point
    ///
    /// `NoEntryPoint(type_name, candidate_names)`
    NoEntryPoint(String, Vec<String>),
    /// The captured output is not equal to the expected string
    ///
    /// `OutputDiffers(expected, actual)`
    OutputDiffers(String, String),
    /// The error after a successful launch of an external [`std::process::Command`]
    ///
    /// `ProcessError(process_name, exit_status, stderr)`
    ProcessError(String, ExitStatus, Vec<u8>),
    /// Reading a file or directory failed
    ///
    /// `ReadError(path, message)`
    ReadError(PathBuf, String),
    /// Installing or restoring the standard input and output failed
    ///
    /// `RedirectError(message)`
    RedirectError(String),
}

impl Error {
    /// Return true if this error means the program ran but produced the wrong output
    pub fn is_wrong_answer(&self) -> bool {
        matches!(
            self,
            Self::Mismatch(_) | Self::OutputDiffers(..) | Self::CasesFailed(..)
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CasesFailed(failed, total) => {
                write!(f, "{failed} of {total} cases failed")
            }
            Self::ConfigurationError(message) => write!(f, "Misconfiguration: {message}"),
            Self::ConstructionFailed(type_name, message) => {
                write!(f, "Failed to construct '{type_name}': {message}")
            }
            Self::FileNotFound(name, root) => write!(
                f,
                "File '{name}' could not be found in '{}' or any of its subdirectories",
                root.display()
            ),
            Self::LaunchError(exec, message) => {
                write!(f, "Error launching '{}': {message}", exec.display())
            }
            Self::Mismatch(mismatch) => write!(f, "{mismatch}"),
            Self::NoEntryPoint(type_name, candidates) => write!(
                f,
                "No entry point found for '{type_name}': The target isn't run as `Program` and \
                 none of the entry points [{}] is registered",
                candidates.join(", ")
            ),
            Self::OutputDiffers(expected, actual) => {
                writeln!(f, "Output differs from the expected output (expected | actual):")?;
                write!(f, "{}", StrComparison::new(expected, actual))
            }
            Self::ProcessError(process, status, stderr) => {
                if let Some(code) = status.code() {
                    write!(f, "Error running '{process}': Exit code was: '{code}'")?;
                } else if let Some(signal) = signal(*status) {
                    write!(
                        f,
                        "Error running '{process}': Terminated by a signal '{signal}'"
                    )?;
                } else {
                    write!(f, "Error running '{process}': Terminated abnormally")?;
                }
                if stderr.is_empty() {
                    Ok(())
                } else {
                    write!(f, "\nstderr:\n{}", String::from_utf8_lossy(stderr).trim_end())
                }
            }
            Self::ReadError(path, message) => {
                write!(f, "Error reading '{}': {message}", path.display())
            }
            Self::RedirectError(message) => {
                write!(f, "Error redirecting standard input/output: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(unix)]
fn signal(status: ExitStatus) -> Option<i32> {
    status.signal()
}

#[cfg(not(unix))]
fn signal(_status: ExitStatus) -> Option<i32> {
    None
}

impl From<Mismatch> for Error {
    fn from(value: Mismatch) -> Self {
        Self::Mismatch(value)
    }
}
