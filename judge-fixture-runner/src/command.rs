//! Run an external executable as the program under test

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{anyhow, Result};
use judge_fixture::error::Error;
use judge_fixture::{Console, Invoke};
use log::{debug, trace};
use which::which;

use crate::format::write_all_to_stderr;

/// An external executable which reads its input from `stdin` and writes its output to `stdout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    args: Vec<String>,
    name: String,
    path: PathBuf,
}

impl CommandTarget {
    /// Create a new `CommandTarget` from the program and its arguments
    ///
    /// The program is resolved with the `PATH` unless it contains a path separator.
    pub fn new<I, T>(program: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Ok(Self {
            args: args.into_iter().map(Into::into).collect(),
            name: program.to_owned(),
            path: resolve_binary_path(program)?,
        })
    }

    /// Create a new `CommandTarget` from a command line where the first element is the program
    pub fn from_command_line(command_line: Vec<String>) -> Result<Self> {
        let mut iter = command_line.into_iter();
        let program = iter.next().ok_or_else(|| {
            Error::ConfigurationError("The command line of the program is empty".to_owned())
        })?;
        Self::new(&program, iter)
    }

    /// The resolved path of the executable
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The arguments passed to the executable
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Invoke for CommandTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, console: &mut Console<'_>) -> Result<()> {
        let mut input = vec![];
        console.read_to_end(&mut input)?;

        debug!(
            "Running '{}' with arguments {:?} and {} bytes of input",
            self.path.display(),
            self.args,
            input.len()
        );
        let mut child = Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| Error::LaunchError(self.path.clone(), error.to_string()))?;

        // The child may block on a full stdout pipe before it has read all of its input
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> {
                stdin.write_all(&input)?;
                trace!("Finished writing the input");
                Ok(())
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|error| Error::LaunchError(self.path.clone(), error.to_string()))?;

        if !output.status.success() {
            return Err(
                Error::ProcessError(self.name.clone(), output.status, output.stderr).into(),
            );
        }
        write_all_to_stderr(&output.stderr);

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The program doesn't need to read all of its input
                Ok(Err(error)) if error.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("'{}' exited before reading all of its input", self.name);
                }
                Ok(Err(error)) => {
                    return Err(Error::LaunchError(
                        self.path.clone(),
                        format!("Failed to write the input: {error}"),
                    )
                    .into());
                }
                Err(_) => return Err(anyhow!("The thread writing the input panicked")),
            }
        }

        console.write_all(&output.stdout)?;
        Ok(())
    }
}

/// Resolve the path of a `binary` with the `PATH`
pub fn resolve_binary_path<T>(binary: T) -> Result<PathBuf>
where
    T: AsRef<OsStr>,
{
    let binary = binary.as_ref();
    match which(binary) {
        Ok(path) => {
            debug!("Found '{}': '{}'", binary.to_string_lossy(), path.display());
            Ok(path)
        }
        Err(error) => Err(Error::LaunchError(
            PathBuf::from(binary),
            format!(
                "{error}: '{0}' could not be found. Is '{0}' installed, executable and in the PATH?",
                binary.to_string_lossy()
            ),
        )
        .into()),
    }
}
