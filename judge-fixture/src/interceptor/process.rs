//! Process wide redirection of the `stdin` and `stdout` file descriptors

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Stdout, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use log::{trace, warn};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{close, dup, dup2};

use super::InputSource;
use crate::error::Error;

/// There's only a single `stdin` and `stdout` per process
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// The `stdin` and `stdout` file descriptors swapped with the test input and a capture file
///
/// The original descriptors are restored by [`StdioRedirect::end`] or on drop.
pub(super) struct StdioRedirect {
    capture: File,
    // The file behind the redirected stdin has to stay open until the redirect ends
    input: File,
    restored: bool,
    saved_stdin: RawFd,
    saved_stdout: RawFd,
    stdin_swapped: bool,
    stdout: Stdout,
}

impl StdioRedirect {
    /// Swap `stdin` with the `input` and `stdout` with an anonymous capture file
    pub(super) fn begin(input: &InputSource) -> Result<Self> {
        if ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::RedirectError(
                "Another process wide interception is already active".to_owned(),
            )
            .into());
        }

        match Self::install(input) {
            Ok(redirect) => Ok(redirect),
            Err(error) => {
                ACTIVE.store(false, Ordering::SeqCst);
                Err(error)
            }
        }
    }

    fn install(input: &InputSource) -> Result<Self> {
        let input = open_input(input)?;
        let capture = tempfile::tempfile().map_err(|error| {
            Error::RedirectError(format!("Failed to create the capture file: {error}"))
        })?;

        let stdout = io::stdout();
        stdout.lock().flush().map_err(|error| {
            Error::RedirectError(format!("Failed to flush stdout: {error}"))
        })?;

        let saved_stdout = dup(STDOUT_FILENO).map_err(|errno| {
            Error::RedirectError(format!("Failed to duplicate stdout: {errno}"))
        })?;
        let saved_stdin = match dup(STDIN_FILENO) {
            Ok(fd) => fd,
            Err(errno) => {
                _ = close(saved_stdout);
                return Err(
                    Error::RedirectError(format!("Failed to duplicate stdin: {errno}")).into(),
                );
            }
        };

        // From here on, dropping `redirect` restores whatever has already been swapped
        let mut redirect = Self {
            capture,
            input,
            restored: false,
            saved_stdin,
            saved_stdout,
            stdin_swapped: false,
            stdout,
        };

        trace!("Swapping stdout (fd {STDOUT_FILENO}) with the capture file");
        dup2(redirect.capture.as_raw_fd(), STDOUT_FILENO).map_err(|errno| {
            Error::RedirectError(format!("Failed to redirect stdout: {errno}"))
        })?;
        trace!("Swapping stdin (fd {STDIN_FILENO}) with the input");
        dup2(redirect.input.as_raw_fd(), STDIN_FILENO).map_err(|errno| {
            Error::RedirectError(format!("Failed to redirect stdin: {errno}"))
        })?;
        redirect.stdin_swapped = true;

        Ok(redirect)
    }

    /// The redirected `stdout`
    pub(super) fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }

    /// Restore the original `stdin` and `stdout` and return the captured bytes
    pub(super) fn end(mut self) -> Result<Vec<u8>> {
        self.restore()?;

        let mut captured = vec![];
        self.capture
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.capture.read_to_end(&mut captured))
            .map_err(|error| {
                Error::RedirectError(format!("Failed to read the capture file: {error}"))
            })?;
        Ok(captured)
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        // Everything still buffered by `std` belongs to the captured output
        let flushed = self.stdout.lock().flush();
        // Consume the rest of the input so nothing of it stays in the buffer of `std::io::stdin`
        let drained = if self.stdin_swapped {
            io::copy(&mut io::stdin().lock(), &mut io::sink()).map(|_| ())
        } else {
            Ok(())
        };

        let stdout = dup2(self.saved_stdout, STDOUT_FILENO);
        let stdin = dup2(self.saved_stdin, STDIN_FILENO);
        _ = close(self.saved_stdout);
        _ = close(self.saved_stdin);
        ACTIVE.store(false, Ordering::SeqCst);
        trace!("Restored stdin and stdout");

        if let Err(error) = flushed {
            warn!("Failed to flush the captured stdout: {error}");
        }
        if let Err(error) = drained {
            warn!("Failed to drain the remaining input: {error}");
        }
        stdout.and(stdin).map(|_| ()).map_err(|errno| {
            Error::RedirectError(format!("Failed to restore stdin and stdout: {errno}")).into()
        })
    }
}

impl Drop for StdioRedirect {
    fn drop(&mut self) {
        if let Err(error) = self.restore() {
            warn!("{error}");
        }
    }
}

fn open_input(input: &InputSource) -> Result<File> {
    let bytes = match input {
        InputSource::File(path) => {
            return File::open(path)
                .map_err(|error| Error::ReadError(path.clone(), error.to_string()).into());
        }
        InputSource::Bytes(bytes) => bytes.as_slice(),
        InputSource::Text(text) => text.as_bytes(),
    };

    let mut file = tempfile::tempfile()
        .and_then(|mut file| {
            file.write_all(bytes)?;
            Ok(file)
        })
        .map_err(|error| {
            Error::RedirectError(format!("Failed to create the input file: {error}"))
        })?;
    file.seek(SeekFrom::Start(0)).map_err(|error| {
        Error::RedirectError(format!("Failed to rewind the input file: {error}"))
    })?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // Everything which actually swaps the descriptors is tested in a separate test binary with
    // only a single test, so the harness can't write to the redirected stdout in the meantime.

    #[rstest]
    #[case::text(InputSource::Text("3\n4\n".to_owned()), b"3\n4\n")]
    #[case::bytes(InputSource::Bytes(vec![0, 1, 2]), &[0, 1, 2])]
    #[case::empty(InputSource::Bytes(vec![]), b"")]
    fn test_open_input_is_rewound(#[case] input: InputSource, #[case] expected: &[u8]) {
        let mut file = open_input(&input).unwrap();

        let mut actual = vec![];
        file.read_to_end(&mut actual).unwrap();

        assert_eq!(actual, expected);
    }
}
