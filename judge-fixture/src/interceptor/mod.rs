//! Interception of the standard input and output of the program under test
//!
//! An [`Interception`] installs the test input and a capturing sink when it begins and hands them
//! back when it ends. In [`Redirect::Injected`] mode nothing outside of the [`Console`] is touched.
//! In [`Redirect::Process`] mode the file descriptors of the real `stdin` and `stdout` are swapped
//! and restored again when the `Interception` ends or, if it never ended because of a panic, when
//! it is dropped.

#[cfg(unix)]
mod process;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
#[cfg(unix)]
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::console::Console;
use crate::error::Error;

/// The input of the program under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// The content of a file read byte by byte
    File(PathBuf),
    /// A string which is fed as utf-8 bytes
    Text(String),
}

/// How the standard input and output of the program are redirected
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Hand input and output to the program through the [`Console`] only (the default)
    ///
    /// There's no global state involved, so fixtures in this mode can run in parallel.
    #[default]
    Injected,
    /// Additionally redirect the file descriptors of the process' `stdin` and `stdout`
    ///
    /// This mode is needed for programs which use [`std::io::stdin`] and [`std::io::stdout`]
    /// directly. Only one such interception can be active at a time. Note that the `print!`
    /// family of macros is captured by the libtest harness unless the tests run with
    /// `--nocapture`, so these programs should write to `std::io::stdout()`.
    ///
    /// Only available on unix platforms.
    Process,
}

/// The bytes written by the program under test
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput(Vec<u8>);

/// An active interception of the standard input and output
pub struct Interception {
    input: Box<dyn BufRead>,
    mode: Mode,
}

enum Mode {
    Injected(Vec<u8>),
    #[cfg(unix)]
    Process(process::StdioRedirect),
}

impl InputSource {
    fn open(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Self::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Self::File(path) => {
                let file = File::open(path)
                    .map_err(|error| Error::ReadError(path.clone(), error.to_string()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            Self::Text(text) => Ok(Box::new(Cursor::new(text.as_bytes().to_vec()))),
        }
    }
}

impl Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Text(_) => f.write_str("input"),
        }
    }
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for InputSource {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<PathBuf> for InputSource {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

impl CapturedOutput {
    /// Create a new `CapturedOutput`
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw captured bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The captured bytes as string with invalid utf-8 replaced
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Return the captured bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Interception {
    /// Begin the interception
    ///
    /// Opens the `input` and installs it together with an empty capture sink.
    pub fn begin(input: &InputSource, redirect: Redirect) -> Result<Self> {
        debug!("Begin interception of stdin and stdout ({redirect:?}) with input '{input}'");
        match redirect {
            Redirect::Injected => Ok(Self {
                input: input.open()?,
                mode: Mode::Injected(Vec::new()),
            }),
            #[cfg(unix)]
            Redirect::Process => {
                let redirect = process::StdioRedirect::begin(input)?;
                Ok(Self {
                    input: Box::new(BufReader::new(io::stdin())),
                    mode: Mode::Process(redirect),
                })
            }
            #[cfg(not(unix))]
            Redirect::Process => Err(Error::ConfigurationError(
                "Process wide redirection is only supported on unix platforms".to_owned(),
            )
            .into()),
        }
    }

    /// The [`Console`] handed to the program under test
    pub fn console(&mut self) -> Console<'_> {
        match &mut self.mode {
            Mode::Injected(sink) => Console::new(&mut self.input, sink),
            #[cfg(unix)]
            Mode::Process(redirect) => Console::process_wide(&mut self.input, redirect.stdout()),
        }
    }

    /// End the interception, restore the original streams and return the captured output
    pub fn end(self) -> Result<CapturedOutput> {
        let captured = match self.mode {
            Mode::Injected(sink) => CapturedOutput(sink),
            #[cfg(unix)]
            Mode::Process(redirect) => {
                drop(self.input);
                CapturedOutput(redirect.end()?)
            }
        };
        debug!(
            "End interception of stdin and stdout: Captured {} bytes",
            captured.0.len()
        );
        Ok(captured)
    }
}
