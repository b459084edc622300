//! Line by line comparison of the captured output with the expected output

use std::fmt::Display;
use std::fs;
use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::error::Error;

/// The result of comparing the expected with the actual output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Both sides have the same lines
    Match,
    /// The first line at which both sides diverge
    Mismatch(Mismatch),
}

/// A line level divergence between the expected and the actual output
///
/// A `None` on either side means this side ran out of lines before the other side did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The name of the expected output file
    pub file: String,
    /// The 1-based line number
    pub line: usize,
    /// The expected line
    pub expected: Option<String>,
    /// The actual line
    pub actual: Option<String>,
}

/// Compares the actual output of a program with the expected output
///
/// The comparison is exact. No whitespace is trimmed and neither the encoding nor the line endings
/// are normalized. Lines are terminated by `\n`, `\r\n` or a single `\r`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutputComparator;

impl Comparison {
    /// Return true if this is a [`Comparison::Match`]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Convert this comparison into a `Result` with [`Error::Mismatch`] as error
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Match => Ok(()),
            Self::Mismatch(mismatch) => Err(Error::Mismatch(mismatch).into()),
        }
    }
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn or_none(line: Option<&String>) -> String {
            line.map_or_else(|| "<none>".to_owned(), |l| format!("'{l}'"))
        }

        writeln!(f, "Error in line :{} of file:{}", self.line, self.file)?;
        writeln!(f, "  expected: {}", or_none(self.expected.as_ref()))?;
        write!(f, "    actual: {}", or_none(self.actual.as_ref()))
    }
}

impl OutputComparator {
    /// Compare the content of the `expected` file with the `actual` output
    ///
    /// The file name reported in a [`Mismatch`] is the file name of the `expected` path.
    pub fn compare_file(&self, expected: &Path, actual: &str) -> Result<Comparison> {
        let file_name = expected.file_name().map_or_else(
            || expected.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        self.compare_file_as(&file_name, expected, actual)
    }

    /// Like [`OutputComparator::compare_file`] but report the file with the given `file_name`
    pub fn compare_file_as(
        &self,
        file_name: &str,
        expected: &Path,
        actual: &str,
    ) -> Result<Comparison> {
        let bytes = fs::read(expected)
            .map_err(|error| Error::ReadError(expected.to_path_buf(), error.to_string()))?;
        debug!(
            "Comparing {} bytes of '{}' with {} bytes of actual output",
            bytes.len(),
            expected.display(),
            actual.len()
        );

        Ok(self.compare(file_name, &String::from_utf8_lossy(&bytes), actual))
    }

    /// Compare the `expected` with the `actual` text and report the first differing line
    pub fn compare(&self, file_name: &str, expected: &str, actual: &str) -> Comparison {
        let mut expected_lines = split_lines(expected);
        let mut actual_lines = split_lines(actual);

        let mut line = 0;
        loop {
            line += 1;
            match (expected_lines.next(), actual_lines.next()) {
                (None, None) => return Comparison::Match,
                (Some(e), Some(a)) if e == a => {}
                (e, a) => {
                    return Comparison::Mismatch(Mismatch {
                        file: file_name.to_owned(),
                        line,
                        expected: e.map(ToOwned::to_owned),
                        actual: a.map(ToOwned::to_owned),
                    })
                }
            }
        }
    }
}

/// Split `text` into lines terminated by `\n`, `\r\n` or `\r`
///
/// The terminators are not part of the lines. A terminator at the very end doesn't start a new
/// line, so `"a\n"` and `"a"` both have exactly one line and the empty string has none.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                let line = &rest[..pos];
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}
