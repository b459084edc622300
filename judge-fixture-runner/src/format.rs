//! The terminal output of `judge-fixture-runner`

use std::fmt::Display;
use std::io::{self, BufWriter, Write};

use anyhow::Result;
use colored::Colorize;
use log::warn;

use crate::suite::{CaseStatus, CaseSummary, SuiteSummary};

/// The one line result of a single validation
pub struct CaseLine<'a> {
    name: &'a str,
    error: Option<&'a str>,
}

impl<'a> CaseLine<'a> {
    /// A successful validation of `name`
    pub fn ok(name: &'a str) -> Self {
        Self { name, error: None }
    }

    /// A failed validation of `name` with the `error` message
    pub fn failed(name: &'a str, error: &'a str) -> Self {
        Self {
            name,
            error: Some(error),
        }
    }

    /// Print this line to `stdout`
    pub fn print(&self) {
        println!("{self}");
    }
}

impl Display for CaseLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ... ", self.name.bold())?;
        match self.error {
            None => write!(f, "{}", "ok".green().bold()),
            Some(error) => {
                write!(f, "{}", "FAILED".bright_red().bold())?;
                for line in error.lines() {
                    write!(f, "\n  {line}")?;
                }
                Ok(())
            }
        }
    }
}

impl<'a> From<&'a CaseSummary> for CaseLine<'a> {
    fn from(value: &'a CaseSummary) -> Self {
        match &value.status {
            CaseStatus::Ok => Self::ok(&value.name),
            CaseStatus::Failed { reason } => Self::failed(&value.name, reason),
        }
    }
}

/// Print the final summary of a suite in the default format
pub fn print_summary(summary: &SuiteSummary) {
    let result = if summary.failed == 0 {
        "ok".green().bold()
    } else {
        "FAILED".bright_red().bold()
    };
    println!(
        "\n{} {result}. {} passed; {} failed; {} not run",
        "Suite result:".bold(),
        summary.passed(),
        summary.failed,
        summary.total - summary.cases.len()
    );
}

/// Print the `summary` as json to `stdout`
pub fn print_json(summary: &SuiteSummary) -> Result<()> {
    let mut writer = BufWriter::new(io::stdout().lock());
    serde_json::to_writer(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Dump all data to `stderr`
pub fn write_all_to_stderr(bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }

    let mut writer = BufWriter::new(io::stderr().lock());
    let result = writer
        .write_all(bytes)
        .and_then(|()| {
            if bytes.last() == Some(&b'\n') {
                Ok(())
            } else {
                writer.write_all(b"\n")
            }
        })
        .and_then(|()| writer.flush());
    if let Err(error) = result {
        warn!("Failed to write to stderr: {error}");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::ok(CaseLine::ok("a.inp"), "a.inp ... ok")]
    #[case::failed(CaseLine::failed("a.inp", "wrong"), "a.inp ... FAILED\n  wrong")]
    #[case::failed_multiline(
        CaseLine::failed("x/b.inp", "Error in line :1 of file:b.oup\n  expected: '8'"),
        "x/b.inp ... FAILED\n  Error in line :1 of file:b.oup\n    expected: '8'"
    )]
    fn test_case_line(#[case] line: CaseLine<'_>, #[case] expected: &str) {
        colored::control::set_override(false);
        assert_eq!(line.to_string(), expected);
    }
}
