//! Validate a program against all cases in a directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::Pattern;
use judge_fixture::error::Error;
use judge_fixture::{Directory, Fixture, Invoke};
use log::{debug, warn};
use serde::Serialize;

/// A pair of an input file and the sibling expected output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// The directory containing both files
    pub dir: PathBuf,
    /// The file name of the input file
    pub input: String,
    /// The file name of the expected output file
    pub output: String,
}

/// The outcome of a single case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    /// The output matched
    Ok,
    /// The case failed
    Failed {
        /// The error message
        reason: String,
    },
}

/// The summary of a single case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSummary {
    /// The path of the input file relative to the suite directory
    pub name: String,
    /// The input file
    pub input: PathBuf,
    /// The expected output file
    pub output: PathBuf,
    /// The outcome
    #[serde(flatten)]
    pub status: CaseStatus,
}

/// The summary of a whole suite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// The summaries of all cases which were run
    pub cases: Vec<CaseSummary>,
    /// The number of failed cases
    pub failed: usize,
    /// The number of all cases which were found
    pub total: usize,
}

/// The configuration of a suite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    /// The directory which is searched recursively for cases
    pub dir: PathBuf,
    /// Stop after the first failed case
    pub fail_fast: bool,
    /// The extension of the input files without the leading dot
    pub input_ext: String,
    /// The extension of the expected output files without the leading dot
    pub output_ext: String,
}

impl Case {
    /// The path of the input file
    pub fn input_path(&self) -> PathBuf {
        self.dir.join(&self.input)
    }

    /// The path of the expected output file
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output)
    }

    /// Run this case with a file validating fixture rooted at the case's directory
    ///
    /// Both files are resolved in the case's directory only, never in its subdirectories.
    pub fn validate<I>(&self, target: &I) -> Result<()>
    where
        I: Invoke,
    {
        Fixture::file_validating(target)
            .input_resolver(Directory::new(&self.dir))
            .output_resolver(Directory::new(&self.dir))
            .validate_files(&self.input, &self.output)
    }
}

impl SuiteSummary {
    /// The number of passed cases
    pub fn passed(&self) -> usize {
        self.cases.len() - self.failed
    }

    /// Return an [`Error::CasesFailed`] if any case failed
    pub fn into_result(self) -> Result<Self> {
        if self.failed == 0 {
            Ok(self)
        } else {
            Err(Error::CasesFailed(self.failed, self.total).into())
        }
    }
}

impl Suite {
    /// Create a new `Suite` with the default extensions `inp` and `oup`
    pub fn new<T>(dir: T) -> Self
    where
        T: Into<PathBuf>,
    {
        Self {
            dir: dir.into(),
            fail_fast: false,
            input_ext: "inp".to_owned(),
            output_ext: "oup".to_owned(),
        }
    }

    /// Find all input files below the suite directory sorted by path
    ///
    /// The expected output file of a case doesn't need to exist. A missing output file fails the
    /// case when it is run.
    pub fn discover(&self) -> Result<Vec<Case>> {
        if !self.dir.is_dir() {
            return Err(Error::ReadError(self.dir.clone(), "Not a directory".to_owned()).into());
        }

        let dir = self.dir.to_str().ok_or_else(|| {
            Error::ConfigurationError(format!(
                "The suite directory '{}' is not valid utf-8",
                self.dir.display()
            ))
        })?;
        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(dir),
            Pattern::escape(&self.input_ext)
        );
        debug!("Searching cases with pattern '{pattern}'");

        let mut inputs = vec![];
        for entry in glob::glob(&pattern)
            .map_err(|error| Error::ConfigurationError(format!("Invalid pattern: {error}")))?
        {
            match entry {
                Ok(path) if path.is_file() => inputs.push(path),
                Ok(_) => {}
                Err(error) => warn!("Skipping '{}': {}", error.path().display(), error.error()),
            }
        }
        inputs.sort();

        Ok(inputs
            .into_iter()
            .filter_map(|path| self.case(&path))
            .collect())
    }

    /// Run all cases and return the summary
    ///
    /// `on_case` is called with the summary of each case directly after it ran.
    pub fn run<I, F>(&self, target: &I, mut on_case: F) -> Result<SuiteSummary>
    where
        I: Invoke,
        F: FnMut(&CaseSummary),
    {
        let cases = self.discover()?;
        if cases.is_empty() {
            warn!(
                "No cases with extension '{}' found in '{}'",
                self.input_ext,
                self.dir.display()
            );
        }

        let mut summary = SuiteSummary {
            total: cases.len(),
            ..Default::default()
        };
        for case in &cases {
            let status = match case.validate(target) {
                Ok(()) => CaseStatus::Ok,
                Err(error) => {
                    summary.failed += 1;
                    CaseStatus::Failed {
                        reason: format!("{error:#}"),
                    }
                }
            };
            let case_summary = CaseSummary {
                name: self.case_name(case),
                input: case.input_path(),
                output: case.output_path(),
                status,
            };
            on_case(&case_summary);
            summary.cases.push(case_summary);

            if self.fail_fast && summary.failed > 0 {
                debug!("Stopping after the first failed case");
                break;
            }
        }

        Ok(summary)
    }

    fn case(&self, input_path: &Path) -> Option<Case> {
        let dir = input_path.parent()?;
        let input = input_path.file_name()?.to_str()?;
        let stem = input_path.file_stem()?.to_str()?;
        Some(Case {
            dir: dir.to_path_buf(),
            input: input.to_owned(),
            output: format!("{stem}.{}", self.output_ext),
        })
    }

    fn case_name(&self, case: &Case) -> String {
        let input = case.input_path();
        input
            .strip_prefix(&self.dir)
            .unwrap_or(&input)
            .display()
            .to_string()
    }
}
