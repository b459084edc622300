//! The [`Fixture`] ties file lookup, interception, invocation and comparison together

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::comparator::{Comparison, OutputComparator};
use crate::error::Error;
use crate::format;
use crate::interceptor::{CapturedOutput, InputSource, Interception, Redirect};
use crate::invoker::Invoke;
use crate::locator::{FileLocator, FileResolver};

/// What a [`Fixture`] reports to the real console when the output doesn't match
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Print the captured output to `stdout` before returning the failure (the default)
    #[default]
    Echo,
    /// Only return the failure
    Silent,
}

/// Run a program with a given input and validate its output
///
/// The files are resolved with a [`FileLocator`] rooted at the current directory, or at the
/// directory in `JUDGE_FIXTURE_ROOT` if present, unless configured otherwise with
/// [`Fixture::search_root`], [`Fixture::input_resolver`] or [`Fixture::output_resolver`].
pub struct Fixture<I> {
    input_resolver: Option<Box<dyn FileResolver>>,
    output_resolver: Option<Box<dyn FileResolver>>,
    redirect: Redirect,
    report: Report,
    target: I,
}

impl<I> Fixture<I>
where
    I: Invoke,
{
    /// Create a `Fixture` which echoes the captured output if the validation fails
    pub fn console_validating(target: I) -> Self {
        Self {
            input_resolver: None,
            output_resolver: None,
            redirect: Redirect::default(),
            report: Report::Echo,
            target,
        }
    }

    /// Create a `Fixture` which only returns the failure if the validation fails
    pub fn file_validating(target: I) -> Self {
        Self::console_validating(target).report(Report::Silent)
    }

    /// Search the input and output files below `root`
    pub fn search_root<T>(mut self, root: T) -> Self
    where
        T: Into<PathBuf>,
    {
        let locator = FileLocator::new(root);
        self.input_resolver = Some(Box::new(locator.clone()));
        self.output_resolver = Some(Box::new(locator));
        self
    }

    /// Resolve the names of input files with the given `resolver`
    pub fn input_resolver<R>(mut self, resolver: R) -> Self
    where
        R: FileResolver + 'static,
    {
        self.input_resolver = Some(Box::new(resolver));
        self
    }

    /// Resolve the names of expected output files with the given `resolver`
    pub fn output_resolver<R>(mut self, resolver: R) -> Self
    where
        R: FileResolver + 'static,
    {
        self.output_resolver = Some(Box::new(resolver));
        self
    }

    /// Set how the standard input and output of the program are redirected
    pub fn redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = redirect;
        self
    }

    /// Set what is reported to the console if the validation fails
    pub fn report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    /// The program run by this fixture
    pub fn target(&self) -> &I {
        &self.target
    }

    /// Run the program with the file `input_name` as input and compare its output with the file
    /// `output_name`
    ///
    /// Both files are resolved before the program runs. The output is compared line by line and
    /// the first differing line is returned as [`Error::Mismatch`].
    pub fn validate_files(&self, input_name: &str, output_name: &str) -> Result<()> {
        let input = resolve(self.input_resolver.as_deref(), input_name)?;
        let expected = resolve(self.output_resolver.as_deref(), output_name)?;

        let captured = self.capture(input)?;
        match OutputComparator.compare_file_as(
            output_name,
            &expected,
            &captured.to_string_lossy(),
        )? {
            Comparison::Match => {
                debug!("Output of '{}' matches '{output_name}'", self.target.name());
                Ok(())
            }
            Comparison::Mismatch(mismatch) => {
                self.echo(output_name, &captured);
                Err(Error::Mismatch(mismatch).into())
            }
        }
    }

    /// Run the program with `input` and check that the output is exactly `expected`
    ///
    /// Other than [`Fixture::validate_files`], line endings are not normalized. Any difference
    /// fails with [`Error::OutputDiffers`].
    pub fn validate_string(&self, input: &str, expected: &str) -> Result<()> {
        let captured = self.capture(input)?;
        if captured.as_bytes() == expected.as_bytes() {
            debug!("Output of '{}' matches the expected string", self.target.name());
            return Ok(());
        }

        self.echo("input", &captured);
        Err(Error::OutputDiffers(expected.to_owned(), captured.to_string_lossy()).into())
    }

    /// Run the program with `input` and return its output without validating it
    ///
    /// The interception is always ended, even if the program fails. An error of the program has
    /// precedence over an error ending the interception.
    pub fn capture<T>(&self, input: T) -> Result<CapturedOutput>
    where
        T: Into<InputSource>,
    {
        let input = input.into();
        let mut interception = Interception::begin(&input, self.redirect)?;

        let result = {
            let mut console = interception.console();
            self.target
                .invoke(&mut console)
                .and_then(|()| console.flush().map_err(Into::into))
        };

        let captured = interception.end();
        result?;
        captured
    }

    /// Like [`Fixture::validate_files`] but panic with the error message on failure
    #[track_caller]
    pub fn assert_files(&self, input_name: &str, output_name: &str) {
        if let Err(error) = self.validate_files(input_name, output_name) {
            panic!("{error:#}");
        }
    }

    /// Like [`Fixture::validate_string`] but panic with the error message on failure
    #[track_caller]
    pub fn assert_string(&self, input: &str, expected: &str) {
        if let Err(error) = self.validate_string(input, expected) {
            panic!("{error:#}");
        }
    }

    fn echo(&self, file_name: &str, captured: &CapturedOutput) {
        if self.report == Report::Echo {
            format::print_echo(file_name, captured.as_bytes());
        }
    }
}

impl<I> std::fmt::Debug for Fixture<I>
where
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("redirect", &self.redirect)
            .field("report", &self.report)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

fn resolve(resolver: Option<&dyn FileResolver>, name: &str) -> Result<PathBuf> {
    match resolver {
        Some(resolver) => resolver.resolve(name),
        None => FileLocator::from_env()?.resolve(name),
    }
}
