//! The command-line arguments of the `judge-fixture-runner` binary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use judge_fixture::error::Error;

/// The kind of the output format of a suite run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormatKind {
    /// The default terminal output
    #[default]
    Default,
    /// Json terminal output
    Json,
}

/// The command line arguments of `judge-fixture-runner`
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run a program against judge-style input and output files",
    long_about = None
)]
pub struct CommandLineArgs {
    /// The subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of `judge-fixture-runner`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the output of the program for a single pair of input and expected output files
    ///
    /// The files are searched by name below the root directory.
    Run {
        /// The name of the input file
        #[arg(long, value_name = "NAME")]
        input: String,
        /// The name of the file with the expected output
        #[arg(long, value_name = "NAME")]
        output: String,
        /// The directory to search the files in [default: $JUDGE_FIXTURE_ROOT or the current
        /// directory]
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Don't echo the output of the program if it doesn't match
        #[arg(long, short)]
        quiet: bool,
        #[command(flatten)]
        program: ProgramArgs,
    },
    /// Validate the output of the program for the given input string
    ///
    /// The output has to be exactly equal to the expected string.
    Check {
        /// The input of the program
        #[arg(long, value_name = "TEXT")]
        input: String,
        /// The expected output
        #[arg(long, value_name = "TEXT")]
        expected: String,
        /// Don't echo the output of the program if it doesn't match
        #[arg(long, short)]
        quiet: bool,
        #[command(flatten)]
        program: ProgramArgs,
    },
    /// Validate the output of the program for all input files in a directory
    ///
    /// Every input file is paired with the expected output file of the same name but with the
    /// output extension in the same directory.
    Suite {
        /// The directory with the cases. It is searched recursively.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// The file extension of the input files
        #[arg(long, value_name = "EXT", default_value = "inp")]
        input_ext: String,
        /// The file extension of the expected output files
        #[arg(long, value_name = "EXT", default_value = "oup")]
        output_ext: String,
        /// Stop after the first failed case
        #[arg(long)]
        fail_fast: bool,
        /// The format of the report
        #[arg(long, value_enum, default_value_t = OutputFormatKind::Default)]
        output_format: OutputFormatKind,
        #[command(flatten)]
        program: ProgramArgs,
    },
}

/// The program to validate
#[derive(Args, Debug)]
pub struct ProgramArgs {
    /// The program and its arguments as a single shell-like string
    #[arg(long, value_name = "STRING", value_parser = parse_command, conflicts_with = "program")]
    pub command: Option<RawArgs>,
    /// The program followed by its arguments
    #[arg(last = true, value_name = "PROGRAM")]
    pub program: Vec<String>,
}

/// Raw command-line arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs(pub Vec<String>);

impl ProgramArgs {
    /// Return the program and its arguments
    ///
    /// Fails if neither `--command` nor the trailing program arguments are present.
    pub fn into_args(self) -> Result<Vec<String>, Error> {
        let args = match self.command {
            Some(RawArgs(args)) => args,
            None => self.program,
        };
        if args.is_empty() {
            Err(Error::ConfigurationError(
                "A program is required: Use '--command <STRING>' or '-- <PROGRAM> [ARGS]...'"
                    .to_owned(),
            ))
        } else {
            Ok(args)
        }
    }
}

fn parse_command(value: &str) -> Result<RawArgs, String> {
    shlex::split(value)
        .ok_or_else(|| "Failed to split the command".to_owned())
        .map(RawArgs)
}
