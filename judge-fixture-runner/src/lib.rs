//! The judge-fixture-runner library
//!
//! Runs an external executable through the [`judge_fixture::Fixture`] pipeline. The executable is
//! wrapped in a [`command::CommandTarget`] which feeds the input to its `stdin` and captures its
//! `stdout`.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod args;
pub mod command;
pub mod format;
pub mod suite;

use anyhow::Result;
use clap::Parser;
use judge_fixture::Fixture;

use self::args::{Command, CommandLineArgs, OutputFormatKind};
use self::command::CommandTarget;
use self::format::CaseLine;
use self::suite::Suite;

/// Parse the command-line arguments and run the requested command
pub fn run() -> Result<()> {
    run_with_args(CommandLineArgs::parse())
}

/// Run the command of already parsed `args`
pub fn run_with_args(args: CommandLineArgs) -> Result<()> {
    match args.command {
        Command::Run {
            input,
            output,
            root,
            quiet,
            program,
        } => {
            let target = CommandTarget::from_command_line(program.into_args()?)?;
            let mut fixture = fixture(target, quiet);
            if let Some(root) = root {
                fixture = fixture.search_root(root);
            }

            fixture.validate_files(&input, &output)?;
            CaseLine::ok(&input).print();
            Ok(())
        }
        Command::Check {
            input,
            expected,
            quiet,
            program,
        } => {
            let target = CommandTarget::from_command_line(program.into_args()?)?;

            fixture(target, quiet).validate_string(&input, &expected)?;
            CaseLine::ok("input").print();
            Ok(())
        }
        Command::Suite {
            dir,
            input_ext,
            output_ext,
            fail_fast,
            output_format,
            program,
        } => {
            let target = CommandTarget::from_command_line(program.into_args()?)?;
            let suite = Suite {
                dir,
                fail_fast,
                input_ext,
                output_ext,
            };

            let summary = match output_format {
                OutputFormatKind::Default => {
                    let summary = suite.run(&target, |case| CaseLine::from(case).print())?;
                    format::print_summary(&summary);
                    summary
                }
                OutputFormatKind::Json => {
                    let summary = suite.run(&target, |_| {})?;
                    format::print_json(&summary)?;
                    summary
                }
            };

            summary.into_result().map(|_| ())
        }
    }
}

fn fixture(target: CommandTarget, quiet: bool) -> Fixture<CommandTarget> {
    if quiet {
        Fixture::file_validating(target)
    } else {
        Fixture::console_validating(target)
    }
}
