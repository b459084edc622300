//! The `judge-fixture-runner` binary
use std::io::Write;

use colored::{control, Colorize};
use env_logger::Env;
use judge_fixture::envs;
use judge_fixture::error::Error;
use log::error;

/// The main function of the `judge-fixture-runner` binary
///
/// Logging and the usage of colors are configured first. Then the main
/// [`judge_fixture_runner::run`] library function is called. A wrong answer exits with `3`, any
/// other error with `1`.
fn main() {
    // JUDGE_FIXTURE_COLOR wins over CARGO_TERM_COLOR, anything but never/always is auto
    let judge_color = std::env::var(envs::JUDGE_FIXTURE_COLOR).ok();
    if let Some(var) = judge_color
        .clone()
        .or_else(|| std::env::var(envs::CARGO_TERM_COLOR).ok())
    {
        if var == "never" {
            control::set_override(false);
        } else if var == "always" {
            control::set_override(true);
        } else {
            // auto
        }
    }

    // Log lines share the color choice and are filtered with JUDGE_FIXTURE_LOG
    env_logger::Builder::from_env(
        Env::default()
            .filter_or(envs::JUDGE_FIXTURE_LOG, "warn")
            .write_style(
                judge_color.map_or_else(|| envs::CARGO_TERM_COLOR, |_| envs::JUDGE_FIXTURE_COLOR),
            ),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "{}: {:<5}: {}",
            record
                .module_path()
                .unwrap_or_else(|| record.module_path_static().unwrap_or("???")),
            match record.level() {
                log::Level::Error => "Error".red().bold(),
                log::Level::Warn => "Warn".yellow().bold(),
                log::Level::Info => "Info".green().bold(),
                log::Level::Debug => "Debug".blue().bold(),
                log::Level::Trace => "Trace".cyan().bold(),
            },
            record.args()
        )
    })
    .init();

    if let Err(error) = judge_fixture_runner::run() {
        error!("{error:#}");
        match error.downcast_ref::<Error>() {
            Some(error) if error.is_wrong_answer() => std::process::exit(3),
            _ => std::process::exit(1),
        }
    }
}
