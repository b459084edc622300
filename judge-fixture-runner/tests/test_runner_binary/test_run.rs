use predicates::prelude::*;
use predicates::str::contains;
use rstest::rstest;

use crate::common::{self, Runner, SUM};

#[test]
fn test_run_when_output_matches() {
    let root = common::sandbox(&[("cases/a.inp", "3\n4\n"), ("a.oup", "7\n")]);

    Runner::new()
        .args(&[
            "run",
            "--input",
            "a.inp",
            "--output",
            "a.oup",
            "--root",
            root.path().to_str().unwrap(),
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .success()
        .stdout("a.inp ... ok\n")
        .stderr("");
}

#[test]
fn test_run_when_output_differs_then_echo() {
    let root = common::sandbox(&[("a.inp", "3\n4\n"), ("a.oup", "8\n")]);

    Runner::new()
        .args(&[
            "run",
            "--input",
            "a.inp",
            "--output",
            "a.oup",
            "--root",
            root.path().to_str().unwrap(),
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .code(3)
        .stdout("Test Result compared for the output file:a.oup\n7\n\n")
        .stderr(
            "judge_fixture_runner: Error: Error in line :1 of file:a.oup\n  expected: '8'\n    \
             actual: '7'\n",
        );
}

#[test]
fn test_run_quiet_when_output_differs_then_no_echo() {
    let root = common::sandbox(&[("a.inp", "3\n4\n"), ("a.oup", "8\n")]);

    Runner::new()
        .args(&[
            "run",
            "--quiet",
            "--input",
            "a.inp",
            "--output",
            "a.oup",
            "--root",
            root.path().to_str().unwrap(),
            "--command",
            &format!("sh -c '{SUM}'"),
        ])
        .run()
        .code(3)
        .stdout("")
        .stderr(contains("Error in line :1 of file:a.oup"));
}

#[test]
fn test_run_with_root_from_env() {
    let root = common::sandbox(&[("x/y/a.inp", "1\n1\n"), ("x/a.oup", "2\n")]);

    Runner::new()
        .env("JUDGE_FIXTURE_ROOT", root.path())
        .args(&["run", "--input", "a.inp", "--output", "a.oup", "--", "sh", "-c", SUM])
        .run()
        .success();
}

#[test]
fn test_run_with_current_dir_as_root() {
    let root = common::sandbox(&[("a.inp", "20\n22\n"), ("a.oup", "42\n")]);

    Runner::new()
        .current_dir(root.path())
        .args(&["run", "--input", "a.inp", "--output", "a.oup", "--", "sh", "-c", SUM])
        .run()
        .success();
}

#[rstest]
#[case::input_missing("b.inp", "a.oup", "File 'b.inp' could not be found")]
#[case::output_missing("a.inp", "b.oup", "File 'b.oup' could not be found")]
fn test_run_when_file_missing(#[case] input: &str, #[case] output: &str, #[case] message: &str) {
    let root = common::sandbox(&[("a.inp", "1\n2\n"), ("a.oup", "3\n")]);

    Runner::new()
        .current_dir(root.path())
        .args(&["run", "--input", input, "--output", output, "--", "sh", "-c", SUM])
        .run()
        .code(1)
        .stdout("")
        .stderr(contains(message));
}

#[rstest]
#[case::not_found(&["does-not-exist-judge-fixture"], "Error launching 'does-not-exist-judge-fixture'")]
#[case::exit_code(&["sh", "-c", "echo oops >&2; exit 2"], "Error running 'sh': Exit code was: '2'\nstderr:\noops")]
fn test_run_when_program_fails(#[case] program: &[&str], #[case] message: &str) {
    let root = common::sandbox(&[("a.inp", ""), ("a.oup", "")]);
    let mut args = vec!["run", "--input", "a.inp", "--output", "a.oup", "--"];
    args.extend_from_slice(program);

    Runner::new()
        .current_dir(root.path())
        .args(&args)
        .run()
        .code(1)
        .stderr(contains(message));
}

#[test]
fn test_run_without_program() {
    Runner::new()
        .args(&["run", "--input", "a.inp", "--output", "a.oup"])
        .run()
        .code(1)
        .stderr(contains("A program is required"));
}

#[test]
fn test_run_forwards_stderr_of_program() {
    let root = common::sandbox(&[("a.inp", "1\n"), ("a.oup", "1\n")]);

    Runner::new()
        .current_dir(root.path())
        .args(&[
            "run",
            "--input",
            "a.inp",
            "--output",
            "a.oup",
            "--",
            "sh",
            "-c",
            "echo debugging >&2; cat",
        ])
        .run()
        .success()
        .stderr(contains("debugging").and(contains("Error").not()));
}
