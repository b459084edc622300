use predicates::str::contains;
use rstest::rstest;

use crate::common::Runner;

const SQUARE: &str = "read n; echo $((n * n))";

#[rstest]
#[case::trailing_program(&["--", "sh", "-c", SQUARE])]
#[case::command(&["--command", "sh -c 'read n; echo $((n * n))'"])]
fn test_check_when_output_matches(#[case] program: &[&str]) {
    let mut args = vec!["check", "--input", "5\n", "--expected", "25\n"];
    args.extend_from_slice(program);

    Runner::new()
        .args(&args)
        .run()
        .success()
        .stdout("input ... ok\n");
}

#[test]
fn test_check_is_exact() {
    Runner::new()
        .args(&["check", "--input", "5\n", "--expected", "25", "--", "sh", "-c", SQUARE])
        .run()
        .code(3)
        .stdout(contains("Test Result compared for the output file:input\n25\n"))
        .stderr(contains("Output differs from the expected output"));
}

#[test]
fn test_check_quiet() {
    Runner::new()
        .args(&[
            "check", "--quiet", "--input", "4\n", "--expected", "25\n", "--", "sh", "-c", SQUARE,
        ])
        .run()
        .code(3)
        .stdout("");
}
