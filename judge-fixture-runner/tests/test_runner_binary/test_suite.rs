use predicates::str::contains;
use pretty_assertions::assert_eq;

use crate::common::{self, Runner, SUM};

fn cases() -> tempfile::TempDir {
    common::sandbox(&[
        ("a.inp", "1\n2\n"),
        ("a.oup", "3\n"),
        ("b.inp", "1\n1\n"),
        ("b.oup", "3\n"),
        ("sub/c.inp", "2\n2\n"),
        ("sub/c.oup", "4\n"),
        ("sub/d.inp", "0\n0\n"),
    ])
}

#[test]
fn test_suite_reports_all_cases() {
    let root = cases();

    Runner::new()
        .args(&["suite", root.path().to_str().unwrap(), "--", "sh", "-c", SUM])
        .run()
        .code(3)
        .stdout(contains("a.inp ... ok\n"))
        .stdout(contains(
            "b.inp ... FAILED\n  Error in line :1 of file:b.oup\n    expected: '3'\n      actual: \
             '2'\n",
        ))
        .stdout(contains("sub/c.inp ... ok\n"))
        .stdout(contains("sub/d.inp ... FAILED\n  File 'd.oup' could not be found"))
        .stdout(contains(
            "Suite result: FAILED. 2 passed; 2 failed; 0 not run\n",
        ))
        .stderr(contains("2 of 4 cases failed"));
}

#[test]
fn test_suite_when_all_cases_pass() {
    let root = common::sandbox(&[("x.in", "5\n5\n"), ("x.out", "10\n")]);

    Runner::new()
        .args(&[
            "suite",
            root.path().to_str().unwrap(),
            "--input-ext",
            "in",
            "--output-ext",
            "out",
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .success()
        .stdout("x.in ... ok\n\nSuite result: ok. 1 passed; 0 failed; 0 not run\n");
}

#[test]
fn test_suite_fail_fast() {
    let root = cases();

    Runner::new()
        .args(&[
            "suite",
            "--fail-fast",
            root.path().to_str().unwrap(),
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .code(3)
        .stdout(contains("Suite result: FAILED. 1 passed; 1 failed; 2 not run\n"))
        .stderr(contains("1 of 4 cases failed"));
}

#[test]
fn test_suite_json_output() {
    let root = cases();

    let assert = Runner::new()
        .args(&[
            "suite",
            "--output-format",
            "json",
            root.path().to_str().unwrap(),
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .code(3);

    let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let statuses = summary["cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|case| {
            (
                case["name"].as_str().unwrap().to_owned(),
                case["status"].as_str().unwrap().to_owned(),
            )
        })
        .collect::<Vec<_>>();

    assert_eq!(
        statuses,
        [
            ("a.inp".to_owned(), "ok".to_owned()),
            ("b.inp".to_owned(), "failed".to_owned()),
            ("sub/c.inp".to_owned(), "ok".to_owned()),
            ("sub/d.inp".to_owned(), "failed".to_owned()),
        ]
    );
    assert_eq!(summary["failed"], 2);
    assert_eq!(summary["total"], 4);
}

#[test]
fn test_suite_when_dir_missing() {
    let root = common::sandbox(&[]);

    Runner::new()
        .args(&[
            "suite",
            root.path().join("missing").to_str().unwrap(),
            "--",
            "sh",
            "-c",
            SUM,
        ])
        .run()
        .code(1)
        .stderr(contains("Not a directory"));
}
