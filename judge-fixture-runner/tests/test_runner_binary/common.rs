use std::fs;
use std::path::Path;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

pub const RUNNER: &str = env!("CARGO_BIN_EXE_judge-fixture-runner");

/// Reads two numbers, one per line, and prints their sum
pub const SUM: &str = "read a; read b; echo $((a + b))";

pub struct Runner {
    command: Command,
}

impl Runner {
    pub fn new() -> Self {
        let mut command = Command::new(RUNNER);
        command
            .env_remove("JUDGE_FIXTURE_ROOT")
            .env("JUDGE_FIXTURE_COLOR", "never")
            .env("JUDGE_FIXTURE_LOG", "error");
        Self { command }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.command.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &Path) -> Self {
        self.command.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.current_dir(dir);
        self
    }

    pub fn run(mut self) -> Assert {
        self.command.assert()
    }
}

/// Create a temporary directory with the given files and their content
pub fn sandbox(files: &[(&str, &str)]) -> TempDir {
    let root = tempdir().expect("Creating sandbox directory should succeed");
    for (name, content) in files {
        let path = root.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}
