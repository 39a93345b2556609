//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/hv");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("hv");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

/// A temporary `--workspace` directory plus a fluent `hv` invocation builder.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start building an `hv` invocation rooted at this workspace, always
    /// passing `--mock` so the deterministic oracles are used.
    pub fn hv(&self) -> CliBuilder {
        CliBuilder::new(self.dir.path().to_path_buf())
    }
}

pub struct CliBuilder {
    workspace: PathBuf,
    args: Vec<String>,
    json: bool,
}

impl CliBuilder {
    fn new(workspace: PathBuf) -> Self {
        Self { workspace, args: Vec::new(), json: false }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::new(binary_path());
        cmd.arg("--workspace").arg(&self.workspace);
        cmd.arg("--mock");
        if self.json {
            cmd.arg("--json");
        }
        cmd.args(&self.args);
        cmd
    }

    pub fn run(self) -> RunAssert {
        let output = self.command().output().expect("hv should spawn");
        RunAssert { output }
    }

    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            run.output.status.code(),
            run.stdout(),
            run.stderr()
        );
        run
    }

    pub fn fails_with(self, code: i32) -> RunAssert {
        let run = self.run();
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "stdout: {}\nstderr: {}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(self.stdout().contains(expected), "stdout does not contain '{expected}'\nstdout: {}", self.stdout());
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(self.stderr().contains(expected), "stderr does not contain '{expected}'\nstderr: {}", self.stderr());
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be valid JSON")
    }
}
