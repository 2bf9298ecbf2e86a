//! Shared mock infrastructure for unit tests.
//!
//! Provides canned [`CommandRunner`] and [`Transport`] implementations and
//! output helpers so each test file doesn't have to re-define the same
//! boilerplate.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use shipit_cli::bundle::{RetrievedFile, SuffixClass};
use shipit_cli::command_runner::CommandRunner;
use shipit_cli::staging::StagingArea;
use shipit_cli::transport::Transport;

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(1 << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Scripted command runner ───────────────────────────────────────────────────

/// One canned response: the first rule whose substrings all appear in the
/// joined invocation line (`program arg1 arg2 ...`) supplies the output.
pub struct Rule {
    pub contains: &'static [&'static str],
    pub output: Output,
}

/// Canned [`CommandRunner`] — records every invocation line and answers
/// from rules. Unmatched invocations succeed with empty output.
#[derive(Clone)]
pub struct ScriptedRunner {
    rules: Arc<Vec<Rule>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: Arc::new(rules),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn respond(&self, program: &str, args: &[&str]) -> Output {
        let line = format!("{program} {}", args.join(" "));
        self.calls.lock().expect("calls lock").push(line.clone());
        for rule in self.rules.iter() {
            if rule.contains.iter().all(|s| line.contains(s)) {
                return rule.output.clone();
            }
        }
        ok_output(b"")
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.respond(program, args))
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        Ok(self.respond(program, args).status)
    }
}

// ── Canned transport ──────────────────────────────────────────────────────────

/// Canned [`Transport`] for collection tests: directory and file listings
/// come from maps, fetches write a marker file into staging.
#[derive(Default)]
pub struct CannedTransport {
    /// module-name pattern → discovered directories
    pub dirs: HashMap<String, Vec<String>>,
    /// directory → files within it
    pub files: HashMap<String, Vec<String>>,
    /// remote paths whose fetch must fail
    pub failing: Vec<String>,
    /// files returned by the default-location path
    pub default_files: Vec<String>,
    /// captured `run_command` stdout
    pub command_output: String,
}

impl Transport for CannedTransport {
    async fn find_directories(&self, _root: &str, name_pattern: &str) -> Result<Vec<String>> {
        Ok(self.dirs.get(name_pattern).cloned().unwrap_or_default())
    }

    async fn list_files(&self, dir: &str, _suffix: &str) -> Result<Vec<String>> {
        Ok(self.files.get(dir).cloned().unwrap_or_default())
    }

    async fn fetch(&self, remote_path: &str, staging: &StagingArea) -> Result<RetrievedFile> {
        if self.failing.iter().any(|f| f == remote_path) {
            anyhow::bail!("fetch of '{remote_path}' failed");
        }
        let name = remote_path.rsplit('/').next().expect("file name");
        let local_path = staging.write(name, "data")?;
        Ok(RetrievedFile {
            remote_path: remote_path.to_string(),
            kind: SuffixClass::of(&local_path),
            local_path,
        })
    }

    async fn fetch_default(
        &self,
        _suffix: &str,
        staging: &StagingArea,
    ) -> Result<Vec<RetrievedFile>> {
        let mut files = Vec::new();
        for remote in &self.default_files {
            files.push(self.fetch(remote, staging).await?);
        }
        Ok(files)
    }

    async fn run_command(&self, _argv: &[&str]) -> Result<String> {
        Ok(self.command_output.clone())
    }
}
