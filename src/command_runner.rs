//! Generic command execution — enables test doubles for every external tool.
//!
//! This trait is NOT tied to a particular transport — it runs any external
//! command (`ssh`, `scp`, `kubectl`, the presenters, `angela`). The
//! production implementation uses tokio; test doubles return canned results
//! without spawning processes.
//!
//! Known limitation: there is no timeout or retry on any invocation. A hung
//! remote call blocks the run until the child exits.

use std::process::Output;

use anyhow::{Context, Result};

/// Runs external programs either captured or with inherited stdio.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its stdout/stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with inherited stdio (streams to the caller's
    /// terminal, interactive pass-through).
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus>;
}

/// Production `CommandRunner` — delegates to [`tokio::process::Command`].
#[derive(Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus> {
        tokio::process::Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::inherit())
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to run {program}"))
    }
}
