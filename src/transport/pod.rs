//! Container-exec backend — discovery and commands run inside the pod's
//! filesystem namespace via `kubectl exec`; retrieval copies from the pod
//! to local storage by name via `kubectl cp`, with an explicit existence
//! check before each copy.

use anyhow::Result;

use crate::bundle::{RetrievedFile, SuffixClass};
use crate::command_runner::CommandRunner;
use crate::error::TransportError;
use crate::staging::StagingArea;

use super::{DEFAULT_BUNDLE_DIR, Transport, expect_success, remote_file_name, stdout_lines};

/// Container-exec transport bound to one pod name.
pub struct PodTransport<R> {
    pod: String,
    runner: R,
}

impl<R: CommandRunner> PodTransport<R> {
    #[must_use]
    pub fn new(pod: String, runner: R) -> Self {
        Self { pod, runner }
    }

    async fn exec(&self, remote_argv: &[&str]) -> Result<std::process::Output> {
        let mut args: Vec<&str> = vec!["exec", self.pod.as_str(), "--"];
        args.extend_from_slice(remote_argv);
        self.runner.run("kubectl", &args).await
    }

    /// Check that `path` exists inside the pod before attempting a copy.
    async fn exists(&self, path: &str) -> Result<bool> {
        let output = self.exec(&["test", "-e", path]).await?;
        Ok(output.status.success())
    }
}

impl<R: CommandRunner> Transport for PodTransport<R> {
    async fn find_directories(&self, root: &str, name_pattern: &str) -> Result<Vec<String>> {
        let pattern = format!("*{name_pattern}*");
        let output = self
            .exec(&[
                "find", root, "-mindepth", "1", "-maxdepth", "1", "-type", "d", "-name", &pattern,
            ])
            .await?;
        expect_success("kubectl", &output)?;
        Ok(stdout_lines(&output))
    }

    async fn list_files(&self, dir: &str, suffix: &str) -> Result<Vec<String>> {
        let pattern = format!("*{suffix}");
        let output = self
            .exec(&[
                "find", dir, "-mindepth", "1", "-maxdepth", "1", "-type", "f", "-name", &pattern,
            ])
            .await?;
        expect_success("kubectl", &output)?;
        Ok(stdout_lines(&output))
    }

    async fn fetch(&self, remote_path: &str, staging: &StagingArea) -> Result<RetrievedFile> {
        if !self.exists(remote_path).await? {
            return Err(TransportError::MissingRemote(remote_path.to_string()).into());
        }

        let local_path = staging.join(remote_file_name(remote_path));
        let source = format!("{}:{remote_path}", self.pod);
        let local = local_path.to_string_lossy().to_string();
        let output = self.runner.run("kubectl", &["cp", &source, &local]).await?;
        if !output.status.success() {
            return Err(TransportError::CopyFailed {
                remote: remote_path.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(RetrievedFile {
            remote_path: remote_path.to_string(),
            kind: SuffixClass::of(&local_path),
            local_path,
        })
    }

    async fn fetch_default(
        &self,
        suffix: &str,
        staging: &StagingArea,
    ) -> Result<Vec<RetrievedFile>> {
        // kubectl cp has no remote glob; list first, then copy file by file.
        let remote_files = self.list_files(DEFAULT_BUNDLE_DIR, suffix).await?;
        let mut files = Vec::with_capacity(remote_files.len());
        for remote in &remote_files {
            files.push(self.fetch(remote, staging).await?);
        }
        Ok(files)
    }

    async fn run_command(&self, argv: &[&str]) -> Result<String> {
        let output = self.exec(argv).await?;
        expect_success("kubectl", &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
