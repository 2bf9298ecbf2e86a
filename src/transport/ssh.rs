//! Remote-shell backend — every operation is a discrete `ssh`/`scp`
//! invocation against the target board as a fixed user.

use anyhow::Result;

use crate::bundle::{RetrievedFile, SuffixClass};
use crate::command_runner::CommandRunner;
use crate::error::TransportError;
use crate::staging::StagingArea;

use super::{DEFAULT_BUNDLE_DIR, Transport, expect_success, remote_file_name, stdout_lines};

/// Fixed login user on target boards.
pub const SSH_USER: &str = "root";

/// Non-interactive options for unattended board access.
const SSH_OPTS: &[&str] = &[
    "-o",
    "BatchMode=yes",
    "-o",
    "StrictHostKeyChecking=no",
];

/// Remote-shell transport bound to one board address.
pub struct SshTransport<R> {
    address: String,
    runner: R,
}

impl<R: CommandRunner> SshTransport<R> {
    #[must_use]
    pub fn new(address: String, runner: R) -> Self {
        Self { address, runner }
    }

    fn login(&self) -> String {
        format!("{SSH_USER}@{}", self.address)
    }

    async fn ssh(&self, remote_argv: &[&str]) -> Result<std::process::Output> {
        let login = self.login();
        let mut args: Vec<&str> = SSH_OPTS.to_vec();
        args.push(&login);
        args.extend_from_slice(remote_argv);
        self.runner.run("ssh", &args).await
    }
}

impl<R: CommandRunner> Transport for SshTransport<R> {
    async fn find_directories(&self, root: &str, name_pattern: &str) -> Result<Vec<String>> {
        let pattern = format!("*{name_pattern}*");
        let output = self
            .ssh(&[
                "find", root, "-mindepth", "1", "-maxdepth", "1", "-type", "d", "-name", &pattern,
            ])
            .await?;
        expect_success("ssh", &output)?;
        Ok(stdout_lines(&output))
    }

    async fn list_files(&self, dir: &str, suffix: &str) -> Result<Vec<String>> {
        let pattern = format!("*{suffix}");
        let output = self
            .ssh(&[
                "find", dir, "-mindepth", "1", "-maxdepth", "1", "-type", "f", "-name", &pattern,
            ])
            .await?;
        expect_success("ssh", &output)?;
        Ok(stdout_lines(&output))
    }

    async fn fetch(&self, remote_path: &str, staging: &StagingArea) -> Result<RetrievedFile> {
        let local_path = staging.join(remote_file_name(remote_path));
        let source = format!("{}:{remote_path}", self.login());
        let local = local_path.to_string_lossy().to_string();

        let mut args: Vec<&str> = SSH_OPTS.to_vec();
        args.push(&source);
        args.push(&local);
        let output = self.runner.run("scp", &args).await?;
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
        // One wildcard copy; the glob expands on the remote side.
        let source = format!("{}:{DEFAULT_BUNDLE_DIR}/*{suffix}", self.login());
        let dest = staging.root().to_string_lossy().to_string();

        let mut args: Vec<&str> = SSH_OPTS.to_vec();
        args.push(&source);
        args.push(&dest);
        let output = self.runner.run("scp", &args).await?;
        if !output.status.success() {
            return Err(TransportError::CopyFailed {
                remote: format!("{DEFAULT_BUNDLE_DIR}/*{suffix}"),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let mut files = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(staging.root())?
            .collect::<std::io::Result<_>>()?;
        entries.sort_by_key(std::fs::DirEntry::file_name);
        for entry in entries {
            let local_path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if local_path.is_file() && name.ends_with(suffix) {
                files.push(RetrievedFile {
                    remote_path: format!("{DEFAULT_BUNDLE_DIR}/{name}"),
                    kind: SuffixClass::of(&local_path),
                    local_path,
                });
            }
        }
        Ok(files)
    }

    async fn run_command(&self, argv: &[&str]) -> Result<String> {
        let output = self.ssh(argv).await?;
        expect_success("ssh", &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
