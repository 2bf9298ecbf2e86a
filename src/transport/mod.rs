//! Transport abstraction over the two retrieval mechanisms.
//!
//! Both backends expose the same capability set so collection and
//! orchestration stay transport-agnostic; only backend selection differs.
//! Every operation is a discrete invocation of the underlying tool
//! (`ssh`/`scp` or `kubectl`) through a [`CommandRunner`], so tests can
//! substitute canned results.

pub mod pod;
pub mod ssh;

use std::process::Output;

use anyhow::Result;

use crate::bundle::RetrievedFile;
use crate::command_runner::CommandRunner;
use crate::config::Target;
use crate::error::TransportError;
use crate::staging::StagingArea;

pub use pod::PodTransport;
pub use ssh::SshTransport;

/// Root on the target under which module bundle directories live.
pub const APPLICATIONS_ROOT: &str = "/tmp/applications";

/// Default location of top-level bundle files when no module filter is set.
pub const DEFAULT_BUNDLE_DIR: &str = "/tmp";

/// Capability set shared by both backends.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// List directories under `root` whose name contains `name_pattern`.
    /// An empty result is a valid, non-error outcome.
    async fn find_directories(&self, root: &str, name_pattern: &str) -> Result<Vec<String>>;

    /// List files under `dir` ending in `suffix` (e.g. `".ship"`).
    async fn list_files(&self, dir: &str, suffix: &str) -> Result<Vec<String>>;

    /// Copy one remote artifact into the staging area.
    async fn fetch(&self, remote_path: &str, staging: &StagingArea) -> Result<RetrievedFile>;

    /// Retrieve all `suffix` files from the default bundle location.
    /// The mechanism differs per backend: ssh performs a single wildcard
    /// copy, the pod backend lists and fetches file by file.
    async fn fetch_default(&self, suffix: &str, staging: &StagingArea)
    -> Result<Vec<RetrievedFile>>;

    /// Execute `argv` on the target and return captured stdout.
    async fn run_command(&self, argv: &[&str]) -> Result<String>;
}

/// Transport backend bound to the resolved target.
pub enum Backend<R: CommandRunner> {
    Ssh(SshTransport<R>),
    Pod(PodTransport<R>),
}

impl<R: CommandRunner> Backend<R> {
    /// Bind the matching backend for `target`. Selection happens exactly
    /// once; all downstream logic is backend-agnostic.
    pub fn bind(target: &Target, runner: R) -> Self {
        match target {
            Target::Host(address) => Self::Ssh(SshTransport::new(address.clone(), runner)),
            Target::Pod(name) => Self::Pod(PodTransport::new(name.clone(), runner)),
        }
    }
}

impl<R: CommandRunner> Transport for Backend<R> {
    async fn find_directories(&self, root: &str, name_pattern: &str) -> Result<Vec<String>> {
        match self {
            Self::Ssh(t) => t.find_directories(root, name_pattern).await,
            Self::Pod(t) => t.find_directories(root, name_pattern).await,
        }
    }

    async fn list_files(&self, dir: &str, suffix: &str) -> Result<Vec<String>> {
        match self {
            Self::Ssh(t) => t.list_files(dir, suffix).await,
            Self::Pod(t) => t.list_files(dir, suffix).await,
        }
    }

    async fn fetch(&self, remote_path: &str, staging: &StagingArea) -> Result<RetrievedFile> {
        match self {
            Self::Ssh(t) => t.fetch(remote_path, staging).await,
            Self::Pod(t) => t.fetch(remote_path, staging).await,
        }
    }

    async fn fetch_default(
        &self,
        suffix: &str,
        staging: &StagingArea,
    ) -> Result<Vec<RetrievedFile>> {
        match self {
            Self::Ssh(t) => t.fetch_default(suffix, staging).await,
            Self::Pod(t) => t.fetch_default(suffix, staging).await,
        }
    }

    async fn run_command(&self, argv: &[&str]) -> Result<String> {
        match self {
            Self::Ssh(t) => t.run_command(argv).await,
            Self::Pod(t) => t.run_command(argv).await,
        }
    }
}

/// Map a non-zero exit to a [`TransportError::CommandFailed`].
pub(crate) fn expect_success(program: &str, output: &Output) -> Result<(), TransportError> {
    if output.status.success() {
        return Ok(());
    }
    Err(TransportError::CommandFailed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Non-empty stdout lines of a captured invocation.
pub(crate) fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// File-name component of a remote path, used to place fetched artifacts
/// in the staging area by name.
pub(crate) fn remote_file_name(remote_path: &str) -> &str {
    remote_path.rsplit('/').next().unwrap_or(remote_path)
}
