//! Staging area — the ephemeral local directory holding one run's artifacts.
//!
//! Acquired at run start and released by drop on every exit path (normal
//! completion, propagated error, or the run future being dropped on
//! Ctrl-C). This replaces trap-style cleanup: removal happens exactly once,
//! without a signal handler.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Ephemeral local directory for one run. Never shared between runs.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh staging directory under the system temp location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("shipit-")
            .tempdir()
            .context("creating staging directory")?;
        Ok(Self { dir })
    }

    /// Root path other components resolve artifact paths against.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the staging area.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a staged text artifact and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
