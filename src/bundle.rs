//! Bundle model — the staged input handed to the presentation stage.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Serialize;

use crate::staging::StagingArea;

/// File name of the staged bundle description.
pub const BUNDLE_JSON: &str = "shipit.json";

/// Suffix class of a retrieved artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixClass {
    Ship,
    Whip,
}

impl SuffixClass {
    /// Classify a path by its extension. Defaults to `Ship` for unknown
    /// extensions (module-scoped retrieval only ever fetches `.ship`).
    #[must_use]
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("whip") => Self::Whip,
            _ => Self::Ship,
        }
    }
}

/// One artifact copied from the target into the staging area.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedFile {
    /// Path on the target the artifact was copied from.
    pub remote_path: String,
    /// Path inside the staging area.
    pub local_path: PathBuf,
    /// Suffix class (`ship` / `whip`).
    pub kind: SuffixClass,
}

/// Captured output of the target's `um list` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct MailboxSnapshot {
    /// Staged file holding the raw listing.
    pub local_path: PathBuf,
}

/// The complete staged input to the presentation stage.
#[derive(Debug, Serialize)]
pub struct Bundle {
    pub files: Vec<RetrievedFile>,
    pub mailbox: MailboxSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_filter: Option<String>,
}

impl Bundle {
    /// Finalize the bundle once retrieval completes.
    ///
    /// # Errors
    ///
    /// Returns an error if any retrieved file has an empty local path; the
    /// bundle is not complete until every artifact landed in staging.
    pub fn finalize(
        files: Vec<RetrievedFile>,
        mailbox: MailboxSnapshot,
        timestamp_filter: Option<String>,
    ) -> Result<Self> {
        for file in &files {
            ensure!(
                !file.local_path.as_os_str().is_empty(),
                "retrieved file '{}' has no local path",
                file.remote_path
            );
        }
        Ok(Self {
            files,
            mailbox,
            timestamp_filter,
        })
    }

    /// Stage the JSON bundle description and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json(&self, staging: &StagingArea) -> Result<PathBuf> {
        let path = staging.join(BUNDLE_JSON);
        let json = serde_json::to_string_pretty(self).context("serializing bundle")?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Path of the staged mailbox listing.
    #[must_use]
    pub fn mailbox_path(&self) -> &Path {
        &self.mailbox.local_path
    }
}
