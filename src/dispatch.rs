//! Secondary dispatch — hand the staged bundle to the Angela publishing
//! tool. Requires a one-time login artifact; the login flow runs
//! interactively when the artifact is absent.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::bundle::Bundle;
use crate::command_runner::CommandRunner;
use crate::output::OutputContext;

/// External publishing tool.
pub const DISPATCH_TOOL: &str = "angela";

/// Session artifact created by `angela login`.
pub struct LoginArtifact {
    path: PathBuf,
}

impl LoginArtifact {
    /// Artifact at the default location, `~/.angela/session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".angela").join("session")))
    }

    /// Artifact at an arbitrary path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Publish the bundle through the dispatch tool, logging in first when no
/// session artifact exists.
///
/// # Errors
///
/// Returns an error if the login flow or the publish invocation fails.
pub async fn publish<R: CommandRunner>(
    runner: &R,
    artifact: &LoginArtifact,
    bundle: &Bundle,
    ctx: &OutputContext,
) -> Result<()> {
    if !artifact.exists() {
        ctx.info("No Angela session found, logging in.");
        let status = runner
            .run_status(DISPATCH_TOOL, &["login"])
            .await
            .context("running angela login")?;
        if !status.success() {
            bail!("angela login failed with {status}");
        }
    }

    let mut args: Vec<String> = vec!["add".to_string()];
    args.extend(
        bundle
            .files
            .iter()
            .map(|f| f.local_path.to_string_lossy().to_string()),
    );
    args.push(bundle.mailbox_path().to_string_lossy().to_string());

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = runner
        .run(DISPATCH_TOOL, &arg_refs)
        .await
        .context("running angela add")?;
    if !output.status.success() {
        bail!(
            "angela add failed with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    ctx.success("Bundle dispatched to Angela.");
    Ok(())
}
